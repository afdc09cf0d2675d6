use chrono::NaiveDate;

use crate::{
    data_types::{
        garmin::activity::{GarminActivity, GarminActivityId},
        peloton::{
            activity::{RidePointer, Workout},
            performance::PerformanceGraph,
            ride::RideDetail,
        },
        workout::Tcx,
    },
    errors::SyncResult,
};

pub type FeedIter<'a, T> = Box<dyn Iterator<Item = SyncResult<T>> + 'a>;

/// The platform workouts are read from.
pub trait SourceActivityFeed {
    /// Workouts, newest first. Pages are fetched only as the iterator is consumed.
    fn activities(&self) -> FeedIter<'_, Workout>;

    fn ride_detail(&self, ride: &RidePointer) -> SyncResult<RideDetail>;

    fn telemetry(&self, workout_id: &str) -> SyncResult<PerformanceGraph>;
}

/// The platform workouts are written to.
pub trait SinkActivityFeed {
    /// Activities, newest first. Pages are fetched only as the iterator is consumed.
    fn activities(&self) -> FeedIter<'_, GarminActivity>;

    fn upload(&self, tcx: &Tcx) -> SyncResult<GarminActivityId>;

    fn update_title(&self, activity_id: GarminActivityId, title: &str) -> SyncResult<()>;

    fn update_description(&self, activity_id: GarminActivityId, description: &str)
        -> SyncResult<()>;

    /// Leaves `gear_name` as the only gear linked to the activity.
    fn assign_gear(
        &self,
        activity_id: GarminActivityId,
        activity_date: NaiveDate,
        gear_name: &str,
    ) -> SyncResult<()>;
}
