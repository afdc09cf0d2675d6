use crate::{
    client::{Endpoint, ObjectHttpClient},
    data_types::peloton::{
        activity::{RidePointer, Workout, WorkoutPage},
        performance::PerformanceGraph,
        ride::RideDetail,
    },
    errors::SyncResult,
    logvbln,
    processors::feeds::{FeedIter, SourceActivityFeed},
    util::cursors::{Page, PageCursor},
};

use super::{auth::PelotonSession, PELOTON_BASE_URL};

const WORKOUTS_PER_PAGE: usize = 100;

pub struct PelotonApi {
    session: PelotonSession,
}

impl PelotonApi {
    const CC: &'static str = "PelotonApi";

    pub fn new(session: PelotonSession) -> Self {
        Self { session }
    }

    fn endpoint(&self, path: &[&str]) -> Endpoint {
        Endpoint::of(PELOTON_BASE_URL)
            .path(path)
            .header("cookie", &self.session.to_cookies())
    }

    pub fn workouts(&self, page: usize, limit: usize) -> SyncResult<WorkoutPage> {
        logvbln!("Fetching workouts page {}", page);

        ObjectHttpClient::get(
            &self
                .endpoint(&["api", "user", &self.session.user_id, "workouts"])
                .query("joins", "ride")
                .query("limit", limit)
                .query("page", page),
        )
    }
}

impl SourceActivityFeed for PelotonApi {
    fn activities(&self) -> FeedIter<'_, Workout> {
        Box::new(PageCursor::new(move |page| {
            let workouts = self.workouts(page, WORKOUTS_PER_PAGE)?;
            Ok(Page {
                has_more: page + 1 < workouts.page_count,
                items: workouts.data,
            })
        }))
    }

    fn ride_detail(&self, ride: &RidePointer) -> SyncResult<RideDetail> {
        ObjectHttpClient::get(
            &self
                .endpoint(&["api", "ride", &ride.id, "details"])
                .query("stream_source", "multichannel"),
        )
    }

    fn telemetry(&self, workout_id: &str) -> SyncResult<PerformanceGraph> {
        ObjectHttpClient::get(
            &self
                .endpoint(&["api", "workout", workout_id, "performance_graph"])
                .query("every_n", 1),
        )
    }
}
