use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{
    data_types::{
        common::Timestamped,
        garmin::activity::{activity_link, GarminActivity},
        peloton::activity::{RidePointer, Workout},
        sync::{
            validate_sync_window, CandidateOutcome, FailedSync, SyncRecord, SyncResponse,
            SyncState,
        },
    },
    errors::SyncResult,
    logln, logvbln,
    processors::{
        feeds::{SinkActivityFeed, SourceActivityFeed},
        lap_mapper::LapMapper,
        matcher::{ActivityMatcher, MatchDecision, MATCH_WINDOW_SECONDS},
        normalizer::TelemetryNormalizer,
        tcx_renderer::TcxRenderer,
    },
    util::{
        facilities::{Facilities, Required},
        time::Benchmark,
        DateTimeUtils,
    },
};

/// Walks recent source workouts and makes sure each cycling one exists on the sink.
pub struct SyncOrchestrator<'a> {
    source: &'a dyn SourceActivityFeed,
    sink: &'a dyn SinkActivityFeed,
    gear_name: String,
}

impl<'a> SyncOrchestrator<'a> {
    const CC: &'static str = "Orchestrator";

    pub fn new(facilities: &Facilities<'a>, gear_name: &str) -> SyncResult<Self> {
        facilities.check(&[Required::Source, Required::Sink])?;

        Ok(Self {
            source: facilities.source()?,
            sink: facilities.sink()?,
            gear_name: gear_name.to_string(),
        })
    }

    /// Syncs every cycling workout started in the `num_days` before `now`.
    ///
    /// A candidate that fails is reported in `failures` and the walk goes on. Only a failing
    /// listing stops the run early, keeping whatever was already recorded.
    pub fn sync_last_n_days(&self, now: DateTime<Utc>, num_days: i64) -> SyncResponse {
        if let Err(e) = validate_sync_window(num_days) {
            return SyncResponse::from_error(e);
        }

        let cutoff = now - Duration::days(num_days);
        logln!("Syncing workouts started after {}", cutoff);

        let recent_sink = match self.recent_sink_activities(cutoff) {
            Ok(activities) => activities,
            Err(e) => {
                logln!("Could not list sink activities: {}", e);
                return SyncResponse::from_error(e);
            }
        };
        logvbln!("{} sink activities since cutoff", recent_sink.len());

        let mut response = SyncResponse {
            result: Some(Vec::new()),
            ..Default::default()
        };

        for workout in self.source.activities() {
            let workout = match workout {
                Ok(workout) => workout,
                Err(e) => {
                    logln!("Source listing failed: {}", e);
                    response.error = Some(e.to_string());
                    break;
                }
            };

            if workout.start_instant() <= cutoff {
                break;
            }

            let ride = match (&workout.ride, workout.is_cycling()) {
                (Some(ride), true) => ride,
                _ => {
                    logvbln!("Skipping {} workout {}", workout.fitness_discipline, workout.id);
                    continue;
                }
            };

            response.push(self.sync_candidate(&workout, ride, &recent_sink));
        }

        logln!(
            "Done: {} recorded, {} created, {} failed",
            response.result.as_ref().map_or(0, Vec::len),
            response.created(),
            response.failures.len()
        );

        response
    }

    /// Sink activities that can still match a workout newer than `cutoff`.
    fn recent_sink_activities(&self, cutoff: DateTime<Utc>) -> SyncResult<Vec<GarminActivity>> {
        let floor = cutoff - Duration::seconds(MATCH_WINDOW_SECONDS);
        let mut recent = Vec::new();

        for activity in self.sink.activities() {
            let activity = activity?;
            if activity.start_instant() <= floor {
                break;
            }
            recent.push(activity);
        }

        Ok(recent)
    }

    fn sync_candidate(
        &self,
        workout: &Workout,
        ride: &RidePointer,
        recent_sink: &[GarminActivity],
    ) -> CandidateOutcome {
        let _benchmark = Benchmark::start(format!("Workout {}", workout.id));
        let mut state = SyncState::Pending;

        match self.run_candidate(workout, ride, recent_sink, &mut state) {
            Ok(record) => CandidateOutcome::Synced(record),
            Err(e) => {
                logln!("Workout {} failed at {}: {}", workout.id, state, e);
                CandidateOutcome::Failed(FailedSync {
                    activity_date: DateTimeUtils::epoch_to_utc_date(workout.created).ok(),
                    peloton_link: workout.link(),
                    reached: state,
                    error: e.to_string(),
                })
            }
        }
    }

    fn run_candidate(
        &self,
        workout: &Workout,
        ride: &RidePointer,
        recent_sink: &[GarminActivity],
        state: &mut SyncState,
    ) -> SyncResult<SyncRecord> {
        let activity_date = DateTimeUtils::epoch_to_utc_date(workout.created)?;

        let decision =
            ActivityMatcher::find_match(recent_sink.iter().map(SyncResult::Ok), workout.start_instant())?;

        if let MatchDecision::Match(existing) = decision {
            self.transition(workout, state, SyncState::Matched);
            return Ok(record(workout, ride, activity_date, existing.activity_id, false));
        }

        let detail = self.source.ride_detail(ride)?;
        let graph = self.source.telemetry(&workout.id)?;

        let series = TelemetryNormalizer::from_performance_graph(&graph, workout.start_instant())?;
        let laps = LapMapper::new(&series, detail.ride.duration, graph.total_calories()?)
            .map_laps(&graph.segments)?;
        let tcx = TcxRenderer::render(&laps, workout.start_instant(), &detail.ride.notes())?;

        self.transition(workout, state, SyncState::Uploading);
        let activity_id = self.sink.upload(&tcx)?;
        logln!("Workout {} uploaded as {}", workout.id, activity_id);

        self.sink
            .update_title(activity_id, &detail.ride.title_with_instructor())?;
        self.sink
            .update_description(activity_id, &detail.ride.description)?;
        self.transition(workout, state, SyncState::MetadataUpdated);

        self.sink
            .assign_gear(activity_id, activity_date, &self.gear_name)?;
        self.transition(workout, state, SyncState::GearAssigned);

        self.transition(workout, state, SyncState::Created);
        Ok(record(workout, ride, activity_date, activity_id, true))
    }

    fn transition(&self, workout: &Workout, state: &mut SyncState, next: SyncState) {
        logvbln!("Workout {}: {} -> {}", workout.id, state, next);
        *state = next;
    }
}

fn record(
    workout: &Workout,
    ride: &RidePointer,
    activity_date: NaiveDate,
    garmin_id: i64,
    was_created: bool,
) -> SyncRecord {
    SyncRecord {
        activity_date,
        title: ride.title.clone(),
        description: ride.description.clone(),
        peloton_link: workout.link(),
        garmin_link: activity_link(garmin_id),
        was_created,
    }
}
