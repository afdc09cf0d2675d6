use chrono::{DateTime, Duration, Utc};

use crate::{data_types::common::Timestamped, errors::SyncResult, logvbln};

/// Two activities starting this close together are taken to be the same ride.
pub const MATCH_WINDOW_SECONDS: i64 = 120;

#[derive(Debug, PartialEq)]
pub enum MatchDecision<A> {
    Match(A),
    NoMatch,
}

impl<A> MatchDecision<A> {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchDecision::Match(_))
    }
}

pub struct ActivityMatcher;

impl ActivityMatcher {
    const CC: &'static str = "Matcher";

    /// Scans `entries`, newest first, for one starting within the match window of
    /// `candidate_start`. Stops at the first entry that is already older than the window.
    pub fn find_match<I, A>(entries: I, candidate_start: DateTime<Utc>) -> SyncResult<MatchDecision<A>>
    where
        I: IntoIterator<Item = SyncResult<A>>,
        A: Timestamped,
    {
        let window = Duration::seconds(MATCH_WINDOW_SECONDS);
        let mut scanned = 0;

        for entry in entries {
            let entry = entry?;
            scanned += 1;
            let delta = entry.start_instant() - candidate_start;

            if delta <= window && delta >= -window {
                logvbln!(
                    "Match for {} after {} entries ({}ms apart)",
                    candidate_start,
                    scanned,
                    delta.num_milliseconds()
                );
                return Ok(MatchDecision::Match(entry));
            }

            if entry.start_instant() < candidate_start - window {
                break;
            }
        }

        logvbln!("No match for {} after {} entries", candidate_start, scanned);
        Ok(MatchDecision::NoMatch)
    }
}
