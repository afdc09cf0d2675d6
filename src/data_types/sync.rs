use std::fmt;

use chrono::NaiveDate;
use serde_derive::{Deserialize, Serialize};

use crate::errors::{SyncError, SyncResult};

pub const MAX_DAYS_TO_SYNC: i64 = 30;

/// Where a candidate got to before it was recorded or abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncState {
    Pending,
    Matched,
    Uploading,
    MetadataUpdated,
    GearAssigned,
    Created,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRecord {
    pub activity_date: NaiveDate,
    pub title: String,
    pub description: String,
    pub peloton_link: String,
    pub garmin_link: String,
    pub was_created: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedSync {
    pub activity_date: Option<NaiveDate>,
    pub peloton_link: String,
    /// `Uploading` or later means a partial Garmin activity may exist.
    pub reached: SyncState,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Synced(SyncRecord),
    Failed(FailedSync),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub result: Option<Vec<SyncRecord>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailedSync>,
    pub error: Option<String>,
}

impl SyncResponse {
    pub fn from_error(error: impl fmt::Display) -> Self {
        Self {
            result: None,
            failures: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn push(&mut self, outcome: CandidateOutcome) {
        match outcome {
            CandidateOutcome::Synced(record) => {
                self.result.get_or_insert_with(Vec::new).push(record)
            }
            CandidateOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    pub fn created(&self) -> usize {
        self.result
            .as_ref()
            .map_or(0, |records| records.iter().filter(|r| r.was_created).count())
    }
}

/// Body of `PUT /api/synchronize/peloton-to-garmin`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncRequest {
    pub peloton_email: String,
    pub peloton_password: String,
    pub garmin_email: String,
    pub garmin_password: String,
    pub garmin_peloton_gear_name: String,
    pub num_days_to_sync: i64,
}

impl SyncRequest {
    pub fn validate(&self) -> SyncResult<()> {
        let missing: Vec<&str> = [
            ("pelotonEmail", &self.peloton_email),
            ("pelotonPassword", &self.peloton_password),
            ("garminEmail", &self.garmin_email),
            ("garminPassword", &self.garmin_password),
            ("garminPelotonGearName", &self.garmin_peloton_gear_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(SyncError::Configuration(format!(
                "Some required fields were missing or empty: [{}]",
                missing.join(", ")
            )));
        }

        validate_sync_window(self.num_days_to_sync)
    }
}

pub fn validate_sync_window(num_days: i64) -> SyncResult<()> {
    if !(1..=MAX_DAYS_TO_SYNC).contains(&num_days) {
        return Err(SyncError::Configuration(format!(
            "numDaysToSync must be between 1 and {}",
            MAX_DAYS_TO_SYNC
        )));
    }

    Ok(())
}
