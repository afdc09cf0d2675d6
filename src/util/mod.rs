use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};

use crate::errors::{SyncError, SyncResult};

pub mod cursors;
pub mod facilities;
pub mod logging;
pub mod time;

const GARMIN_GMT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct DateTimeUtils {}

impl DateTimeUtils {
    /// ISO-8601 with millisecond precision and a UTC offset, e.g. `2021-03-01T12:30:00.000Z`.
    pub fn to_tcx_instant(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn epoch_to_instant(timestamp: i64) -> SyncResult<DateTime<Utc>> {
        DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
            SyncError::data_shape(format!("timestamp {} is out of range", timestamp))
        })
    }

    pub fn epoch_to_utc_date(timestamp: i64) -> SyncResult<NaiveDate> {
        Ok(DateTimeUtils::epoch_to_instant(timestamp)?.date_naive())
    }

    pub fn garmin_gmt_to_instant(gmt: &str) -> SyncResult<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(gmt, GARMIN_GMT_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|e| SyncError::data_shape(format!("bad Garmin start time '{}': {}", gmt, e)))
    }
}

/// serde adapter for Garmin's `startTimeGMT` field.
pub fn deserialize_garmin_gmt<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTimeUtils::garmin_gmt_to_instant(&raw).map_err(serde::de::Error::custom)
}
