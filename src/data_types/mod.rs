pub mod common;
pub mod garmin;
pub mod peloton;
pub mod sync;
pub mod telemetry;
pub mod units;
pub mod workout;
