pub mod api;
pub mod auth;

pub const GARMIN_BASE_URL: &str = "https://connect.garmin.com/modern/";
