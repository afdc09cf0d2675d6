pub mod api;
pub mod auth;

pub const PELOTON_BASE_URL: &str = "https://api.onepeloton.com/";
