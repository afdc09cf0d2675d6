pub mod activity;
pub mod performance;
pub mod ride;

use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username_or_email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub session_id: String,
    pub user_id: String,
}
