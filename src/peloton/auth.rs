use crate::{
    client::{Endpoint, ObjectHttpClient},
    data_types::peloton::{LoginRequest, LoginResponse},
    errors::{SyncError, SyncResult},
    logln,
};

use super::PELOTON_BASE_URL;

/// An authenticated Peloton session.
#[derive(Debug, Clone, PartialEq)]
pub struct PelotonSession {
    pub session_id: String,
    pub user_id: String,
}

impl PelotonSession {
    const CC: &'static str = "PelotonAuth";

    pub fn login(email: &str, password: &str) -> SyncResult<Self> {
        let response: LoginResponse = ObjectHttpClient::post(
            &Endpoint::of(PELOTON_BASE_URL).path(&["auth", "login"]),
            Some(&LoginRequest {
                username_or_email: email,
                password,
            }),
        )
        .map_err(|e| match e {
            SyncError::Upstream(error) => {
                SyncError::Upstream(error.with_comment("Error while logging in to Peloton"))
            }
            other => other,
        })?;

        logln!("Logged in as Peloton user {}", response.user_id);

        Ok(Self {
            session_id: response.session_id,
            user_id: response.user_id,
        })
    }

    pub fn to_cookies(&self) -> String {
        format!("peloton_session_id={}", self.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_carries_session_id() {
        let session = PelotonSession {
            session_id: "s3ss10n".to_string(),
            user_id: "u1".to_string(),
        };

        assert_eq!(session.to_cookies(), "peloton_session_id=s3ss10n");
    }
}
