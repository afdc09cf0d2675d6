use std::fmt;

use thiserror::Error;

/// Status reported for failures that never produced an HTTP response.
pub const NO_RESPONSE_STATUS: u32 = 500;

/// A failed exchange with Peloton or Garmin.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    pub status: u32,
    pub body: String,
    pub comment: Option<String>,
}

impl HttpError {
    pub fn from_response(status: u32, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn no_response(comment: &str) -> Self {
        Self {
            status: NO_RESPONSE_STATUS,
            body: "<>".to_string(),
            comment: Some(comment.to_string()),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.comment.as_deref().unwrap_or("Error"),
            self.status,
            self.body
        )
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Malformed telemetry: {0}")]
    DataShape(String),

    #[error("Not enough data to render lap {lap}: {trackpoints} trackpoint(s)")]
    InsufficientData { lap: usize, trackpoints: usize },

    #[error("Upstream request failed: {0}")]
    Upstream(HttpError),

    #[error("{0}")]
    Configuration(String),
}

impl SyncError {
    pub fn data_shape(message: impl Into<String>) -> Self {
        SyncError::DataShape(message.into())
    }

    pub fn upstream(comment: &str) -> Self {
        SyncError::Upstream(HttpError::no_response(comment))
    }
}

impl From<HttpError> for SyncError {
    fn from(error: HttpError) -> Self {
        SyncError::Upstream(error)
    }
}

impl From<curl::Error> for SyncError {
    fn from(error: curl::Error) -> Self {
        SyncError::upstream(&format!("Error while making HTTP request: {}", error))
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_carries_status_and_body() {
        let error: SyncError = HttpError::from_response(403, "forbidden")
            .with_comment("Error while logging in")
            .into();

        assert_eq!(
            error.to_string(),
            "Upstream request failed: Error while logging in: 403: forbidden"
        );
    }

    #[test]
    fn transport_failures_report_placeholder_body() {
        let error = HttpError::no_response("Failed to initialize token after 7 redirects");

        assert_eq!(error.status, NO_RESPONSE_STATUS);
        assert_eq!(error.body, "<>");
    }
}
