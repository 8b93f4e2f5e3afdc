//! Error types for the HTTP client

use thiserror::Error;

/// Errors that can occur while talking to the speaker's HTTP API
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection-level failure (DNS, refused, reset, ...)
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The request did not complete within the configured deadline
    #[error("Request timed out")]
    Timeout,

    /// The speaker answered with a non-success status code
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// The response body was not the JSON shape we expected
    #[error("JSON parsing error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ClientError::Timeout
        } else if let Some(status) = error.status() {
            ClientError::Status(status.as_u16())
        } else if error.is_decode() {
            ClientError::Parse(error.to_string())
        } else {
            ClientError::Network(error.to_string())
        }
    }
}
