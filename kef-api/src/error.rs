use kef_client::ClientError;
use thiserror::Error;

/// High-level API errors for KEF speaker operations
///
/// This enum abstracts away the HTTP transport and gives every caller the
/// same small vocabulary of failures. It is `Clone` so that a single failed
/// fetch can be handed to every task waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network communication error
    ///
    /// The speaker could not be reached: DNS failure, refused connection,
    /// reset, or an unreachable host.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The request exceeded its deadline
    #[error("Request timed out")]
    Timeout,

    /// The speaker answered with a non-success HTTP status
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Response parsing error
    ///
    /// The speaker answered, but the body did not have the shape expected
    /// for the requested path.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid parameter value
    ///
    /// Returned before any request is made, e.g. a volume above 100.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ApiError {
    /// Whether the failure happened at the transport level
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ApiError::NetworkError(_) | ApiError::Timeout | ApiError::HttpStatus(_)
        )
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Network(msg) => ApiError::NetworkError(msg),
            ClientError::Timeout => ApiError::Timeout,
            ClientError::Status(code) => ApiError::HttpStatus(code),
            ClientError::Parse(msg) => ApiError::ParseError(msg),
        }
    }
}
