use thiserror::Error;

/// Errors that can occur when talking to a player
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection or HTTP-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// The player did not answer within the request timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// A response was missing a required field or held an unexpected value
    #[error("Parse error: {0}")]
    Parse(String),

    /// A named preset or album did not resolve to anything on the player
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, ApiError>;
