use thiserror::Error;

use bluos_api::ApiError;

/// Errors that can occur during player discovery
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The service browser binary is not installed or not on the PATH
    #[error("browser tool '{0}' not found; install Avahi or configure another tool")]
    ToolNotFound(String),

    /// The browser ran but did not complete a scan
    #[error("service browse failed: {0}")]
    Browse(String),

    /// A resolved record did not have the expected shape
    #[error("unparsable browse record: {0}")]
    Parse(String),

    /// A candidate endpoint failed the identity probe
    #[error("identity probe failed: {0}")]
    Probe(#[from] ApiError),
}

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;
