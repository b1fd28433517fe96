//! Blocking HTTP transport for the player's XML interface.

use std::io;
use std::time::Duration;

use xmltree::{Element, XMLNode};

use crate::endpoint::Endpoint;
use crate::error::{ApiError, Result};

/// Fixed timeout applied to every request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client bound to a single player endpoint.
///
/// Every request is a plain GET against `http://host:port/<path>` and the
/// response body is parsed into a sequence of document nodes. Players answer
/// some control requests with empty or informal bodies; those parse to an
/// empty sequence rather than an error.
#[derive(Debug, Clone)]
pub struct Transport {
    agent: ureq::Agent,
    endpoint: Endpoint,
}

impl Transport {
    /// Create a transport bound to `endpoint`.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            endpoint,
        }
    }

    /// The endpoint this transport is bound to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Issue a GET for `path` and parse the body into document nodes.
    ///
    /// `path` is relative to the endpoint root and must already be
    /// percent-encoded where needed.
    pub fn fetch(&self, path: &str) -> Result<Vec<XMLNode>> {
        let url = format!("http://{}/{}", self.endpoint, path);
        tracing::debug!("GET {}", url);

        let response = self.agent.get(&url).call().map_err(map_request_error)?;
        let body = response.into_string().map_err(map_read_error)?;

        Ok(parse_document(&body))
    }
}

/// Parse a response body into its root-level nodes.
///
/// Bodies that are empty or not well-formed yield an empty sequence.
pub(crate) fn parse_document(body: &str) -> Vec<XMLNode> {
    match Element::parse(body.as_bytes()) {
        Ok(root) => vec![XMLNode::Element(root)],
        Err(_) => Vec::new(),
    }
}

fn map_request_error(error: ureq::Error) -> ApiError {
    match error {
        ureq::Error::Status(code, _) => ApiError::Network(format!("player answered HTTP {}", code)),
        other => {
            if is_timeout(&other) {
                ApiError::Timeout(other.to_string())
            } else {
                ApiError::Network(other.to_string())
            }
        }
    }
}

fn map_read_error(error: io::Error) -> ApiError {
    match error.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ApiError::Timeout(error.to_string()),
        _ => ApiError::Network(error.to_string()),
    }
}

/// Walk the error's source chain looking for a timed-out IO operation.
fn is_timeout(error: &ureq::Error) -> bool {
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            if matches!(
                io_error.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ) {
                return true;
            }
        }
        source = cause.source();
    }
    false
}
