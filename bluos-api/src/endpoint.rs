use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// TCP port players listen on unless configured otherwise
pub const DEFAULT_PORT: u16 = 11000;

/// Network address of a player's HTTP interface.
///
/// An endpoint is bound once when a [`Player`](crate::Player) is created and
/// stays fixed for the lifetime of that client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Host name or IP address
    pub host: String,
    /// HTTP port, usually [`DEFAULT_PORT`]
    pub port: u16,
}

impl Endpoint {
    /// Create an endpoint from a host and an explicit port.
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
        }
    }

    /// Create an endpoint on the default player port.
    pub fn with_default_port(host: &str) -> Self {
        Self::new(host, DEFAULT_PORT)
    }
}

impl fmt::Display for Endpoint {
    /// `host:port`, with IPv6 hosts bracketed so the form re-parses.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Endpoint {
    type Err = ApiError;

    /// Parse `HOST`, `HOST:PORT`, or the bracketed `[IPV6]`/`[IPV6]:PORT`
    /// forms. A bare IPv6 address counts as a host.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ApiError::Parse("empty endpoint".to_string()));
        }
        if let Some(rest) = s.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| ApiError::Parse(format!("unclosed bracket in '{}'", s)))?;
            if host.is_empty() {
                return Err(ApiError::Parse(format!("missing host in '{}'", s)));
            }
            return match after.strip_prefix(':') {
                Some(port) => {
                    let port = port
                        .parse::<u16>()
                        .map_err(|_| ApiError::Parse(format!("invalid port in '{}'", s)))?;
                    Ok(Self::new(host, port))
                }
                None if after.is_empty() => Ok(Self::with_default_port(host)),
                None => Err(ApiError::Parse(format!(
                    "unexpected '{}' after the bracketed host in '{}'",
                    after, s
                ))),
            };
        }
        match s.rsplit_once(':') {
            // More than one colon means a bare IPv6 address, not HOST:PORT
            Some((host, _)) if host.contains(':') => Ok(Self::with_default_port(s)),
            Some((host, port)) => {
                if host.is_empty() {
                    return Err(ApiError::Parse(format!("missing host in '{}'", s)));
                }
                let port = port
                    .parse::<u16>()
                    .map_err(|_| ApiError::Parse(format!("invalid port in '{}'", s)))?;
                Ok(Self::new(host, port))
            }
            None => Ok(Self::with_default_port(s)),
        }
    }
}
