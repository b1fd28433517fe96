//! Invocation and parsing of the external zeroconf browser.

use std::io;
use std::process::Command;

use bluos_api::Endpoint;

use crate::error::{DiscoveryError, Result};

/// Zeroconf service type players announce themselves under
pub const SERVICE_TYPE: &str = "_musc._tcp";

/// Browser binary used when none is configured
pub const DEFAULT_TOOL: &str = "avahi-browse";

/// Handle for running the external service browser.
///
/// The browser is an external capability; a host without it can still use
/// every other part of the client by entering endpoints directly.
#[derive(Debug, Clone)]
pub struct Browser {
    tool: String,
}

impl Browser {
    /// Use a specific browser binary, either a name on the PATH or an
    /// absolute path.
    pub fn new(tool: &str) -> Self {
        Self {
            tool: tool.to_string(),
        }
    }

    /// The binary this browser invokes.
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Scan the local network for player endpoints.
    ///
    /// Runs one terminating scan and returns the endpoints of every
    /// resolved record, deduplicated in first-seen order. Scans are
    /// best-effort: they can take several seconds, and players on a busy
    /// network may be missed entirely.
    pub fn browse(&self) -> Result<Vec<Endpoint>> {
        let output = Command::new(&self.tool)
            .args([
                "--terminate",
                "--parsable",
                "--resolve",
                "--no-db-lookup",
                SERVICE_TYPE,
            ])
            .output()
            .map_err(|error| self.spawn_error(error))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DiscoveryError::Browse(format!(
                "{} exited with {}: {}",
                self.tool,
                output.status,
                stderr.trim()
            )));
        }

        endpoints_from(&String::from_utf8_lossy(&output.stdout))
    }

    fn spawn_error(&self, error: io::Error) -> DiscoveryError {
        if error.kind() == io::ErrorKind::NotFound {
            DiscoveryError::ToolNotFound(self.tool.clone())
        } else {
            DiscoveryError::Browse(format!("failed to run {}: {}", self.tool, error))
        }
    }
}

impl Default for Browser {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

/// Parse browser output into endpoints.
///
/// Only `=` records (fully resolved services) carry an address and port;
/// every other line is skipped. Duplicate endpoints keep their first
/// position.
fn endpoints_from(output: &str) -> Result<Vec<Endpoint>> {
    let mut endpoints: Vec<Endpoint> = Vec::new();
    for line in output.lines() {
        if !line.starts_with('=') {
            continue;
        }
        let endpoint = parse_record(line)?;
        if !endpoints.contains(&endpoint) {
            tracing::debug!("resolved player candidate at {}", endpoint);
            endpoints.push(endpoint);
        }
    }
    Ok(endpoints)
}

/// Parse one resolved record: `;`-delimited with the address in field 7
/// and the port in field 8.
fn parse_record(line: &str) -> Result<Endpoint> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() < 9 {
        return Err(DiscoveryError::Parse(format!(
            "expected at least 9 fields, got {} in '{}'",
            fields.len(),
            line
        )));
    }
    let host = fields[7];
    let port = fields[8]
        .parse::<u16>()
        .map_err(|_| DiscoveryError::Parse(format!("invalid port '{}' in '{}'", fields[8], line)))?;
    Ok(Endpoint::new(host, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        "=;eth0;IPv4;Living\\032Room;_musc._tcp;local;living.local;10.0.0.5;11000;",
        "10.0.0.5",
        11000
    )]
    #[case(
        "=;wlan0;IPv4;Kitchen;_musc._tcp;local;kitchen.local;192.168.1.20;11000;\"model=N130\"",
        "192.168.1.20",
        11000
    )]
    #[case(
        "=;eth0;IPv6;Den;_musc._tcp;local;den.local;fe80::1;11000;",
        "fe80::1",
        11000
    )]
    fn test_parse_record(#[case] line: &str, #[case] host: &str, #[case] port: u16) {
        let endpoint = parse_record(line).expect("record should parse");
        assert_eq!(endpoint, Endpoint::new(host, port));
    }

    #[rstest]
    #[case("=;eth0;IPv4;Name;_musc._tcp;local;host.local")]
    #[case("=;too;short")]
    #[case("=")]
    fn test_parse_record_with_too_few_fields(#[case] line: &str) {
        assert!(matches!(
            parse_record(line),
            Err(DiscoveryError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_record_with_bad_port() {
        let line = "=;eth0;IPv4;Name;_musc._tcp;local;host.local;10.0.0.5;eleven;";
        assert!(matches!(parse_record(line), Err(DiscoveryError::Parse(_))));
    }

    #[test]
    fn test_endpoints_from_skips_unresolved_lines() {
        let output = "\
+;eth0;IPv4;Living Room;_musc._tcp;local
=;eth0;IPv4;Living\\032Room;_musc._tcp;local;living.local;10.0.0.5;11000;
failed to resolve something
=;eth0;IPv4;Kitchen;_musc._tcp;local;kitchen.local;10.0.0.6;11000;
";
        let endpoints = endpoints_from(output).expect("output should parse");
        assert_eq!(
            endpoints,
            vec![
                Endpoint::new("10.0.0.5", 11000),
                Endpoint::new("10.0.0.6", 11000),
            ]
        );
    }

    #[test]
    fn test_endpoints_from_deduplicates_interfaces() {
        let output = "\
=;eth0;IPv4;Living\\032Room;_musc._tcp;local;living.local;10.0.0.5;11000;
=;wlan0;IPv4;Living\\032Room;_musc._tcp;local;living.local;10.0.0.5;11000;
";
        let endpoints = endpoints_from(output).expect("output should parse");
        assert_eq!(endpoints, vec![Endpoint::new("10.0.0.5", 11000)]);
    }

    #[test]
    fn test_endpoints_from_empty_scan() {
        assert!(endpoints_from("").expect("empty scan is fine").is_empty());
    }

    #[test]
    fn test_one_bad_record_fails_the_scan() {
        let output = "\
=;eth0;IPv4;Living\\032Room;_musc._tcp;local;living.local;10.0.0.5;11000;
=;eth0;IPv4;Broken
";
        assert!(matches!(
            endpoints_from(output),
            Err(DiscoveryError::Parse(_))
        ));
    }
}
