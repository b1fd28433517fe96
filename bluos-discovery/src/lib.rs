//! Discovery of BluOS players on the local network.
//!
//! Browsing goes through an external zeroconf browser (`avahi-browse` by
//! default) rather than a bundled mDNS stack, and each candidate endpoint is
//! then probed over HTTP for its identity. Discovery is best-effort: a scan
//! can be slow, and candidates that do not answer the probe are skipped.
//!
//! # Quick Start
//!
//! ```no_run
//! let players = bluos_discovery::discover()?;
//! for player in &players {
//!     println!("{} at {}", player.name, player.endpoint);
//! }
//! # Ok::<(), bluos_discovery::DiscoveryError>(())
//! ```

mod browse;
mod error;

pub use browse::{Browser, DEFAULT_TOOL, SERVICE_TYPE};
pub use error::{DiscoveryError, Result};

use serde::Serialize;

use bluos_api::{Endpoint, Player};

/// A player found on the local network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredPlayer {
    /// Display name the player reports for itself
    pub name: String,
    /// Where the player answered
    pub endpoint: Endpoint,
}

/// Ask a candidate endpoint for its display name.
///
/// Each probe builds its own short-lived client, so probing one unreachable
/// candidate cannot affect another.
pub fn identify(endpoint: &Endpoint) -> Result<String> {
    Ok(Player::new(endpoint.clone()).player_name()?)
}

/// Scan the network and identify every player that answers.
///
/// Candidates whose identity probe fails are logged and skipped rather than
/// failing the whole scan. The result is sorted by player name, so equal
/// networks produce equal listings regardless of record order.
pub fn discover_players(browser: &Browser) -> Result<Vec<DiscoveredPlayer>> {
    let mut players = Vec::new();
    for endpoint in browser.browse()? {
        match identify(&endpoint) {
            Ok(name) => {
                tracing::debug!("{} identified as '{}'", endpoint, name);
                players.push(DiscoveredPlayer { name, endpoint });
            }
            Err(error) => {
                tracing::warn!("skipping {}: {}", endpoint, error);
            }
        }
    }
    players.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(players)
}

/// Scan with the default browser tool.
pub fn discover() -> Result<Vec<DiscoveredPlayer>> {
    discover_players(&Browser::default())
}
