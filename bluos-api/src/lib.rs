//! Blocking client for BluOS players.
//!
//! Talks to a player's HTTP interface on port 11000: status and identity
//! queries, playback and volume control, preset slots, and the local
//! library's album catalog with lazy in-memory caching. Responses are the
//! players' plain XML documents; the [`query`] module walks them by tag
//! path.
//!
//! # Quick Start
//!
//! ```no_run
//! use bluos_api::{Endpoint, Player};
//!
//! # fn main() -> bluos_api::Result<()> {
//! let player = Player::new(Endpoint::with_default_port("10.0.0.5"));
//! println!("{}: {}", player.player_name()?, player.now_playing()?);
//! player.set_volume(30)?;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod endpoint;
mod error;
mod player;
mod presets;
pub mod query;
mod status;
mod transport;

pub use catalog::{AlbumEntry, ALBUM_SECTIONS};
pub use endpoint::{Endpoint, DEFAULT_PORT};
pub use error::{ApiError, Result};
pub use player::Player;
pub use presets::PresetEntry;
pub use status::{Status, SyncStatus};
pub use transport::Transport;
