//! Bound client session for a single player.

use std::sync::Arc;

use parking_lot::Mutex;
use urlencoding::encode;

use crate::catalog::{self, AlbumEntry, ALBUM_SECTIONS};
use crate::endpoint::Endpoint;
use crate::error::{ApiError, Result};
use crate::presets::{self, PresetEntry};
use crate::status::{Status, SyncStatus};
use crate::transport::Transport;

/// Client bound to one player.
///
/// Construction fixes the endpoint for the lifetime of the session. State
/// queries always hit the network; only the album catalog is cached, lazily,
/// until [`invalidate_albums`](Player::invalidate_albums) drops it.
#[derive(Debug)]
pub struct Player {
    transport: Transport,
    album_cache: Mutex<Option<Arc<Vec<AlbumEntry>>>>,
}

impl Player {
    /// Create a client bound to `endpoint`.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            transport: Transport::new(endpoint),
            album_cache: Mutex::new(None),
        }
    }

    /// The endpoint this client is bound to.
    pub fn endpoint(&self) -> &Endpoint {
        self.transport.endpoint()
    }

    /// Fetch a fresh status snapshot.
    pub fn status(&self) -> Result<Status> {
        Ok(Status::from_nodes(&self.transport.fetch("Status")?))
    }

    /// Fetch the player's identity attributes.
    pub fn sync_status(&self) -> Result<SyncStatus> {
        Ok(SyncStatus::from_nodes(&self.transport.fetch("SyncStatus")?))
    }

    /// The player's configured display name.
    pub fn player_name(&self) -> Result<String> {
        self.sync_status()?
            .name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Parse("SyncStatus has no name attribute".to_string()))
    }

    /// Current volume in percent.
    pub fn volume(&self) -> Result<i32> {
        self.status()?.volume()
    }

    /// One-line description of the current playback.
    pub fn now_playing(&self) -> Result<String> {
        Ok(self.status()?.now_playing())
    }

    /// Resume playback.
    pub fn play(&self) -> Result<()> {
        self.transport.fetch("Play")?;
        Ok(())
    }

    /// Start playing a stream URL.
    pub fn play_url(&self, url: &str) -> Result<()> {
        self.transport.fetch(&format!("Play?url={}", encode(url)))?;
        Ok(())
    }

    /// Pause playback.
    pub fn pause(&self) -> Result<()> {
        self.transport.fetch("Pause")?;
        Ok(())
    }

    /// Set the volume to an absolute percentage.
    pub fn set_volume(&self, level: i32) -> Result<()> {
        self.transport.fetch(&format!("Volume?level={}", level))?;
        Ok(())
    }

    /// Jump to the next track.
    pub fn skip(&self) -> Result<()> {
        self.transport.fetch("Skip")?;
        Ok(())
    }

    /// Jump back to the previous track.
    pub fn back(&self) -> Result<()> {
        self.transport.fetch("Back")?;
        Ok(())
    }

    /// List the preset slots configured on the player.
    ///
    /// Presets are cheap to fetch and can change between calls, so they are
    /// never cached.
    pub fn presets(&self) -> Result<Vec<PresetEntry>> {
        Ok(presets::presets_from(&self.transport.fetch("Presets")?))
    }

    /// Resolve a preset by id or case-insensitive name.
    ///
    /// # Returns
    /// The matching entry, or [`ApiError::NotFound`] listing the presets the
    /// player does have.
    pub fn find_preset(&self, needle: &str) -> Result<PresetEntry> {
        let presets = self.presets()?;
        let lowered = needle.to_lowercase();
        let found = presets
            .iter()
            .find(|preset| preset.id == needle || preset.name.to_lowercase() == lowered);
        match found {
            Some(preset) => Ok(preset.clone()),
            None => {
                let available: Vec<&str> =
                    presets.iter().map(|preset| preset.name.as_str()).collect();
                Err(ApiError::NotFound(format!(
                    "no preset '{}'; available: {}",
                    needle,
                    available.join(", ")
                )))
            }
        }
    }

    /// Trigger a preset slot by id.
    pub fn load_preset(&self, id: &str) -> Result<()> {
        self.transport.fetch(&format!("Preset?id={}", encode(id)))?;
        Ok(())
    }

    /// Fetch the album entries of one alphabet section.
    ///
    /// Sections are the buckets of [`ALBUM_SECTIONS`]; anything else returns
    /// whatever the player answers, usually an empty page.
    pub fn albums_in_section(&self, section: char) -> Result<Vec<AlbumEntry>> {
        let section = section.to_string();
        let nodes = self.transport.fetch(&format!(
            "Albums?service=LocalMusic&section={}",
            encode(&section)
        ))?;
        Ok(catalog::albums_from(&nodes))
    }

    /// The player's full album catalog, sorted for presentation.
    ///
    /// The first call pages through every alphabet section and caches the
    /// merged result; later calls return the cached catalog without touching
    /// the network. The cache lock is held across the build, so concurrent
    /// callers block until the first build finishes. A failed build leaves
    /// the cache unset and the next call starts over.
    pub fn albums(&self) -> Result<Arc<Vec<AlbumEntry>>> {
        let mut cache = self.album_cache.lock();
        if let Some(albums) = cache.as_ref() {
            return Ok(Arc::clone(albums));
        }
        let albums = Arc::new(self.build_catalog()?);
        *cache = Some(Arc::clone(&albums));
        Ok(albums)
    }

    /// Drop the cached catalog so the next [`albums`](Player::albums) call
    /// rebuilds it.
    pub fn invalidate_albums(&self) {
        *self.album_cache.lock() = None;
    }

    /// Rebuild the catalog immediately.
    pub fn refresh_albums(&self) -> Result<Arc<Vec<AlbumEntry>>> {
        self.invalidate_albums();
        self.albums()
    }

    /// Resolve a single album from the catalog.
    ///
    /// An exact (case-insensitive) match on `"artist - title"` or on the
    /// title alone wins; otherwise `needle` is matched as a substring of
    /// artist or title and must pick out exactly one entry.
    pub fn find_album(&self, needle: &str) -> Result<AlbumEntry> {
        let albums = self.albums()?;
        let lowered = needle.to_lowercase();

        if let Some(album) = albums.iter().find(|album| {
            album.title.to_lowercase() == lowered
                || format!("{} - {}", album.artist, album.title).to_lowercase() == lowered
        }) {
            return Ok(album.clone());
        }

        let matches: Vec<&AlbumEntry> = albums
            .iter()
            .filter(|album| {
                album.artist.to_lowercase().contains(&lowered)
                    || album.title.to_lowercase().contains(&lowered)
            })
            .collect();
        match matches.as_slice() {
            [album] => Ok((*album).clone()),
            [] => Err(ApiError::NotFound(format!(
                "no album matching '{}'",
                needle
            ))),
            several => {
                let mut listing = several
                    .iter()
                    .take(5)
                    .map(|album| format!("{} - {}", album.artist, album.title))
                    .collect::<Vec<_>>()
                    .join(", ");
                if several.len() > 5 {
                    listing.push_str(", ...");
                }
                Err(ApiError::NotFound(format!(
                    "{} albums match '{}': {}",
                    several.len(),
                    needle,
                    listing
                )))
            }
        }
    }

    /// Append an album to the play queue and start playing it.
    pub fn queue_album(&self, album: &AlbumEntry) -> Result<()> {
        self.transport.fetch(&format!(
            "Add?service=LocalMusic&playnow=1&where=last&cursor=last&artist={}&album={}",
            encode(&album.artist),
            encode(&album.title)
        ))?;
        Ok(())
    }

    fn build_catalog(&self) -> Result<Vec<AlbumEntry>> {
        let mut albums = Vec::new();
        for section in ALBUM_SECTIONS.chars() {
            let mut page = self.albums_in_section(section)?;
            tracing::debug!("section '{}' holds {} albums", section, page.len());
            albums.append(&mut page);
        }
        catalog::sort_albums(&mut albums);
        tracing::info!("album catalog built with {} entries", albums.len());
        Ok(albums)
    }
}
