//! Album catalog extraction and ordering.

use serde::Serialize;
use xmltree::{Element, XMLNode};

use crate::query;

/// Alphabet buckets the player pages its library index by.
///
/// `#` collects everything that sorts before the letters.
pub const ALBUM_SECTIONS: &str = "#ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// One album in the player's local library index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumEntry {
    /// Album artist as indexed by the player
    pub artist: String,
    /// Album title
    pub title: String,
}

impl AlbumEntry {
    /// Ordering key: artist and title glued together, case-insensitive,
    /// surrounding whitespace ignored.
    fn sort_key(&self) -> String {
        format!("{}{}", self.artist, self.title)
            .trim()
            .to_lowercase()
    }
}

/// Extract the album entries from one section page.
///
/// Albums with a missing artist or title keep an empty field rather than
/// being dropped, and duplicates are preserved.
pub(crate) fn albums_from(nodes: &[XMLNode]) -> Vec<AlbumEntry> {
    query::all(&["albums", "sections", "section", "album"], nodes)
        .into_iter()
        .map(|album| AlbumEntry {
            artist: child_text(album, "art"),
            title: child_text(album, "title"),
        })
        .collect()
}

/// Sort a combined catalog into presentation order.
///
/// The sort is stable, so entries with equal keys keep the order their
/// sections produced them in.
pub(crate) fn sort_albums(albums: &mut [AlbumEntry]) {
    albums.sort_by_cached_key(AlbumEntry::sort_key);
}

fn child_text(element: &Element, tag: &str) -> String {
    query::first(&[tag], &element.children)
        .and_then(query::text)
        .map(str::to_string)
        .unwrap_or_default()
}
