//! Typed views over the player's status and identity responses.

use std::collections::BTreeMap;

use serde::Serialize;
use xmltree::XMLNode;

use crate::error::{ApiError, Result};
use crate::query;

/// Separator between the parts of a now-playing line
const NOW_PLAYING_SEPARATOR: &str = "  /  ";

/// Snapshot of the player's transport state.
///
/// Wraps the text children of a `Status` response as a flat map keyed by the
/// tags the player uses (`state`, `volume`, `title1`, ...). A snapshot is
/// never cached; fetch a fresh one per query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Status(BTreeMap<String, String>);

impl Status {
    /// Build a snapshot from the root nodes of a `Status` response.
    ///
    /// A missing or empty response produces an empty snapshot, not an error.
    pub fn from_nodes(nodes: &[XMLNode]) -> Self {
        let mut fields = BTreeMap::new();
        if let Some(root) = query::first(&["status"], nodes) {
            for child in &root.children {
                if let XMLNode::Element(element) = child {
                    if let Some(value) = query::text(element) {
                        fields.insert(element.name.clone(), value.to_string());
                    }
                }
            }
        }
        Self(fields)
    }

    /// Raw field lookup by tag name.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Playback state as the player reports it (`play`, `stream`, `pause`,
    /// `stop`).
    pub fn state(&self) -> Option<&str> {
        self.get("state")
    }

    /// Whether the player reports itself paused.
    pub fn is_paused(&self) -> bool {
        self.state() == Some("pause")
    }

    /// Current volume in percent.
    pub fn volume(&self) -> Result<i32> {
        let raw = self
            .get("volume")
            .ok_or_else(|| ApiError::Parse("status has no volume field".to_string()))?;
        raw.parse::<i32>()
            .map_err(|_| ApiError::Parse(format!("volume '{}' is not a number", raw)))
    }

    /// One-line description of the current playback.
    ///
    /// Joins the `title2`, `title3` and `title1` fields, in that order, with
    /// `"  /  "`, leaving out fields the player omitted, and appends
    /// `" (paused)"` while the player is paused.
    pub fn now_playing(&self) -> String {
        let mut line = ["title2", "title3", "title1"]
            .iter()
            .filter_map(|field| self.get(field))
            .collect::<Vec<_>>()
            .join(NOW_PLAYING_SEPARATOR);
        if self.is_paused() {
            line.push_str(" (paused)");
        }
        line
    }

    /// True when the response held no readable fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All fields in tag order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(tag, value)| (tag.as_str(), value.as_str()))
    }
}

/// Identity attributes from the player's `SyncStatus` response.
///
/// The players put their identity (`name`, `brand`, `model`, MAC address and
/// so on) in attributes on the response root rather than child elements.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncStatus(BTreeMap<String, String>);

impl SyncStatus {
    /// Build from the root nodes of a `SyncStatus` response.
    pub fn from_nodes(nodes: &[XMLNode]) -> Self {
        let mut attributes = BTreeMap::new();
        if let Some(root) = query::first(&["SyncStatus"], nodes) {
            for (key, value) in &root.attributes {
                attributes.insert(key.clone(), value.clone());
            }
        }
        Self(attributes)
    }

    /// Raw attribute lookup.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.0.get(attribute).map(String::as_str)
    }

    /// The player's configured display name.
    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    /// Hardware brand, when reported.
    pub fn brand(&self) -> Option<&str> {
        self.get("brand")
    }

    /// Model identifier, when reported.
    pub fn model(&self) -> Option<&str> {
        self.get("model")
    }

    /// All attributes in key order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}
