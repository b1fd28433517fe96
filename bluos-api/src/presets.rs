//! Preset slot extraction.

use serde::Serialize;
use xmltree::{Element, XMLNode};

use crate::query;

/// One preset slot configured on the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetEntry {
    /// Display name of the slot
    pub name: String,
    /// Identifier used to trigger the slot
    pub id: String,
}

/// Extract the preset entries from a `Presets` response.
///
/// Slots missing a name or id keep an empty field.
pub(crate) fn presets_from(nodes: &[XMLNode]) -> Vec<PresetEntry> {
    query::all(&["presets", "preset"], nodes)
        .into_iter()
        .map(|preset| PresetEntry {
            name: attribute(preset, "name"),
            id: attribute(preset, "id"),
        })
        .collect()
}

fn attribute(element: &Element, name: &str) -> String {
    element.attributes.get(name).cloned().unwrap_or_default()
}
