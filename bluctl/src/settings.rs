//! Stored player selection.
//!
//! `bluctl` remembers which player it talks to between invocations in a small
//! JSON file under the platform configuration directory. Commands read it on
//! startup; `bluctl use` rewrites it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bluos_api::Endpoint;

/// Errors raised while loading or storing the settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// No player has been selected yet and none was given on the command line.
    #[error("no player configured; run 'bluctl discover' and 'bluctl use <NAME>' first")]
    NoPlayer,

    /// The platform configuration directory could not be determined.
    #[error("could not determine the user configuration directory")]
    NoConfigDir,

    /// Reading or writing the settings file failed.
    #[error("settings file error: {0}")]
    Io(#[from] io::Error),

    /// The settings file does not hold valid JSON.
    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persisted CLI state: the selected player and discovery preferences.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Endpoint commands are sent to when no `--player` override is given.
    pub player: Option<Endpoint>,
    /// Display name of the selected player, used in confirmation output.
    pub name: Option<String>,
    /// Service browser binary to run instead of the default one.
    pub browse_tool: Option<String>,
}

impl Settings {
    /// Location of the settings file under the platform configuration
    /// directory.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let base = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(base.join("bluctl").join("config.json"))
    }

    /// Load the settings from the default location.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Store the settings at the default location.
    pub fn store(&self) -> Result<(), SettingsError> {
        self.store_to(&Self::default_path()?)
    }

    /// Store the settings at `path`, creating parent directories as needed.
    pub fn store_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The stored endpoint, or [`SettingsError::NoPlayer`] when none is set.
    pub fn endpoint(&self) -> Result<Endpoint, SettingsError> {
        self.player.clone().ok_or(SettingsError::NoPlayer)
    }
}
