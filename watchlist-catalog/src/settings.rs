//! Pipeline settings (data root, extraction options, name preferences).
//!
//! Settings live in `~/.config/the-watchlist/settings.toml`. Every field is
//! optional; a missing file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::preference::NamePreference;

/// Environment variable that overrides the configured data root.
pub const DATA_ROOT_ENV: &str = "WATCHLIST_DATA_ROOT";

/// Data root used when nothing else is configured.
pub const DEFAULT_DATA_ROOT: &str = "the-watchlist-data";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub extract: ExtractSettings,
    pub preference: NamePreference,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Drop low-value staff and company roles (see `roles` in the import crate).
    pub filter_blocked_roles: bool,
}

/// Canonical path to the settings file: `~/.config/the-watchlist/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("the-watchlist").join("settings.toml")
}

/// Load settings from the standard location.
pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_from(&settings_path())
}

/// Load settings from a specific file. A missing file yields defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    toml::from_str(&contents).map_err(|e| SettingsError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Resolve the data root using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. `WATCHLIST_DATA_ROOT` environment variable
/// 3. `data.root` in `settings.toml`
/// 4. `./the-watchlist-data`
pub fn resolve_data_root(cli_override: Option<PathBuf>, settings: &Settings) -> PathBuf {
    if let Some(p) = cli_override {
        return p;
    }
    if let Some(p) = std::env::var_os(DATA_ROOT_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(p);
    }
    if let Some(p) = settings.data.root.clone() {
        return p;
    }
    PathBuf::from(DEFAULT_DATA_ROOT)
}

/// Render settings as TOML for display.
pub fn settings_to_string(settings: &Settings) -> Option<String> {
    toml::to_string_pretty(settings).ok()
}
