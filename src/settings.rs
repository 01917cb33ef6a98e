//! Persisted selection state.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::dsp::sampler::Tuning;
use crate::error::SettingsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Name of the selected preset. `None` means the catalog's first preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_preset: Option<String>,
    /// Whether local graph views receive values too.
    #[serde(default = "default_include_local")]
    pub include_local: bool,
    #[serde(default)]
    pub tuning: Tuning,
}

fn default_include_local() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            active_preset: None,
            include_local: default_include_local(),
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// `<config dir>/living-graph/settings.json` for the current user.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        ProjectDirs::from("", "", "living-graph")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Read settings from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).map_err(SettingsError::Json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(SettingsError::Io(e)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SettingsError::Io)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(SettingsError::Json)?;
        std::fs::write(path, json).map_err(SettingsError::Io)
    }
}
