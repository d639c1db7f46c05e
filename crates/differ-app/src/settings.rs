// Settings persistence: comparison defaults and diff colours.
// Uses platform-native config dir: e.g. ~/Library/Application Support/differ/settings.json
// on macOS, ~/.config/differ/settings.json on Linux.

use std::io;
use std::path::{Path, PathBuf};

use differ_engine::{CompareOptions, DetailMode};
use serde::{Deserialize, Serialize};

use crate::theme;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferSettings {
    /// Minimum similarity for two replaced lines to be paired.
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    #[serde(default)]
    pub detail: DetailMode,
    #[serde(default)]
    pub colors: ColorSettings,
}

impl Default for DifferSettings {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            detail: DetailMode::default(),
            colors: ColorSettings::default(),
        }
    }
}

fn default_cutoff() -> f64 {
    CompareOptions::DEFAULT_CUTOFF
}

/// HTML colour tokens, `#RRGGBB` or `#RGB`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSettings {
    /// Background of deleted, added and changed lines.
    #[serde(default = "default_changed_line")]
    pub changed_line: String,
    /// Background of added characters.
    #[serde(default = "default_detail_add")]
    pub detail_add: String,
    /// Background of deleted characters.
    #[serde(default = "default_detail_del")]
    pub detail_del: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            changed_line: default_changed_line(),
            detail_add: default_detail_add(),
            detail_del: default_detail_del(),
        }
    }
}

fn default_changed_line() -> String {
    theme::CHANGED_LINE.to_string()
}

fn default_detail_add() -> String {
    theme::DETAIL_ADD.to_string()
}

fn default_detail_del() -> String {
    theme::DETAIL_DEL.to_string()
}

fn settings_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("differ").join("settings.json"))
}

/// Load the user's settings. A missing file is created with the defaults so
/// there is something to edit.
pub fn load_settings() -> DifferSettings {
    let path = match settings_path() {
        Some(p) => p,
        None => return DifferSettings::default(),
    };
    if !path.exists() {
        let settings = DifferSettings::default();
        match save_settings_to(&path, &settings) {
            Ok(()) => log::info!("Wrote default settings to {}", path.display()),
            Err(e) => log::warn!("Failed to write {}: {}", path.display(), e),
        }
        return settings;
    }
    load_settings_from(&path)
}

pub fn load_settings_from(path: &Path) -> DifferSettings {
    match std::fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                DifferSettings::default()
            }
        },
        Err(e) => {
            log::warn!("Failed to read {}: {}", path.display(), e);
            DifferSettings::default()
        }
    }
}

pub fn save_settings_to(path: &Path, settings: &DifferSettings) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(io::Error::other)?;
    std::fs::write(path, json)
}
