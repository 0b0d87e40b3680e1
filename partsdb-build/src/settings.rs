//! Build settings (`~/.config/partsdb/settings.toml`).

use std::path::{Path, PathBuf};

use partsdb_catalog::default_price_cutoff;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generate::DEFAULT_BATCH_SIZE;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Inventory cache database to read components from.
    pub source_db: PathBuf,
    /// Directory the index files are written to.
    pub output_dir: PathBuf,
    pub batch_size: usize,
    /// Price breaks cheaper than this are dropped, except the first one.
    pub price_cutoff: Decimal,
    /// Exclude parts out of stock for at least this many days. 0 disables.
    pub obsolete_parts_threshold_days: u32,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            source_db: PathBuf::from("cache_archive/cache.sqlite3"),
            output_dir: PathBuf::from("db_working"),
            batch_size: DEFAULT_BATCH_SIZE,
            price_cutoff: default_price_cutoff(),
            obsolete_parts_threshold_days: 0,
        }
    }
}

/// Returns `~/.config/partsdb/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("partsdb").join("settings.toml")
}

/// Read and parse the settings file at `path`.
pub fn read_settings(path: &Path) -> Result<BuildSettings, SettingsError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Load settings from `path`, returning defaults if missing or corrupt.
pub fn load_settings(path: &Path) -> BuildSettings {
    match read_settings(path) {
        Ok(settings) => settings,
        Err(SettingsError::Io(_)) => BuildSettings::default(),
        Err(e) => {
            log::warn!("Failed to parse settings at {}: {}", path.display(), e);
            BuildSettings::default()
        }
    }
}

/// Save settings to `path` atomically (write to temp, then rename).
pub fn save_settings(path: &Path, settings: &BuildSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(settings)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
