//! Configuration file persistence for Marknote
//!
//! Settings live in `config.json` inside the platform config directory.
//! Loading never fails from the caller's point of view: a missing, empty, or
//! corrupted file falls back to defaults. Saving writes a sibling `.bak`
//! file first and renames it over the original.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "marknote";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Temporary file name used during atomic writes
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// The application's config directory.
///
/// - **Windows**: `%APPDATA%\marknote\`
/// - **macOS**: `~/Library/Application Support/marknote/`
/// - **Linux**: `~/.config/marknote/`
///
/// # Errors
///
/// `Error::ConfigDirNotFound` if the platform has no config directory
/// (e.g. `HOME` is unset).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Full path of `config.json`.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from the platform config directory, falling back to defaults.
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load and sanitize settings from `config_path`.
///
/// A missing or blank file yields defaults; unreadable or malformed JSON is
/// an error.
pub fn load_config_from(config_path: &Path) -> Result<Settings> {
    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!("Configuration loaded from {}", config_path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save settings to the platform config directory.
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(&get_config_file_path()?, settings)
}

/// Save settings to `config_path`, creating its directory if needed.
///
/// The JSON is written to a `.bak` sibling first and then renamed over the
/// original, so a crash mid-write never leaves a truncated config.
pub fn save_config_to(config_path: &Path, settings: &Settings) -> Result<()> {
    let save_err = |path: &Path, e: Box<dyn std::error::Error + Send + Sync>| Error::ConfigSave {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(dir) = config_path.parent() {
        if !dir.exists() {
            debug!("Creating config directory: {}", dir.display());
            fs::create_dir_all(dir).map_err(|e| save_err(dir, Box::new(e)))?;
        }
    }

    let json =
        serde_json::to_string_pretty(settings).map_err(|e| save_err(config_path, Box::new(e)))?;

    let backup_path = config_path.with_file_name(CONFIG_BACKUP_NAME);
    fs::write(&backup_path, &json).map_err(|e| save_err(&backup_path, Box::new(e)))?;
    fs::rename(&backup_path, config_path).map_err(|e| save_err(config_path, Box::new(e)))?;

    info!("Configuration saved to {}", config_path.display());
    Ok(())
}

/// Save settings, logging instead of returning errors.
///
/// Returns `true` if the save succeeded.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
