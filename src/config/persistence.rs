//! Reading and writing the settings file
//!
//! Settings live in one pretty-printed JSON file,
//! `{config_dir}/surveyor/config.json`:
//!
//! - **Linux**: `~/.config/surveyor/config.json`
//! - **macOS**: `~/Library/Application Support/surveyor/config.json`
//! - **Windows**: `%APPDATA%\surveyor\config.json`
//!
//! A missing or blank file means defaults. A broken file is reported by
//! [`ConfigStore::load`] and papered over by [`load_config`], so a bad edit
//! never keeps the program from starting.

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Settings, API_URL_ENV};
use crate::error::{Error, Result, ResultExt};

/// Directory name under the platform config directory.
const APP_DIR_NAME: &str = "surveyor";

const SETTINGS_FILE: &str = "config.json";

/// Written first, then renamed over [`SETTINGS_FILE`].
const PENDING_FILE: &str = "config.json.tmp";

// ─────────────────────────────────────────────────────────────────────────────
// Locations
// ─────────────────────────────────────────────────────────────────────────────

/// `{config_dir}/surveyor`, or an error when the platform has none.
pub fn get_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(Error::ConfigDirNotFound)?;
    Ok(base.join(APP_DIR_NAME))
}

/// Full path of the settings file.
pub fn get_config_file_path() -> Result<PathBuf> {
    get_config_dir().map(|dir| dir.join(SETTINGS_FILE))
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// A settings file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// The store at the platform location.
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(get_config_file_path()?))
    }

    /// A store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the settings, sanitized.
    ///
    /// A missing or whitespace-only file yields `Settings::default()`.
    pub fn load(&self) -> Result<Settings> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", self.path.display());
                return Ok(Settings::default());
            }
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            debug!("Settings file {} is blank", self.path.display());
            return Ok(Settings::default());
        }

        let settings = Settings::from_json_sanitized(&contents).map_err(|source| {
            Error::ConfigParse {
                path: Some(self.path.clone()),
                source,
            }
        })?;

        debug!("Loaded settings from {}", self.path.display());
        Ok(settings)
    }

    /// Write the settings.
    ///
    /// The JSON goes to a sibling temp file which is then renamed over the
    /// real one, so a crash mid-write leaves the old file intact.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        fs::create_dir_all(dir).map_err(|source| Error::ConfigWrite {
            path: dir.to_path_buf(),
            source,
        })?;

        let json = serde_json::to_string_pretty(settings)?;
        let pending = dir.join(PENDING_FILE);

        fs::write(&pending, json).map_err(|source| Error::ConfigWrite {
            path: pending.clone(),
            source,
        })?;
        fs::rename(&pending, &self.path).map_err(|source| Error::ConfigWrite {
            path: self.path.clone(),
            source,
        })?;

        info!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Load, change, and save in one step.
    pub fn update(&self, change: impl FnOnce(&mut Settings)) -> Result<()> {
        let mut settings = self.load()?;
        change(&mut settings);
        self.save(&settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Entry Points
// ─────────────────────────────────────────────────────────────────────────────

/// Settings for this run: the stored file (or defaults if it cannot be
/// used) with the `SURVEYOR_API_URL` override applied.
pub fn load_config() -> Settings {
    let mut settings = ConfigStore::open_default()
        .and_then(|store| store.load())
        .unwrap_or_warn_default(Settings::default(), "Could not load settings");

    if let Ok(url) = std::env::var(API_URL_ENV) {
        info!("Using service URL from {}", API_URL_ENV);
        settings.apply_api_url_override(Some(url));
    }
    settings
}

/// Persist settings to the platform location.
pub fn save_config(settings: &Settings) -> Result<()> {
    ConfigStore::open_default()?.save(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
