//! Configuration loading and parsing.
//!
//! Parses `modalrc.toml` (or an override path provided by the binary)
//! for the `[keymap]` table that governs the modal parser: which mode
//! a fresh session starts in, and whether `v` is reachable only from
//! `Mode::Normal`. Unknown fields are ignored (TOML deserialization
//! tolerance) to allow forward evolution without immediate warnings.

use anyhow::Result;
use core_state::Mode;
use serde::Deserialize;
use std::{fs, io, path::PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "modalrc.toml";

/// Failures reading or parsing a config file. Always caught internally
/// by [`load_from`] and turned into a fallback-to-defaults plus a
/// `warn!` — never propagated to the caller — but typed so the failure
/// mode is documented rather than swallowed behind a bare `bool`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartMode {
    Normal,
    Insert,
    Visual,
}

impl Default for StartMode {
    fn default() -> Self {
        Self::Normal
    }
}

impl From<StartMode> for Mode {
    fn from(value: StartMode) -> Self {
        match value {
            StartMode::Normal => Mode::Normal,
            StartMode::Insert => Mode::Insert,
            StartMode::Visual => Mode::Visual,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeymapConfig {
    #[serde(default = "KeymapConfig::default_start_mode")]
    pub start_mode: StartMode,
    #[serde(default = "KeymapConfig::default_visual_toggle_from_normal_only")]
    pub visual_toggle_from_normal_only: bool,
}

impl KeymapConfig {
    const fn default_start_mode() -> StartMode {
        StartMode::Normal
    }

    const fn default_visual_toggle_from_normal_only() -> bool {
        true
    }
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            start_mode: Self::default_start_mode(),
            visual_toggle_from_normal_only: Self::default_visual_toggle_from_normal_only(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,
    pub file: ConfigFile,
}

impl Config {
    pub fn start_mode(&self) -> Mode {
        self.file.keymap.start_mode.into()
    }

    pub fn visual_toggle_from_normal_only(&self) -> bool {
        self.file.keymap.visual_toggle_from_normal_only
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("modal").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

fn read_and_parse(path: &std::path::Path) -> Result<ConfigFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    match read_and_parse(&path) {
        Ok(file) => {
            info!(target: "core_config", path = %path.display(), "loaded config");
            let raw = fs::read_to_string(&path).ok();
            Ok(Config { raw, file })
        }
        Err(e) => {
            warn!(target: "core_config", path = %path.display(), error = %e, "falling back to defaults");
            Ok(Config::default())
        }
    }
}
