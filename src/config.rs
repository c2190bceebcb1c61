//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\playlist-minder\config.toml
//! - macOS: ~/Library/Application Support/playlist-minder/config.toml
//! - Linux: ~/.config/playlist-minder/config.toml
//!
//! The config file is human-readable and editable. A few settings can be
//! overridden from the environment, which wins over the file:
//!
//! | Variable | Setting |
//! |---|---|
//! | `PLAYLIST_MINDER_SERVER_URL` | `server.url` |
//! | `PLAYLIST_MINDER_TIMEOUT_SECS` | `server.timeout_secs` |
//! | `PLAYLIST_MINDER_PAGE_SIZE` | `view.page_size` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::playlist::PageSize;

pub const ENV_SERVER_URL: &str = "PLAYLIST_MINDER_SERVER_URL";
pub const ENV_TIMEOUT_SECS: &str = "PLAYLIST_MINDER_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "PLAYLIST_MINDER_PAGE_SIZE";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Media-library service connection
    pub server: ServerConfig,

    /// Track view defaults
    pub view: ViewConfig,

    /// Remote mutation settings
    pub mutations: MutationConfig,
}

/// Media-library service connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the web service
    pub url: String,

    /// Per-request timeout; must be at least 1
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Per-request timeout. Zero would fail every request, so it falls back
    /// to the default.
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

/// Track view defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Entries per page: 50, 100, 250, 500, 1000, 2000, 5000 or 10000
    pub page_size: PageSize,

    /// Quiet window before search input is applied (clamped to 250-350)
    pub search_debounce_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            search_debounce_ms: 300,
        }
    }
}

/// Remote mutation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Max deletes in flight during a bulk remove (at least 1)
    pub bulk_concurrency: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self { bulk_concurrency: 4 }
    }
}

impl Config {
    /// Apply overrides from an environment lookup.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_SERVER_URL).filter(|u| !u.trim().is_empty()) {
            self.server.url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.server.timeout_secs = secs,
                _ => tracing::warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT_SECS, raw),
            }
        }

        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            match raw
                .trim()
                .parse::<u32>()
                .map_err(|e| e.to_string())
                .and_then(PageSize::try_from)
            {
                Ok(size) => self.view.page_size = size,
                Err(e) => tracing::warn!("Ignoring invalid {}={:?}: {}", ENV_PAGE_SIZE, raw, e),
            }
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("playlist-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk, then apply environment overrides
///
/// Never fails: a missing or broken file yields defaults.
pub fn load() -> Config {
    let mut config = match config_path() {
        Some(path) => load_from(&path),
        None => {
            tracing::warn!("Could not determine config directory, using defaults");
            Config::default()
        }
    };
    config.apply_env_overrides(|key| std::env::var(key).ok());
    config
}

/// Load configuration from a specific file
///
/// Returns default config if the file doesn't exist or can't be parsed.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match try_load_from(path) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Read and parse a config file
pub fn try_load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let mut config: Config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;

    if config.server.timeout_secs == 0 {
        tracing::warn!(
            "Ignoring server.timeout_secs = 0 in {:?}, using {}",
            path,
            DEFAULT_TIMEOUT_SECS
        );
        config.server.timeout_secs = DEFAULT_TIMEOUT_SECS;
    }
    Ok(config)
}

/// Save configuration to the standard location
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to a specific file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
