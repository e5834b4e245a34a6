//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\shelf-minder\config.toml
//! - macOS: ~/Library/Application Support/shelf-minder/config.toml
//! - Linux: ~/.config/shelf-minder/config.toml
//!
//! The config file is human-readable and editable. Command-line flags
//! override whatever it contains.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where books come from and where output goes
    pub library: LibraryConfig,

    /// Sync pipeline toggles
    pub sync: SyncConfig,

    /// Online metadata lookups
    pub lookup: LookupConfig,
}

/// Source and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Calibre library directory (contains `metadata.db`)
    pub calibre_path: Option<PathBuf>,

    /// Directory the front-end data is written to
    pub output_dir: PathBuf,

    /// File name of the persisted library inside `output_dir`
    pub library_file: String,

    /// File name of the editorial overlay inside `output_dir`
    pub hooks_file: String,

    /// Directory name for copied covers inside `output_dir`
    pub covers_dir: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            calibre_path: None,
            output_dir: PathBuf::from("data"),
            library_file: "biblioteca_app.json".to_string(),
            hooks_file: "hooks.json".to_string(),
            covers_dir: "portadas".to_string(),
        }
    }
}

impl LibraryConfig {
    pub fn library_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.library_file)
    }

    pub fn hooks_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.hooks_file)
    }

    pub fn covers_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.covers_dir)
    }
}

/// Sync pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Add default overlay entries for books missing one
    pub generate_hooks: bool,

    /// Copy cover images next to the library
    pub copy_covers: bool,

    /// Write `sync_report.json` after each sync
    pub write_report: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            generate_hooks: false,
            copy_covers: false,
            write_report: true,
        }
    }
}

/// Online lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub open_library: bool,

    pub google_books: bool,

    /// Preferred language for Google Books results (ISO 639-1)
    pub language: String,

    /// Pause between requests to the same provider, in milliseconds
    pub request_delay_ms: u64,

    /// Per-request timeout, in seconds
    pub timeout_secs: u64,

    /// Retries for rate-limited or failed requests
    pub max_retries: u32,

    /// Books looked up at the same time
    pub max_concurrent: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            open_library: true,
            google_books: true,
            language: "es".to_string(),
            request_delay_ms: 500,
            timeout_secs: 15,
            max_retries: 2,
            max_concurrent: 4,
        }
    }
}

impl LookupConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shelf-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file, falling back to defaults.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
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
