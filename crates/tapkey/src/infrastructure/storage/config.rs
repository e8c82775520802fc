//! TOML-based configuration for tapkey.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\Tapkey\config.toml`
//! - Linux:    `~/.config/tapkey/config.toml`
//! - macOS:    `~/Library/Application Support/Tapkey/config.toml`
//!
//! Example:
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [storage]
//! mappings_path = "/home/me/slides/mappings.toml"
//!
//! [reader]
//! source = "fifo:/run/user/1000/tapkey.feed"
//!
//! [injection]
//! platform = "auto"
//! ```
//!
//! # Serde default values
//!
//! Every section and field has a default, so an absent or empty file yields a
//! working configuration.  Command-line flags override the file (see
//! `main.rs`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tapkey_core::Platform;
use thiserror::Error;

use crate::infrastructure::reader::ReaderSource;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is syntactically valid TOML but not a valid setting.
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub injection: InjectionConfig,
}

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Mapping store location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Mapping file; defaults to `mappings.toml` next to the config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mappings_path: Option<PathBuf>,
}

/// Where tag events come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReaderConfig {
    /// `fifo:<path>` or `tcp:<host:port>`.
    #[serde(default = "default_reader_source")]
    pub source: String,
}

/// Key-injection backend selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InjectionConfig {
    /// `"auto"` (detect from the build target), `"macos"`, `"windows"` or `"linux"`.
    #[serde(default = "default_platform")]
    pub platform: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_reader_source() -> String {
    "tcp:127.0.0.1:24900".to_string()
}
fn default_platform() -> String {
    "auto".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            source: default_reader_source(),
        }
    }
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
        }
    }
}

impl AppConfig {
    /// Resolves the configured injection platform.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unknown name, or for `"auto"`
    /// on a build target without a supported backend.
    pub fn platform(&self) -> Result<Platform, ConfigError> {
        let raw = self.injection.platform.trim();
        if raw.eq_ignore_ascii_case("auto") {
            return Platform::detect().ok_or_else(|| ConfigError::Invalid {
                field: "injection.platform",
                reason: "no key-injection backend for this OS; set it explicitly".to_string(),
            });
        }
        raw.parse().map_err(|reason| ConfigError::Invalid {
            field: "injection.platform",
            reason,
        })
    }

    /// Parses the configured reader source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the source string is malformed.
    pub fn reader_source(&self) -> Result<ReaderSource, ConfigError> {
        self.reader
            .source
            .parse()
            .map_err(|reason| ConfigError::Invalid {
                field: "reader.source",
                reason,
            })
    }

    /// Resolves the mapping file path, defaulting to `<config dir>/mappings.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPlatformConfigDir`] when no path is configured
    /// and the platform directory is unknown.
    pub fn mappings_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.mappings_path {
            Some(path) => Ok(path.clone()),
            None => Ok(config_dir()?.join("mappings.toml")),
        }
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for tapkey's files.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Resolves the platform config base directory including the `tapkey` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Tapkey"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("tapkey"))
    }

    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/Tapkey
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Tapkey")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
