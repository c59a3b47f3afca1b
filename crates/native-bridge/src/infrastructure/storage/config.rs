//! TOML persistence for [`AppSettings`].
//!
//! The default settings file lives in the platform config directory:
//! - Windows:  `%APPDATA%\NativeBridge\config.toml`
//! - Linux:    `~/.config/native-bridge/config.toml`
//! - macOS:    `~/Library/Application Support/NativeBridge/config.toml`
//!
//! `--config <path>` (or `NATIVE_BRIDGE_CONFIG`) points the bridge at a
//! different file.  A missing file is not an error: the bridge starts with
//! [`AppSettings::default()`], so a fresh install needs no setup.
//!
//! # Example file
//!
//! ```toml
//! [app]
//! name = "Notes"
//!
//! [window]
//! width = 1024
//! height = 768
//!
//! [updater]
//! enabled = true
//! check_interval_secs = 7200
//!
//! [shell]
//! api_url = "http://127.0.0.1:4000/api/"
//! timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::settings::AppSettings;

/// Error type for settings file operations.
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

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Paths ─────────────────────────────────────────────────────────────────────

/// Full path of the default settings file.
///
/// # Errors
///
/// [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined from the environment.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("NativeBridge"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("native-bridge"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("NativeBridge")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Load / save ───────────────────────────────────────────────────────────────

/// Loads settings from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// [`ConfigError::Io`] for file-system errors other than "not found", and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<AppSettings, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let settings: AppSettings = toml::from_str(&content)?;
            debug!(path = %path.display(), "loaded settings file");
            Ok(settings)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file; using defaults");
            Ok(AppSettings::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `settings` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// [`ConfigError::Io`] for file-system failures or [`ConfigError::Serialize`]
/// if serialization fails.
pub fn save_config(path: &Path, settings: &AppSettings) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
