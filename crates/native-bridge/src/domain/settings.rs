//! Application settings schema (the TOML configuration file).
//!
//! ```toml
//! [app]
//! name = "Notes"
//! app_id = "com.example.notes"
//! version = "1.2.0"
//!
//! [window]
//! width = 1024
//! height = 768
//! center = true
//!
//! [tray]
//! enabled = true
//! tooltip = "Notes"
//!
//! [updater]
//! enabled = true
//! url = "https://updates.example.com/notes"
//! check_interval_secs = 3600
//!
//! [shell]
//! api_url = "http://127.0.0.1:4000/api/"
//! secret = "change-me"
//! timeout_secs = 60
//!
//! [server]
//! bind_address = "127.0.0.1"
//! port = 8100
//! ```
//!
//! Every field has a serde default, so a missing file, an empty file, or a file
//! written by an older version all load into a working configuration.  Reading
//! and writing the file is the job of `infrastructure::storage::config`.
//!
//! Durations are stored as whole seconds (`*_secs`) and exposed as
//! [`Duration`] through accessor methods.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use native_core::{TrayOptions, WindowOptions};

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub window: WindowDefaults,
    #[serde(default)]
    pub tray: TraySection,
    #[serde(default)]
    pub updater: UpdaterSection,
    #[serde(default)]
    pub shell: ShellSection,
    #[serde(default)]
    pub server: ServerSection,
}

/// Application identity shown by the shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Reverse-DNS bundle identifier.
    #[serde(default = "default_app_id")]
    pub app_id: String,
    #[serde(default = "default_app_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Geometry and chrome of the window the shell opens at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowDefaults {
    #[serde(default = "default_window_width")]
    pub width: u32,
    #[serde(default = "default_window_height")]
    pub height: u32,
    #[serde(default = "default_window_min")]
    pub min_width: u32,
    #[serde(default = "default_window_min")]
    pub min_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "default_true")]
    pub center: bool,
    #[serde(default = "default_true")]
    pub resizable: bool,
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default = "default_true")]
    pub frame: bool,
    #[serde(default)]
    pub transparency: bool,
    #[serde(default = "default_true")]
    pub shadow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibrancy: Option<String>,
}

/// Tray icon settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TraySection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

/// Auto-updater settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdaterSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub check_on_startup: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// How often the shell polls `url` for a new release.
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
}

/// Where and how to reach the shell's control API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShellSection {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Shared secret proving a request came from the shell (and, outbound,
    /// from this application).  Usually supplied via environment instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Listener for the inbound event endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Keep this on loopback: the shell runs on the same machine.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_app_name() -> String {
    "NativeBridge".to_string()
}
fn default_app_id() -> String {
    "com.nativebridge.app".to_string()
}
fn default_app_version() -> String {
    "1.0.0".to_string()
}
fn default_window_width() -> u32 {
    800
}
fn default_window_height() -> u32 {
    600
}
fn default_window_min() -> u32 {
    400
}
fn default_true() -> bool {
    true
}
fn default_check_interval_secs() -> u64 {
    60 * 60
}
fn default_api_url() -> String {
    "http://127.0.0.1:4000/api/".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8100
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            app_id: default_app_id(),
            version: default_app_version(),
            icon: None,
        }
    }
}

impl Default for WindowDefaults {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
            min_width: default_window_min(),
            min_height: default_window_min(),
            title: None,
            center: true,
            resizable: true,
            fullscreen: false,
            frame: true,
            transparency: false,
            shadow: true,
            vibrancy: None,
        }
    }
}

impl Default for UpdaterSection {
    fn default() -> Self {
        Self {
            enabled: false,
            check_on_startup: true,
            url: None,
            check_interval_secs: default_check_interval_secs(),
        }
    }
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            secret: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

// ── Derived views ─────────────────────────────────────────────────────────────

impl UpdaterSection {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}

impl ShellSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WindowDefaults {
    /// Converts the startup window settings into the options the shell's
    /// `window/open` call takes.  The title falls back to `app_name`.
    pub fn to_window_options(&self, app_name: &str) -> WindowOptions {
        let mut opts = WindowOptions::new()
            .title(self.title.clone().unwrap_or_else(|| app_name.to_string()))
            .size(self.width, self.height)
            .min_size(self.min_width, self.min_height)
            .resizable(self.resizable)
            .fullscreen(self.fullscreen)
            .transparent(self.transparency)
            .shadow(self.shadow);
        if self.center {
            opts = opts.center();
        }
        if !self.frame {
            opts = opts.frameless();
        }
        if let Some(material) = &self.vibrancy {
            opts = opts.vibrancy(material.clone());
        }
        opts
    }
}

/// The part of the settings the shell is allowed to read.
///
/// Served on the guarded config route.  It never contains the shell secret or
/// the server listener settings.  Keys are camelCase throughout, unlike the
/// snake_case settings file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShellFacingConfig {
    pub app: AppView,
    pub window: WindowOptions,
    /// `None` when the tray is disabled.
    pub tray: Option<TrayOptions>,
    pub updater: UpdaterView,
}

/// Application identity as sent to the shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppView {
    pub name: String,
    pub app_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl From<&AppSection> for AppView {
    fn from(app: &AppSection) -> Self {
        Self {
            name: app.name.clone(),
            app_id: app.app_id.clone(),
            version: app.version.clone(),
            icon: app.icon.clone(),
        }
    }
}

/// Updater settings as sent to the shell; the interval is in milliseconds
/// because that is the unit the shell's timers take.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdaterView {
    pub enabled: bool,
    pub check_on_startup: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub check_interval_ms: u64,
}

impl AppSettings {
    pub fn shell_facing(&self) -> ShellFacingConfig {
        let tray = self.tray.enabled.then(|| TrayOptions {
            icon: self.tray.icon.clone().or_else(|| self.app.icon.clone()),
            tooltip: self.tray.tooltip.clone().or_else(|| Some(self.app.name.clone())),
            label: None,
        });

        ShellFacingConfig {
            app: AppView::from(&self.app),
            window: self.window.to_window_options(&self.app.name),
            tray,
            updater: UpdaterView {
                enabled: self.updater.enabled,
                check_on_startup: self.updater.check_on_startup,
                url: self.updater.url.clone(),
                check_interval_ms: self.updater.check_interval_secs.saturating_mul(1000),
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_loads_all_defaults() {
        // Arrange / Act
        let cfg: AppSettings = toml::from_str("").unwrap();

        // Assert
        assert_eq!(cfg, AppSettings::default());
        assert_eq!(cfg.server.port, 8100);
        assert_eq!(cfg.shell.api_url, "http://127.0.0.1:4000/api/");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let cfg: AppSettings = toml::from_str("[window]\nwidth = 1280\n").unwrap();

        assert_eq!(cfg.window.width, 1280);
        assert_eq!(cfg.window.height, 600);
        assert!(cfg.window.center);
    }

    #[test]
    fn test_updater_interval_defaults_to_one_hour() {
        let cfg = AppSettings::default();
        assert_eq!(cfg.updater.check_interval(), Duration::from_secs(3600));
    }

    #[test]
    fn test_shell_timeout_is_seconds() {
        let section = ShellSection {
            timeout_secs: 5,
            ..ShellSection::default()
        };
        assert_eq!(section.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_window_defaults_become_window_options() {
        // Arrange
        let window = WindowDefaults {
            frame: false,
            vibrancy: Some("sidebar".to_string()),
            ..WindowDefaults::default()
        };

        // Act
        let opts = window.to_window_options("Notes");

        // Assert
        assert_eq!(opts.title.as_deref(), Some("Notes"));
        assert_eq!(opts.width, Some(800));
        assert_eq!(opts.center, Some(true));
        assert_eq!(opts.frame, Some(false));
        assert_eq!(opts.vibrancy.as_deref(), Some("sidebar"));
    }

    #[test]
    fn test_shell_facing_config_hides_secret_and_server() {
        let mut cfg = AppSettings::default();
        cfg.shell.secret = Some("s3cret".to_string());

        let json = serde_json::to_string(&cfg.shell_facing()).unwrap();

        assert!(!json.contains("s3cret"));
        assert!(!json.contains("bind_address"));
    }

    #[test]
    fn test_shell_facing_updater_interval_is_milliseconds() {
        let cfg = AppSettings::default();
        assert_eq!(cfg.shell_facing().updater.check_interval_ms, 3_600_000);
    }

    #[test]
    fn test_huge_updater_interval_saturates_instead_of_wrapping() {
        let mut cfg = AppSettings::default();
        cfg.updater.check_interval_secs = u64::MAX / 10;

        assert_eq!(cfg.shell_facing().updater.check_interval_ms, u64::MAX);
    }

    #[test]
    fn test_shell_facing_keys_are_camel_case() {
        // Arrange
        let mut cfg = AppSettings::default();
        cfg.app.app_id = "com.example.notes".to_string();

        // Act
        let value = serde_json::to_value(cfg.shell_facing()).unwrap();

        // Assert
        assert_eq!(value["app"]["appId"], "com.example.notes");
        assert!(value["app"].get("app_id").is_none());
        assert_eq!(value["window"]["minWidth"], 400);
        assert_eq!(value["updater"]["checkIntervalMs"], 3_600_000);
    }

    #[test]
    fn test_disabled_tray_is_omitted() {
        let cfg = AppSettings::default();
        assert!(cfg.shell_facing().tray.is_none());
    }

    #[test]
    fn test_enabled_tray_falls_back_to_app_name_tooltip() {
        let mut cfg = AppSettings::default();
        cfg.tray.enabled = true;

        let tray = cfg.shell_facing().tray.unwrap();

        assert_eq!(tray.tooltip.as_deref(), Some("NativeBridge"));
    }
}
