//! Option records the web application sends to the shell.
//!
//! Every optional field is left out of the JSON body when unset, so the shell
//! applies its own default for it.  Keys are camelCase on the wire.

use serde::{Deserialize, Serialize};

// ── Windows ───────────────────────────────────────────────────────────────────

/// Geometry and chrome settings for opening a window.
///
/// Built with chained setters:
///
/// ```rust
/// use native_core::WindowOptions;
///
/// let opts = WindowOptions::new()
///     .url("/settings")
///     .title("Settings")
///     .size(640, 480)
///     .center();
/// assert_eq!(opts.width, Some(640));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOptions {
    /// Application route to load, relative to the web server root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullscreen: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub always_on_top: Option<bool>,
    /// macOS material name, e.g. `"sidebar"` or `"under-window"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vibrancy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparency: Option<bool>,
    /// `false` opens a frameless window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_dev_tools: Option<bool>,
}

impl WindowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn min_size(mut self, width: u32, height: u32) -> Self {
        self.min_width = Some(width);
        self.min_height = Some(height);
        self
    }

    pub fn max_size(mut self, width: u32, height: u32) -> Self {
        self.max_width = Some(width);
        self.max_height = Some(height);
        self
    }

    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn center(mut self) -> Self {
        self.center = Some(true);
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = Some(resizable);
        self
    }

    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = Some(fullscreen);
        self
    }

    pub fn always_on_top(mut self, on_top: bool) -> Self {
        self.always_on_top = Some(on_top);
        self
    }

    pub fn vibrancy(mut self, material: impl Into<String>) -> Self {
        self.vibrancy = Some(material.into());
        self
    }

    pub fn transparent(mut self, transparent: bool) -> Self {
        self.transparency = Some(transparent);
        self
    }

    pub fn frameless(mut self) -> Self {
        self.frame = Some(false);
        self
    }

    pub fn shadow(mut self, shadow: bool) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn show_dev_tools(mut self, show: bool) -> Self {
        self.show_dev_tools = Some(show);
        self
    }
}

// ── Notifications ─────────────────────────────────────────────────────────────

/// A system notification to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub title: String,
    pub body: String,
    /// Reference echoed back in the `notification.clicked` event, so the
    /// application can tell which notification was clicked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

impl NotificationOptions {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            event: None,
        }
    }

    pub fn with_event(mut self, reference: impl Into<String>) -> Self {
        self.event = Some(reference.into());
        self
    }
}

// ── Tray ──────────────────────────────────────────────────────────────────────

/// Tray (menu bar) icon settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayOptions {
    /// Path or URL of the icon image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// Text shown next to the icon (macOS only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

// ── Printing ──────────────────────────────────────────────────────────────────

/// Print job settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOptions {
    /// System name of the target printer; `None` prints to the default one.
    #[serde(rename = "deviceName", skip_serializing_if = "Option::is_none")]
    pub printer: Option<String>,
    /// Print without showing the system print dialog.
    pub silent: bool,
    pub copies: u32,
    pub landscape: bool,
    pub color: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            printer: None,
            silent: false,
            copies: 1,
            landscape: false,
            color: true,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_window_options_serialize_to_empty_object() {
        let json = serde_json::to_string(&WindowOptions::new()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_window_options_use_camel_case_keys() {
        // Arrange
        let opts = WindowOptions::new()
            .min_size(200, 100)
            .always_on_top(true)
            .show_dev_tools(false);

        // Act
        let value = serde_json::to_value(&opts).unwrap();

        // Assert
        assert_eq!(value["minWidth"], 200);
        assert_eq!(value["minHeight"], 100);
        assert_eq!(value["alwaysOnTop"], true);
        assert_eq!(value["showDevTools"], false);
    }

    #[test]
    fn test_window_chrome_setters() {
        let opts = WindowOptions::new()
            .center()
            .frameless()
            .transparent(true)
            .shadow(false)
            .vibrancy("sidebar");

        assert_eq!(opts.center, Some(true));
        assert_eq!(opts.frame, Some(false));
        assert_eq!(opts.transparency, Some(true));
        assert_eq!(opts.shadow, Some(false));
        assert_eq!(opts.vibrancy.as_deref(), Some("sidebar"));
    }

    #[test]
    fn test_notification_without_event_omits_key() {
        let value = serde_json::to_value(NotificationOptions::new("Hi", "There")).unwrap();
        assert!(value.get("event").is_none());
        assert_eq!(value["title"], "Hi");
    }

    #[test]
    fn test_notification_with_event_reference() {
        let opts = NotificationOptions::new("Build", "finished").with_event("build-42");
        let value = serde_json::to_value(opts).unwrap();
        assert_eq!(value["event"], "build-42");
    }

    #[test]
    fn test_print_options_default_to_one_colour_copy() {
        let opts = PrintOptions::default();
        assert_eq!(opts.copies, 1);
        assert!(opts.color);
        assert!(!opts.silent);
    }

    #[test]
    fn test_print_options_printer_is_sent_as_device_name() {
        let opts = PrintOptions {
            printer: Some("HP_LaserJet".to_string()),
            ..PrintOptions::default()
        };
        let value = serde_json::to_value(opts).unwrap();
        assert_eq!(value["deviceName"], "HP_LaserJet");
    }
}
