//! Window identity.
//!
//! The shell can host several windows of the same web application.  When a
//! window calls back into the application it names itself in the
//! [`WINDOW_ID_HEADER`] request header; requests without that header belong to
//! the main window.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Request header carrying the acting window's identity.
pub const WINDOW_ID_HEADER: &str = "X-NativePHP-Window-Id";

/// Identity assumed when a request does not name a window.
pub const MAIN_WINDOW_ID: &str = "main";

/// Identifier of one native window.
///
/// Any non-empty string is a valid identity; the shell chooses the format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The sentinel identity of the application's first window.
    pub fn main() -> Self {
        Self(MAIN_WINDOW_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_main(&self) -> bool {
        self.0 == MAIN_WINDOW_ID
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::main()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the acting window from the raw value of [`WINDOW_ID_HEADER`].
///
/// A present, non-empty value is taken as-is (no trimming or format checks).
/// A missing or empty value resolves to [`MAIN_WINDOW_ID`].
///
/// ```rust
/// use native_core::resolve_window_id;
///
/// assert_eq!(resolve_window_id(Some("secondary")).as_str(), "secondary");
/// assert_eq!(resolve_window_id(None).as_str(), "main");
/// ```
pub fn resolve_window_id(header: Option<&str>) -> WindowId {
    match header {
        Some(value) if !value.is_empty() => WindowId::new(value),
        _ => WindowId::main(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
