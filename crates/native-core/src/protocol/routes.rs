//! Paths and names both sides of the bridge must agree on byte for byte.

/// Shell reports that it finished starting up.
pub const BOOTED_PATH: &str = "/_native/api/booted";

/// Shell forwards a native occurrence (menu click, notification click, ...).
pub const EVENTS_PATH: &str = "/_native/api/events";

/// Shell bootstraps its credential.  Not guarded.
pub const COOKIE_PATH: &str = "/_native/api/cookie";

/// Shell reads the application configuration for its first window.
pub const CONFIG_PATH: &str = "/_native/api/config";

/// Header carrying the shell credential, in both directions.
pub const SECRET_HEADER: &str = "X-NativePHP-Secret";

/// Cookie carrying the shell credential issued by [`COOKIE_PATH`].
pub const SECRET_COOKIE: &str = "_php_native";
