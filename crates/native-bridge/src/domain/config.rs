//! Bridge runtime configuration.
//!
//! [`BridgeConfig`] is the resolved set of settings the running bridge uses:
//! the settings file merged with CLI arguments and environment variables.
//! `main.rs` builds it once; everything else receives it by value or behind an
//! `Arc`.

use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::settings::{AppSettings, ShellFacingConfig};

/// All runtime configuration for the bridge.
///
/// # Example
///
/// ```rust
/// use native_bridge::domain::BridgeConfig;
///
/// let cfg = BridgeConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 8100);
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Address the inbound event endpoint listens on.
    pub bind_addr: SocketAddr,

    /// Base URL of the shell's control API, e.g. `http://127.0.0.1:4000/api/`.
    pub shell_url: String,

    /// Shared secret the shell and the bridge both know.
    ///
    /// Inbound, it (or a token signed with it) must accompany every guarded
    /// request.  Outbound, it is sent to the shell on every command.
    pub secret: String,

    /// Upper bound on a single outbound call to the shell.
    pub shell_timeout: Duration,

    /// Settings served to the shell on the config route.
    pub shell_facing: ShellFacingConfig,
}

impl Default for BridgeConfig {
    /// Local development defaults with an empty secret.
    ///
    /// | Field          | Default                        |
    /// |----------------|--------------------------------|
    /// | bind_addr      | `127.0.0.1:8100`               |
    /// | shell_url      | `http://127.0.0.1:4000/api/`   |
    /// | secret         | empty (guard rejects everyone) |
    /// | shell_timeout  | 60 seconds                     |
    fn default() -> Self {
        let settings = AppSettings::default();
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], settings.server.port)),
            shell_url: settings.shell.api_url.clone(),
            secret: String::new(),
            shell_timeout: settings.shell.timeout(),
            shell_facing: settings.shell_facing(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
