//! Domain layer for native-bridge.
//!
//! The domain layer contains plain configuration types that have no
//! dependencies on I/O, networking, or frameworks.
//!
//! # What belongs in the domain layer?
//!
//! - The runtime configuration of the bridge ([`BridgeConfig`])
//! - The schema of the settings file ([`AppSettings`])
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, `axum`, or `reqwest` types
//! - File I/O or environment variable reading
//! - The shell's wire records (those live in `native-core`)

pub mod config;
pub mod settings;

pub use config::BridgeConfig;
pub use settings::{AppSettings, AppView, ShellFacingConfig};
