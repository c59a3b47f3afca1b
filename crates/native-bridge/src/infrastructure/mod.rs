//! Infrastructure layer for native-bridge.
//!
//! Everything that touches the network or the file system lives here:
//!
//! - [`http_server`]: the axum router the shell calls back into
//! - [`shell_conn`]: the reqwest transport for outbound shell commands
//! - [`storage`]: loading and saving the TOML settings file
//!
//! # What does NOT belong here?
//!
//! - Deciding who may call a route or which event a body means (application
//!   layer)
//! - The settings schema and DTOs (domain layer and `native-core`)

pub mod http_server;
pub mod shell_conn;
pub mod storage;

pub use http_server::{router, run_server, AppState};
pub use shell_conn::HttpShellTransport;
