//! native-bridge library crate.
//!
//! Connects a web application to the native desktop shell that hosts it.  The
//! two processes talk HTTP in both directions:
//!
//! ```text
//!   web application                         native shell
//!  ┌──────────────────────┐   commands   ┌────────────────────┐
//!  │ ShellClient ─────────┼─────────────▶│ control API        │
//!  │                      │              │ (windows, tray,    │
//!  │ event endpoint ◀─────┼──────────────┤  printers, power)  │
//!  │  booted/events/...   │   callbacks  └────────────────────┘
//!  └──────────────────────┘
//! ```
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! [native-bridge]
//!   ├── domain/            BridgeConfig, settings file schema
//!   ├── application/       access guard, event dispatch, command client
//!   └── infrastructure/
//!         ├── http_server/ axum router for shell callbacks
//!         ├── shell_conn/  reqwest transport for shell commands
//!         └── storage/     TOML settings file
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `native-core`; the only seam to the
//!   network is the [`application::ShellTransport`] trait.
//! - `infrastructure` depends on all other layers plus axum and reqwest.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use native_bridge::application::ShellClient;
//! use native_bridge::infrastructure::HttpShellTransport;
//!
//! # async fn example() -> Result<(), native_bridge::application::BridgeError> {
//! let transport = HttpShellTransport::new(
//!     "http://127.0.0.1:4000/api/",
//!     "s3cret",
//!     Duration::from_secs(10),
//! )?;
//! let shell = ShellClient::new(transport);
//! for printer in shell.printers().await? {
//!     println!("{}", printer.display_name());
//! }
//! # Ok(())
//! # }
//! ```

/// Domain layer: runtime configuration and the settings schema.
pub mod domain;

/// Application layer: guard, dispatch, and the command client.
pub mod application;

/// Infrastructure layer: HTTP server, HTTP client, settings file.
pub mod infrastructure;
