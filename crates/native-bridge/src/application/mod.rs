//! Application layer: use cases that sit between the HTTP edges and the
//! shared domain types.
//!
//! - [`access_guard`] decides who may call the privileged routes.
//! - [`bridge_service`] turns inbound shell calls into application events.
//! - [`dispatcher`] fans those events out to listeners.
//! - [`command_client`] sends typed commands to the shell.

pub mod access_guard;
pub mod bridge_service;
pub mod command_client;
pub mod dispatcher;

pub use access_guard::{AccessGuard, PresentedCredentials};
pub use bridge_service::{BridgeError, BridgeService};
pub use command_client::{ShellClient, ShellMethod, ShellRequest, ShellTransport};
pub use dispatcher::{AppEvent, ChannelListener, EventDispatcher, EventListener, LoggingListener};
