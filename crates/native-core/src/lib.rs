//! # native-core
//!
//! Shared library for the native shell bridge containing the data-transfer
//! records reported by the shell, the host power states, window identity
//! resolution, and the mapping from shell event names to typed events.
//!
//! This crate is used by the bridge service and by anything that wants to talk
//! to the shell with the same vocabulary.  It has zero dependencies on
//! sockets, HTTP frameworks, or async runtimes.
//!
//! # Architecture overview (for beginners)
//!
//! A web application does not draw its own desktop windows.  A separately
//! running native shell process owns the windows, the tray icon, the
//! notification centre and the printers.  The two talk over HTTP in both
//! directions:
//!
//! - **`domain`** – The records that cross the bridge: [`PrinterInfo`], the
//!   power states ([`SystemIdleState`], [`ThermalState`], [`PowerState`]),
//!   window identity ([`WindowId`]) and the request options the web side sends.
//!
//! - **`protocol`** – How the shell names its events on the wire.  The inbound
//!   `{"event": "menu.clicked", ...}` envelope is turned into a [`NativeEvent`]
//!   by a compile-time `match`, never by runtime type lookup.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `native_core::PrinterInfo` instead of `native_core::domain::printer::PrinterInfo`.
pub use domain::options::{NotificationOptions, PrintOptions, TrayOptions, WindowOptions};
pub use domain::power::{ParseStateError, PowerState, SystemIdleState, ThermalState};
pub use domain::printer::PrinterInfo;
pub use domain::window::{resolve_window_id, WindowId, MAIN_WINDOW_ID, WINDOW_ID_HEADER};
pub use protocol::events::{EventError, MenuItem, NativeEvent};
