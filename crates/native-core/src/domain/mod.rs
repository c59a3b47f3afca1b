//! Domain records for the native shell bridge.
//!
//! This module contains plain data with no infrastructure dependencies.
//!
//! # Snapshots, not objects (for beginners)
//!
//! Everything the shell reports (a printer list, the thermal state of the
//! machine) is a *snapshot*: it is read once from a JSON response, handed to
//! the caller, and never changed afterwards.  The reported records therefore
//! keep their fields private and expose read accessors only.
//!
//! The option records in [`options`] go the other way: the web application
//! fills them in and the command client serialises them into a request body.

/// Request options sent to the shell (windows, notifications, tray, printing).
pub mod options;

/// Host power states reported by the shell.
pub mod power;

/// Printer snapshot returned by printer enumeration.
pub mod printer;

/// Window identity and its request-header defaulting rule.
pub mod window;
