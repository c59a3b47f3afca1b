//! Storage infrastructure: settings file persistence.
//!
//! The settings schema lives in `domain::settings`; this module only moves it
//! between disk and memory.

pub mod config;
