//! Wire vocabulary shared by the bridge and the shell: route paths, header
//! and cookie names, and the named-event mapping.

pub mod events;
pub mod routes;

pub use events::{EventError, MenuItem, NativeEvent};
