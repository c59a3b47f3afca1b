//! Named shell events and their typed payloads.
//!
//! The shell reports native occurrences by POSTing an *envelope* to the
//! bridge's events route:
//!
//! ```json
//! {"event":"menu.clicked","item":{"id":"file.open","label":"Open…"},"combo":["CmdOrCtrl","O"]}
//! ```
//!
//! The event name selects one variant of [`NativeEvent`]; the remaining fields
//! fill that variant.  The name lookup is an ordinary `match` over a closed
//! list, so an unrecognised name is a clean [`EventError::UnknownEvent`]
//! rather than a runtime type lookup.
//!
//! # Payload binding
//!
//! Fields can arrive in three shapes, checked in this order:
//!
//! 1. `"payload": [a, b]` – values bound positionally to the variant's
//!    declared field order (see [`NativeEvent::field_names`]).
//! 2. `"payload": {...}` – fields bound by name from that object.
//! 3. No `"payload"` key – fields bound by name from the envelope itself.
//!
//! # Wire names
//!
//! | Name                          | Variant               | Fields          |
//! |-------------------------------|-----------------------|-----------------|
//! | `menu.clicked`                | `MenuItemClicked`     | `item`, `combo` |
//! | `notification.clicked`        | `NotificationClicked` | `reference`     |
//! | `window.focused`              | `WindowFocused`       | `id`            |
//! | `window.blurred`              | `WindowBlurred`       | `id`            |
//! | `window.closed`               | `WindowClosed`        | `id`            |
//! | `power.thermal-state-changed` | `ThermalStateChanged` | `state`         |
//! | `power.speed-limit-changed`   | `SpeedLimitChanged`   | `limit`         |
//! | `power.idle-state-changed`    | `IdleStateChanged`    | `state`         |
//! | `power.state-changed`         | `PowerStateChanged`   | `state`         |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::domain::power::{PowerState, SystemIdleState, ThermalState};
use crate::domain::window::WindowId;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors produced while turning an envelope into a [`NativeEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The envelope names an event this bridge does not know.
    #[error("unknown event: {0:?}")]
    UnknownEvent(String),

    /// The envelope is not a JSON object.
    #[error("event envelope must be a JSON object")]
    NotAnObject,

    /// The envelope has no string `"event"` field.
    #[error("event envelope is missing the \"event\" name")]
    MissingEventName,

    /// The event is known but its fields do not fit the payload shape.
    #[error("invalid payload for {event:?}: {reason}")]
    InvalidPayload { event: String, reason: String },
}

// ── Payload types ─────────────────────────────────────────────────────────────

/// The menu item the user clicked, as described by the shell.
///
/// `id`, `label` and `checked` are the fields the bridge understands; anything
/// else the shell sends (role, type, accelerator, ...) is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Every shell event the bridge can dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum NativeEvent {
    /// A menu item (application menu, tray menu, or context menu) was clicked.
    #[serde(rename = "menu.clicked")]
    MenuItemClicked {
        item: MenuItem,
        /// Modifier keys held during the click, e.g. `["Shift", "CmdOrCtrl"]`.
        #[serde(default)]
        combo: Vec<String>,
    },

    /// The user clicked a notification shown by the application.
    ///
    /// `reference` is the `event` reference the notification was shown with,
    /// if any.
    #[serde(rename = "notification.clicked")]
    NotificationClicked {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference: Option<String>,
    },

    #[serde(rename = "window.focused")]
    WindowFocused { id: WindowId },

    #[serde(rename = "window.blurred")]
    WindowBlurred { id: WindowId },

    #[serde(rename = "window.closed")]
    WindowClosed { id: WindowId },

    #[serde(rename = "power.thermal-state-changed")]
    ThermalStateChanged { state: ThermalState },

    /// CPU speed limit changed; `limit` is a percentage of full speed.
    #[serde(rename = "power.speed-limit-changed")]
    SpeedLimitChanged { limit: u8 },

    #[serde(rename = "power.idle-state-changed")]
    IdleStateChanged { state: SystemIdleState },

    /// The host switched between mains and battery power.
    #[serde(rename = "power.state-changed")]
    PowerStateChanged { state: PowerState },
}

/// Names of all known events, in declaration order.
pub const KNOWN_EVENTS: &[&str] = &[
    "menu.clicked",
    "notification.clicked",
    "window.focused",
    "window.blurred",
    "window.closed",
    "power.thermal-state-changed",
    "power.speed-limit-changed",
    "power.idle-state-changed",
    "power.state-changed",
];

impl NativeEvent {
    /// Wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MenuItemClicked { .. } => "menu.clicked",
            Self::NotificationClicked { .. } => "notification.clicked",
            Self::WindowFocused { .. } => "window.focused",
            Self::WindowBlurred { .. } => "window.blurred",
            Self::WindowClosed { .. } => "window.closed",
            Self::ThermalStateChanged { .. } => "power.thermal-state-changed",
            Self::SpeedLimitChanged { .. } => "power.speed-limit-changed",
            Self::IdleStateChanged { .. } => "power.idle-state-changed",
            Self::PowerStateChanged { .. } => "power.state-changed",
        }
    }

    /// Declared field order of the named event, or `None` if the name is
    /// unknown.  Positional payloads bind against this order.
    pub fn field_names(name: &str) -> Option<&'static [&'static str]> {
        let fields: &'static [&'static str] = match name {
            "menu.clicked" => &["item", "combo"],
            "notification.clicked" => &["reference"],
            "window.focused" | "window.blurred" | "window.closed" => &["id"],
            "power.thermal-state-changed"
            | "power.idle-state-changed"
            | "power.state-changed" => &["state"],
            "power.speed-limit-changed" => &["limit"],
            _ => return None,
        };
        Some(fields)
    }

    /// Decodes a complete envelope (`{"event": name, ...}`).
    ///
    /// `acting_window` fills the `id` of window events whose payload leaves
    /// it out, so a window reporting about itself need not repeat its own id.
    ///
    /// # Errors
    ///
    /// See [`EventError`]; an unknown name is reported before any payload
    /// field is looked at.
    pub fn from_envelope(envelope: Value, acting_window: &WindowId) -> Result<Self, EventError> {
        let Value::Object(mut envelope) = envelope else {
            return Err(EventError::NotAnObject);
        };

        let name = match envelope.remove("event") {
            Some(Value::String(name)) => name,
            _ => return Err(EventError::MissingEventName),
        };

        let fields = Self::field_names(&name).ok_or_else(|| EventError::UnknownEvent(name.clone()))?;

        let mut bound = match envelope.remove("payload") {
            Some(Value::Array(values)) => bind_positional(&name, fields, values)?,
            Some(Value::Object(map)) => map,
            Some(Value::Null) | None => envelope,
            Some(other) => {
                return Err(EventError::InvalidPayload {
                    event: name,
                    reason: format!("payload must be an array or object, got {other}"),
                })
            }
        };

        if fields.contains(&"id") && !bound.contains_key("id") {
            bound.insert("id".to_string(), Value::String(acting_window.to_string()));
        }

        debug!(event = %name, fields = bound.len(), "decoding native event");

        bound.insert("event".to_string(), Value::String(name.clone()));
        serde_json::from_value(Value::Object(bound)).map_err(|e| EventError::InvalidPayload {
            event: name,
            reason: e.to_string(),
        })
    }
}

/// Zips positional payload values with the event's declared field names.
///
/// Fewer values than fields is allowed (missing fields fall back to serde
/// defaults or fail later as missing); more values than fields is an error.
fn bind_positional(
    name: &str,
    fields: &[&str],
    values: Vec<Value>,
) -> Result<Map<String, Value>, EventError> {
    if values.len() > fields.len() {
        return Err(EventError::InvalidPayload {
            event: name.to_string(),
            reason: format!(
                "expected at most {} positional values, got {}",
                fields.len(),
                values.len()
            ),
        });
    }

    Ok(fields
        .iter()
        .zip(values)
        .map(|(field, value)| ((*field).to_string(), value))
        .collect())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
