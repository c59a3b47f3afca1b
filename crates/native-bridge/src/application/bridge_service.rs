//! Bridge service: the use cases behind the inbound endpoint.
//!
//! The HTTP layer parses requests into plain values and calls one method here
//! per route.  Nothing in this module knows about axum, so every rule about
//! when an event fires can be tested without a server.
//!
//! # Use cases
//!
//! | Route    | Method                        | Effect                                   |
//! |----------|-------------------------------|------------------------------------------|
//! | `booted` | [`BridgeService::booted`]     | raises [`AppEvent::ApplicationReady`]    |
//! | `events` | [`BridgeService::dispatch_event`] | raises [`AppEvent::Native`]          |
//! | `cookie` | [`BridgeService::issue_cookie`]   | returns a fresh shell token          |
//!
//! A request that fails (bad credentials, unknown event, unreadable body)
//! raises nothing.

use std::sync::Arc;

use native_core::{EventError, NativeEvent, WindowId};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::access_guard::{AccessGuard, PresentedCredentials};
use crate::application::dispatcher::{AppEvent, EventDispatcher};

/// Everything that can go wrong between the application and the shell.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The shell's control API is not listening, or the call timed out.
    #[error("native shell unreachable: {0}")]
    ShellUnreachable(String),

    /// The shell answered with a non-success status.
    #[error("native shell returned {status}: {message}")]
    ShellError { status: u16, message: String },

    /// The shell answered with a success status but an unexpected body.
    #[error("could not decode shell response: {0}")]
    Decode(String),

    /// An inbound event name is not in the known set.
    #[error("unknown native event `{0}`")]
    UnknownEvent(String),

    /// A known event arrived with a payload that does not fit it.
    #[error("invalid event payload: {0}")]
    InvalidPayload(String),

    /// The inbound body is not well-formed JSON.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The caller did not present a valid shell credential.
    #[error("forbidden")]
    Forbidden,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<EventError> for BridgeError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::UnknownEvent(name) => Self::UnknownEvent(name),
            other => Self::InvalidPayload(other.to_string()),
        }
    }
}

/// Inbound use cases, shared by every request handler.
#[derive(Debug, Clone)]
pub struct BridgeService {
    dispatcher: Arc<EventDispatcher>,
    guard: AccessGuard,
}

impl BridgeService {
    pub fn new(dispatcher: EventDispatcher, guard: AccessGuard) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            guard,
        }
    }

    /// Admits or rejects a request to a guarded route.
    pub fn authorize(&self, presented: &PresentedCredentials) -> Result<(), BridgeError> {
        self.guard.check(presented).map_err(|e| {
            warn!("rejected request without a valid shell credential");
            e
        })
    }

    /// The shell finished starting.  Raises one `ApplicationReady` per call.
    ///
    /// The body is optional; when present it must be well-formed JSON.
    pub fn booted(&self, body: &[u8]) -> Result<(), BridgeError> {
        if !body.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_slice::<Value>(body)
                .map_err(|e| BridgeError::MalformedBody(e.to_string()))?;
        }
        self.dispatcher.dispatch(&AppEvent::ApplicationReady);
        Ok(())
    }

    /// Maps one event envelope to a [`NativeEvent`] and raises it.
    ///
    /// `acting_window` fills in the `id` of window events that do not name
    /// a window themselves.
    pub fn dispatch_event(
        &self,
        body: &[u8],
        acting_window: &WindowId,
    ) -> Result<NativeEvent, BridgeError> {
        let envelope: Value =
            serde_json::from_slice(body).map_err(|e| BridgeError::MalformedBody(e.to_string()))?;

        let event = NativeEvent::from_envelope(envelope, acting_window).map_err(|e| {
            match &e {
                EventError::UnknownEvent(name) => {
                    warn!(event = %name, window = %acting_window, "ignoring unknown native event")
                }
                other => debug!(window = %acting_window, error = %other, "event rejected"),
            }
            BridgeError::from(e)
        })?;

        self.dispatcher.dispatch(&AppEvent::Native(event.clone()));
        Ok(event)
    }

    /// Issues a fresh shell token for the cookie route.
    pub fn issue_cookie(&self) -> String {
        self.guard.issue_token()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
