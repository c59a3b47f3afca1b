//! In-process event dispatch.
//!
//! The inbound endpoint turns every accepted shell call into exactly one
//! [`AppEvent`] and hands it to the [`EventDispatcher`], which calls every
//! registered [`EventListener`] in registration order.
//!
//! # Lifecycle
//!
//! Listeners are registered while the dispatcher is being built, before the
//! server starts.  Afterwards the dispatcher is shared behind an `Arc` and
//! never changes, so dispatching needs no lock.
//!
//! # Ordering
//!
//! `dispatch` runs the listeners synchronously inside the request handler and
//! the handler answers the shell only afterwards.  Events delivered one after
//! another on the same connection therefore reach listeners in that order.

use std::sync::Arc;

use native_core::NativeEvent;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Events the bridge raises inside the application.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The shell finished starting up.  Raised once per `booted` call.
    ApplicationReady,
    /// The shell reported a native occurrence.
    Native(NativeEvent),
}

impl AppEvent {
    /// Name used in logs: `"app.ready"` or the native event's wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ApplicationReady => "app.ready",
            Self::Native(event) => event.name(),
        }
    }
}

/// Something the application wants to run when the shell reports an event.
///
/// Implementations must not block: they run on the request handler's task.
pub trait EventListener: Send + Sync {
    fn handle(&self, event: &AppEvent);
}

/// Any `Fn(&AppEvent)` closure is a listener.
impl<F> EventListener for F
where
    F: Fn(&AppEvent) + Send + Sync,
{
    fn handle(&self, event: &AppEvent) {
        self(event)
    }
}

/// Fans one event out to every registered listener.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    listeners: Vec<Arc<dyn EventListener>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.  Listeners run in registration order.
    pub fn with_listener(mut self, listener: impl EventListener + 'static) -> Self {
        self.listeners.push(Arc::new(listener));
        self
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Calls every listener with `event` and returns how many were called.
    pub fn dispatch(&self, event: &AppEvent) -> usize {
        debug!(event = event.name(), listeners = self.listeners.len(), "dispatching");
        for listener in &self.listeners {
            listener.handle(event);
        }
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// ── Built-in listeners ────────────────────────────────────────────────────────

/// Logs every event at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingListener;

impl EventListener for LoggingListener {
    fn handle(&self, event: &AppEvent) {
        match event {
            AppEvent::ApplicationReady => info!("native shell booted; application ready"),
            AppEvent::Native(native) => match serde_json::to_string(native) {
                Ok(json) => info!(event = native.name(), payload = %json, "native event"),
                Err(_) => info!(event = native.name(), "native event"),
            },
        }
    }
}

/// Forwards every event into an unbounded channel, so async application code
/// can consume events on its own task.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl ChannelListener {
    /// Creates the listener and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventListener for ChannelListener {
    fn handle(&self, event: &AppEvent) {
        if self.tx.send(event.clone()).is_err() {
            warn!(event = event.name(), "event receiver dropped; event discarded");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
