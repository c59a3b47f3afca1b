//! Command client: typed operations on the shell's control API.
//!
//! [`ShellClient`] knows *what* to ask the shell (method, path, body) and how
//! to read the answer into a typed record.  *How* the request travels is the
//! job of a [`ShellTransport`]; production code uses the reqwest transport in
//! `infrastructure::shell_conn`, tests use a mock.
//!
//! # Operations
//!
//! | Method                   | Request                                         | Result                 |
//! |--------------------------|-------------------------------------------------|------------------------|
//! | `printers`               | `GET printer`                                   | `Vec<PrinterInfo>`     |
//! | `print_html`             | `POST printer/print`                            | `()`                   |
//! | `open_window`            | `POST window/open`                              | `()`                   |
//! | `close_window`           | `POST window/close`                             | `()`                   |
//! | `resize_window`          | `POST window/resize`                            | `()`                   |
//! | `set_window_title`       | `POST window/title`                             | `()`                   |
//! | `show_notification`      | `POST notification`                             | `()`                   |
//! | `set_tray`               | `POST menu-bar/create`                          | `()`                   |
//! | `system_idle_state`      | `GET power-monitor/get-system-idle-state`       | `SystemIdleState`      |
//! | `system_idle_time`       | `GET power-monitor/get-system-idle-time`        | `Duration`             |
//! | `thermal_state`          | `GET power-monitor/get-current-thermal-state`   | `ThermalState`         |
//! | `is_on_battery_power`    | `GET power-monitor/is-on-battery-power`         | `bool`                 |
//! | `broadcast`              | `POST broadcast`                                | `()`                   |
//!
//! Scalar power-monitor answers come wrapped as `{"result": <value>}`.
//!
//! # Errors
//!
//! Every operation fails with [`BridgeError::ShellUnreachable`] when the shell
//! is not listening or the call times out, [`BridgeError::ShellError`] when the
//! shell answers with a non-success status, and [`BridgeError::Decode`] when a
//! success body has the wrong shape.  The client never retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use native_core::{
    NotificationOptions, PrintOptions, PrinterInfo, SystemIdleState, ThermalState, TrayOptions,
    WindowId, WindowOptions,
};

use crate::application::bridge_service::BridgeError;

// ── Request model ─────────────────────────────────────────────────────────────

/// HTTP method of a shell request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMethod {
    Get,
    Post,
    Delete,
}

/// One request to the shell's control API.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellRequest {
    pub method: ShellMethod,
    /// Path relative to the control API base URL, without a leading slash.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ShellRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: ShellMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: ShellMethod::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: ShellMethod::Delete,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

/// Sends a [`ShellRequest`] and returns the decoded JSON body.
///
/// An empty success body is returned as `Value::Null`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShellTransport: Send + Sync {
    async fn send(&self, request: ShellRequest) -> Result<Value, BridgeError>;
}

// ── Response shapes ───────────────────────────────────────────────────────────

/// Printer enumeration answer: older shells send a bare array, newer ones wrap
/// it in `{"printers": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PrinterList {
    Bare(Vec<PrinterInfo>),
    Wrapped { printers: Vec<PrinterInfo> },
}

#[derive(Deserialize)]
struct ScalarResult<T> {
    result: T,
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Typed command client over any [`ShellTransport`].
#[derive(Debug, Clone)]
pub struct ShellClient<T> {
    transport: T,
}

impl<T: ShellTransport> ShellClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Sends an arbitrary request and returns the raw JSON answer.
    ///
    /// For shell endpoints that have no typed method here.
    pub async fn request(&self, request: ShellRequest) -> Result<Value, BridgeError> {
        self.transport.send(request).await
    }

    /// Lists the printers installed on the host.
    pub async fn printers(&self) -> Result<Vec<PrinterInfo>, BridgeError> {
        let list: PrinterList = self.call(ShellRequest::get("printer")).await?;
        Ok(match list {
            PrinterList::Bare(printers) | PrinterList::Wrapped { printers } => printers,
        })
    }

    /// Prints an HTML document.
    pub async fn print_html(&self, html: &str, options: &PrintOptions) -> Result<(), BridgeError> {
        let mut body = to_object(options)?;
        body.insert("html".to_string(), Value::String(html.to_string()));
        self.fire(ShellRequest::post("printer/print", Value::Object(body)))
            .await
    }

    /// Opens (or focuses, if it exists) the window `id`.
    pub async fn open_window(
        &self,
        id: &WindowId,
        options: &WindowOptions,
    ) -> Result<(), BridgeError> {
        let mut body = to_object(options)?;
        body.insert("id".to_string(), Value::String(id.to_string()));
        self.fire(ShellRequest::post("window/open", Value::Object(body)))
            .await
    }

    pub async fn close_window(&self, id: &WindowId) -> Result<(), BridgeError> {
        self.fire(ShellRequest::post("window/close", json!({ "id": id })))
            .await
    }

    pub async fn resize_window(
        &self,
        id: &WindowId,
        width: u32,
        height: u32,
    ) -> Result<(), BridgeError> {
        self.fire(ShellRequest::post(
            "window/resize",
            json!({ "id": id, "width": width, "height": height }),
        ))
        .await
    }

    pub async fn set_window_title(&self, id: &WindowId, title: &str) -> Result<(), BridgeError> {
        self.fire(ShellRequest::post(
            "window/title",
            json!({ "id": id, "title": title }),
        ))
        .await
    }

    pub async fn show_notification(
        &self,
        notification: &NotificationOptions,
    ) -> Result<(), BridgeError> {
        let body = Value::Object(to_object(notification)?);
        self.fire(ShellRequest::post("notification", body)).await
    }

    /// Creates or replaces the tray icon.
    pub async fn set_tray(&self, tray: &TrayOptions) -> Result<(), BridgeError> {
        let body = Value::Object(to_object(tray)?);
        self.fire(ShellRequest::post("menu-bar/create", body)).await
    }

    /// Idle state of the host, where "idle" means no input for at least
    /// `threshold`.
    pub async fn system_idle_state(
        &self,
        threshold: Duration,
    ) -> Result<SystemIdleState, BridgeError> {
        let request = ShellRequest::get("power-monitor/get-system-idle-state")
            .with_query("threshold", threshold.as_secs());
        self.scalar(request).await
    }

    /// Time since the last user input.
    pub async fn system_idle_time(&self) -> Result<Duration, BridgeError> {
        let secs: u64 = self
            .scalar(ShellRequest::get("power-monitor/get-system-idle-time"))
            .await?;
        Ok(Duration::from_secs(secs))
    }

    pub async fn thermal_state(&self) -> Result<ThermalState, BridgeError> {
        self.scalar(ShellRequest::get("power-monitor/get-current-thermal-state"))
            .await
    }

    pub async fn is_on_battery_power(&self) -> Result<bool, BridgeError> {
        self.scalar(ShellRequest::get("power-monitor/is-on-battery-power"))
            .await
    }

    /// Sends an application event to the shell, which relays it to every
    /// open window.
    ///
    /// The body is `{"event": <event>, "payload": <payload>}`.
    pub async fn broadcast<P>(&self, event: &str, payload: &P) -> Result<(), BridgeError>
    where
        P: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(payload)
            .map_err(|e| BridgeError::Internal(format!("unserializable broadcast payload: {e}")))?;
        self.fire(ShellRequest::post(
            "broadcast",
            json!({ "event": event, "payload": payload }),
        ))
        .await
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    async fn call<R: DeserializeOwned>(&self, request: ShellRequest) -> Result<R, BridgeError> {
        let path = request.path.clone();
        let value = self.transport.send(request).await?;
        serde_json::from_value(value).map_err(|e| {
            debug!(%path, error = %e, "shell response did not match expected shape");
            BridgeError::Decode(format!("{path}: {e}"))
        })
    }

    async fn scalar<R: DeserializeOwned>(&self, request: ShellRequest) -> Result<R, BridgeError> {
        let wrapped: ScalarResult<R> = self.call(request).await?;
        Ok(wrapped.result)
    }

    /// Sends a command whose answer carries nothing the caller needs.
    async fn fire(&self, request: ShellRequest) -> Result<(), BridgeError> {
        self.transport.send(request).await.map(|_| ())
    }
}

fn to_object<S: Serialize>(value: &S) -> Result<serde_json::Map<String, Value>, BridgeError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(BridgeError::Internal(format!(
            "request options must serialize to an object, got {other}"
        ))),
        Err(e) => Err(BridgeError::Internal(e.to_string())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn client_answering(
        expected: ShellRequest,
        answer: Result<Value, BridgeError>,
    ) -> ShellClient<MockShellTransport> {
        let mut transport = MockShellTransport::new();
        let mut answer = Some(answer);
        transport
            .expect_send()
            .with(eq(expected))
            .times(1)
            .returning(move |_| answer.take().unwrap_or(Ok(Value::Null)));
        ShellClient::new(transport)
    }

    // ── Printers ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_printers_decodes_bare_array() {
        // Arrange
        let client = client_answering(
            ShellRequest::get("printer"),
            Ok(json!([{
                "name": "HP", "displayName": "HP 400", "description": "Office",
                "status": 3, "isDefault": true, "options": {"copies": "1"}
            }])),
        );

        // Act
        let printers = client.printers().await.unwrap();

        // Assert
        assert_eq!(printers.len(), 1);
        assert_eq!(printers[0].name(), "HP");
        assert_eq!(printers[0].display_name(), "HP 400");
        assert_eq!(printers[0].status(), 3);
        assert!(printers[0].is_default());
        assert_eq!(printers[0].option("copies"), Some("1"));
    }

    #[tokio::test]
    async fn test_printers_decodes_wrapped_list() {
        let client = client_answering(
            ShellRequest::get("printer"),
            Ok(json!({"printers": [{"name": "PDF", "displayName": "Save as PDF"}]})),
        );

        let printers = client.printers().await.unwrap();

        assert_eq!(printers[0].name(), "PDF");
    }

    #[tokio::test]
    async fn test_printers_with_wrong_shape_is_decode_error() {
        let client = client_answering(ShellRequest::get("printer"), Ok(json!({"oops": 1})));

        let err = client.printers().await.unwrap_err();

        assert!(matches!(err, BridgeError::Decode(_)));
    }

    #[tokio::test]
    async fn test_print_html_merges_options_and_html() {
        let expected = ShellRequest::post(
            "printer/print",
            json!({"html": "<p>hi</p>", "silent": true, "copies": 2, "landscape": false, "color": true}),
        );
        let client = client_answering(expected, Ok(Value::Null));
        let options = PrintOptions {
            silent: true,
            copies: 2,
            ..PrintOptions::default()
        };

        client.print_html("<p>hi</p>", &options).await.unwrap();
    }

    // ── Windows ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_open_window_sends_id_and_options() {
        let expected = ShellRequest::post(
            "window/open",
            json!({"id": "prefs", "title": "Preferences", "width": 400, "height": 300, "center": true}),
        );
        let client = client_answering(expected, Ok(Value::Null));
        let options = WindowOptions::new()
            .title("Preferences")
            .size(400, 300)
            .center();

        client
            .open_window(&WindowId::new("prefs"), &options)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_close_window_sends_id() {
        let client = client_answering(
            ShellRequest::post("window/close", json!({"id": "main"})),
            Ok(Value::Null),
        );

        client.close_window(&WindowId::main()).await.unwrap();
    }

    #[tokio::test]
    async fn test_resize_and_retitle_window() {
        let mut transport = MockShellTransport::new();
        transport
            .expect_send()
            .with(eq(ShellRequest::post(
                "window/resize",
                json!({"id": "main", "width": 1024, "height": 768}),
            )))
            .times(1)
            .returning(|_| Ok(Value::Null));
        transport
            .expect_send()
            .with(eq(ShellRequest::post(
                "window/title",
                json!({"id": "main", "title": "Notes"}),
            )))
            .times(1)
            .returning(|_| Ok(Value::Null));
        let client = ShellClient::new(transport);

        client.resize_window(&WindowId::main(), 1024, 768).await.unwrap();
        client.set_window_title(&WindowId::main(), "Notes").await.unwrap();
    }

    // ── Notifications and tray ────────────────────────────────────────────────

    #[tokio::test]
    async fn test_show_notification() {
        let client = client_answering(
            ShellRequest::post("notification", json!({"title": "Done", "body": "Export finished"})),
            Ok(json!({"ok": true})),
        );

        client
            .show_notification(&NotificationOptions::new("Done", "Export finished"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_set_tray() {
        let client = client_answering(
            ShellRequest::post("menu-bar/create", json!({"tooltip": "Notes"})),
            Ok(Value::Null),
        );
        let tray = TrayOptions {
            tooltip: Some("Notes".to_string()),
            ..TrayOptions::default()
        };

        client.set_tray(&tray).await.unwrap();
    }

    // ── Power monitor ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_system_idle_state_sends_threshold_in_seconds() {
        let client = client_answering(
            ShellRequest::get("power-monitor/get-system-idle-state").with_query("threshold", 60),
            Ok(json!({"result": "locked"})),
        );

        let state = client.system_idle_state(Duration::from_secs(60)).await.unwrap();

        assert_eq!(state, SystemIdleState::Locked);
    }

    #[tokio::test]
    async fn test_thermal_state_unknown_string_maps_to_unknown() {
        let client = client_answering(
            ShellRequest::get("power-monitor/get-current-thermal-state"),
            Ok(json!({"result": "toasty"})),
        );

        assert_eq!(client.thermal_state().await.unwrap(), ThermalState::Unknown);
    }

    #[tokio::test]
    async fn test_system_idle_time_is_seconds() {
        let client = client_answering(
            ShellRequest::get("power-monitor/get-system-idle-time"),
            Ok(json!({"result": 42})),
        );

        assert_eq!(client.system_idle_time().await.unwrap(), Duration::from_secs(42));
    }

    #[tokio::test]
    async fn test_is_on_battery_power() {
        let client = client_answering(
            ShellRequest::get("power-monitor/is-on-battery-power"),
            Ok(json!({"result": true})),
        );

        assert!(client.is_on_battery_power().await.unwrap());
    }

    #[tokio::test]
    async fn test_scalar_without_result_key_is_decode_error() {
        let client = client_answering(
            ShellRequest::get("power-monitor/is-on-battery-power"),
            Ok(json!(true)),
        );

        assert!(matches!(
            client.is_on_battery_power().await,
            Err(BridgeError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_raw_request_passes_answer_through() {
        let client = client_answering(
            ShellRequest::delete("menu-bar"),
            Ok(json!({"removed": true})),
        );

        let answer = client.request(ShellRequest::delete("menu-bar")).await.unwrap();

        assert_eq!(answer, json!({"removed": true}));
    }

    // ── Broadcast ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_broadcast_wraps_event_and_payload() {
        // Arrange
        let client = client_answering(
            ShellRequest::post(
                "broadcast",
                json!({"event": "OrderShipped", "payload": {"orderId": 7}}),
            ),
            Ok(Value::Null),
        );

        // Act / Assert
        client
            .broadcast("OrderShipped", &json!({"orderId": 7}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_broadcast_accepts_any_serializable_payload() {
        #[derive(Serialize)]
        struct Progress {
            done: u32,
        }

        let client = client_answering(
            ShellRequest::post("broadcast", json!({"event": "Progress", "payload": {"done": 3}})),
            Ok(Value::Null),
        );

        client.broadcast("Progress", &Progress { done: 3 }).await.unwrap();
    }

    // ── Error propagation ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_unreachable_shell_is_surfaced_unchanged() {
        let client = client_answering(
            ShellRequest::get("printer"),
            Err(BridgeError::ShellUnreachable("connection refused".to_string())),
        );

        let err = client.printers().await.unwrap_err();

        assert!(matches!(err, BridgeError::ShellUnreachable(_)));
    }

    #[tokio::test]
    async fn test_shell_error_status_is_surfaced_unchanged() {
        let client = client_answering(
            ShellRequest::post("window/close", json!({"id": "ghost"})),
            Err(BridgeError::ShellError {
                status: 404,
                message: "no such window".to_string(),
            }),
        );

        let err = client.close_window(&WindowId::new("ghost")).await.unwrap_err();

        match err {
            BridgeError::ShellError { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "no such window");
            }
            other => panic!("expected ShellError, got {:?}", other),
        }
    }
}
