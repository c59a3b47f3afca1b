//! HTTP transport to the shell's control API.
//!
//! [`HttpShellTransport`] is the production [`ShellTransport`]: it joins the
//! request path onto the configured base URL, attaches the shared secret in
//! the `X-NativePHP-Secret` header, and turns the shell's answer into either a
//! JSON value or a [`BridgeError`].
//!
//! # Error mapping
//!
//! | What happened                              | Result                         |
//! |--------------------------------------------|--------------------------------|
//! | connect refused, DNS failure, timeout      | `ShellUnreachable`             |
//! | request could not be built (bad header)    | `Internal`                     |
//! | status outside 2xx                         | `ShellError { status, message }` |
//! | 2xx with empty body                        | `Ok(Value::Null)`              |
//! | 2xx with a body that is not JSON           | `Decode`                       |
//!
//! The shell reports failures as `{"error": "..."}` or `{"message": "..."}`;
//! the first one present becomes `message`, otherwise the raw body text does.
//!
//! One `reqwest::Client` (and therefore one connection pool) is shared by all
//! clones of the transport.  Calls are independent and may run concurrently.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::{debug, warn};

use native_core::protocol::routes::SECRET_HEADER;

use crate::application::bridge_service::BridgeError;
use crate::application::command_client::{ShellMethod, ShellRequest, ShellTransport};

/// reqwest-backed [`ShellTransport`].
#[derive(Clone)]
pub struct HttpShellTransport {
    client: Client,
    base_url: Url,
    secret: String,
}

impl std::fmt::Debug for HttpShellTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpShellTransport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpShellTransport {
    /// Creates a transport for the control API at `base_url`.
    ///
    /// A missing trailing slash is added, so `http://host/api` and
    /// `http://host/api/` behave the same.
    ///
    /// # Errors
    ///
    /// [`BridgeError::Internal`] if `base_url` is not a valid URL or the HTTP
    /// client cannot be built.
    pub fn new(
        base_url: &str,
        secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BridgeError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| BridgeError::Internal(format!("invalid shell URL {base_url:?}: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BridgeError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            secret: secret.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}

#[async_trait]
impl ShellTransport for HttpShellTransport {
    async fn send(&self, request: ShellRequest) -> Result<Value, BridgeError> {
        let url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| BridgeError::Internal(format!("bad shell path {:?}: {e}", request.path)))?;

        let method = match request.method {
            ShellMethod::Get => Method::GET,
            ShellMethod::Post => Method::POST,
            ShellMethod::Delete => Method::DELETE,
        };

        debug!(%method, %url, "calling shell");

        let mut builder = self
            .client
            .request(method, url.clone())
            .header(SECRET_HEADER, &self.secret);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                return BridgeError::Internal(format!("could not build shell request: {e}"));
            }
            warn!(%url, error = %e, "shell call failed");
            BridgeError::ShellUnreachable(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BridgeError::ShellUnreachable(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(&text).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| text.clone())
            });
            warn!(%url, status = status.as_u16(), %message, "shell returned an error");
            return Err(BridgeError::ShellError {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| BridgeError::Decode(format!("{url}: {e}")))
    }
}

/// Pulls a human-readable message out of an error body.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["error", "message"] {
            if let Some(Value::String(message)) = map.get(key) {
                return Some(message.clone());
            }
        }
    }
    Some(trimmed.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
