//! Inbound event endpoint: the axum router the shell calls back into.
//!
//! | Route                      | Guarded | Handler   |
//! |----------------------------|---------|-----------|
//! | `POST /_native/api/booted` | yes     | `booted`  |
//! | `POST /_native/api/events` | yes     | `events`  |
//! | `GET  /_native/api/config` | yes     | `config`  |
//! | `GET  /_native/api/cookie` | no      | `cookie`  |
//!
//! The guard runs as a route layer on the guarded routes only, before the body
//! is read, so a rejected request never reaches a handler and raises nothing.
//!
//! # Failures (for beginners)
//!
//! Handlers return `Result<_, BridgeError>`.  axum turns the `Err` side into a
//! response through the [`IntoResponse`] impl below, which picks the status
//! code and writes `{"error": "..."}`.  A panic inside a handler is caught by
//! `CatchPanicLayer` and answered with a plain 500 instead of dropping the
//! connection.  Both paths log under the `native_bridge::uncaught` target.

use std::any::Any;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use native_core::protocol::routes::{
    BOOTED_PATH, CONFIG_PATH, COOKIE_PATH, EVENTS_PATH, SECRET_COOKIE, SECRET_HEADER,
};
use native_core::{resolve_window_id, WindowId, WINDOW_ID_HEADER};

use crate::application::access_guard::{AccessGuard, PresentedCredentials};
use crate::application::bridge_service::{BridgeError, BridgeService};
use crate::application::dispatcher::EventDispatcher;
use crate::domain::config::BridgeConfig;
use crate::domain::settings::ShellFacingConfig;

const UNCAUGHT_TARGET: &str = "native_bridge::uncaught";

// ── State ─────────────────────────────────────────────────────────────────────

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    service: BridgeService,
    shell_facing: Arc<ShellFacingConfig>,
}

impl AppState {
    pub fn new(service: BridgeService, shell_facing: ShellFacingConfig) -> Self {
        Self {
            service,
            shell_facing: Arc::new(shell_facing),
        }
    }

    /// Wires the guard and the listeners for `config`.
    pub fn from_config(config: &BridgeConfig, dispatcher: EventDispatcher) -> Self {
        let guard = AccessGuard::new(config.secret.clone());
        Self::new(
            BridgeService::new(dispatcher, guard),
            config.shell_facing.clone(),
        )
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Builds the complete router.
pub fn router(state: AppState) -> Router {
    let guarded = Router::new()
        .route(BOOTED_PATH, post(booted))
        .route(EVENTS_PATH, post(events))
        .route(CONFIG_PATH, get(config))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_shell));

    Router::new()
        .merge(guarded)
        .route(COOKIE_PATH, get(cookie))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Serves [`router`] on `config.bind_addr` until `running` is cleared.
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run_server(
    config: BridgeConfig,
    dispatcher: EventDispatcher,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind event endpoint on {}", config.bind_addr))?;
    let local: SocketAddr = listener
        .local_addr()
        .context("failed to read bound address")?;

    info!("native event endpoint listening on http://{local}");

    let app = router(AppState::from_config(&config, dispatcher));
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_stop(running))
        .await
        .context("event endpoint server failed")?;

    info!("native event endpoint stopped");
    Ok(())
}

async fn wait_for_stop(running: Arc<AtomicBool>) {
    while running.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}

// ── Guard ─────────────────────────────────────────────────────────────────────

async fn require_shell(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, BridgeError> {
    state.service.authorize(&credentials_from(request.headers()))?;
    Ok(next.run(request).await)
}

/// Collects the credential material a request carries.
pub fn credentials_from(headers: &HeaderMap) -> PresentedCredentials {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    PresentedCredentials {
        header: header_str(SECRET_HEADER),
        cookie: cookie_value(headers, SECRET_COOKIE),
        fetch_mode: header_str("sec-fetch-mode"),
    }
}

/// Value of cookie `name` across all `Cookie` headers, if present.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

// ── Window identity ───────────────────────────────────────────────────────────

/// The window a request acts for, from `X-NativePHP-Window-Id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingWindow(pub WindowId);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ActingWindow {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(WINDOW_ID_HEADER)
            .and_then(|v| v.to_str().ok());
        Ok(Self(resolve_window_id(header)))
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn booted(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, BridgeError> {
    state.service.booted(&body)?;
    Ok(StatusCode::OK)
}

async fn events(
    State(state): State<AppState>,
    ActingWindow(window): ActingWindow,
    body: Bytes,
) -> Result<StatusCode, BridgeError> {
    state.service.dispatch_event(&body, &window)?;
    Ok(StatusCode::OK)
}

async fn config(State(state): State<AppState>) -> Json<ShellFacingConfig> {
    Json(ShellFacingConfig::clone(&state.shell_facing))
}

async fn cookie(State(state): State<AppState>) -> Result<Response, BridgeError> {
    let token = state.service.issue_cookie();
    let set_cookie = HeaderValue::from_str(&format!(
        "{SECRET_COOKIE}={token}; HttpOnly; SameSite=Strict; Path=/"
    ))
    .map_err(|e| BridgeError::Internal(format!("unencodable cookie: {e}")))?;

    Ok((
        [(header::SET_COOKIE, set_cookie)],
        Json(json!({ "cookie": token })),
    )
        .into_response())
}

// ── Error responses ───────────────────────────────────────────────────────────

impl BridgeError {
    /// HTTP status used when this error ends an inbound request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UnknownEvent(_) | Self::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::ShellUnreachable(_) | Self::ShellError { .. } | Self::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Internal(detail) => {
                error!(target: UNCAUGHT_TARGET, %detail, "request failed");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(target: UNCAUGHT_TARGET, %detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal error" })),
    )
        .into_response()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
