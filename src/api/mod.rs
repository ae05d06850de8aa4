//! HTTP routing and serialization.
//!
//! This layer owns no behavior of its own: each route parses the action and
//! parameters, delegates to exactly one engine, and serializes the outcome.
//! Session and dataset endpoints speak JSON; the execute endpoint returns
//! plain text for the terminal-style display.

mod dataset;
mod execute;
mod forms;
mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::sandbox::executor::SnippetSandbox;
use crate::session::SessionStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub sandbox: Arc<SnippetSandbox>,
}

impl AppState {
    pub fn new(sessions: Arc<SessionStore>, sandbox: Arc<SnippetSandbox>) -> Self {
        Self { sessions, sandbox }
    }
}

/// Build the playground router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/session", get(session::session).post(session::session))
        .route("/dataset", get(dataset::dataset))
        .route("/execute", post(execute::execute))
        .route("/form", post(forms::form_echo))
        .route("/calc", get(forms::calc))
        .with_state(state)
}

/// JSON body for reported input errors.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

pub(crate) type ApiError = (StatusCode, Json<ErrorBody>);

/// An input error: reported synchronously, never a silent default.
pub(crate) fn input_error(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Best-effort client address: forwarded header first, then the socket.
pub(crate) fn client_addr(
    headers: &HeaderMap,
    connect: Option<&ConnectInfo<SocketAddr>>,
) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| connect.map(|ConnectInfo(addr)| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub(crate) fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}
