//! Form echo and calculator endpoints — thin, stateless demos.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query};
use axum::http::{HeaderMap, Method};
use axum::{Form, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::client_addr;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    remember: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FormEchoResponse {
    status: String,
    received: ReceivedFields,
    validation: ValidationFlags,
    timestamp: String,
    server: ServerInfo,
}

#[derive(Debug, Serialize)]
struct ReceivedFields {
    username: String,
    password: String,
    remember: bool,
}

#[derive(Debug, Serialize)]
struct ValidationFlags {
    username_valid: bool,
    password_valid: bool,
}

#[derive(Debug, Serialize)]
struct ServerInfo {
    request_method: String,
    remote_addr: String,
}

/// `POST /form` — echo sanitized fields plus validity flags.
///
/// The password itself never comes back; only a mask indicating whether one
/// was supplied.
pub(crate) async fn form_echo(
    method: Method,
    headers: HeaderMap,
    connect: Option<ConnectInfo<SocketAddr>>,
    form: Option<Form<LoginForm>>,
) -> Json<FormEchoResponse> {
    let form = form.map(|Form(f)| f).unwrap_or_default();
    let username = form.username.unwrap_or_default();
    let password = form.password.unwrap_or_default();
    let remember = form.remember.is_some();

    Json(FormEchoResponse {
        status: "success".to_string(),
        validation: ValidationFlags {
            username_valid: username.len() >= 3,
            password_valid: password.len() >= 6,
        },
        received: ReceivedFields {
            username,
            password: if password.is_empty() {
                "(empty)".to_string()
            } else {
                "********".to_string()
            },
            remember,
        },
        timestamp: Utc::now().to_rfc3339(),
        server: ServerInfo {
            request_method: method.to_string(),
            remote_addr: client_addr(&headers, connect.as_ref()),
        },
    })
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CalcParams {
    #[serde(default)]
    a: Option<f64>,
    #[serde(default)]
    b: Option<f64>,
    #[serde(default)]
    op: Option<String>,
}

/// `GET /calc?a=…&b=…&op=…` — plain-text arithmetic.
pub(crate) async fn calc(Query(params): Query<CalcParams>) -> String {
    let a = params.a.unwrap_or(0.0);
    let b = params.b.unwrap_or(0.0);
    let op = params.op.as_deref().unwrap_or("add");

    match evaluate(a, b, op) {
        Ok(value) => format!("{value}\n"),
        Err(message) => format!("{message}\n"),
    }
}

fn evaluate(a: f64, b: f64, op: &str) -> Result<f64, String> {
    match op {
        "add" => Ok(a + b),
        "subtract" => Ok(a - b),
        "multiply" => Ok(a * b),
        "divide" => {
            if b == 0.0 {
                Err("ERROR: Division by zero".to_string())
            } else {
                Ok(a / b)
            }
        }
        "power" => Ok(a.powf(b)),
        "modulo" => {
            if b == 0.0 {
                Err("ERROR: Modulo by zero".to_string())
            } else {
                Ok(a % b)
            }
        }
        other => Err(format!("ERROR: Unknown operation '{other}'")),
    }
}
