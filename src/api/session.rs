//! Session lifecycle endpoint.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use tracing::debug;

use crate::session::SESSION_COOKIE;

use super::{client_addr, input_error, user_agent, AppState};

#[derive(Debug, Deserialize)]
pub(crate) struct SessionQuery {
    #[serde(default)]
    action: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SessionForm {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

/// `GET|POST /session?action={start|get|add|remove|destroy}`
///
/// The session identity rides in the `SESSION_ID` cookie; `start` issues
/// it and `destroy` expires it. Every other action only ever reads the
/// token, so absent sessions stay absent.
pub(crate) async fn session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    headers: HeaderMap,
    connect: Option<ConnectInfo<SocketAddr>>,
    jar: CookieJar,
    form: Option<Form<SessionForm>>,
) -> Response {
    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let form = form.map(|Form(f)| f).unwrap_or_default();
    let action = query.action.as_deref().unwrap_or("get");
    debug!(action, has_token = token.is_some(), "session request");

    match action {
        "start" => {
            let remote = client_addr(&headers, connect.as_ref());
            let agent = user_agent(&headers);
            let (token, view) = state.sessions.start(token.as_deref(), &remote, &agent);
            let jar = jar.add(
                Cookie::build((SESSION_COOKIE, token))
                    .path("/")
                    .http_only(true),
            );
            (jar, Json(view)).into_response()
        }
        "get" => {
            let view = state.sessions.get(token.as_deref().unwrap_or_default());
            Json(view).into_response()
        }
        "add" => {
            let key = form.key.unwrap_or_default();
            let value = form.value.unwrap_or_default();
            let view = state
                .sessions
                .put(token.as_deref().unwrap_or_default(), &key, &value);
            Json(view).into_response()
        }
        "remove" => {
            let key = form.key.unwrap_or_default();
            let view = state
                .sessions
                .remove(token.as_deref().unwrap_or_default(), &key);
            Json(view).into_response()
        }
        "destroy" => {
            let view = state.sessions.destroy(token.as_deref().unwrap_or_default());
            let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
            (jar, Json(view)).into_response()
        }
        other => input_error(format!("unknown session action: {other}")).into_response(),
    }
}
