//! Session lifecycle over the HTTP surface.
//!
//! Drives the `/session` endpoint the way a browser would: the identity
//! rides in the `SESSION_ID` cookie issued by `start` and expired by
//! `destroy`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;
use web_playground_rs::prelude::*;

fn test_app() -> Router {
    let config = SandboxConfig::builder()
        .timeout(Duration::from_secs(2))
        .build();
    let state = AppState::new(
        Arc::new(SessionStore::new()),
        Arc::new(SnippetSandbox::new(config).unwrap()),
    );
    router(state)
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `SESSION_ID=<id>` pair from a Set-Cookie header.
fn session_cookie(response: &Response) -> String {
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("expected a Set-Cookie header")
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_string()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn start_issues_cookie_and_default_data() {
    let app = test_app();

    let response = app
        .oneshot(get("/session?action=start", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("SESSION_ID="));

    let json = body_json(response).await;
    assert_eq!(json["active"], true);
    assert!(json["session_id"].is_string());
    assert_eq!(json["data"]["visits"], "1");
    assert_eq!(json["data"]["theme"], "dark");
    assert!(json["created_at"].is_string());
    assert!(json["last_access"].is_string());
}

#[tokio::test]
async fn get_without_cookie_is_inactive() {
    let app = test_app();

    let response = app.oneshot(get("/session?action=get", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["active"], false);
    assert!(json.get("session_id").is_none());
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn get_with_cookie_counts_a_visit() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get("/session?action=start", None))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let response = app
        .oneshot(get("/session?action=get", Some(&cookie)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["active"], true);
    assert_eq!(json["data"]["visits"], "2");
}

#[tokio::test]
async fn add_and_remove_mutate_session_data() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get("/session?action=start", None))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(post_form(
            "/session?action=add",
            Some(&cookie),
            "key=color&value=blue",
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["color"], "blue");

    let response = app
        .oneshot(post_form(
            "/session?action=remove",
            Some(&cookie),
            "key=color",
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert!(json["data"].get("color").is_none());
    // Untouched defaults survive the churn.
    assert_eq!(json["data"]["theme"], "dark");
}

#[tokio::test]
async fn add_with_empty_key_reports_current_state() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get("/session?action=start", None))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let response = app
        .oneshot(post_form(
            "/session?action=add",
            Some(&cookie),
            "key=&value=ignored",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["active"], true);
    assert_eq!(json["data"]["visits"], "1");
}

#[tokio::test]
async fn mutations_without_a_session_report_inactive() {
    let app = test_app();

    let response = app
        .oneshot(post_form("/session?action=add", None, "key=k&value=v"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["active"], false);
}

#[tokio::test]
async fn destroy_invalidates_the_token() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get("/session?action=start", None))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(get("/session?action=destroy", Some(&cookie)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["active"], false);

    // The old token no longer resolves.
    let response = app
        .oneshot(get("/session?action=get", Some(&cookie)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["active"], false);
}

#[tokio::test]
async fn destroy_is_idempotent() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get("/session?action=destroy", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["active"], false);
}

#[tokio::test]
async fn unknown_action_is_a_reported_input_error() {
    let app = test_app();

    let response = app
        .oneshot(get("/session?action=obliterate", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("unknown session action"));
}

#[tokio::test]
async fn start_twice_reuses_the_identity() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get("/session?action=start", None))
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    let first = body_json(response).await;

    let response = app
        .oneshot(get("/session?action=start", Some(&cookie)))
        .await
        .unwrap();
    let second = body_json(response).await;

    assert_eq!(first["session_id"], second["session_id"]);
    assert_eq!(second["data"]["visits"], "2");
}
