//! API endpoint integration tests

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use chirp_gateway::{Degradation, Outcome, customize};

mod common;
use common::build_router;

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn chat_decorates_reply_and_echoes_default_session() {
    let (app, _) = build_router(Outcome::Reply("Hi there!".to_string()));

    let (status, body) = send_json(&app, "POST", "/chat", json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["response"], "\u{1f44b} Hi there!");
    assert_eq!(body["sessionId"], "default");
}

#[tokio::test]
async fn chat_rejects_empty_message() {
    let (app, _) = build_router(Outcome::Reply("unused".to_string()));

    for body in [json!({"message": ""}), json!({"message": "   "}), json!({})] {
        let (status, body) = send_json(&app, "POST", "/chat", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "No message provided");
    }
}

#[tokio::test]
async fn chat_timeout_degrades_to_canned_reply_with_200() {
    let (app, handles) = build_router(Outcome::Degraded(Degradation::Timeout));

    let (status, body) = send_json(
        &app,
        "POST",
        "/chat",
        json!({"message": "hello", "sessionId": "s"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["response"],
        "Response taking too long. Please try a shorter question."
    );
    // Transport failures leave history untouched
    assert!(handles.store.history("s").await.is_empty());
}

#[tokio::test]
async fn chat_reply_with_deny_word_is_fully_replaced() {
    let (app, _) = build_router(Outcome::Reply("That is a stupid idea".to_string()));

    let (status, body) = send_json(&app, "POST", "/chat", json!({"message": "rate this"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], customize::FILTER_REDIRECT_TEXT);
    assert!(!body["response"].as_str().unwrap().contains("stupid"));
}

#[tokio::test]
async fn chat_never_filters_the_user_message() {
    let (app, _) = build_router(Outcome::Reply("Let us keep our chat kind.".to_string()));

    let (status, body) = send_json(
        &app,
        "POST",
        "/chat",
        json!({"message": "you are stupid"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["response"], "Let us keep our chat kind.");
}

#[tokio::test]
async fn chat_session_ids_are_isolated() {
    let (app, handles) = build_router(Outcome::Reply("ok".to_string()));

    send_json(&app, "POST", "/chat", json!({"message": "a", "sessionId": "one"})).await;
    send_json(&app, "POST", "/chat", json!({"message": "b", "sessionId": "two"})).await;
    send_json(&app, "POST", "/chat", json!({"message": "c", "sessionId": "one"})).await;

    assert_eq!(handles.store.history("one").await.len(), 4);
    assert_eq!(handles.store.history("two").await.len(), 2);
}

#[tokio::test]
async fn reset_clears_history_and_always_succeeds() {
    let (app, handles) = build_router(Outcome::Reply("ok".to_string()));

    send_json(&app, "POST", "/chat", json!({"message": "a", "sessionId": "s"})).await;
    assert_eq!(handles.store.history("s").await.len(), 2);

    let (status, body) = send_json(&app, "POST", "/reset", json!({"sessionId": "s"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(handles.store.history("s").await.is_empty());

    // Resetting an already-empty session is fine too
    let (status, body) = send_json(&app, "POST", "/reset", json!({"sessionId": "s"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn config_get_lists_personalities() {
    let (app, _) = build_router(Outcome::Reply("ok".to_string()));

    let (status, body) = get_json(&app, "/config").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["config"]["personality"], "friendly");
    assert_eq!(body["config"]["max_length"], 2000);
    let personalities = body["available_personalities"].as_array().unwrap();
    assert_eq!(personalities.len(), 5);
    assert!(personalities.contains(&json!("technical")));
}

#[tokio::test]
async fn config_update_applies_known_keys_and_ignores_unknown() {
    let (app, _) = build_router(Outcome::Reply("ok".to_string()));

    let (status, body) = send_json(
        &app,
        "POST",
        "/config",
        json!({"updates": {"max_length": 500, "use_emojis": false, "bogus_key": 42}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["config"]["max_length"], 500);
    assert_eq!(body["config"]["use_emojis"], false);

    // Settings stick for later reads
    let (_, body) = get_json(&app, "/config").await;
    assert_eq!(body["config"]["max_length"], 500);
}

#[tokio::test]
async fn config_update_disables_decoration() {
    let (app, _) = build_router(Outcome::Reply("Hi there!".to_string()));

    send_json(
        &app,
        "POST",
        "/config",
        json!({"updates": {"use_emojis": false}}),
    )
    .await;

    let (_, body) = send_json(&app, "POST", "/chat", json!({"message": "hello"})).await;
    assert_eq!(body["response"], "Hi there!");
}

#[tokio::test]
async fn personality_change_applies() {
    let (app, _) = build_router(Outcome::Reply("ok".to_string()));

    let (status, body) = send_json(&app, "POST", "/personality/technical", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["personality"], "technical");

    let (_, body) = get_json(&app, "/config").await;
    assert_eq!(body["config"]["personality"], "technical");
}

#[tokio::test]
async fn unknown_personality_is_rejected_without_mutation() {
    let (app, _) = build_router(Outcome::Reply("ok".to_string()));

    let (status, body) = send_json(&app, "POST", "/personality/alien", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("Invalid personality"));

    let (_, body) = get_json(&app, "/config").await;
    assert_eq!(body["config"]["personality"], "friendly");
}

#[tokio::test]
async fn health_reports_upstream_and_features() {
    let (app, _) = build_router(Outcome::Reply("ok".to_string()));

    let (status, body) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    // No Ollama client wired in tests
    assert_eq!(body["ollama"]["status"], "Disconnected");
    assert_eq!(body["ollama"]["model"], "test-model");
    assert_eq!(body["features"]["chat"], "Available");
    assert_eq!(body["features"]["speech_recognition"], "Unavailable");
}
