//! Chat and reset endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::Error;

/// Build chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/reset", post(reset))
        .with_state(state)
}

/// Chat request body
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Chat response body
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
struct ChatErrorBody {
    success: bool,
    error: String,
}

fn chat_error(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ChatErrorBody {
            success: false,
            error: error.into(),
        }),
    )
        .into_response()
}

/// Handle one chat message
///
/// Generation failures come back as 200 with canned text; only invalid input
/// or an unexpected internal failure maps to an error status.
async fn chat(State(state): State<Arc<ApiState>>, Json(request): Json<ChatRequest>) -> Response {
    match state
        .engine
        .handle(&request.message, request.session_id.as_deref())
        .await
    {
        Ok(reply) => Json(ChatResponse {
            success: true,
            response: reply.text,
            session_id: reply.session_id,
        })
        .into_response(),
        Err(Error::EmptyMessage) => chat_error(StatusCode::BAD_REQUEST, "No message provided"),
        Err(e) => {
            tracing::error!(error = %e, "chat handler failed");
            chat_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to process message: {e}"),
            )
        }
    }
}

/// Reset request body
#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Reset response body
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

/// Clear a session's history; succeeds whether or not the session exists
async fn reset(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ResetRequest>,
) -> Json<ResetResponse> {
    state.engine.reset(request.session_id.as_deref()).await;

    Json(ResetResponse {
        success: true,
        message: "Chat history cleared successfully!".to_string(),
    })
}
