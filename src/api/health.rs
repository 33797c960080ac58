//! Health check endpoint

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use super::ApiState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ollama: GenerationStatus,
    pub features: Features,
}

/// Generation service connectivity
#[derive(Debug, Serialize)]
pub struct GenerationStatus {
    pub url: String,
    pub model: String,
    pub status: &'static str,
}

/// Which optional features this process offers
#[derive(Debug, Serialize)]
pub struct Features {
    pub chat: &'static str,
    pub speech_recognition: &'static str,
}

/// Liveness plus a quick generation-service connectivity probe
async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let connected = match &state.ollama {
        Some(client) => client.probe().await,
        None => false,
    };

    Json(HealthResponse {
        status: "OK",
        ollama: GenerationStatus {
            url: state.generation_url.clone(),
            model: state.generation_model.clone(),
            status: if connected { "Connected" } else { "Disconnected" },
        },
        features: Features {
            chat: "Available",
            speech_recognition: if state.recognizer.is_some() {
                "Available"
            } else {
                "Unavailable"
            },
        },
    })
}

/// Build health router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}
