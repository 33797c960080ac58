//! Response configuration endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::customize::{ConfigUpdate, Personality, ResponseConfig};

/// Build config router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/config", get(get_config).post(update_config))
        .route("/personality/{name}", post(set_personality))
        .with_state(state)
}

/// Current configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub success: bool,
    pub config: ResponseConfig,
    pub available_personalities: Vec<&'static str>,
}

/// Get the current response configuration
async fn get_config(State(state): State<Arc<ApiState>>) -> Json<ConfigResponse> {
    let config = state.response_config.read().await.clone();
    Json(ConfigResponse {
        success: true,
        config,
        available_personalities: Personality::names(),
    })
}

/// Configuration update request
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub updates: ConfigUpdate,
}

/// Configuration update response
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
    pub config: ResponseConfig,
}

/// Apply a partial configuration update
///
/// Known keys overwrite unconditionally; unknown keys are ignored.
async fn update_config(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<UpdateRequest>,
) -> Json<UpdateResponse> {
    let mut config = state.response_config.write().await;
    config.apply(&request.updates);
    tracing::debug!(config = ?*config, "response configuration updated");

    Json(UpdateResponse {
        success: true,
        message: "Configuration updated successfully!".to_string(),
        config: config.clone(),
    })
}

#[derive(Debug, Serialize)]
struct PersonalityResponse {
    success: bool,
    message: String,
    personality: &'static str,
}

#[derive(Debug, Serialize)]
struct PersonalityError {
    success: bool,
    message: String,
}

/// Switch the active personality
///
/// Unknown names are rejected without touching the configuration.
async fn set_personality(
    State(state): State<Arc<ApiState>>,
    Path(name): Path<String>,
) -> Response {
    match Personality::parse(&name) {
        Some(personality) => {
            state.response_config.write().await.personality = personality.name().to_string();
            tracing::info!(personality = personality.name(), "personality changed");

            Json(PersonalityResponse {
                success: true,
                message: format!("Personality changed to {}", personality.name()),
                personality: personality.name(),
            })
            .into_response()
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(PersonalityError {
                success: false,
                message: format!(
                    "Invalid personality. Available: {:?}",
                    Personality::names()
                ),
            }),
        )
            .into_response(),
    }
}
