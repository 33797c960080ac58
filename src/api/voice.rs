//! Speech capture endpoints

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::voice::{self, InputDevice, RecognizeError};

/// Build voice router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/record", post(record))
        .route("/microphones", get(microphones))
        .with_state(state)
}

/// Microphone listing response
#[derive(Debug, Serialize)]
pub struct MicrophoneList {
    pub microphones: Vec<InputDevice>,
}

/// List available input devices
async fn microphones() -> Json<MicrophoneList> {
    let microphones = tokio::task::spawn_blocking(voice::list_input_devices)
        .await
        .unwrap_or_default();
    Json(MicrophoneList { microphones })
}

/// Record request form body
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    pub mic_index: Option<String>,
}

/// Transcription response
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub text: String,
}

/// Record one phrase from the selected microphone and transcribe it
///
/// Blocks on live audio capture for the full phrase window.
async fn record(
    State(state): State<Arc<ApiState>>,
    Form(form): Form<RecordForm>,
) -> Result<Json<RecordResponse>, RecordError> {
    let recognizer = state.recognizer.as_ref().ok_or(RecordError::Disabled)?;

    let raw_index = form.mic_index.ok_or(RecordError::NoMicrophone)?;
    let index: usize = raw_index.parse().map_err(|_| RecordError::InvalidIndex)?;

    let device_count = tokio::task::spawn_blocking(|| voice::list_input_devices().len())
        .await
        .unwrap_or(0);
    if index >= device_count {
        return Err(RecordError::IndexOutOfRange);
    }

    tracing::info!(mic_index = index, "recording from microphone");

    let samples = tokio::task::spawn_blocking(move || voice::record(index))
        .await
        .map_err(|e| RecordError::Unexpected(e.to_string()))?
        .map_err(|e| RecordError::Unexpected(e.to_string()))?;

    let text = recognizer
        .recognize(&samples, voice::SAMPLE_RATE)
        .await
        .map_err(|e| match e {
            RecognizeError::Unintelligible => RecordError::Unintelligible,
            RecognizeError::Request(msg) => RecordError::RecognitionFailed(msg),
        })?;

    Ok(Json(RecordResponse { text }))
}

/// Record endpoint errors
#[derive(Debug)]
pub enum RecordError {
    Disabled,
    NoMicrophone,
    InvalidIndex,
    IndexOutOfRange,
    Unintelligible,
    RecognitionFailed(String),
    Unexpected(String),
}

impl IntoResponse for RecordError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody {
            error: String,
        }

        let (status, message) = match self {
            Self::Disabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Speech recognition is disabled".to_string(),
            ),
            Self::NoMicrophone => (
                StatusCode::BAD_REQUEST,
                "No microphone selected".to_string(),
            ),
            Self::InvalidIndex => (
                StatusCode::BAD_REQUEST,
                "Invalid microphone index".to_string(),
            ),
            Self::IndexOutOfRange => (
                StatusCode::BAD_REQUEST,
                "Microphone index out of range".to_string(),
            ),
            Self::Unintelligible => (
                StatusCode::BAD_REQUEST,
                "Could not understand audio. Please try again.".to_string(),
            ),
            Self::RecognitionFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Speech Recognition request failed: {msg}"),
            ),
            Self::Unexpected(msg) => {
                tracing::error!(error = %msg, "unexpected record failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Unexpected error: {msg}"),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
