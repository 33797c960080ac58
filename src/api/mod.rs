//! HTTP API server for the Chirp gateway

pub mod chat;
pub mod config;
pub mod health;
pub mod voice;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chat::ChatEngine;
use crate::customize::ResponseConfig;
use crate::generation::OllamaClient;
use crate::voice::SpeechRecognizer;
use crate::Result;

/// Shared state for API handlers
pub struct ApiState {
    /// Chat pipeline (generation + sessions + customization)
    pub engine: ChatEngine,

    /// Runtime-mutable response settings, shared with the engine
    pub response_config: Arc<RwLock<ResponseConfig>>,

    /// Concrete Ollama client for the health probe; absent in tests
    pub ollama: Option<Arc<OllamaClient>>,

    /// Generation service URL, echoed by `/health`
    pub generation_url: String,

    /// Generation model, echoed by `/health`
    pub generation_model: String,

    /// Speech recognizer; absent when voice is disabled
    pub recognizer: Option<Arc<SpeechRecognizer>>,
}

/// Build the router with all routes
///
/// CORS is wide open: the gateway is a single-user local tool fronted by a
/// browser page on a different origin.
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(chat::router(state.clone()))
        .merge(config::router(state.clone()))
        .merge(health::router(state.clone()))
        .merge(voice::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    #[must_use]
    pub fn new(state: Arc<ApiState>, port: u16) -> Self {
        Self { state, port }
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, router(self.state))
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
