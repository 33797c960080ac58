//! Shared test utilities

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use tokio::sync::RwLock;

use chirp_gateway::api::{self, ApiState};
use chirp_gateway::{
    ChatEngine, Generator, Outcome, ResponseConfig, SessionStore, SpeechRecognizer, Turn,
};

/// Generation stub returning a fixed outcome
pub struct StubGenerator(pub Outcome);

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, _turns: &[Turn]) -> Outcome {
        self.0.clone()
    }
}

/// Handles into the shared state behind a test router
pub struct TestHandles {
    pub store: SessionStore,
    pub config: Arc<RwLock<ResponseConfig>>,
}

/// Build a test router around a stubbed generation backend
pub fn build_router(outcome: Outcome) -> (Router, TestHandles) {
    build_router_with_voice(outcome, false)
}

/// Build a test router, optionally with a recognizer wired in
///
/// The recognizer never gets to the network in tests that stop at input
/// validation.
pub fn build_router_with_voice(outcome: Outcome, with_recognizer: bool) -> (Router, TestHandles) {
    let store = SessionStore::new();
    let config = Arc::new(RwLock::new(ResponseConfig::default()));
    let generator: Arc<dyn Generator> = Arc::new(StubGenerator(outcome));
    let engine = ChatEngine::new(generator, store.clone(), config.clone());

    let recognizer = with_recognizer.then(|| {
        Arc::new(SpeechRecognizer::new(None, "en-us").expect("failed to build recognizer"))
    });

    let state = Arc::new(ApiState {
        engine,
        response_config: config.clone(),
        ollama: None,
        generation_url: "http://localhost:11434".to_string(),
        generation_model: "test-model".to_string(),
        recognizer,
    });

    (api::router(state), TestHandles { store, config })
}
