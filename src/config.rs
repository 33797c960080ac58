//! Startup configuration for the Chirp gateway
//!
//! Runtime-mutable response settings live in [`crate::customize::ResponseConfig`];
//! this module only covers what is fixed at process start.

use crate::generation;

/// Default port the gateway listens on
pub const DEFAULT_PORT: u16 = 5000;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Base URL of the local Ollama instance
    pub ollama_url: String,

    /// Ollama model for chat completions
    pub ollama_model: String,

    /// Enable the voice capture endpoint
    pub voice_enabled: bool,

    /// Speech recognition API key override
    pub speech_api_key: Option<String>,

    /// Speech recognition language tag (e.g. "en-us")
    pub speech_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            ollama_url: generation::DEFAULT_BASE_URL.to_string(),
            ollama_model: generation::DEFAULT_MODEL.to_string(),
            voice_enabled: true,
            speech_api_key: None,
            speech_language: "en-us".to_string(),
        }
    }
}

impl Config {
    /// Ollama base URL without a trailing slash, safe to join paths onto
    #[must_use]
    pub fn normalized_ollama_url(&self) -> String {
        self.ollama_url.trim_end_matches('/').to_string()
    }
}
