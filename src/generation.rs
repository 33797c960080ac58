//! Ollama inference client
//!
//! Sends an ordered turn list to the local Ollama chat endpoint and returns a
//! tagged [`Outcome`]. Upstream failures never surface as errors: each one
//! degrades to a canned user-facing string, keyed by a [`Degradation`] reason
//! so callers can still log what actually happened.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::session::Turn;
use crate::{Error, Result};

/// Default Ollama API URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model; a small one keeps local responses fast
pub const DEFAULT_MODEL: &str = "llama3.2:1b";

/// Fixed timeout for chat completions
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed timeout for the health probe
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Why generation degraded instead of producing a model reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    /// Request exceeded the fixed timeout
    Timeout,
    /// Connection to the generation service failed
    Unreachable,
    /// Service answered with a non-success status
    UpstreamStatus(u16),
    /// Service answered 200 but the reply payload was absent
    EmptyReply,
}

impl Degradation {
    /// Canned user-facing text for this degradation
    #[must_use]
    pub const fn user_text(self) -> &'static str {
        match self {
            Self::Timeout => "Response taking too long. Please try a shorter question.",
            Self::Unreachable => {
                "I'm having trouble connecting to Ollama. Please ensure it's running."
            }
            Self::UpstreamStatus(_) => {
                "I'm having trouble connecting to my AI brain. Please try again."
            }
            Self::EmptyReply => "I'm sorry, I couldn't generate a response.",
        }
    }
}

/// Result of one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The model produced a reply
    Reply(String),
    /// Generation failed in a recovered way
    Degraded(Degradation),
}

/// Generation backend seam
///
/// The orchestrator only sees this trait; tests inject stubs.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, turns: &[Turn]) -> Outcome;
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    stream: bool,
    options: OllamaOptions,
}

/// Sampling options tuned for quick, detailed local replies
#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    repeat_penalty: f32,
    num_predict: u32,
    stop: Vec<String>,
}

impl Default for OllamaOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            repeat_penalty: 1.1,
            num_predict: 2000,
            stop: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    message: Option<OllamaReply>,
}

#[derive(Deserialize)]
struct OllamaReply {
    #[serde(default)]
    content: Option<String>,
}

/// Client for a local Ollama instance
pub struct OllamaClient {
    client: reqwest::Client,
    probe_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP clients cannot be built
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Http)?;
        let probe_client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            probe_client,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Quick connectivity check against the model listing endpoint
    pub async fn probe(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.probe_client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(&self, turns: &[Turn]) -> Outcome {
        let url = format!("{}/api/chat", self.base_url);
        let request = OllamaChatRequest {
            model: &self.model,
            messages: turns,
            stream: false,
            options: OllamaOptions::default(),
        };

        let response = match self.client.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::warn!("generation request timed out");
                return Outcome::Degraded(Degradation::Timeout);
            }
            Err(e) => {
                tracing::warn!(error = %e, "generation service unreachable");
                return Outcome::Degraded(Degradation::Unreachable);
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "generation service returned an error");
            return Outcome::Degraded(Degradation::UpstreamStatus(status.as_u16()));
        }

        let body: OllamaChatResponse = match response.json().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => {
                tracing::warn!("generation response timed out mid-body");
                return Outcome::Degraded(Degradation::Timeout);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read generation response");
                return Outcome::Degraded(Degradation::Unreachable);
            }
        };

        match body.message.and_then(|m| m.content) {
            Some(content) => {
                tracing::debug!(chars = content.len(), "generation complete");
                Outcome::Reply(content)
            }
            None => Outcome::Degraded(Degradation::EmptyReply),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_degradation_has_distinct_canned_text() {
        let reasons = [
            Degradation::Timeout,
            Degradation::Unreachable,
            Degradation::UpstreamStatus(500),
            Degradation::EmptyReply,
        ];
        for (i, a) in reasons.iter().enumerate() {
            for b in &reasons[i + 1..] {
                assert_ne!(a.user_text(), b.user_text());
            }
        }
    }

    #[test]
    fn request_serializes_ollama_wire_shape() {
        let turns = vec![Turn::system("be brief"), Turn::user("hello")];
        let request = OllamaChatRequest {
            model: "llama3.2:1b",
            messages: &turns,
            stream: false,
            options: OllamaOptions::default(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.2:1b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["options"]["num_predict"], 2000);
        assert!(json["options"]["stop"].as_array().unwrap().is_empty());
    }

    #[test]
    fn response_without_content_is_recognized() {
        let body: OllamaChatResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(body.message.and_then(|m| m.content).is_none());

        let body: OllamaChatResponse =
            serde_json::from_str(r#"{"message": {"role": "assistant"}}"#).unwrap();
        assert!(body.message.and_then(|m| m.content).is_none());

        let body: OllamaChatResponse =
            serde_json::from_str(r#"{"message": {"role": "assistant", "content": "hi"}}"#).unwrap();
        assert_eq!(body.message.and_then(|m| m.content).as_deref(), Some("hi"));
    }
}
