//! Chirp Gateway - voice-enabled chat gateway for a local Ollama instance
//!
//! This library provides the core functionality for the Chirp gateway:
//! - Chat orchestration with per-session conversation history
//! - Cosmetic response customization (length bounding, emoji decoration,
//!   deny-list filtering)
//! - One-shot voice capture with cloud speech recognition
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP surface                       │
//! │  /chat │ /reset │ /config │ /health │ /record │ ... │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Chirp Gateway                        │
//! │  Orchestrator │ Sessions │ Customizer │ Capture     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              External services                       │
//! │   Ollama (generation) │ Web Speech API (STT)        │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod chat;
pub mod config;
pub mod customize;
pub mod error;
pub mod generation;
pub mod session;
pub mod voice;

pub use chat::{ChatEngine, ChatReply};
pub use config::Config;
pub use customize::{ConfigUpdate, Personality, ResponseConfig};
pub use error::{Error, Result};
pub use generation::{Degradation, Generator, OllamaClient, Outcome};
pub use session::{Role, SessionStore, Turn};
pub use voice::{RecognizeError, SpeechRecognizer};
