//! Voice input: microphone capture and cloud speech recognition

pub mod capture;
pub mod recognize;

pub use capture::{InputDevice, PHRASE_LIMIT, SAMPLE_RATE, list_input_devices, record};
pub use recognize::{RecognizeError, SpeechRecognizer};
