use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

use chirp_gateway::api::{ApiServer, ApiState};
use chirp_gateway::generation::Generator;
use chirp_gateway::{
    ChatEngine, Config, OllamaClient, ResponseConfig, SessionStore, SpeechRecognizer, voice,
};

/// Chirp - voice-enabled chat gateway for a local Ollama instance
#[derive(Parser)]
#[command(name = "chirp", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "CHIRP_PORT", default_value = "5000")]
    port: u16,

    /// Ollama base URL
    #[arg(long, env = "CHIRP_OLLAMA_URL", default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Ollama model for chat completions
    #[arg(long, env = "CHIRP_OLLAMA_MODEL", default_value = "llama3.2:1b")]
    model: String,

    /// Disable voice capture (for headless servers without audio hardware)
    #[arg(long, env = "CHIRP_DISABLE_VOICE")]
    disable_voice: bool,

    /// Speech recognition API key override
    #[arg(long, env = "CHIRP_SPEECH_KEY")]
    speech_key: Option<String>,

    /// Speech recognition language tag
    #[arg(long, env = "CHIRP_SPEECH_LANG", default_value = "en-us")]
    speech_lang: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,chirp_gateway=info",
        1 => "info,chirp_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config {
        port: cli.port,
        ollama_url: cli.ollama_url,
        ollama_model: cli.model,
        voice_enabled: !cli.disable_voice,
        speech_api_key: cli.speech_key,
        speech_language: cli.speech_lang,
    };

    let ollama = Arc::new(OllamaClient::new(
        config.normalized_ollama_url(),
        config.ollama_model.clone(),
    )?);

    let store = SessionStore::new();
    let response_config = Arc::new(RwLock::new(ResponseConfig::default()));
    let generator: Arc<dyn Generator> = ollama.clone();
    let engine = ChatEngine::new(generator, store, response_config.clone());

    let recognizer = if config.voice_enabled {
        let mics = voice::list_input_devices();
        tracing::info!(count = mics.len(), "input devices available");
        Some(Arc::new(SpeechRecognizer::new(
            config.speech_api_key.clone(),
            config.speech_language.clone(),
        )?))
    } else {
        tracing::info!("voice capture disabled");
        None
    };

    tracing::info!(
        url = %ollama.base_url(),
        model = %ollama.model(),
        "chat gateway starting"
    );

    let state = Arc::new(ApiState {
        engine,
        response_config,
        generation_url: ollama.base_url().to_string(),
        generation_model: ollama.model().to_string(),
        ollama: Some(ollama),
        recognizer,
    });

    ApiServer::new(state, config.port).run().await?;
    Ok(())
}
