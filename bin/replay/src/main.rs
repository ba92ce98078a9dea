use roomchat_conversation::ConversationStore;
use roomchat_core::Result;
use roomchat_replay::output::{LoggingNotifier, PrintingDriver, write_state};
use roomchat_replay::{Replay, ReplayConfig, ReplayError};
use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ReplayError> {
    // Load configuration from environment
    let config = ReplayConfig::from_env().map_err(|e| ReplayError::Config {
        details: e.to_string(),
    })?;
    tracing::info!(input = ?config.input, "Loaded configuration");

    let store = ConversationStore::builder()
        .data_driver(Arc::new(PrintingDriver::new(io::stdout())))
        .notifier(Arc::new(LoggingNotifier))
        .config(config.conversation.clone())
        .build()
        .map_err(|e| ReplayError::Store {
            details: e.to_string(),
        })?;
    tracing::info!(conversation = %store.id(), "Conversation store ready");

    let mut replay = Replay::new(store);
    if let Some(display_name) = &config.display_name {
        replay.set_display_name(display_name);
    }

    match &config.input {
        Some(path) => {
            let file = File::open(path).map_err(|e| ReplayError::OpenInput {
                path: path.clone(),
                details: e.to_string(),
            })?;
            replay.replay(BufReader::new(file))?;
        }
        None => {
            replay.replay(io::stdin().lock())?;
        }
    }

    write_state(io::stdout().lock(), &replay.state())
}
