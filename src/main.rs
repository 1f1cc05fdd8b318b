mod config;
mod health;
mod llm;
mod platform;
mod prompts;
mod relay;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::llm::GeminiClient;
use crate::relay::Relay;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,nikki_relay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Model: {}", config.gemini.model);
    info!("  Port: {}", config.server.port);
    info!(
        "  Channels: {:?}, {:?}",
        config.channels.english_diary, config.channels.kids_diary
    );

    // Bind before touching Discord so a taken port fails the process early.
    let listener = health::bind(config.server.port).await?;
    tokio::spawn(async move {
        if let Err(e) = health::serve(listener).await {
            error!("{:#}", e);
            std::process::exit(1);
        }
    });

    let gemini = Arc::new(GeminiClient::new(config.gemini.clone()));
    let relay = Arc::new(Relay::new(gemini, config.channels.clone()));

    info!("Bot is starting...");
    platform::discord::run(relay, &config.discord.bot_token).await?;

    Ok(())
}
