mod ai;
mod backend;
mod bot;
mod commands;
mod config;
mod inspirobot;

use anyhow::Result;
use bot::Handler;
use config::{Config, ConfigError};
use serenity::gateway::GatewayError;
use serenity::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!(
        "Starting fun-bot {} (built {}, rustc {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_BUILD_TIMESTAMP"),
        env!("VERGEN_RUSTC_SEMVER"),
        env!("VERGEN_CARGO_TARGET_TRIPLE"),
    );

    let path = Config::path_from_env();
    let config = match Config::load(&path) {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e @ ConfigError::Created(_)) => {
            error!("{}", e);
            error!("Edit the file and start the bot again.");
            return Err(e.into());
        }
        Err(e @ ConfigError::Placeholder { .. }) => {
            error!("Please fill out all the placeholder values: {}", e);
            return Err(e.into());
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let token = config.discord_token.clone();
    let handler = Handler::new(config);

    // Slash commands need no privileged intents.
    let intents = GatewayIntents::GUILDS;

    let mut client = match Client::builder(&token, intents).event_handler(handler).await {
        Ok(client) => {
            info!("Discord client created successfully");
            client
        }
        Err(e) => {
            error!("Failed to create Discord client: {}", e);
            return Err(e.into());
        }
    };

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        info!("Received Ctrl-C, shutting down");
        shard_manager.shutdown_all().await;
    });

    match client.start().await {
        Ok(()) => Ok(()),
        Err(serenity::Error::Gateway(GatewayError::InvalidAuthentication)) => {
            error!("Improper token has been passed. Please check your config.json");
            Err(anyhow::anyhow!("invalid Discord bot token"))
        }
        Err(e) => {
            error!("Client error: {:?}", e);
            Err(e.into())
        }
    }
}
