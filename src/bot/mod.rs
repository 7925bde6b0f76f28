//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `BudgetBuddy`
//! application: the poise framework setup, all commands, and the message
//! handler that feeds wizard steps and free-text quick entry into the
//! dialog engine. Everything here is a thin relay; the replies themselves
//! are assembled by the core.

/// Discord command implementations (entry, summary, general)
pub mod commands;
/// Discord event handlers (wizard steps and quick entry messages)
pub mod handlers;

use crate::core::Engine;
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info};

/// Shared data available to all bot commands.
pub struct BotData {
    /// The dialog engine all commands and handlers delegate to
    pub engine: Arc<Engine>,
}

impl BotData {
    /// Creates the shared context handed to every command invocation.
    #[must_use]
    pub const fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            panic!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(error.user_message()).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Connects to Discord and runs the bot until the process is stopped.
pub async fn run_bot(token: String, engine: Arc<Engine>) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::add(),
                commands::cancel(),
                commands::summary(),
                commands::categories(),
                commands::help(),
                commands::ping(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("/".to_string()),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(engine))
            })
        })
        .build();

    // MESSAGE_CONTENT is required: wizard steps and quick entry arrive as
    // plain messages, not interactions
    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await?;
    client.start().await.map_err(Into::into)
}
