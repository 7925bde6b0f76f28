//! General Discord commands - help and ping.
//! This module contains simple commands that don't require ledger access
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::Engine,
        errors::{Error, Result},
    };

    /// Displays help information about available commands.
    ///
    /// `/start` is kept as an alias so the greeting works the way
    /// newcomers expect from other chat bots.
    #[poise::command(slash_command, prefix_command, aliases("start"))]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(Engine::help_text()).await?;
        Ok(())
    }

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any ledger operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
