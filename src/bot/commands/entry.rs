//! Guided entry Discord commands - `add` and `cancel`.
//!
//! These commands only move the user's wizard session; the step inputs
//! themselves arrive as plain messages handled by the message handler.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Starts the guided five-step transaction entry wizard.
    ///
    /// A wizard already in progress is restarted from step 1 with a fresh,
    /// empty entry; the previous partial entry is discarded.
    #[poise::command(slash_command, prefix_command)]
    pub async fn add(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user = ctx.author().id.to_string();
        let reply = ctx.data().engine.start_add(&user).await;
        ctx.say(reply).await?;
        Ok(())
    }

    /// Cancels the wizard in progress, discarding the partial entry.
    ///
    /// Cancellation never touches the ledger: nothing is appended until
    /// the final wizard step completes.
    #[poise::command(slash_command, prefix_command)]
    pub async fn cancel(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user = ctx.author().id.to_string();
        let reply = ctx.data().engine.cancel(&user).await;
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
