//! Plain message handling.
//!
//! Poise dispatches registered commands itself; everything else lands
//! here. Bot-authored messages and anything command-shaped are ignored so
//! a message is never handled twice.

use crate::bot::BotData;
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use tracing::debug;

/// Poise event hook; only `Message` events are of interest.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    if let serenity::FullEvent::Message { new_message } = event {
        handle_message(ctx, new_message, data).await?;
    }
    Ok(())
}

/// Feeds one plain message into the engine and relays the reply.
async fn handle_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &BotData,
) -> Result<()> {
    let content = message.content.trim();
    if message.author.bot || content.is_empty() || content.starts_with('/') {
        return Ok(());
    }

    let user = message.author.id.to_string();
    let reply = match data.engine.handle_text(&user, content).await {
        Ok(reply) => reply,
        Err(error) => {
            // Recoverable input errors become guidance replies; the
            // interaction ends here either way.
            debug!(%error, %user, "text input rejected");
            error.user_message()
        }
    };
    message.channel_id.say(&ctx.http, reply).await?;
    Ok(())
}
