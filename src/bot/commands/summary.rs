//! Reporting Discord commands - `summary` and `categories`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };
    use tracing::warn;

    /// Reports per-type totals for a period.
    ///
    /// Arguments may appear in any order: a 4-digit year, a month number
    /// or name, `full` for the category breakdown, and `compare` for the
    /// previous-month deltas. Defaults to the current month, short view.
    #[poise::command(slash_command, prefix_command)]
    pub async fn summary(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Period and mode, e.g. `2025 November full compare`"]
        #[rest]
        args: Option<String>,
    ) -> Result<()> {
        let reply = match ctx
            .data()
            .engine
            .summary(args.as_deref().unwrap_or_default())
            .await
        {
            Ok(report) => report,
            Err(error) => {
                warn!(%error, "summary request failed");
                error.user_message()
            }
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Lists all registered categories, grouped by transaction type.
    #[poise::command(slash_command, prefix_command)]
    pub async fn categories(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let reply = ctx.data().engine.categories();
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
