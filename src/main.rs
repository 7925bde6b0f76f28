//! Binary entry point: wires the taxonomy seed, the sheet backend, and the
//! dialog engine together, then hands control to the Discord bot.

use budget_buddy::bot;
use budget_buddy::config::{Settings, taxonomy};
use budget_buddy::core::Engine;
use budget_buddy::errors::{Error, Result};
use budget_buddy::sheet::MemorySheet;
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Runtime settings
    let settings = Settings::from_env();

    // 4. Taxonomy seed and sheet backend. The in-memory backend stands in
    //    for the external spreadsheet client during local development; a
    //    production client implements the same SheetService trait.
    let taxonomy = taxonomy::load_config(&settings.taxonomy_path)
        .inspect(|taxonomy| info!(categories = taxonomy.len(), "Taxonomy seed loaded."))
        .inspect_err(|e| error!("Failed to load taxonomy seed: {e}"))?;
    let sheet = Arc::new(MemorySheet::new(taxonomy));

    // 5. Dialog engine
    let engine = Arc::new(
        Engine::new(sheet, &settings)
            .await
            .inspect(|_| info!("Dialog engine initialized."))
            .inspect_err(|e| error!("Failed to initialize dialog engine: {e}"))?,
    );

    // 6. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, engine).await
}
