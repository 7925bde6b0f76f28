//! Dispatch engine.
//!
//! The single entry point the transport layer talks to. Commands map to
//! dedicated methods; everything else goes through [`Engine::handle_text`],
//! which feeds the active wizard session when one exists and falls back to
//! free-text quick entry otherwise. All replies are plain text assembled
//! here, so the bot layer stays a thin relay.

use crate::config::Settings;
use crate::core::quick;
use crate::core::record::TransactionRecord;
use crate::core::session::SessionStore;
use crate::core::summary::{self, SummaryOrchestrator};
use crate::core::taxonomy::CategoryTaxonomy;
use crate::core::wizard::{DraftRecord, StepOutcome, WizardStep, advance};
use crate::errors::{Error, Result};
use crate::sheet::SheetService;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{info, warn};

/// The framework-agnostic dialog engine.
pub struct Engine {
    sheet: Arc<dyn SheetService>,
    sessions: SessionStore,
    taxonomy: CategoryTaxonomy,
    orchestrator: SummaryOrchestrator,
    strict_categories: bool,
}

impl Engine {
    /// Builds the engine, loading the category taxonomy from the
    /// configuration source once at startup.
    pub async fn new(sheet: Arc<dyn SheetService>, settings: &Settings) -> Result<Self> {
        let taxonomy = sheet.load_taxonomy().await?;
        if taxonomy.is_empty() {
            return Err(Error::Config {
                message: "The category taxonomy is empty".to_string(),
            });
        }
        info!(categories = taxonomy.len(), "loaded category taxonomy");

        Ok(Self {
            sheet: Arc::clone(&sheet),
            sessions: SessionStore::new(settings.session_ttl()),
            taxonomy,
            orchestrator: SummaryOrchestrator::new(
                sheet,
                settings.settle_reads,
                settings.settle_delay(),
            ),
            strict_categories: settings.strict_categories,
        })
    }

    /// The `/help` (and `/start`) reply.
    #[must_use]
    pub const fn help_text() -> &'static str {
        "👋 **Budget Buddy**\n\n\
         Log a transaction:\n\
         • `/add` — guided step-by-step entry\n\
         • Free text: `Groceries 45.50` or `Dining out 32`\n\n\
         Other commands:\n\
         • `/summary [year] [month] [full] [compare]` — totals for a period\n\
         • `/categories` — list all categories\n\
         • `/cancel` — cancel the current entry\n\
         • `/help` — show this message"
    }

    /// Starts (or restarts) the guided entry wizard for a user. A wizard
    /// already in progress is discarded, not merged.
    pub async fn start_add(&self, user: &str) -> String {
        self.sessions.begin(user).await;
        WizardStep::SelectType.prompt(&self.taxonomy, &DraftRecord::default())
    }

    /// Aborts the active wizard, if any. Never touches the ledger.
    pub async fn cancel(&self, user: &str) -> String {
        if self.sessions.clear(user).await {
            "❌ Entry cancelled.".to_string()
        } else {
            "Nothing to cancel — no entry in progress.".to_string()
        }
    }

    /// The `/categories` listing, grouped by type in taxonomy order.
    #[must_use]
    pub fn categories(&self) -> String {
        let mut lines = vec!["📋 **Available Categories**".to_string()];
        for (kind, categories) in self.taxonomy.groups() {
            lines.push(String::new());
            lines.push(format!("**{kind}**"));
            lines.push(format!("  {}", categories.join(" | ")));
        }
        lines.join("\n")
    }

    /// Runs a `/summary` request end to end.
    pub async fn summary(&self, args: &str) -> Result<String> {
        let request = summary::parse_request(args, today())?;
        let outcome = self.orchestrator.summarize(request).await?;
        Ok(summary::format_outcome(&outcome))
    }

    /// Handles a non-command message: a wizard step input when a session
    /// is active, free-text quick entry otherwise.
    pub async fn handle_text(&self, user: &str, text: &str) -> Result<String> {
        if let Some((step, draft)) = self.sessions.snapshot(user).await {
            Ok(self.handle_wizard_input(user, step, draft, text).await)
        } else {
            self.handle_quick_entry(text).await
        }
    }

    async fn handle_wizard_input(
        &self,
        user: &str,
        step: WizardStep,
        mut draft: DraftRecord,
        text: &str,
    ) -> String {
        match advance(step, &mut draft, text, &self.taxonomy, today()) {
            StepOutcome::Reprompt(message) => {
                self.sessions.store(user, step, draft).await;
                message
            }
            StepOutcome::Next(next_step, prompt) => {
                self.sessions.store(user, next_step, draft).await;
                prompt
            }
            StepOutcome::Complete(record) => match self.sheet.append_row(&record).await {
                Ok(()) => {
                    self.sessions.clear(user).await;
                    info!(
                        kind = %record.kind,
                        category = %record.category,
                        amount = record.amount,
                        "wizard entry appended"
                    );
                    format_confirmation(&record)
                }
                Err(error) => {
                    // The session stays on the date step so the entry can
                    // be retried without re-entering everything.
                    warn!(%error, "ledger append failed at wizard completion");
                    self.sessions.store(user, step, draft).await;
                    format!(
                        "{}\nYour entry is still active — send the date again, or /cancel.",
                        error.user_message()
                    )
                }
            },
        }
    }

    async fn handle_quick_entry(&self, text: &str) -> Result<String> {
        let entry = quick::parse(text, &self.taxonomy, self.strict_categories)?;
        let record = TransactionRecord::new(
            today(),
            entry.kind,
            entry.category,
            entry.amount,
            &entry.details,
        )?;
        self.sheet.append_row(&record).await?;
        info!(
            kind = %record.kind,
            category = %record.category,
            amount = record.amount,
            "quick entry appended"
        );
        Ok(format_confirmation(&record))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Echoes a logged record back to the user.
fn format_confirmation(record: &TransactionRecord) -> String {
    let details = if record.details.is_empty() {
        "—"
    } else {
        record.details.as_str()
    };
    format!(
        "✅ **Logged to the ledger!**\n\n\
         📅 {}\n\
         📂 {}\n\
         🏷 {}\n\
         💰 ${:.2}\n\
         📝 {details}",
        record.date.format("%Y-%m-%d"),
        record.kind,
        record.category,
        record.amount,
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::record::TransactionType;
    use crate::sheet::MemorySheet;
    use crate::test_utils::{engine_with_sheet, strict_engine_with_sheet};

    const USER: &str = "user1";

    async fn walk_wizard(engine: &Engine, inputs: &[&str]) -> String {
        let mut reply = String::new();
        for input in inputs {
            reply = engine.handle_text(USER, input).await.unwrap();
        }
        reply
    }

    #[tokio::test]
    async fn wizard_walkthrough_appends_the_accumulated_record() {
        let (engine, sheet) = engine_with_sheet().await;

        let prompt = engine.start_add(USER).await;
        assert!(prompt.contains("Step 1 of 5"));

        let reply = walk_wizard(
            &engine,
            &["Variable Expenses", "Groceries", "45.50", "-", "Today"],
        )
        .await;
        assert!(reply.contains("Logged to the ledger"));

        let rows = sheet.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, TransactionType::VariableExpenses);
        assert_eq!(rows[0].category, "Groceries");
        assert_eq!(rows[0].amount, 45.5);
        assert_eq!(rows[0].details, "");
        assert_eq!(rows[0].date, today());

        // Session is discarded on completion
        assert!(matches!(
            engine.handle_text(USER, "no session now").await,
            Err(Error::NoAmount)
        ));
    }

    #[tokio::test]
    async fn cancel_at_any_step_leaves_the_ledger_unchanged() {
        let (engine, sheet) = engine_with_sheet().await;

        engine.start_add(USER).await;
        walk_wizard(&engine, &["Variable Expenses", "Groceries", "45.50"]).await;

        let reply = engine.cancel(USER).await;
        assert!(reply.contains("cancelled"));
        assert_eq!(sheet.row_count().await, 0);

        // A fresh /add starts from step 1
        let prompt = engine.start_add(USER).await;
        assert!(prompt.contains("Step 1 of 5"));
    }

    #[tokio::test]
    async fn cancel_without_a_session_says_so() {
        let (engine, _sheet) = engine_with_sheet().await;
        let reply = engine.cancel(USER).await;
        assert!(reply.contains("Nothing to cancel"));
    }

    #[tokio::test]
    async fn re_entering_add_discards_the_partial_draft() {
        let (engine, sheet) = engine_with_sheet().await;

        engine.start_add(USER).await;
        walk_wizard(&engine, &["Income", "Salary"]).await;

        // Restart and log something entirely different
        engine.start_add(USER).await;
        let reply = walk_wizard(
            &engine,
            &["Variable Expenses", "Groceries", "12", "-", "Today"],
        )
        .await;
        assert!(reply.contains("Logged to the ledger"));

        let rows = sheet.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, TransactionType::VariableExpenses);
        assert_eq!(rows[0].category, "Groceries");
    }

    #[tokio::test]
    async fn invalid_step_input_re_prompts_and_preserves_progress() {
        let (engine, sheet) = engine_with_sheet().await;

        engine.start_add(USER).await;
        walk_wizard(&engine, &["Variable Expenses", "Groceries"]).await;

        let reply = engine.handle_text(USER, "a lot").await.unwrap();
        assert!(reply.contains("45.50"));

        // Still on the amount step; a valid amount continues the flow
        let reply = walk_wizard(&engine, &["45.50", "-", "Today"]).await;
        assert!(reply.contains("Logged to the ledger"));
        assert_eq!(sheet.row_count().await, 1);
    }

    #[tokio::test]
    async fn append_failure_at_completion_keeps_the_session_resumable() {
        let (engine, sheet) = engine_with_sheet().await;

        engine.start_add(USER).await;
        walk_wizard(&engine, &["Variable Expenses", "Groceries", "45.50", "-"]).await;

        sheet.set_fail_appends(true).await;
        let reply = engine.handle_text(USER, "Today").await.unwrap();
        assert!(!reply.contains("Logged to the ledger"));
        assert!(reply.contains("still active"));
        assert_eq!(sheet.row_count().await, 0);

        // Store recovers; resending the date completes the entry
        sheet.set_fail_appends(false).await;
        let reply = engine.handle_text(USER, "Today").await.unwrap();
        assert!(reply.contains("Logged to the ledger"));
        assert_eq!(sheet.row_count().await, 1);
    }

    #[tokio::test]
    async fn quick_entry_stamps_todays_date() {
        let (engine, sheet) = engine_with_sheet().await;

        let reply = engine.handle_text(USER, "Coffee 4.50").await.unwrap();
        assert!(reply.contains("Logged to the ledger"));

        let rows = sheet.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, TransactionType::VariableExpenses);
        assert_eq!(rows[0].category, "Coffee");
        assert_eq!(rows[0].amount, 4.5);
        assert_eq!(rows[0].details, "");
        assert_eq!(rows[0].date, today());
    }

    #[tokio::test]
    async fn quick_entry_classifies_known_categories() {
        let (engine, sheet) = engine_with_sheet().await;
        engine.handle_text(USER, "salary 3000").await.unwrap();
        assert_eq!(sheet.rows().await[0].kind, TransactionType::Income);
    }

    #[tokio::test]
    async fn strict_mode_rejects_unknown_quick_entry_categories() {
        let (engine, sheet) = strict_engine_with_sheet().await;
        let result = engine.handle_text(USER, "Coffee 4.50").await;
        assert!(matches!(result, Err(Error::UnknownCategory { .. })));
        assert_eq!(sheet.row_count().await, 0);
    }

    #[tokio::test]
    async fn summary_command_round_trips_through_the_orchestrator() {
        let (engine, _sheet) = engine_with_sheet().await;
        engine.handle_text(USER, "Groceries 45.50").await.unwrap();

        let reply = engine.summary("").await.unwrap();
        assert!(reply.contains("Summary —"));
        assert!(reply.contains("Variable Expenses: $45.50"));

        let reply = engine.summary("1984 3").await.unwrap();
        assert!(reply.contains("No transactions found"));
    }

    #[tokio::test]
    async fn summary_rejects_bad_periods_without_touching_the_store() {
        let (engine, sheet) = engine_with_sheet().await;
        assert!(matches!(
            engine.summary("13").await,
            Err(Error::InvalidPeriod { .. })
        ));
        assert_eq!(sheet.selector().await, (String::new(), 0));
    }

    #[tokio::test]
    async fn categories_listing_groups_by_type() {
        let (engine, _sheet) = engine_with_sheet().await;
        let listing = engine.categories();
        assert!(listing.contains("**Income**"));
        assert!(listing.contains("Salary | Rent"));
        assert!(listing.contains("**Variable Expenses**"));
    }

    #[tokio::test]
    async fn engine_refuses_an_empty_taxonomy() {
        let sheet = Arc::new(MemorySheet::new(CategoryTaxonomy::new()));
        let result = Engine::new(sheet, &Settings::default()).await;
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn confirmation_echoes_the_record_with_empty_details_placeholder() {
        let record = TransactionRecord::new(
            chrono::NaiveDate::from_ymd_opt(2025, 11, 22).unwrap(),
            TransactionType::VariableExpenses,
            "Groceries",
            45.5,
            "",
        )
        .unwrap();
        let text = format_confirmation(&record);
        assert!(text.contains("2025-11-22"));
        assert!(text.contains("Variable Expenses"));
        assert!(text.contains("$45.50"));
        assert!(text.contains("📝 —"));
    }
}
