//! Guided entry wizard state machine.
//!
//! Five steps: type → category → amount → details → date. Each step
//! validates one field; invalid input re-prompts without advancing, valid
//! input moves the cursor forward, and the final step yields a complete
//! [`TransactionRecord`]. The machine is pure: the engine owns the session
//! storage and the ledger append, so cancellation at any step is trivially
//! side-effect-free.

use crate::core::dates;
use crate::core::record::{self, TransactionRecord, TransactionType, parse_amount};
use crate::core::taxonomy::CategoryTaxonomy;
use chrono::NaiveDate;

/// Number of wizard steps.
pub const STEP_COUNT: usize = 5;

/// The wizard's step cursor. Terminal states (complete, cancelled) are not
/// steps: completion is the [`StepOutcome::Complete`] outcome and
/// cancellation is the engine discarding the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Choose one of the five transaction types
    SelectType,
    /// Choose a category registered under the chosen type
    SelectCategory,
    /// Enter a non-negative decimal amount
    EnterAmount,
    /// Enter a free-text note, `-` to skip
    EnterDetails,
    /// Choose the transaction date
    SelectDate,
}

impl WizardStep {
    /// Zero-based position in the step sequence, always within
    /// `[0, STEP_COUNT)`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::SelectType => 0,
            Self::SelectCategory => 1,
            Self::EnterAmount => 2,
            Self::EnterDetails => 3,
            Self::SelectDate => 4,
        }
    }

    /// The prompt shown when this step is reached.
    #[must_use]
    pub fn prompt(self, taxonomy: &CategoryTaxonomy, draft: &DraftRecord) -> String {
        let step = self.index() + 1;
        match self {
            Self::SelectType => format!(
                "📂 **Step {step} of {STEP_COUNT}** — Choose the transaction type:\n{}",
                type_choices()
            ),
            Self::SelectCategory => {
                let kind = draft.kind.unwrap_or(record::DEFAULT_TYPE);
                format!(
                    "🏷 **Step {step} of {STEP_COUNT}** — Choose a category under _{kind}_:\n{}",
                    bullet_list(taxonomy.categories_for(kind))
                )
            }
            Self::EnterAmount => format!(
                "💰 **Step {step} of {STEP_COUNT}** — Enter the amount (e.g. `45.50`):"
            ),
            Self::EnterDetails => format!(
                "📝 **Step {step} of {STEP_COUNT}** — Any details or notes?\n_(Send `-` to skip)_"
            ),
            Self::SelectDate => format!(
                "📅 **Step {step} of {STEP_COUNT}** — Which date? Send `Today`, `Yesterday`, \
                 `22/02`, `22/02/2025`, or `2025-02-22`."
            ),
        }
    }
}

/// The partially-filled record a session accumulates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftRecord {
    /// Chosen at the type step
    pub kind: Option<TransactionType>,
    /// Chosen at the category step, stored canonically
    pub category: Option<String>,
    /// Entered at the amount step, already validated non-negative
    pub amount: Option<f64>,
    /// Entered at the details step, already normalized
    pub details: Option<String>,
}

/// What one step input produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Input was invalid; stay on the current step and send this text
    Reprompt(String),
    /// Input accepted; advance to this step and send its prompt
    Next(WizardStep, String),
    /// Final step accepted; the accumulated fields form a complete record
    Complete(TransactionRecord),
}

/// Feeds one user input into the wizard at the given step.
///
/// The draft is only mutated when the input is accepted, so a re-prompt
/// leaves the session exactly as it was.
pub fn advance(
    step: WizardStep,
    draft: &mut DraftRecord,
    input: &str,
    taxonomy: &CategoryTaxonomy,
    today: NaiveDate,
) -> StepOutcome {
    match step {
        WizardStep::SelectType => match TransactionType::parse(input) {
            Some(kind) => {
                draft.kind = Some(kind);
                next(WizardStep::SelectCategory, taxonomy, draft)
            }
            None => StepOutcome::Reprompt(format!(
                "❓ Please pick one of the listed types:\n{}",
                type_choices()
            )),
        },
        WizardStep::SelectCategory => {
            let Some(kind) = draft.kind else {
                // A session can only reach this step with a type chosen;
                // recover by re-asking for the type.
                return next(WizardStep::SelectType, taxonomy, draft);
            };
            match taxonomy.lookup_in(kind, input) {
                Some(canonical) => {
                    draft.category = Some(canonical.to_string());
                    next(WizardStep::EnterAmount, taxonomy, draft)
                }
                None => StepOutcome::Reprompt(format!(
                    "❓ Please pick one of the categories under _{kind}_:\n{}",
                    bullet_list(taxonomy.categories_for(kind))
                )),
            }
        }
        WizardStep::EnterAmount => match parse_amount(input) {
            Some(amount) => {
                draft.amount = Some(amount);
                next(WizardStep::EnterDetails, taxonomy, draft)
            }
            None => StepOutcome::Reprompt(format!(
                "❓ Couldn't read '{}'. Enter a number like `45.50`:",
                input.trim()
            )),
        },
        WizardStep::EnterDetails => {
            draft.details = Some(record::normalize_details(input));
            next(WizardStep::SelectDate, taxonomy, draft)
        }
        WizardStep::SelectDate => match dates::resolve(input, today) {
            Ok(date) => complete(draft, date),
            Err(error) => StepOutcome::Reprompt(error.user_message()),
        },
    }
}

fn next(step: WizardStep, taxonomy: &CategoryTaxonomy, draft: &DraftRecord) -> StepOutcome {
    StepOutcome::Next(step, step.prompt(taxonomy, draft))
}

fn complete(draft: &DraftRecord, date: NaiveDate) -> StepOutcome {
    let (Some(kind), Some(category), Some(amount)) =
        (draft.kind, draft.category.clone(), draft.amount)
    else {
        // Earlier steps were skipped somehow; restart the wizard cleanly.
        return StepOutcome::Reprompt(
            "❓ This entry got out of step. Send /add to start over.".to_string(),
        );
    };
    StepOutcome::Complete(TransactionRecord {
        date,
        kind,
        category,
        amount: record::round_amount(amount),
        details: draft.details.clone().unwrap_or_default(),
    })
}

fn type_choices() -> String {
    bullet_list(
        &TransactionType::ALL
            .map(|kind| kind.as_str().to_string()),
    )
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
