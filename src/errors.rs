//! Unified error types and result handling.
//!
//! Every failure in the system is scoped to a single user interaction:
//! nothing here is fatal to the process. The [`Error::user_message`] helper
//! maps each variant to the reply text the bot layer sends back, so that
//! malformed input, taxonomy misses, and spreadsheet trouble each produce a
//! distinct, actionable message.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or value could not be loaded or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    /// A required environment variable is missing or malformed.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Underlying I/O failure (config file reads).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A date token could not be resolved to a real calendar date.
    #[error("Unrecognized date: '{input}'")]
    InvalidDate {
        /// The token that failed to resolve
        input: String,
    },

    /// A free-text message contained no token that parses as an amount.
    #[error("No amount found in message")]
    NoAmount,

    /// A free-text message had an amount but no category text around it.
    #[error("No category text found in message")]
    NoCategory,

    /// A category is not registered in the taxonomy (strict matching only).
    #[error("Unknown category: '{category}'")]
    UnknownCategory {
        /// The unmatched category text
        category: String,
    },

    /// A transaction amount is negative, non-finite, or otherwise unusable.
    #[error("Invalid amount: '{input}'")]
    InvalidAmount {
        /// The offending amount text
        input: String,
    },

    /// A `/summary` argument does not describe a valid reporting period.
    #[error("Invalid summary period: {message}")]
    InvalidPeriod {
        /// Why the period was rejected
        message: String,
    },

    /// The backing spreadsheet could not be reached at all.
    #[error("Spreadsheet unavailable: {message}")]
    StoreUnavailable {
        /// Transport-level failure description
        message: String,
    },

    /// The formula layer never produced a stable read for the written
    /// selector within the retry budget.
    #[error("Spreadsheet formulas did not settle after {attempts} read(s)")]
    StoreNotReady {
        /// How many reads were attempted before giving up
        attempts: u32,
    },

    /// The selector cells rejected the write (locked or protected).
    #[error("Selector write rejected: {message}")]
    SelectorWriteRejected {
        /// Store-side rejection description
        message: String,
    },

    /// Serenity/Poise framework error.
    #[error("Discord framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// The reply text shown to the user when this error ends an interaction.
    ///
    /// Recoverable input errors come back with guidance on how to retry;
    /// spreadsheet errors name the failure mode so the user knows whether to
    /// try again later. Internal errors get a generic apology, the details
    /// stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidDate { input } => format!(
                "❓ '{input}' isn't a date I recognize. Try `Today`, `Yesterday`, \
                 `22/02`, `22/02/2025`, or `2025-02-22`."
            ),
            Self::NoAmount => "❓ Couldn't find an amount in that. \
                 Try `Groceries 45.50` or use /add for guided entry."
                .to_string(),
            Self::NoCategory => "❓ Couldn't match a category. \
                 Try `Groceries 45.50` or use /add for guided entry.\n\
                 Send /categories to see all options."
                .to_string(),
            Self::UnknownCategory { category } => format!(
                "❓ '{category}' isn't a known category. \
                 Send /categories to see all options."
            ),
            Self::InvalidAmount { input } => {
                format!("❓ '{input}' isn't a valid amount. Enter a number like `45.50`.")
            }
            Self::InvalidPeriod { message } => {
                format!("❓ {message}\nUsage: `/summary [year] [month] [full] [compare]`")
            }
            Self::StoreUnavailable { .. } => {
                "❌ The spreadsheet is unreachable right now. Please try again later.".to_string()
            }
            Self::StoreNotReady { .. } => {
                "⏳ The spreadsheet is still recalculating. Please try again in a moment."
                    .to_string()
            }
            Self::SelectorWriteRejected { .. } => {
                "❌ The spreadsheet rejected the period selection. \
                 Check that the selector cells aren't protected."
                    .to_string()
            }
            Self::Config { .. } | Self::EnvVar(_) | Self::Io(_) | Self::Framework(_) => {
                "❌ Something went wrong on my side. Check the logs.".to_string()
            }
        }
    }
}

/// Convenience `Result` type.
pub type Result<T> = std::result::Result<T, Error>;
