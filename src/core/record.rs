//! Transaction record and type definitions.
//!
//! A [`TransactionRecord`] is the unit appended to the ledger: one row with
//! `DATE | TYPE | CATEGORY | AMOUNT | DETAILS` columns. Records are built
//! either atomically by the quick-entry parser or incrementally by the
//! wizard, and are never mutated after they are appended.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of transaction types recognized by the ledger.
///
/// Display names match the strings used in the ledger's TYPE column and in
/// the spreadsheet's per-type total formulas, so they must not drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money coming in (salary, rent received)
    Income,
    /// Recurring committed expenses (insurance, utilities, tuition)
    FixedExpenses,
    /// Day-to-day discretionary spending
    VariableExpenses,
    /// Transfers into savings vehicles
    Savings,
    /// Debt payments (mortgages, loans)
    Debts,
}

impl TransactionType {
    /// All types in ledger column order.
    pub const ALL: [Self; 5] = [
        Self::Income,
        Self::FixedExpenses,
        Self::VariableExpenses,
        Self::Savings,
        Self::Debts,
    ];

    /// The display name used in the ledger and in chat replies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::FixedExpenses => "Fixed Expenses",
            Self::VariableExpenses => "Variable Expenses",
            Self::Savings => "Savings",
            Self::Debts => "Debts",
        }
    }

    /// Parses a display name, case-insensitively, ignoring surrounding
    /// whitespace. Returns `None` for anything outside the closed set.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
    }

    /// Whether this type counts toward total expenses in a summary.
    #[must_use]
    pub const fn is_expense(self) -> bool {
        !matches!(self, Self::Income)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default type for quick-entry messages whose category text matches
/// nothing in the taxonomy.
pub const DEFAULT_TYPE: TransactionType = TransactionType::VariableExpenses;

/// One ledger row. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction date, formatted `YYYY-MM-DD` in the ledger
    pub date: NaiveDate,
    /// Transaction type
    pub kind: TransactionType,
    /// Category name; canonical taxonomy entry when matched
    pub category: String,
    /// Non-negative amount, two-decimal precision
    pub amount: f64,
    /// Free-text note, empty allowed
    pub details: String,
}

impl TransactionRecord {
    /// Builds a validated record. The amount must be finite and
    /// non-negative; it is rounded to two decimals. The `-` details
    /// sentinel normalizes to empty.
    pub fn new(
        date: NaiveDate,
        kind: TransactionType,
        category: impl Into<String>,
        amount: f64,
        details: &str,
    ) -> Result<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount {
                input: amount.to_string(),
            });
        }
        Ok(Self {
            date,
            kind,
            category: category.into(),
            amount: round_amount(amount),
            details: normalize_details(details),
        })
    }

    /// The ledger row projection: `DATE | TYPE | CATEGORY | AMOUNT | DETAILS`.
    #[must_use]
    pub fn to_row(&self) -> [String; 5] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.kind.as_str().to_string(),
            self.category.clone(),
            format!("{:.2}", self.amount),
            self.details.clone(),
        ]
    }
}

/// Rounds an amount to two-decimal precision.
#[must_use]
pub fn round_amount(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Normalizes a details note: trims whitespace and maps the `-` skip
/// sentinel to empty.
#[must_use]
pub fn normalize_details(details: &str) -> String {
    let trimmed = details.trim();
    if trimmed == "-" {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Parses a token as a non-negative decimal amount with at most two
/// decimal places. Accepts both `.` and `,` as the decimal separator and
/// tolerates a leading `$`. Returns `None` for anything else, including
/// signed values and digits embedded in words.
#[must_use]
pub fn parse_amount(token: &str) -> Option<f64> {
    let cleaned = token.trim().trim_start_matches('$');
    let (whole, fraction) = match cleaned.split_once(['.', ',']) {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (cleaned, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(fraction) = fraction {
        if fraction.is_empty() || fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
    }
    let normalized = match fraction {
        Some(fraction) => format!("{whole}.{fraction}"),
        None => whole.to_string(),
    };
    normalized.parse().ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn type_round_trips_through_display_name() {
        for kind in TransactionType::ALL {
            assert_eq!(TransactionType::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn type_parse_is_case_insensitive() {
        assert_eq!(
            TransactionType::parse("variable expenses"),
            Some(TransactionType::VariableExpenses)
        );
        assert_eq!(
            TransactionType::parse("  INCOME  "),
            Some(TransactionType::Income)
        );
        assert_eq!(TransactionType::parse("Groceries"), None);
    }

    #[test]
    fn only_income_is_excluded_from_expenses() {
        assert!(!TransactionType::Income.is_expense());
        assert!(TransactionType::FixedExpenses.is_expense());
        assert!(TransactionType::VariableExpenses.is_expense());
        assert!(TransactionType::Savings.is_expense());
        assert!(TransactionType::Debts.is_expense());
    }

    #[test]
    fn record_rejects_negative_and_non_finite_amounts() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 22).unwrap();
        for bad in [-0.01, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = TransactionRecord::new(
                date,
                TransactionType::VariableExpenses,
                "Groceries",
                bad,
                "",
            );
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }
    }

    #[test]
    fn record_normalizes_details_sentinel() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 22).unwrap();
        let record =
            TransactionRecord::new(date, TransactionType::Savings, "RESP", 200.0, " - ").unwrap();
        assert_eq!(record.details, "");
    }

    #[test]
    fn row_projection_formats_date_and_amount() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let record = TransactionRecord::new(
            date,
            TransactionType::VariableExpenses,
            "Coffee",
            4.5,
            "morning",
        )
        .unwrap();
        let row = record.to_row();
        assert_eq!(
            row,
            [
                "2025-03-05".to_string(),
                "Variable Expenses".to_string(),
                "Coffee".to_string(),
                "4.50".to_string(),
                "morning".to_string(),
            ]
        );
    }

    #[test]
    fn parse_amount_accepts_plain_decimals() {
        assert_eq!(parse_amount("45"), Some(45.0));
        assert_eq!(parse_amount("45.50"), Some(45.5));
        assert_eq!(parse_amount("45,50"), Some(45.5));
        assert_eq!(parse_amount("$12.99"), Some(12.99));
        assert_eq!(parse_amount("0"), Some(0.0));
    }

    #[test]
    fn parse_amount_rejects_everything_else() {
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("+5"), None);
        assert_eq!(parse_amount("4.999"), None);
        assert_eq!(parse_amount("12a"), None);
        assert_eq!(parse_amount("a12"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("."), None);
        assert_eq!(parse_amount("1."), None);
        assert_eq!(parse_amount("1e3"), None);
    }
}
