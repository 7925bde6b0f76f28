//! Free-text quick-entry parsing.
//!
//! A single unstructured message like `Groceries 45.50 weekly shop` becomes
//! a draft transaction: the first whitespace token that parses as a
//! non-negative decimal is the amount, everything before it is the category
//! anchor, everything after it is the details note. Amount-first messages
//! (`45.50 Groceries ...`) are accepted when the text after the amount leads
//! with a known category.

use crate::core::record::{self, DEFAULT_TYPE, TransactionType, parse_amount};
use crate::core::taxonomy::CategoryTaxonomy;
use crate::errors::{Error, Result};

/// A parsed quick entry. The caller stamps the date (always today for
/// free-text entry) and builds the final [`crate::core::TransactionRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct QuickEntry {
    /// Resolved type: the matched category's type, or the default
    pub kind: TransactionType,
    /// Canonical category name when matched, raw anchor text otherwise
    pub category: String,
    /// Parsed non-negative amount
    pub amount: f64,
    /// Remaining text after the amount
    pub details: String,
}

/// Parses a free-text message against the taxonomy.
///
/// With `strict` set, anchors that match no registered category are
/// rejected instead of falling back to the default type.
pub fn parse(message: &str, taxonomy: &CategoryTaxonomy, strict: bool) -> Result<QuickEntry> {
    let tokens: Vec<&str> = message.split_whitespace().collect();

    // First token that parses as an amount wins; digits embedded in words
    // never qualify because tokenization is whitespace-only.
    let (position, amount) = tokens
        .iter()
        .enumerate()
        .find_map(|(position, token)| parse_amount(token).map(|amount| (position, amount)))
        .ok_or(Error::NoAmount)?;

    let anchor = tokens[..position].join(" ");
    let tail = &tokens[position + 1..];

    if anchor.is_empty() {
        return parse_amount_first(amount, tail, taxonomy);
    }

    let details = tail.join(" ");
    match taxonomy.lookup(&anchor) {
        Some((kind, canonical)) => Ok(QuickEntry {
            kind,
            category: canonical.to_string(),
            amount: record::round_amount(amount),
            details,
        }),
        None if strict => Err(Error::UnknownCategory { category: anchor }),
        None => Ok(QuickEntry {
            kind: DEFAULT_TYPE,
            category: anchor,
            amount: record::round_amount(amount),
            details,
        }),
    }
}

/// Amount-first form: the longest leading run of tail tokens that names a
/// registered category becomes the category; the rest is details. Without
/// a match there is no way to tell category from note, so the message is
/// rejected with guidance.
fn parse_amount_first(
    amount: f64,
    tail: &[&str],
    taxonomy: &CategoryTaxonomy,
) -> Result<QuickEntry> {
    for split in (1..=tail.len()).rev() {
        let candidate = tail[..split].join(" ");
        if let Some((kind, canonical)) = taxonomy.lookup(&candidate) {
            return Ok(QuickEntry {
                kind,
                category: canonical.to_string(),
                amount: record::round_amount(amount),
                details: tail[split..].join(" "),
            });
        }
    }
    Err(Error::NoCategory)
}
