//! Spreadsheet service interface.
//!
//! The real ledger lives in an external spreadsheet with a formula layer
//! that recomputes per-type totals for whichever period is written into two
//! designated selector cells. Everything the core needs from it goes
//! through the [`SheetService`] trait: appending ledger rows, driving the
//! selector cells, reading back computed totals, and loading the category
//! taxonomy from the configuration sheet. The production client
//! (spreadsheet API, credentials) plugs in from outside; [`MemorySheet`]
//! backs tests and local development.

/// In-memory sheet backend with a simulated formula layer
pub mod memory;

use crate::core::record::{TransactionRecord, TransactionType};
use crate::core::taxonomy::CategoryTaxonomy;
use crate::errors::Result;
use async_trait::async_trait;

pub use memory::MemorySheet;

/// One per-type total as computed by the formula layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeTotal {
    /// The transaction type this total covers
    pub kind: TransactionType,
    /// Sum of amounts for the selected period
    pub total: f64,
}

/// One category-level breakdown row.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The owning transaction type
    pub kind: TransactionType,
    /// Category name
    pub category: String,
    /// Sum of amounts for the selected period
    pub total: f64,
}

/// What the formula layer currently computes. The selector echo reports
/// which period the totals actually belong to, so a reader can tell a
/// stale snapshot from a settled one.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalsSnapshot {
    /// Month name the computed totals are for
    pub selector_month: String,
    /// Year the computed totals are for
    pub selector_year: i32,
    /// Per-type totals, one entry per transaction type
    pub totals: Vec<TypeTotal>,
    /// Category-level breakdown rows
    pub breakdown: Vec<CategoryTotal>,
    /// Number of ledger rows matching the selected period. Distinguishes
    /// "no transactions" from a period whose activity sums to zero.
    pub row_count: usize,
}

impl TotalsSnapshot {
    /// The computed total for one type, zero when absent.
    #[must_use]
    pub fn total_for(&self, kind: TransactionType) -> f64 {
        self.totals
            .iter()
            .find(|entry| entry.kind == kind)
            .map_or(0.0, |entry| entry.total)
    }

    /// Whether this snapshot was computed for the given selector.
    #[must_use]
    pub fn is_for(&self, month_name: &str, year: i32) -> bool {
        self.selector_month == month_name && self.selector_year == year
    }
}

/// The narrow interface to the backing spreadsheet.
#[async_trait]
pub trait SheetService: Send + Sync {
    /// Appends one ledger row: `DATE | TYPE | CATEGORY | AMOUNT | DETAILS`.
    async fn append_row(&self, record: &TransactionRecord) -> Result<()>;

    /// Writes the period into the two selector cells the formula layer
    /// watches.
    async fn write_selector(&self, month_name: &str, year: i32) -> Result<()>;

    /// Reads back whatever the formula layer currently computes. May lag
    /// behind the last selector write while formulas recompute.
    async fn read_totals(&self) -> Result<TotalsSnapshot>;

    /// Loads the category taxonomy from the configuration sheet.
    async fn load_taxonomy(&self) -> Result<CategoryTaxonomy>;
}
