//! In-memory sheet backend.
//!
//! Implements [`SheetService`] against plain vectors, simulating the one
//! behavior of the real spreadsheet that matters to the orchestrator: the
//! formula layer does not recompute instantly. A configurable recompute lag
//! keeps serving totals for the previously committed selector for the
//! first N reads after a selector write, which is exactly the stale-read
//! window the settle-wait logic has to ride out.
//!
//! Used by the test suite and as the local development backend; the real
//! spreadsheet client is wired in from outside the crate.

use crate::core::record::{TransactionRecord, TransactionType};
use crate::core::summary::MONTH_NAMES;
use crate::core::taxonomy::CategoryTaxonomy;
use crate::errors::{Error, Result};
use crate::sheet::{CategoryTotal, SheetService, TotalsSnapshot, TypeTotal};
use async_trait::async_trait;
use chrono::Datelike;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<TransactionRecord>,
    written_month: String,
    written_year: i32,
    committed_month: String,
    committed_year: i32,
    stale_reads: u32,
    unavailable: bool,
    selector_locked: bool,
    fail_appends: bool,
}

/// In-memory spreadsheet double.
#[derive(Debug)]
pub struct MemorySheet {
    recompute_lag: u32,
    taxonomy: CategoryTaxonomy,
    inner: RwLock<Inner>,
}

impl MemorySheet {
    /// Creates an empty sheet serving the given taxonomy, with an
    /// instantly-settling formula layer.
    #[must_use]
    pub fn new(taxonomy: CategoryTaxonomy) -> Self {
        Self {
            recompute_lag: 0,
            taxonomy,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Sets how many reads after a selector write still observe the
    /// previously committed period.
    #[must_use]
    pub fn with_recompute_lag(mut self, reads: u32) -> Self {
        self.recompute_lag = reads;
        self
    }

    /// Simulates the store being unreachable.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.inner.write().await.unavailable = unavailable;
    }

    /// Simulates protected selector cells.
    pub async fn set_selector_locked(&self, locked: bool) {
        self.inner.write().await.selector_locked = locked;
    }

    /// Simulates append failures while leaving reads working.
    pub async fn set_fail_appends(&self, fail: bool) {
        self.inner.write().await.fail_appends = fail;
    }

    /// All appended rows, in append order.
    pub async fn rows(&self) -> Vec<TransactionRecord> {
        self.inner.read().await.rows.clone()
    }

    /// Number of appended rows.
    pub async fn row_count(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    /// The selector cells as last written.
    pub async fn selector(&self) -> (String, i32) {
        let inner = self.inner.read().await;
        (inner.written_month.clone(), inner.written_year)
    }

    fn compute(inner: &Inner) -> TotalsSnapshot {
        let month_number = MONTH_NAMES
            .iter()
            .position(|name| *name == inner.committed_month)
            .map(|index| index + 1);

        let matching: Vec<&TransactionRecord> = inner
            .rows
            .iter()
            .filter(|row| {
                month_number == Some(row.date.month() as usize)
                    && row.date.year() == inner.committed_year
            })
            .collect();

        let totals = TransactionType::ALL
            .into_iter()
            .map(|kind| TypeTotal {
                kind,
                total: matching
                    .iter()
                    .filter(|row| row.kind == kind)
                    .map(|row| row.amount)
                    .sum(),
            })
            .collect();

        let mut breakdown: Vec<CategoryTotal> = Vec::new();
        for row in &matching {
            if let Some(entry) = breakdown
                .iter_mut()
                .find(|entry| entry.kind == row.kind && entry.category == row.category)
            {
                entry.total += row.amount;
            } else {
                breakdown.push(CategoryTotal {
                    kind: row.kind,
                    category: row.category.clone(),
                    total: row.amount,
                });
            }
        }

        TotalsSnapshot {
            selector_month: inner.committed_month.clone(),
            selector_year: inner.committed_year,
            totals,
            breakdown,
            row_count: matching.len(),
        }
    }
}

#[async_trait]
impl SheetService for MemorySheet {
    async fn append_row(&self, record: &TransactionRecord) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.unavailable {
            return Err(unavailable());
        }
        if inner.fail_appends {
            return Err(Error::StoreUnavailable {
                message: "append rejected".to_string(),
            });
        }
        inner.rows.push(record.clone());
        Ok(())
    }

    async fn write_selector(&self, month_name: &str, year: i32) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.unavailable {
            return Err(unavailable());
        }
        if inner.selector_locked {
            return Err(Error::SelectorWriteRejected {
                message: "selector cells are protected".to_string(),
            });
        }
        inner.written_month = month_name.to_string();
        inner.written_year = year;
        inner.stale_reads = self.recompute_lag;
        Ok(())
    }

    async fn read_totals(&self) -> Result<TotalsSnapshot> {
        let mut inner = self.inner.write().await;
        if inner.unavailable {
            return Err(unavailable());
        }
        if inner.stale_reads > 0 {
            // Formulas haven't caught up with the selector write yet
            inner.stale_reads -= 1;
        } else {
            inner.committed_month = inner.written_month.clone();
            inner.committed_year = inner.written_year;
        }
        Ok(Self::compute(&inner))
    }

    async fn load_taxonomy(&self) -> Result<CategoryTaxonomy> {
        let inner = self.inner.read().await;
        if inner.unavailable {
            return Err(unavailable());
        }
        Ok(self.taxonomy.clone())
    }
}

fn unavailable() -> Error {
    Error::StoreUnavailable {
        message: "memory sheet marked unavailable".to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{date, sample_taxonomy};

    fn groceries(day: u32, amount: f64) -> TransactionRecord {
        TransactionRecord::new(
            date(2025, 11, day),
            TransactionType::VariableExpenses,
            "Groceries",
            amount,
            "",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn totals_cover_only_the_committed_period() {
        let sheet = MemorySheet::new(sample_taxonomy());
        sheet.append_row(&groceries(8, 45.5)).await.unwrap();
        sheet
            .append_row(
                &TransactionRecord::new(
                    date(2025, 10, 2),
                    TransactionType::VariableExpenses,
                    "Groceries",
                    99.0,
                    "",
                )
                .unwrap(),
            )
            .await
            .unwrap();

        sheet.write_selector("November", 2025).await.unwrap();
        let snapshot = sheet.read_totals().await.unwrap();
        assert!(snapshot.is_for("November", 2025));
        assert_eq!(snapshot.total_for(TransactionType::VariableExpenses), 45.5);
        assert_eq!(snapshot.row_count, 1);
    }

    #[tokio::test]
    async fn breakdown_aggregates_per_category_in_first_seen_order() {
        let sheet = MemorySheet::new(sample_taxonomy());
        sheet.append_row(&groceries(8, 45.5)).await.unwrap();
        sheet.append_row(&groceries(9, 4.5)).await.unwrap();

        sheet.write_selector("November", 2025).await.unwrap();
        let snapshot = sheet.read_totals().await.unwrap();
        assert_eq!(snapshot.breakdown.len(), 1);
        assert_eq!(snapshot.breakdown[0].category, "Groceries");
        assert_eq!(snapshot.breakdown[0].total, 50.0);
    }

    #[tokio::test]
    async fn recompute_lag_serves_stale_snapshots_first() {
        let sheet = MemorySheet::new(sample_taxonomy()).with_recompute_lag(2);
        sheet.append_row(&groceries(8, 45.5)).await.unwrap();

        sheet.write_selector("November", 2025).await.unwrap();
        assert!(!sheet.read_totals().await.unwrap().is_for("November", 2025));
        assert!(!sheet.read_totals().await.unwrap().is_for("November", 2025));
        assert!(sheet.read_totals().await.unwrap().is_for("November", 2025));
    }

    #[tokio::test]
    async fn failure_knobs_surface_the_matching_errors() {
        let sheet = MemorySheet::new(sample_taxonomy());

        sheet.set_selector_locked(true).await;
        assert!(matches!(
            sheet.write_selector("November", 2025).await,
            Err(Error::SelectorWriteRejected { .. })
        ));
        sheet.set_selector_locked(false).await;

        sheet.set_fail_appends(true).await;
        assert!(sheet.append_row(&groceries(8, 45.5)).await.is_err());
        assert!(sheet.read_totals().await.is_ok());
        sheet.set_fail_appends(false).await;

        sheet.set_unavailable(true).await;
        assert!(matches!(
            sheet.read_totals().await,
            Err(Error::StoreUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn taxonomy_is_served_from_the_configuration_source() {
        let sheet = MemorySheet::new(sample_taxonomy());
        let taxonomy = sheet.load_taxonomy().await.unwrap();
        assert_eq!(taxonomy, sample_taxonomy());
    }
}
