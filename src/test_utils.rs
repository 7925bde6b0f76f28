//! Shared test utilities for `BudgetBuddy`.
//!
//! This module provides common helper functions for building the fixture
//! taxonomy, the in-memory sheet backend, and fully wired engines with
//! test-friendly settle timings.

#![allow(clippy::expect_used)]

use crate::config::Settings;
use crate::core::Engine;
use crate::core::record::TransactionType;
use crate::core::taxonomy::CategoryTaxonomy;
use crate::sheet::{MemorySheet, SheetService};
use chrono::NaiveDate;
use std::sync::Arc;

/// A small but representative taxonomy covering all five types.
pub fn sample_taxonomy() -> CategoryTaxonomy {
    let groups = [
        (TransactionType::Income, &["Salary", "Rent"][..]),
        (
            TransactionType::FixedExpenses,
            &["Internet", "Car insurance"][..],
        ),
        (
            TransactionType::VariableExpenses,
            &["Groceries", "Dining out", "Entertainment"][..],
        ),
        (TransactionType::Savings, &["RESP", "India Transfers"][..]),
        (TransactionType::Debts, &["Mortgage"][..]),
    ];
    CategoryTaxonomy::from_groups(groups.map(|(kind, categories)| {
        (
            kind,
            categories.iter().map(|&c| c.to_string()).collect::<Vec<_>>(),
        )
    }))
    .expect("fixture taxonomy is valid")
}

/// Settings with millisecond settle timings so tests stay fast.
pub fn fast_settings() -> Settings {
    Settings {
        settle_delay_ms: 1,
        ..Settings::default()
    }
}

/// A calendar date that must be valid.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// An engine wired to a fresh in-memory sheet, loose category matching.
pub async fn engine_with_sheet() -> (Engine, Arc<MemorySheet>) {
    let sheet = Arc::new(MemorySheet::new(sample_taxonomy()));
    let service: Arc<dyn SheetService> = Arc::clone(&sheet) as Arc<dyn SheetService>;
    let engine = Engine::new(service, &fast_settings())
        .await
        .expect("engine builds against the fixture sheet");
    (engine, sheet)
}

/// Same as [`engine_with_sheet`], but rejecting unknown quick-entry
/// categories.
pub async fn strict_engine_with_sheet() -> (Engine, Arc<MemorySheet>) {
    let settings = Settings {
        strict_categories: true,
        ..fast_settings()
    };
    let sheet = Arc::new(MemorySheet::new(sample_taxonomy()));
    let service: Arc<dyn SheetService> = Arc::clone(&sheet) as Arc<dyn SheetService>;
    let engine = Engine::new(service, &settings)
        .await
        .expect("engine builds against the fixture sheet");
    (engine, sheet)
}
