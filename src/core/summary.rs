//! Summary periods, orchestration, and report formatting.
//!
//! The spreadsheet does the arithmetic: its formula layer watches two
//! selector cells and recomputes per-type totals for whichever period they
//! name. The orchestrator's job is to position those inputs and read the
//! results back correctly: write the selector, wait out the recompute
//! delay until consecutive reads agree, then derive the figures the report
//! needs (total expenses, balance, comparison deltas).
//!
//! The selector cells are process-wide shared state in the spreadsheet, so
//! the whole write-settle-read cycle runs under a mutex; two concurrent
//! `/summary` requests are serialized instead of clobbering each other's
//! selector mid-read.

use crate::core::record::TransactionType;
use crate::errors::{Error, Result};
use crate::sheet::{CategoryTotal, SheetService, TotalsSnapshot, TypeTotal};
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Month names as written into the selector cell, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Resolves a month name to its 1-based number. Case-insensitive; unique
/// prefixes of three letters or more are accepted (`nov`, `sept`).
#[must_use]
pub fn parse_month_name(input: &str) -> Option<u32> {
    let needle = input.trim().to_ascii_lowercase();
    if needle.len() < 3 {
        return None;
    }
    let mut candidates = MONTH_NAMES
        .iter()
        .enumerate()
        .filter(|(_, name)| name.to_ascii_lowercase().starts_with(&needle));
    let (index, _) = candidates.next()?;
    if candidates.next().is_some() {
        return None;
    }
    u32::try_from(index).ok().map(|index| index + 1)
}

/// A validated reporting period. Constructed only through [`Self::new`],
/// [`Self::current`], and [`Self::previous`], so `month` is always in
/// `[1, 12]` and `year` is always four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryPeriod {
    year: i32,
    month: u32,
}

impl SummaryPeriod {
    /// Validates month and year bounds before any store interaction.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidPeriod {
                message: format!("Month must be between 1 and 12, got {month}."),
            });
        }
        if !(1000..=9999).contains(&year) {
            return Err(Error::InvalidPeriod {
                message: format!("Year must be four digits, got {year}."),
            });
        }
        Ok(Self { year, month })
    }

    /// The period containing the reference date.
    #[must_use]
    pub fn current(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// The preceding calendar month; the year rolls back at January.
    #[must_use]
    pub const fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The 1-based month number.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The four-digit year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// The month name written into the selector cell.
    #[must_use]
    pub fn month_name(self) -> &'static str {
        // month is in [1, 12] by construction
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Human-readable label, e.g. `November 2025`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

/// A parsed `/summary` request: the period plus report mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRequest {
    /// The period to report on
    pub period: SummaryPeriod,
    /// Include the category-level breakdown
    pub full: bool,
    /// Include the previous-month comparison
    pub compare: bool,
}

/// Parses `/summary` arguments: a 4-digit year, a month number or name,
/// and the `full` / `compare` flags, in any order. Missing pieces default
/// to the current month and year.
pub fn parse_request(args: &str, today: NaiveDate) -> Result<SummaryRequest> {
    let mut year: Option<i32> = None;
    let mut month: Option<u32> = None;
    let mut full = false;
    let mut compare = false;

    for token in args.split_whitespace() {
        if token.eq_ignore_ascii_case("full") {
            full = true;
        } else if token.eq_ignore_ascii_case("compare") {
            compare = true;
        } else if token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()) {
            if year.is_some() {
                return Err(Error::InvalidPeriod {
                    message: "The year was given more than once.".to_string(),
                });
            }
            year = Some(token.parse().map_err(|_| Error::InvalidPeriod {
                message: format!("'{token}' isn't a valid year."),
            })?);
        } else if let Some(number) = parse_month_token(token) {
            if month.is_some() {
                return Err(Error::InvalidPeriod {
                    message: "The month was given more than once.".to_string(),
                });
            }
            month = Some(number);
        } else {
            return Err(Error::InvalidPeriod {
                message: format!("'{token}' isn't a year, month, or mode flag."),
            });
        }
    }

    let reference = SummaryPeriod::current(today);
    let period = SummaryPeriod::new(
        year.unwrap_or_else(|| reference.year()),
        month.unwrap_or_else(|| reference.month()),
    )?;
    Ok(SummaryRequest {
        period,
        full,
        compare,
    })
}

/// A bare month token: a number in `[1, 12]` or a month name.
fn parse_month_token(token: &str) -> Option<u32> {
    if token.bytes().all(|b| b.is_ascii_digit()) {
        return match token.parse::<u32>() {
            Ok(number) if (1..=12).contains(&number) => Some(number),
            _ => None,
        };
    }
    parse_month_name(token)
}

/// Period-over-period direction of one figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Delta is strictly positive
    Up,
    /// Delta is strictly negative
    Down,
    /// Delta is exactly zero
    Flat,
}

impl Trend {
    /// Classifies a delta by strict sign comparison.
    #[must_use]
    pub fn of(delta: f64) -> Self {
        if delta > 0.0 {
            Self::Up
        } else if delta < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }

    /// Arrow glyph for report output.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Up => "↑",
            Self::Down => "↓",
            Self::Flat => "→",
        }
    }
}

/// The figures derived for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodFigures {
    /// The period these figures cover
    pub period: SummaryPeriod,
    /// Per-type totals in ledger column order, all five types present
    pub totals: Vec<TypeTotal>,
    /// Sum of totals for every type except Income
    pub total_expenses: f64,
    /// Income minus total expenses; present only when income is positive
    pub balance: Option<f64>,
    /// Category breakdown rows (full mode only)
    pub breakdown: Vec<CategoryTotal>,
    /// Ledger rows matching the period
    pub row_count: usize,
}

/// One figure's period-over-period movement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaFigure {
    /// Figure label (a type name, `Total Expenses`, or `Balance`)
    pub label: String,
    /// Current minus previous
    pub delta: f64,
    /// Sign classification of the delta
    pub trend: Trend,
}

/// Comparison against the preceding calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// The figures of the preceding month
    pub previous: PeriodFigures,
    /// Per-figure deltas and trend tags
    pub figures: Vec<DeltaFigure>,
}

/// A complete summary report.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    /// Figures for the requested period
    pub current: PeriodFigures,
    /// Previous-month comparison (compare mode only)
    pub comparison: Option<Comparison>,
}

/// The outcome of a summary request. A period with no qualifying ledger
/// rows is an explicit empty result, not an error and not a zero report.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    /// No ledger rows match the requested period
    Empty {
        /// The period that matched nothing
        period: SummaryPeriod,
    },
    /// Figures were computed
    Report(Box<SummaryReport>),
}

/// Drives the spreadsheet's selector cells and derives report figures.
pub struct SummaryOrchestrator {
    sheet: Arc<dyn SheetService>,
    /// Serializes the write-settle-read cycle; the selector cells are
    /// shared mutable state in the spreadsheet.
    selector_lock: Mutex<()>,
    settle_reads: u32,
    settle_delay: Duration,
}

impl SummaryOrchestrator {
    /// Creates an orchestrator with the given settle-wait budget. At least
    /// two reads are needed to observe a stable snapshot, so smaller
    /// budgets are raised to two.
    #[must_use]
    pub fn new(sheet: Arc<dyn SheetService>, settle_reads: u32, settle_delay: Duration) -> Self {
        Self {
            sheet,
            selector_lock: Mutex::new(()),
            settle_reads: settle_reads.max(2),
            settle_delay,
        }
    }

    /// Runs one summary request against the store.
    pub async fn summarize(&self, request: SummaryRequest) -> Result<SummaryOutcome> {
        let _guard = self.selector_lock.lock().await;

        let current = self.query_period(request.period, request.full).await?;
        if current.row_count == 0 {
            return Ok(SummaryOutcome::Empty {
                period: request.period,
            });
        }

        let comparison = if request.compare {
            let previous = self.query_period(request.period.previous(), false).await?;
            Some(build_comparison(&current, previous))
        } else {
            None
        };

        Ok(SummaryOutcome::Report(Box::new(SummaryReport {
            current,
            comparison,
        })))
    }

    /// Selector write plus settle-wait plus figure derivation for one
    /// period. Caller must hold the selector lock.
    async fn query_period(&self, period: SummaryPeriod, full: bool) -> Result<PeriodFigures> {
        self.sheet
            .write_selector(period.month_name(), period.year())
            .await?;
        let snapshot = self.settle(period).await?;
        Ok(derive_figures(period, snapshot, full))
    }

    /// Reads until two consecutive snapshots for the written selector
    /// agree, sleeping a fixed delay between reads. Bounded by the settle
    /// budget; exhaustion surfaces as [`Error::StoreNotReady`].
    async fn settle(&self, period: SummaryPeriod) -> Result<TotalsSnapshot> {
        let mut previous: Option<TotalsSnapshot> = None;
        for read in 0..self.settle_reads {
            if read > 0 {
                tokio::time::sleep(self.settle_delay).await;
            }
            let snapshot = self.sheet.read_totals().await?;
            if snapshot.is_for(period.month_name(), period.year()) {
                if previous.as_ref() == Some(&snapshot) {
                    debug!(period = %period.label(), reads = read + 1, "selector settled");
                    return Ok(snapshot);
                }
                previous = Some(snapshot);
            } else {
                // Formulas still show another period; drop any progress
                previous = None;
            }
        }
        Err(Error::StoreNotReady {
            attempts: self.settle_reads,
        })
    }
}

/// Derives report figures from a settled snapshot.
fn derive_figures(period: SummaryPeriod, snapshot: TotalsSnapshot, full: bool) -> PeriodFigures {
    let totals: Vec<TypeTotal> = TransactionType::ALL
        .into_iter()
        .map(|kind| TypeTotal {
            kind,
            total: snapshot.total_for(kind),
        })
        .collect();
    let total_expenses: f64 = totals
        .iter()
        .filter(|entry| entry.kind.is_expense())
        .map(|entry| entry.total)
        .sum();
    let income = snapshot.total_for(TransactionType::Income);
    let balance = (income > 0.0).then(|| income - total_expenses);

    PeriodFigures {
        period,
        totals,
        total_expenses,
        balance,
        breakdown: if full { snapshot.breakdown } else { Vec::new() },
        row_count: snapshot.row_count,
    }
}

/// Per-figure deltas between two periods, with trend tags.
fn build_comparison(current: &PeriodFigures, previous: PeriodFigures) -> Comparison {
    let mut figures: Vec<DeltaFigure> = current
        .totals
        .iter()
        .map(|entry| {
            let delta = entry.total - previous_total(&previous, entry.kind);
            DeltaFigure {
                label: entry.kind.as_str().to_string(),
                delta,
                trend: Trend::of(delta),
            }
        })
        .collect();

    let expenses_delta = current.total_expenses - previous.total_expenses;
    figures.push(DeltaFigure {
        label: "Total Expenses".to_string(),
        delta: expenses_delta,
        trend: Trend::of(expenses_delta),
    });

    if let (Some(current_balance), Some(previous_balance)) = (current.balance, previous.balance) {
        let balance_delta = current_balance - previous_balance;
        figures.push(DeltaFigure {
            label: "Balance".to_string(),
            delta: balance_delta,
            trend: Trend::of(balance_delta),
        });
    }

    Comparison { previous, figures }
}

fn previous_total(previous: &PeriodFigures, kind: TransactionType) -> f64 {
    previous
        .totals
        .iter()
        .find(|entry| entry.kind == kind)
        .map_or(0.0, |entry| entry.total)
}

/// Formats an amount for report output, e.g. `$45.50`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Formats a signed delta with its trend arrow, e.g. `+$100.00 ↑`.
#[must_use]
pub fn format_delta(figure: &DeltaFigure) -> String {
    let signed = if figure.delta < 0.0 {
        format!("-${:.2}", figure.delta.abs())
    } else {
        format!("+${:.2}", figure.delta)
    };
    format!("{signed} {}", figure.trend.arrow())
}

/// Renders a summary outcome as the chat reply.
#[must_use]
pub fn format_outcome(outcome: &SummaryOutcome) -> String {
    match outcome {
        SummaryOutcome::Empty { period } => {
            format!("📭 No transactions found for {}.", period.label())
        }
        SummaryOutcome::Report(report) => format_report(report),
    }
}

fn format_report(report: &SummaryReport) -> String {
    let current = &report.current;
    let mut lines = vec![format!("📊 **Summary — {}**", current.period.label()), String::new()];

    for entry in &current.totals {
        lines.push(format!("{}: {}", entry.kind, format_amount(entry.total)));
    }
    lines.push(String::new());
    lines.push(format!(
        "💸 Total Expenses: {}",
        format_amount(current.total_expenses)
    ));
    if let Some(balance) = current.balance {
        lines.push(format!("💰 Balance: {}", format_amount(balance)));
    }

    if !current.breakdown.is_empty() {
        lines.push(String::new());
        lines.push("**Breakdown**".to_string());
        for kind in TransactionType::ALL {
            let rows: Vec<&CategoryTotal> = current
                .breakdown
                .iter()
                .filter(|row| row.kind == kind)
                .collect();
            if rows.is_empty() {
                continue;
            }
            lines.push(format!("_{kind}_"));
            for row in rows {
                lines.push(format!("  {}: {}", row.category, format_amount(row.total)));
            }
        }
    }

    if let Some(comparison) = &report.comparison {
        lines.push(String::new());
        lines.push(format!("**vs {}**", comparison.previous.period.label()));
        for figure in &comparison.figures {
            lines.push(format!("{}: {}", figure.label, format_delta(figure)));
        }
    }

    lines.join("\n")
}
