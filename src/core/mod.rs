//! Core business logic.
//!
//! Everything in this module is framework-agnostic: the dialog engine, the
//! wizard state machine, the free-text parser, and the summary orchestrator
//! know nothing about Discord. The bot layer forwards user identity plus
//! message text in and relays reply text out.

/// Date token resolution (Today/Yesterday, DD/MM, DD/MM/YYYY, ISO)
pub mod dates;
/// Dispatch engine - routes commands, wizard steps, and quick entry
pub mod engine;
/// Free-text quick-entry parsing
pub mod quick;
/// Transaction record and type definitions
pub mod record;
/// Per-user conversational session storage
pub mod session;
/// Summary periods, orchestration, and report formatting
pub mod summary;
/// Category taxonomy lookup
pub mod taxonomy;
/// Guided entry wizard state machine
pub mod wizard;

pub use engine::Engine;
pub use record::{TransactionRecord, TransactionType};
pub use taxonomy::CategoryTaxonomy;
