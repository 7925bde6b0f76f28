//! Discord event handlers
//!
//! This module routes non-command messages into the dialog engine: wizard
//! step inputs while a session is active, free-text quick entry otherwise.

/// Plain message handling (wizard steps and quick entry)
pub mod messages;

pub use messages::handle_event;
