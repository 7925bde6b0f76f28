//! Discord command implementations organized by category.

/// Guided entry commands (`add`, `cancel`)
pub mod entry;

/// General utility commands (`help`, `ping`)
pub mod general;

/// Reporting commands (`summary`, `categories`)
pub mod summary;

// Export commands
pub use entry::*;
pub use general::*;
pub use summary::*;
