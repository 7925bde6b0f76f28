/// Runtime settings from environment variables
pub mod settings;

/// Category taxonomy seed loading from config.toml
pub mod taxonomy;

pub use settings::Settings;
