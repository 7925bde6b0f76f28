//! Runtime settings loaded from environment variables.
//!
//! Every knob has a default that works out of the box; a missing variable
//! is normal, a malformed one is logged and replaced by the default rather
//! than aborting startup.

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Tunable runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the taxonomy seed file (`TAXONOMY_CONFIG_PATH`)
    pub taxonomy_path: String,
    /// Settle-wait read budget per selector write (`SETTLE_READS`)
    pub settle_reads: u32,
    /// Fixed delay between settle-wait reads (`SETTLE_DELAY_MS`)
    pub settle_delay_ms: u64,
    /// Idle wizard sessions older than this are evicted
    /// (`SESSION_TTL_MINUTES`)
    pub session_ttl_minutes: u64,
    /// Reject quick-entry categories missing from the taxonomy
    /// (`STRICT_CATEGORIES`)
    pub strict_categories: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            taxonomy_path: "config.toml".to_string(),
            settle_reads: 5,
            settle_delay_ms: 400,
            session_ttl_minutes: 30,
            strict_categories: false,
        }
    }
}

impl Settings {
    /// Loads settings from the environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            taxonomy_path: std::env::var("TAXONOMY_CONFIG_PATH")
                .unwrap_or(defaults.taxonomy_path),
            settle_reads: env_parse("SETTLE_READS", defaults.settle_reads),
            settle_delay_ms: env_parse("SETTLE_DELAY_MS", defaults.settle_delay_ms),
            session_ttl_minutes: env_parse("SESSION_TTL_MINUTES", defaults.session_ttl_minutes),
            strict_categories: env_parse("STRICT_CATEGORIES", defaults.strict_categories),
        }
    }

    /// The settle-wait delay as a [`Duration`].
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// The session idle TTL as a [`Duration`].
    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_minutes * 60)
    }
}

/// Parses an environment variable, keeping the default (and logging) when
/// the value doesn't parse. A missing variable is silently the default.
fn env_parse<T: FromStr + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!(%name, %value, "ignoring unparsable environment variable");
            default
        }),
        Err(_) => default,
    }
}
