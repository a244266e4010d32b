//! Logging setup for the terminal host.
//!
//! Library crates only emit `tracing` events; this module installs the
//! subscriber. The filter comes from `QUIZ_LOG` (same syntax as `RUST_LOG`) and
//! defaults to `info`. Output goes to stderr so it never mixes with the quiz.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "QUIZ_LOG";

const DEFAULT_FILTER: &str = "info";

/// Builds the filter from `QUIZ_LOG`, falling back to `info` when unset or invalid.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init_logging() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
}
