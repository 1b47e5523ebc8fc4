//! Logging setup
//!
//! Installs a global `tracing` subscriber. `RUST_LOG` takes precedence over
//! the configured directive.

use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset, e.g. `"leaprust=info"`
    pub default_directive: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    pub with_thread_names: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            default_directive: "info".to_string(),
            json: false,
            with_thread_names: true,
        }
    }
}

/// Install the global subscriber.
///
/// Returns false if one was already installed.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(config.with_thread_names);

    if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
