//! Logging and tracing initialization.
//!
//! Engine events are emitted under the `zone_tracker` target: `info` for
//! the tracked target and per-frame progress, `debug` for candidate counts
//! and winning scores, `warn` for lost frames. A filter such as
//! `zone_tracker=debug,warn` shows the search details without noise from
//! dependencies. `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Filter from `RUST_LOG`, else the configured level, else `info`.
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Logs go to stderr so the command summaries on stdout stay clean.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = build_filter(config);

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}
