//! Tracing initialisation.
//!
//! Diagnostic logs go to stderr through `tracing`; operator-facing progress
//! goes through [`crate::report`]. `RUST_LOG` overrides the level chosen from
//! the command line.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Default level: warnings only, or debug with `--verbose`.
pub fn level_for(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::WARN }
}

/// Initialise the global tracing subscriber.
///
/// Safe to call multiple times; only the first call takes effect.
pub fn init_tracing(level: Level, color: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(color)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}
