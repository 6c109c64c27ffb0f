//! Diagnostic logging to stderr.
//!
//! User-facing output goes through [`crate::ui`]; this only carries
//! `tracing` events, quiet unless `--verbose` or `RUST_LOG` asks for more.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LEVEL: &str = "warn";
pub const VERBOSE_LEVEL: &str = "debug";

/// Filter directive: `RUST_LOG` wins, then `--verbose`, then the default
pub fn filter_directive(verbose: bool, rust_log: Option<String>) -> String {
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ if verbose => VERBOSE_LEVEL.to_string(),
        _ => DEFAULT_LEVEL.to_string(),
    }
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init_logging(verbose: bool) {
    let directive = filter_directive(verbose, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
