use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::DEFAULT_LOG_LEVEL;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Map a configured level to a known one, ignoring case. Unknown values
/// yield `None`.
fn normalize_level(requested: &str) -> Option<&'static str> {
    let requested = requested.trim();
    LEVELS
        .iter()
        .copied()
        .find(|level| level.eq_ignore_ascii_case(requested))
}

/// Install a stderr subscriber. `requested` is the default level; `RUST_LOG`
/// still overrides it. Stdout stays reserved for the interactive prompts.
pub fn init_logging(requested: &str) {
    let normalized = normalize_level(requested);
    let level = normalized.unwrap_or(DEFAULT_LOG_LEVEL);

    let filter = EnvFilter::builder()
        .with_default_directive(level.parse().unwrap_or_else(|_| LevelFilter::WARN.into()))
        .parse_lossy(std::env::var("RUST_LOG").unwrap_or_default());

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(filter);

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();

    if normalized.is_none() {
        tracing::warn!(
            "Invalid log level '{}', defaulting to '{}'",
            requested,
            DEFAULT_LOG_LEVEL
        );
    }
}
