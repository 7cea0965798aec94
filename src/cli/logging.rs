//! Logging initialization

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Map a configured level name to a filter directive
///
/// Returns `None` for names that are not recognized.
pub fn level_directive(level: &str) -> Option<&'static str> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level when set. A
/// subscriber that is already installed is kept.
pub fn init_logging(level: &str, format: LogFormat) {
    let directive = level_directive(level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive.unwrap_or("info")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match format {
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
        LogFormat::Text => builder.try_init(),
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }

    if directive.is_none() {
        tracing::warn!(level, "Unknown log level, using info");
    }
}
