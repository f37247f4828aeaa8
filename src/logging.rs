//! Diagnostic logging to stderr.
//!
//! Stdout carries the report, so logs only ever go to stderr and stay off
//! unless a filter is configured.

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "off";

/// Resolve the filter directive: explicit config first, then `RUST_LOG`.
pub fn filter_directive(configured: Option<&str>) -> String {
    if let Some(directive) = configured {
        return directive.to_string();
    }
    match std::env::var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => value,
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(configured: Option<&str>) {
    let directive = filter_directive(configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();
}
