//! Structured logging configuration.
//!
//! Records from the engine's `log` macros are bridged into the same
//! subscriber, so one filter controls both.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when none is configured
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=warn";

/// Initialize structured logging with the given filter directives
///
/// Falls back to [`DEFAULT_LOG_FILTER`] when `filter` can't be parsed.
///
/// # Example
///
/// ```no_run
/// use ld_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init("debug");
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid log filter {filter:?}: {e}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::warn!("Logging already initialized");
        return;
    }

    tracing::info!("Structured logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init("not a [valid filter");
        init(DEFAULT_LOG_FILTER);
    }
}
