//! Diagnostics
//!
//! The plugin reports through `tracing`. A stderr subscriber is installed
//! when the plugin is created unless the host process already has one.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive
pub const LOG_ENV: &str = "TRACKER_PLUGIN_LOG";

/// Filter used when nothing else is configured
pub const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber.
///
/// The filter is taken from `filter`, then [`LOG_ENV`], then
/// [`DEFAULT_FILTER`]. An unparsable directive falls back to the default.
/// Returns `false` if a global subscriber was already set.
pub fn init(filter: Option<&str>) -> bool {
    let directive = filter
        .map(str::to_owned)
        .or_else(|| std::env::var(LOG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned());

    let env_filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
