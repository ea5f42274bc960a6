//! Log subscriber setup for the binary.
//!
//! Records go to stderr because stdout is the event stream when the console
//! is the destination.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive for a `--verbose` level.
///
/// 0 keeps warnings and errors, 1 adds drop notices, malformed-line notices
/// and connection attempts, 2 and above adds debug records.
pub fn default_filter(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    format!("riemann_bridge={level}")
}

/// Install the global subscriber. `RUST_LOG` wins over `default_filter` when
/// it parses; `log_json` switches the stderr format to one JSON object per
/// record.
pub fn init_tracing(default_filter: &str, log_json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let stderr = fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry.with(stderr.json()).init();
    } else {
        registry.with(stderr).init();
    }
}
