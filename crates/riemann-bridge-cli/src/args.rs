//! Command-line arguments.

use clap::Parser;

use crate::bridge::BridgeConfig;

/// Subscription filter used when neither `--query` nor the environment sets one.
pub const DEFAULT_QUERY: &str = r#"not (service ~= "^riemann" or state = "expired")"#;

#[derive(Parser, Debug)]
#[command(name = "riemann-bridge")]
#[command(
    version,
    about = "Forward Riemann events between stdio, WebSocket and SSE endpoints",
    long_about = None
)]
pub struct Args {
    /// Where events come from: `-` (stdin), `ws(s)://host:port/index` or
    /// `http(s)://host:port/index`.
    #[arg(env = "RIEMANN_BRIDGE_SRC", default_value = "-")]
    pub source: String,

    /// Where events go: `-` (stdout) or `ws(s)://host:port/events`.
    #[arg(env = "RIEMANN_BRIDGE_DST", default_value = "-")]
    pub destination: String,

    /// Riemann query sent when subscribing to a remote source.
    #[arg(long, env = "RIEMANN_BRIDGE_QUERY", default_value = DEFAULT_QUERY)]
    pub query: String,

    /// Pending events held for a slow destination (0 disables buffering).
    #[arg(long, default_value_t = 0)]
    pub buffer_size: usize,

    /// Forward the first N events and exit (0 forwards forever).
    #[arg(short, long, default_value_t = 0)]
    pub number: u64,

    /// Log verbosity: 1 logs dropped events and connection attempts,
    /// 2 adds debug output.
    #[arg(short, long, default_value_t = 0)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, env = "RIEMANN_BRIDGE_LOG_JSON")]
    pub log_json: bool,
}

impl Args {
    pub fn config(&self) -> BridgeConfig {
        BridgeConfig {
            source: self.source.clone(),
            destination: self.destination.clone(),
            query: self.query.clone(),
            buffer_size: self.buffer_size,
            number: self.number,
        }
    }
}
