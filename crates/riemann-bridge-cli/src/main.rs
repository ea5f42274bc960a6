//! riemann-bridge
//!
//! Forwards Riemann events from one endpoint to another: stdin/stdout,
//! a WebSocket subscription or a Server-Sent Events subscription.

use clap::Parser;
use tracing::info;

use riemann_bridge_cli::{Args, ExitStatus, run};
use riemann_bridge_core::tracing_init::{default_filter, init_tracing};

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            std::process::exit(ExitStatus::Config.code());
        }
    };

    init_tracing(&default_filter(args.verbose), args.log_json);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting riemann-bridge");

    let status = run(args.config()).await;

    // A blocked stdin read would otherwise hold up runtime shutdown.
    std::process::exit(status.code());
}
