//! riemann-bridge CLI Library
//!
//! Argument parsing, address resolution and the driver that wires a source
//! to a sink through a bounded pipe.

pub mod args;
pub mod bridge;
pub mod endpoint;

pub use args::Args;
pub use bridge::{BridgeConfig, ExitStatus, run, run_bridge};
pub use endpoint::Endpoint;
