//! Capability contract between transports and the pipe.
//!
//! A transport that can produce events implements [`Source`]; one that can
//! forward them implements [`Sink`]. A bidirectional transport implements
//! both. Whether a transport supports a direction is decided when the driver
//! resolves addresses, never at run time.

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::error::TransportError;
use crate::pipe::{PipeReceiver, PipeSender};

/// Reader side: produces events into a pipe.
pub trait Source: Send {
    /// Address or label used in diagnostics.
    fn name(&self) -> &str;

    /// Start the background production loop.
    ///
    /// The loop closes `pipe` when it ends and latches an error first if the
    /// transport failed. The returned handle may be ignored.
    fn as_reader(self: Box<Self>, pipe: PipeSender) -> JoinHandle<()>;
}

/// Writer side: forwards events drained from a pipe.
#[async_trait]
pub trait Sink: Send {
    /// Address or label used in diagnostics.
    fn name(&self) -> &str;

    /// Drain `pipe` until it ends, forwarding every event. The driver keeps
    /// the receiver so it can read the pipe's termination afterwards.
    ///
    /// Returns the pipe's latched error, or this sink's own write error if
    /// the destination failed first.
    async fn as_writer(self: Box<Self>, pipe: &mut PipeReceiver) -> Result<(), TransportError>;
}
