//! riemann-bridge Core Library
//!
//! Shared functionality for the bridge:
//! - Bounded event pipe with a drop-newest overflow policy
//! - The `Source`/`Sink` capability contract implemented by transports
//! - Console, WebSocket and SSE transport adapters
//! - Event reshaping and common error types

pub mod error;
pub mod event;
pub mod pipe;
pub mod piper;
pub mod tracing_init;
pub mod transport;

pub use error::{Error, Result, TransportError};
pub use pipe::{Delivery, Pipe, PipeReceiver, PipeSender, SendOutcome, Termination};
pub use piper::{Sink, Source};
