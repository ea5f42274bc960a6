//! Error types for the riemann-bridge core library.

use thiserror::Error;

/// Result type alias using the bridge `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration-time errors, detected before any transport is opened.
#[derive(Debug, Error)]
pub enum Error {
    /// Address could not be parsed as `-` or a URL
    #[error("invalid url: {addr}: {reason}")]
    InvalidAddress { addr: String, reason: String },

    /// Scheme is not one of the supported transports
    #[error("{addr}: unsupported protocol")]
    UnsupportedProtocol { addr: String },

    /// Transport exists but cannot act in the requested direction
    #[error("{addr}: {transport} cannot be used as a {role}")]
    UnsupportedRole {
        addr: String,
        transport: &'static str,
        role: &'static str,
    },
}

/// Terminal transport failures, latched in the pipe and surfaced by the writer.
///
/// Payloads are rendered strings so the error can be cloned out of the latch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("{addr}: connect failed: {reason}")]
    Connect { addr: String, reason: String },

    #[error("{addr}: read failed: {reason}")]
    Read { addr: String, reason: String },

    #[error("{addr}: write failed: {reason}")]
    Write { addr: String, reason: String },
}

impl TransportError {
    pub fn connect(addr: impl Into<String>, reason: impl ToString) -> Self {
        Self::Connect {
            addr: addr.into(),
            reason: reason.to_string(),
        }
    }

    pub fn read(addr: impl Into<String>, reason: impl ToString) -> Self {
        Self::Read {
            addr: addr.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write(addr: impl Into<String>, reason: impl ToString) -> Self {
        Self::Write {
            addr: addr.into(),
            reason: reason.to_string(),
        }
    }
}
