//! Bounded hand-off between one reader and one writer.
//!
//! A [`Pipe`] is created by the driver and split into a [`PipeSender`], owned
//! by the reader loop, and a [`PipeReceiver`], drained by the writer loop.
//!
//! Overflow policy: a send into an empty buffer waits for the slot; a send
//! into a non-empty buffer never waits and drops the event when the buffer is
//! full. A consumer that keeps up never loses events, a stalled one only loses
//! the newest ones. Capacity 0 behaves as a single slot.
//!
//! Lifecycle: `Open` until the sender is closed (or dropped), then `Closing`
//! while buffered events remain, then `Drained`. A latched error makes
//! [`PipeReceiver::recv`] return `false` regardless of what is still buffered.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::TransportError;
use crate::event::Event;

/// Whether a sent event made it into the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Accepted,
    Dropped,
}

impl Delivery {
    pub const fn is_dropped(self) -> bool {
        matches!(self, Self::Dropped)
    }
}

/// Result of [`PipeSender::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Keep producing.
    Ok(Delivery),
    /// The send limit was reached with this call; stop producing.
    EndOfStream(Delivery),
    /// The receiver is gone; stop producing.
    Closed,
}

impl SendOutcome {
    /// Delivery of the event, if the receiver was still there to take it.
    pub const fn delivery(self) -> Option<Delivery> {
        match self {
            Self::Ok(delivery) | Self::EndOfStream(delivery) => Some(delivery),
            Self::Closed => None,
        }
    }

    pub const fn is_continue(self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

/// How the pipe ended, as observed by the writer after `recv` returns `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The reader reached the end of its input.
    Eof,
    /// The send limit was reached.
    EndOfStream,
    /// The reader latched a transport error.
    Failed(TransportError),
}

impl Termination {
    pub const fn is_clean(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// State shared by both halves besides the channel itself.
#[derive(Debug, Default)]
struct Latch {
    error: OnceLock<TransportError>,
    end_of_stream: AtomicBool,
}

/// A bounded event pipe, not yet split into its two halves.
#[derive(Debug)]
pub struct Pipe {
    sender: PipeSender,
    receiver: PipeReceiver,
}

impl Pipe {
    /// Create a pipe holding up to `capacity` pending events (at least one)
    /// that reports end-of-stream after `limit` sends (0 is unbounded).
    pub fn new(capacity: usize, limit: u64) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let latch = Arc::new(Latch::default());
        Self {
            sender: PipeSender {
                tx,
                remaining: (limit != 0).then_some(limit),
                latch: Arc::clone(&latch),
            },
            receiver: PipeReceiver {
                rx,
                current: Vec::new(),
                latch,
            },
        }
    }

    pub fn split(self) -> (PipeSender, PipeReceiver) {
        (self.sender, self.receiver)
    }
}

/// Producer half: owns send, close and the error latch.
#[derive(Debug)]
pub struct PipeSender {
    tx: mpsc::Sender<Event>,
    /// Sends left before end-of-stream; `None` when unbounded.
    remaining: Option<u64>,
    latch: Arc<Latch>,
}

impl PipeSender {
    /// Offer one event to the writer.
    ///
    /// After filling an empty buffer the sender yields once, giving a writer
    /// that is already waiting the chance to take the event before the next
    /// offer.
    pub async fn send(&mut self, event: Event) -> SendOutcome {
        let delivery = if self.is_empty() {
            if self.tx.send(event).await.is_err() {
                return SendOutcome::Closed;
            }
            tokio::task::yield_now().await;
            Delivery::Accepted
        } else {
            match self.tx.try_send(event) {
                Ok(()) => Delivery::Accepted,
                Err(TrySendError::Full(_)) => Delivery::Dropped,
                Err(TrySendError::Closed(_)) => return SendOutcome::Closed,
            }
        };

        if self.exceeded() {
            self.latch.end_of_stream.store(true, Ordering::Release);
            return SendOutcome::EndOfStream(delivery);
        }
        SendOutcome::Ok(delivery)
    }

    /// Latch a terminal error for the writer. The first error wins.
    pub fn set_error(&self, err: TransportError) {
        let _ = self.latch.error.set(err);
    }

    /// End production. Already buffered events stay drainable.
    pub fn close(self) {
        drop(self);
    }

    /// Whether the writer has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn is_empty(&self) -> bool {
        self.tx.capacity() == self.tx.max_capacity()
    }

    fn exceeded(&mut self) -> bool {
        match self.remaining.as_mut() {
            None => false,
            Some(n) => {
                *n = n.saturating_sub(1);
                *n == 0
            }
        }
    }
}

/// Consumer half: drains events and observes the terminal condition.
#[derive(Debug)]
pub struct PipeReceiver {
    rx: mpsc::Receiver<Event>,
    current: Event,
    latch: Arc<Latch>,
}

impl PipeReceiver {
    /// Wait for the next event. Returns `false` once the pipe is closed and
    /// drained, or immediately when an error has been latched.
    pub async fn recv(&mut self) -> bool {
        if self.latch.error.get().is_some() {
            return false;
        }

        match self.rx.recv().await {
            Some(event) => {
                self.current = event;
                true
            }
            None => false,
        }
    }

    /// The event returned by the last successful [`recv`](Self::recv).
    pub fn bytes(&self) -> &[u8] {
        &self.current
    }

    pub fn error(&self) -> Option<TransportError> {
        self.latch.error.get().cloned()
    }

    pub fn termination(&self) -> Termination {
        if let Some(err) = self.error() {
            Termination::Failed(err)
        } else if self.latch.end_of_stream.load(Ordering::Acquire) {
            Termination::EndOfStream
        } else {
            Termination::Eof
        }
    }
}
