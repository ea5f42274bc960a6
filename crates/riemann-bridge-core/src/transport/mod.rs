//! Transport adapters.
//!
//! - [`console`]: newline-delimited JSON on local streams, both directions
//! - [`push_feed`]: WebSocket subscription, both directions
//! - [`pull_feed`]: Server-Sent Events subscription, source only

pub mod console;
pub mod pull_feed;
pub mod push_feed;

pub use console::{ConsoleSink, ConsoleSource};
pub use pull_feed::PullFeed;
pub use push_feed::PushFeed;

use tracing::{Level, debug, info};

use crate::event::Event;
use crate::pipe::{Delivery, PipeSender, SendOutcome};

/// Send one event and log a drop notice. Returns `false` when the reader
/// loop should stop.
pub(crate) async fn forward(pipe: &mut PipeSender, source: &str, event: Event) -> bool {
    let shown = tracing::enabled!(Level::INFO).then(|| String::from_utf8_lossy(&event).into_owned());

    let outcome = pipe.send(event).await;
    if outcome.delivery().is_some_and(Delivery::is_dropped) {
        info!(
            source,
            event = shown.as_deref().unwrap_or_default(),
            "dropping event"
        );
    }

    match outcome {
        SendOutcome::Ok(_) => true,
        SendOutcome::EndOfStream(_) => {
            debug!(source, "send limit reached");
            false
        }
        SendOutcome::Closed => {
            debug!(source, "writer gone; stopping reader");
            false
        }
    }
}

/// Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider,
/// tungstenite builds its rustls config from the process default).
/// The `Err` case just means it was already installed.
pub(crate) fn ensure_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}
