//! Server-Sent Events transport (source only).
//!
//! Subscribes with a plain GET and forwards the `data` of every event.

use std::pin::pin;

use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::TransportError;
use crate::pipe::PipeSender;
use crate::piper::Source;

/// One-way SSE subscription.
#[derive(Debug, Clone)]
pub struct PullFeed {
    url: String,
}

impl PullFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    async fn subscribe(&self) -> Result<reqwest::Response, TransportError> {
        super::ensure_crypto_provider();
        info!(url = %self.url, "sse: connecting");

        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| TransportError::connect(&self.url, err))?;

        let response = client
            .get(&self.url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| TransportError::connect(&self.url, err))?;
        debug!(url = %self.url, status = %response.status(), "sse: subscribed");
        Ok(response)
    }

    async fn produce(self: Box<Self>, mut pipe: PipeSender) {
        let response = match self.subscribe().await {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "sse: subscription failed");
                pipe.set_error(err);
                pipe.close();
                return;
            }
        };

        let mut events = pin!(response.bytes_stream().eventsource());
        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(err) => {
                    info!(url = %self.url, error = %err, "sse: read ended");
                    break;
                }
            };

            if !super::forward(&mut pipe, &self.url, event.data.into_bytes()).await {
                break;
            }
        }

        debug!(url = %self.url, "sse reader finished");
        pipe.close();
    }
}

impl Source for PullFeed {
    fn name(&self) -> &str {
        &self.url
    }

    fn as_reader(self: Box<Self>, pipe: PipeSender) -> JoinHandle<()> {
        tokio::spawn(self.produce(pipe))
    }
}
