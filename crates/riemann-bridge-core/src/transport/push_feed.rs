//! WebSocket transport.
//!
//! As a source it dials the subscription URL and forwards every text or
//! binary frame as one event. Any read error, a close frame or the end of the
//! stream ends the reader without latching an error. As a sink it forwards
//! each event as one text frame, or one binary frame when the bytes are not
//! valid UTF-8.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info};

use crate::error::TransportError;
use crate::pipe::{PipeReceiver, PipeSender};
use crate::piper::{Sink, Source};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Bidirectional WebSocket feed.
#[derive(Debug, Clone)]
pub struct PushFeed {
    url: String,
}

impl PushFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    async fn connect(&self) -> Result<WsStream, TransportError> {
        super::ensure_crypto_provider();
        info!(url = %self.url, "ws: connecting");

        let (stream, response) = connect_async(self.url.as_str())
            .await
            .map_err(|err| TransportError::connect(&self.url, err))?;
        debug!(url = %self.url, status = %response.status(), "ws: connected");
        Ok(stream)
    }

    async fn produce(self: Box<Self>, mut pipe: PipeSender) {
        let mut stream = match self.connect().await {
            Ok(stream) => stream,
            Err(err) => {
                error!(error = %err, "ws: subscription failed");
                pipe.set_error(err);
                pipe.close();
                return;
            }
        };

        while let Some(message) = stream.next().await {
            let message = match message {
                Ok(message) => message,
                Err(err) => {
                    info!(url = %self.url, error = %err, "ws: read ended");
                    break;
                }
            };

            let event = match message {
                Message::Text(_) | Message::Binary(_) => message.into_data(),
                Message::Close(frame) => {
                    info!(url = %self.url, ?frame, "ws: closed by peer");
                    break;
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            };

            if !super::forward(&mut pipe, &self.url, event).await {
                break;
            }
        }

        debug!(url = %self.url, "ws reader finished");
        pipe.close();
    }
}

impl Source for PushFeed {
    fn name(&self) -> &str {
        &self.url
    }

    fn as_reader(self: Box<Self>, pipe: PipeSender) -> JoinHandle<()> {
        tokio::spawn(self.produce(pipe))
    }
}

#[async_trait]
impl Sink for PushFeed {
    fn name(&self) -> &str {
        &self.url
    }

    async fn as_writer(self: Box<Self>, pipe: &mut PipeReceiver) -> Result<(), TransportError> {
        let mut stream = self.connect().await?;

        while pipe.recv().await {
            // Payloads that are not UTF-8 go out untouched as binary frames.
            let message = match std::str::from_utf8(pipe.bytes()) {
                Ok(text) => Message::Text(text.to_owned()),
                Err(_) => Message::Binary(pipe.bytes().to_vec()),
            };
            stream
                .send(message)
                .await
                .map_err(|err| TransportError::write(&self.url, err))?;
        }

        if let Err(err) = stream.close(None).await {
            debug!(url = %self.url, error = %err, "ws: close failed");
        }

        pipe.error().map_or(Ok(()), Err)
    }
}
