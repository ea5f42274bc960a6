//! Console transport: newline-delimited JSON on local streams.
//!
//! The source reads one JSON object per line, skipping blank and malformed
//! lines and stamping a `time` field when it is missing. The sink writes one
//! event per line and flushes after each.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::event;
use crate::pipe::{PipeReceiver, PipeSender};
use crate::piper::{Sink, Source};

/// Address naming the local console in both directions.
pub const CONSOLE: &str = "-";

/// Reads events from a line-oriented stream.
pub struct ConsoleSource<R> {
    reader: R,
}

impl ConsoleSource<Stdin> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

impl<R> ConsoleSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }

    async fn produce(self, mut pipe: PipeSender) {
        let mut reader = BufReader::new(self.reader);
        let mut line = Vec::new();

        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!(source = CONSOLE, error = %err, "console read failed");
                    pipe.set_error(TransportError::read(CONSOLE, err));
                    break;
                }
            }

            let event = match event::reshape_line(&line) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(err) => {
                    info!(source = CONSOLE, error = %err, "skipping malformed event");
                    continue;
                }
            };

            if !super::forward(&mut pipe, CONSOLE, event).await {
                break;
            }
        }

        debug!(source = CONSOLE, "console reader finished");
        pipe.close();
    }
}

impl<R> Source for ConsoleSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    fn name(&self) -> &str {
        CONSOLE
    }

    fn as_reader(self: Box<Self>, pipe: PipeSender) -> JoinHandle<()> {
        tokio::spawn(self.produce(pipe))
    }
}

/// Writes events to a line-oriented stream.
pub struct ConsoleSink<W> {
    writer: W,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> ConsoleSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write every event from `pipe` until it ends.
    pub async fn drain(&mut self, pipe: &mut PipeReceiver) -> Result<(), TransportError> {
        while pipe.recv().await {
            self.write_line(pipe.bytes())
                .await
                .map_err(|err| TransportError::write(CONSOLE, err))?;
        }

        pipe.error().map_or(Ok(()), Err)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    async fn write_line(&mut self, event: &[u8]) -> std::io::Result<()> {
        self.writer.write_all(event).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
}

#[async_trait]
impl<W> Sink for ConsoleSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &str {
        CONSOLE
    }

    async fn as_writer(mut self: Box<Self>, pipe: &mut PipeReceiver) -> Result<(), TransportError> {
        self.drain(pipe).await
    }
}
