//! Bridge driver: one reader, one pipe, one writer.

use tracing::{error, info, warn};

use riemann_bridge_core::{Pipe, Result, Sink, Source, Termination, TransportError};

use crate::endpoint::Endpoint;

/// Process exit status reported by the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// End of input or the forwarding limit was reached.
    Success,
    /// Bad arguments or addresses; nothing was opened.
    Config,
    /// A transport failed while running.
    Runtime,
}

impl ExitStatus {
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Config => 1,
            Self::Runtime => 111,
        }
    }
}

/// Everything needed to run one bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub source: String,
    pub destination: String,
    pub query: String,
    /// Pending event capacity; 0 is unbuffered.
    pub buffer_size: usize,
    /// Events to forward before stopping; 0 is unbounded.
    pub number: u64,
}

impl BridgeConfig {
    /// Resolve both addresses. Nothing is opened until both are valid.
    pub fn endpoints(&self) -> Result<(Box<dyn Source>, Box<dyn Sink>)> {
        let source = Endpoint::parse_source(&self.source, &self.query)?;
        let destination = Endpoint::parse_destination(&self.destination)?;
        Ok((source.into_source(), destination.into_sink()?))
    }
}

/// Run `source` into `sink` through `pipe` until the pipe ends or either side
/// fails.
///
/// On success the reader task is joined and the termination returned. On
/// failure the reader is aborted.
pub async fn run_bridge(
    source: Box<dyn Source>,
    sink: Box<dyn Sink>,
    pipe: Pipe,
) -> std::result::Result<Termination, TransportError> {
    info!(
        source = source.name(),
        destination = sink.name(),
        "starting bridge"
    );
    let (tx, mut rx) = pipe.split();
    let reader = source.as_reader(tx);

    if let Err(err) = sink.as_writer(&mut rx).await {
        reader.abort();
        return Err(err);
    }

    if let Err(err) = reader.await {
        warn!(error = %err, "reader task did not finish cleanly");
    }

    match rx.termination() {
        Termination::Failed(err) => Err(err),
        termination => Ok(termination),
    }
}

/// Resolve `config`, run the bridge and map the outcome to an exit status.
pub async fn run(config: BridgeConfig) -> ExitStatus {
    let (source, sink) = match config.endpoints() {
        Ok(endpoints) => endpoints,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitStatus::Config;
        }
    };

    let pipe = Pipe::new(config.buffer_size, config.number);
    match run_bridge(source, sink, pipe).await {
        Ok(termination) => {
            info!(?termination, "bridge finished");
            ExitStatus::Success
        }
        Err(err) => {
            error!(error = %err, "bridge failed");
            ExitStatus::Runtime
        }
    }
}
