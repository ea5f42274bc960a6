//! Address resolution.
//!
//! `-` is the local console. `ws://` and `wss://` name a push feed usable in
//! both directions; `http://` and `https://` name a pull feed that can only
//! be read. A source URL's query string is replaced by the subscription
//! query, a destination URL is used as given.

use reqwest::Url;

use riemann_bridge_core::transport::console::CONSOLE;
use riemann_bridge_core::transport::{ConsoleSink, ConsoleSource, PullFeed, PushFeed};
use riemann_bridge_core::{Error, Result, Sink, Source};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Console,
    PushFeed(Url),
    PullFeed(Url),
}

impl Endpoint {
    /// Resolve a source address, attaching `query` as the subscription filter.
    pub fn parse_source(addr: &str, query: &str) -> Result<Self> {
        let mut endpoint = Self::parse(addr)?;
        match &mut endpoint {
            Self::Console => {}
            Self::PushFeed(url) => {
                url.query_pairs_mut()
                    .clear()
                    .append_pair("subscribe", "true")
                    .append_pair("query", query);
            }
            Self::PullFeed(url) => {
                url.query_pairs_mut().clear().append_pair("query", query);
            }
        }
        Ok(endpoint)
    }

    pub fn parse_destination(addr: &str) -> Result<Self> {
        let endpoint = Self::parse(addr)?;
        if matches!(endpoint, Self::PullFeed(_)) {
            return Err(Error::UnsupportedRole {
                addr: addr.to_string(),
                transport: "sse",
                role: "destination",
            });
        }
        Ok(endpoint)
    }

    fn parse(addr: &str) -> Result<Self> {
        if addr == CONSOLE {
            return Ok(Self::Console);
        }

        let url = Url::parse(addr).map_err(|err| Error::InvalidAddress {
            addr: addr.to_string(),
            reason: err.to_string(),
        })?;
        match url.scheme() {
            "ws" | "wss" => Ok(Self::PushFeed(url)),
            "http" | "https" => Ok(Self::PullFeed(url)),
            _ => Err(Error::UnsupportedProtocol {
                addr: addr.to_string(),
            }),
        }
    }

    /// Address as shown in diagnostics.
    pub fn addr(&self) -> &str {
        match self {
            Self::Console => CONSOLE,
            Self::PushFeed(url) | Self::PullFeed(url) => url.as_str(),
        }
    }

    pub fn into_source(self) -> Box<dyn Source> {
        match self {
            Self::Console => Box::new(ConsoleSource::stdin()),
            Self::PushFeed(url) => Box::new(PushFeed::new(url)),
            Self::PullFeed(url) => Box::new(PullFeed::new(url)),
        }
    }

    pub fn into_sink(self) -> Result<Box<dyn Sink>> {
        match self {
            Self::Console => Ok(Box::new(ConsoleSink::stdout())),
            Self::PushFeed(url) => Ok(Box::new(PushFeed::new(url))),
            Self::PullFeed(url) => Err(Error::UnsupportedRole {
                addr: url.into(),
                transport: "sse",
                role: "destination",
            }),
        }
    }
}
