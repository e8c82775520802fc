//! Tag reader adapters.
//!
//! A [`TagReader`] turns some external source of NFC events into a stream of
//! [`ReaderEvent`]s on a bounded `mpsc` channel.  The dispatch loop in
//! `main.rs` drains that single channel, so events from every connection are
//! handled one at a time in arrival order.
//!
//! Sources are configured as strings:
//!
//! ```text
//! fifo:/run/user/1000/tapkey.feed   named pipe (or plain file) of JSON lines
//! tcp:127.0.0.1:24900               local listener accepting JSON-line feeds
//! ```
//!
//! The line format is described in [`feed`].

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use tapkey_core::ReaderEvent;
use thiserror::Error;
use tokio::sync::mpsc;

pub mod feed;
pub mod mock;

pub use feed::{FifoFeedReader, TcpFeedReader};
pub use mock::ScriptedReader;

/// Capacity of the event queue between a reader and the dispatch loop.
pub const EVENT_QUEUE_CAPACITY: usize = 64;

/// Error type for starting a reader.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The feed path does not exist or cannot be inspected.
    #[error("cannot open reader feed {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TCP listener could not be bound.
    #[error("cannot listen for reader feeds on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Produces tag events for the dispatch loop.
#[async_trait]
pub trait TagReader: Send + Sync {
    /// Starts producing events.
    ///
    /// The returned receiver yields `None` once the source is exhausted.
    async fn start(&self) -> Result<mpsc::Receiver<ReaderEvent>, ReaderError>;
}

/// A configured reader source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderSource {
    Fifo(PathBuf),
    Tcp(SocketAddr),
}

impl FromStr for ReaderSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(path) = s.strip_prefix("fifo:") {
            if path.is_empty() {
                return Err("fifo: source needs a path".to_string());
            }
            return Ok(Self::Fifo(PathBuf::from(path)));
        }
        if let Some(addr) = s.strip_prefix("tcp:") {
            return addr
                .parse()
                .map(Self::Tcp)
                .map_err(|e| format!("invalid tcp address {addr:?}: {e}"));
        }
        Err(format!("unknown reader source {s:?}; expected fifo:<path> or tcp:<addr>"))
    }
}

impl fmt::Display for ReaderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fifo(path) => write!(f, "fifo:{}", path.display()),
            Self::Tcp(addr) => write!(f, "tcp:{addr}"),
        }
    }
}

/// Builds the reader for `source`.
pub fn for_source(source: &ReaderSource) -> Box<dyn TagReader> {
    match source {
        ReaderSource::Fifo(path) => Box::new(FifoFeedReader::new(path.clone())),
        ReaderSource::Tcp(addr) => Box::new(TcpFeedReader::new(*addr)),
    }
}
