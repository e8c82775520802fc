//! JSON-lines tag feed.
//!
//! A reader bridge (for example a small libnfc or pcscd script) writes one
//! JSON object per line:
//!
//! ```text
//! {"event":"present","reader":"ACR122U","type":"TAG_ISO_14443_3","uid":"04a224b2"}
//! {"event":"present","reader":"ACR122U","type":"TAG_ISO_14443_4","data":"d2760000850101 90 00"}
//! {"event":"removed","reader":"ACR122U","type":"TAG_ISO_14443_3","uid":"04a224b2"}
//! ```
//!
//! `uid` and `data` are hex strings; `:`, `-` and whitespace between digits
//! are ignored.  Blank lines and lines starting with `#` are skipped.  A line
//! that fails to parse is logged and skipped; the feed keeps going.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use tapkey_core::{RawTagEvent, ReaderEvent};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{ReaderError, TagReader, EVENT_QUEUE_CAPACITY};

/// Why a feed line was rejected.
#[derive(Debug, Error)]
pub enum FeedLineError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid hex in {field}: {value:?}")]
    Hex { field: &'static str, value: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FeedEventKind {
    Present,
    Removed,
}

#[derive(Debug, Deserialize)]
struct FeedLine {
    event: FeedEventKind,
    #[serde(default)]
    reader: String,
    #[serde(rename = "type", default)]
    tag_type: String,
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

/// Parses one feed line.  Blank and `#` comment lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ReaderEvent>, FeedLineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let parsed: FeedLine = serde_json::from_str(line)?;
    let raw = RawTagEvent {
        reader: parsed.reader,
        tag_type: parsed.tag_type,
        uid: parsed.uid.as_deref().map(|v| decode_hex("uid", v)).transpose()?,
        data: parsed.data.as_deref().map(|v| decode_hex("data", v)).transpose()?,
    };

    Ok(Some(match parsed.event {
        FeedEventKind::Present => ReaderEvent::TagPresent(raw),
        FeedEventKind::Removed => ReaderEvent::TagRemoved(raw),
    }))
}

fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, FeedLineError> {
    let bad = || FeedLineError::Hex {
        field,
        value: value.to_string(),
    };

    let digits: Vec<u8> = value
        .bytes()
        .filter(|b| !matches!(b, b':' | b'-') && !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(bad());
    }

    digits
        .chunks(2)
        .map(|pair| -> Result<u8, FeedLineError> {
            let hi = (pair[0] as char).to_digit(16).ok_or_else(bad)?;
            let lo = (pair[1] as char).to_digit(16).ok_or_else(bad)?;
            Ok((hi * 16 + lo) as u8)
        })
        .collect()
}

/// Forwards every parsable line of `input` to `tx` until EOF.
///
/// Returns `Ok(false)` if the receiving side has gone away.
pub async fn pump_lines<R>(
    input: R,
    origin: &str,
    tx: &mpsc::Sender<ReaderEvent>,
) -> io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Some(event)) => {
                if tx.send(event).await.is_err() {
                    return Ok(false);
                }
            }
            Ok(None) => {}
            Err(e) => warn!(origin, "skipping feed line: {e}"),
        }
    }
    Ok(true)
}

// ── FIFO / file source ────────────────────────────────────────────────────────

/// Reads JSON lines from a named pipe or regular file.
///
/// A FIFO is reopened whenever its writer disconnects, so the bridge process
/// can be restarted without restarting tapkey.  A regular file is read once.
#[derive(Debug, Clone)]
pub struct FifoFeedReader {
    path: PathBuf,
}

impl FifoFeedReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(unix)]
fn is_fifo(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::FileTypeExt;
    meta.file_type().is_fifo()
}

#[cfg(not(unix))]
fn is_fifo(_meta: &std::fs::Metadata) -> bool {
    false
}

#[async_trait]
impl TagReader for FifoFeedReader {
    async fn start(&self) -> Result<mpsc::Receiver<ReaderEvent>, ReaderError> {
        let meta = tokio::fs::metadata(&self.path)
            .await
            .map_err(|source| ReaderError::Open {
                path: self.path.clone(),
                source,
            })?;
        let reopen = is_fifo(&meta);

        let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        let path = self.path.clone();
        info!(path = %path.display(), fifo = reopen, "reading tag feed");

        tokio::spawn(async move {
            let origin = path.display().to_string();
            loop {
                // Opening a FIFO waits until a writer connects.
                let file = match tokio::fs::File::open(&path).await {
                    Ok(file) => file,
                    Err(e) => {
                        warn!(path = %origin, "tag feed closed: {e}");
                        return;
                    }
                };
                match pump_lines(BufReader::new(file), &origin, &tx).await {
                    Ok(true) => debug!(path = %origin, "feed writer disconnected"),
                    Ok(false) => return,
                    Err(e) => warn!(path = %origin, "feed read error: {e}"),
                }
                if !reopen {
                    info!(path = %origin, "tag feed exhausted");
                    return;
                }
            }
        });

        Ok(rx)
    }
}

// ── TCP source ────────────────────────────────────────────────────────────────

/// Accepts any number of local connections, each streaming JSON lines.
#[derive(Debug, Clone, Copy)]
pub struct TcpFeedReader {
    addr: SocketAddr,
}

impl TcpFeedReader {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }
}

#[async_trait]
impl TagReader for TcpFeedReader {
    async fn start(&self) -> Result<mpsc::Receiver<ReaderEvent>, ReaderError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ReaderError::Bind {
                addr: self.addr,
                source,
            })?;
        let local = listener.local_addr().unwrap_or(self.addr);
        info!(addr = %local, "listening for tag feeds");

        let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        tokio::spawn(async move {
            loop {
                let (stream, peer) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("accept failed: {e}");
                        continue;
                    }
                };
                if tx.is_closed() {
                    return;
                }
                info!(%peer, "tag feed connected");
                let tx = tx.clone();
                tokio::spawn(async move {
                    let origin = peer.to_string();
                    match pump_lines(BufReader::new(stream), &origin, &tx).await {
                        Ok(_) => info!(%peer, "tag feed disconnected"),
                        Err(e) => warn!(%peer, "tag feed error: {e}"),
                    }
                });
            }
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;

    use super::*;

    fn present(event: Option<ReaderEvent>) -> RawTagEvent {
        match event {
            Some(ReaderEvent::TagPresent(raw)) => raw,
            other => panic!("expected TagPresent, got {other:?}"),
        }
    }

    // ── parse_line ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_present_line_with_uid() {
        // Arrange
        let line =
            r#"{"event":"present","reader":"ACR122U","type":"TAG_ISO_14443_3","uid":"04a224b2"}"#;

        // Act
        let raw = present(parse_line(line).unwrap());

        // Assert
        assert_eq!(raw.reader, "ACR122U");
        assert_eq!(raw.tag_type, "TAG_ISO_14443_3");
        assert_eq!(raw.uid, Some(vec![0x04, 0xA2, 0x24, 0xB2]));
        assert_eq!(raw.data, None);
    }

    #[test]
    fn test_parse_data_tolerates_separators() {
        let line = r#"{"event":"present","type":"TAG_ISO_14443_4","data":"d2:76-00 00 90 00"}"#;

        let raw = present(parse_line(line).unwrap());

        assert_eq!(raw.data, Some(vec![0xD2, 0x76, 0x00, 0x00, 0x90, 0x00]));
        assert_eq!(raw.reader, "");
    }

    #[test]
    fn test_parse_removed_line() {
        let line = r#"{"event":"removed","reader":"r","type":"t","uid":"01"}"#;
        assert!(matches!(
            parse_line(line).unwrap(),
            Some(ReaderEvent::TagRemoved(_))
        ));
    }

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("# bridge started").unwrap().is_none());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(parse_line("not json"), Err(FeedLineError::Json(_))));
        assert!(matches!(
            parse_line(r#"{"event":"wave"}"#),
            Err(FeedLineError::Json(_))
        ));
        assert!(matches!(
            parse_line(r#"{"event":"present","uid":"04a"}"#),
            Err(FeedLineError::Hex { field: "uid", .. })
        ));
        assert!(matches!(
            parse_line(r#"{"event":"present","data":"zz"}"#),
            Err(FeedLineError::Hex { field: "data", .. })
        ));
    }

    // ── pump_lines ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_pump_lines_skips_malformed_lines_and_keeps_order() {
        // Arrange
        let input = tokio_test::io::Builder::new()
            .read(b"{\"event\":\"present\",\"uid\":\"aa\"}\n")
            .read(b"garbage\n{\"event\":\"removed\",\"uid\":\"aa\"}\n")
            .read(b"{\"event\":\"present\",\"uid\":\"bb\"}")
            .build();
        let (tx, mut rx) = mpsc::channel(8);

        // Act
        let open = pump_lines(BufReader::new(input), "test", &tx).await.unwrap();
        drop(tx);

        // Assert
        assert!(open);
        assert_eq!(present(rx.recv().await).uid, Some(vec![0xAA]));
        assert!(matches!(rx.recv().await, Some(ReaderEvent::TagRemoved(_))));
        assert_eq!(present(rx.recv().await).uid, Some(vec![0xBB]));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_pump_lines_stops_when_receiver_dropped() {
        let input = tokio_test::io::Builder::new()
            .read(b"{\"event\":\"present\",\"uid\":\"aa\"}\n")
            .build();
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let open = pump_lines(BufReader::new(input), "test", &tx).await.unwrap();

        assert!(!open);
    }

    // ── adapters ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_fifo_reader_missing_path_fails_at_start() {
        let reader = FifoFeedReader::new("/nonexistent/tapkey/feed");
        assert!(matches!(
            reader.start().await,
            Err(ReaderError::Open { .. })
        ));
    }

    #[tokio::test]
    async fn test_fifo_reader_reads_regular_file_once() {
        // Arrange
        let path = std::env::temp_dir().join(format!("tapkey_feed_{}.jsonl", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "{\"event\":\"present\",\"uid\":\"04a224b2\"}\n{\"event\":\"present\",\"uid\":\"01\"}\n",
        )
        .unwrap();

        // Act
        let mut rx = FifoFeedReader::new(&path).start().await.unwrap();

        // Assert
        assert_eq!(present(rx.recv().await).uid, Some(vec![0x04, 0xA2, 0x24, 0xB2]));
        assert_eq!(present(rx.recv().await).uid, Some(vec![0x01]));
        assert!(rx.recv().await.is_none(), "a regular file is read once");

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_tcp_reader_merges_connections_into_one_queue() {
        // Arrange: bind to an ephemeral port first to learn a free address
        let probe = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = probe.local_addr().unwrap();
        drop(probe);
        let mut rx = TcpFeedReader::new(addr).start().await.unwrap();

        // Act
        let mut conn = TcpStream::connect(addr).await.unwrap();
        conn.write_all(b"{\"event\":\"present\",\"uid\":\"cafe\"}\n")
            .await
            .unwrap();
        conn.shutdown().await.unwrap();

        // Assert
        assert_eq!(present(rx.recv().await).uid, Some(vec![0xCA, 0xFE]));
    }

    #[tokio::test]
    async fn test_tcp_reader_bind_conflict_fails_at_start() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let result = TcpFeedReader::new(addr).start().await;

        assert!(matches!(result, Err(ReaderError::Bind { .. })));
    }
}
