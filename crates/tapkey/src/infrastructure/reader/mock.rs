//! Scripted reader for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use tapkey_core::ReaderEvent;
use tokio::sync::mpsc;

use super::{ReaderError, TagReader};

/// Replays a fixed list of events, then closes the channel.
///
/// Only the first `start` yields the script; later calls get a closed,
/// empty channel.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    script: Mutex<Vec<ReaderEvent>>,
}

impl ScriptedReader {
    pub fn new(events: Vec<ReaderEvent>) -> Self {
        Self {
            script: Mutex::new(events),
        }
    }
}

#[async_trait]
impl TagReader for ScriptedReader {
    async fn start(&self) -> Result<mpsc::Receiver<ReaderEvent>, ReaderError> {
        let events = self
            .script
            .lock()
            .map(|mut s| std::mem::take(&mut *s))
            .unwrap_or_default();
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            // Capacity equals the script length, so this cannot fill up.
            let _ = tx.try_send(event);
        }
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use tapkey_core::RawTagEvent;

    use super::*;

    #[tokio::test]
    async fn test_scripted_reader_replays_then_closes() {
        let reader = ScriptedReader::new(vec![
            ReaderEvent::TagPresent(RawTagEvent::with_uid("r", "t", vec![1])),
            ReaderEvent::TagRemoved(RawTagEvent::with_uid("r", "t", vec![1])),
        ]);

        let mut rx = reader.start().await.unwrap();

        assert!(matches!(rx.recv().await, Some(ReaderEvent::TagPresent(_))));
        assert!(matches!(rx.recv().await, Some(ReaderEvent::TagRemoved(_))));
        assert!(rx.recv().await.is_none());
        assert!(reader.start().await.unwrap().recv().await.is_none());
    }
}
