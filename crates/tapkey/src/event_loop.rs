//! The dispatch loop: drains the reader queue into the engine.
//!
//! ```text
//! TagReader ──mpsc──> run() ──> DispatchEngine::handle() ──> KeyInjector
//!                      ^
//!                      └── shutdown (watch)
//! ```
//!
//! Events are handled strictly one at a time.  A tag tapped while the
//! operator is answering a prompt waits in the queue and is handled after the
//! prompt resolves.

use tapkey_core::ReaderEvent;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::application::dispatch_tag::{DispatchEngine, DispatchOutcome};
use crate::application::MappingRepository;

/// Per-run counters, logged at shutdown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    /// Presence events that pressed a key.
    pub dispatched: usize,
    /// Presence events the operator declined to assign.
    pub skipped: usize,
    /// Presence events that ended in an error.
    pub failed: usize,
}

/// Why [`run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The reader closed its queue.
    ReaderClosed,
    /// Shutdown was requested.
    Shutdown,
}

/// Feeds `events` to `engine` until the reader closes or `shutdown` flips to
/// `true` (or its sender is dropped).
///
/// The prompt is closed before returning on shutdown.
pub async fn run<S: MappingRepository>(
    engine: &mut DispatchEngine<S>,
    mut events: mpsc::Receiver<ReaderEvent>,
    mut shutdown: watch::Receiver<bool>,
) -> (StopReason, LoopStats) {
    let mut stats = LoopStats::default();

    let reason = loop {
        if *shutdown.borrow() {
            break StopReason::Shutdown;
        }
        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break StopReason::Shutdown;
                }
            }

            event = events.recv() => {
                let Some(event) = event else {
                    break StopReason::ReaderClosed;
                };
                match engine.handle(event).await {
                    Some(Ok(DispatchOutcome::Dispatched { .. })) => stats.dispatched += 1,
                    Some(Ok(DispatchOutcome::Skipped { .. })) => stats.skipped += 1,
                    Some(Err(_)) => stats.failed += 1,
                    None => {}
                }
            }
        }
    };

    match reason {
        StopReason::Shutdown => {
            engine.close_prompt();
            debug!("dispatch loop stopped by shutdown");
        }
        StopReason::ReaderClosed => info!("tag reader closed"),
    }
    (reason, stats)
}
