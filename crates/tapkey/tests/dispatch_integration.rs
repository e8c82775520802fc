//! Integration tests for the tag -> key pipeline.
//!
//! These tests drive the real `TomlMappingStore` on a temporary directory
//! through the public API, with a scripted reader, a scripted prompt and a
//! recording injector standing in for the operator and the OS.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tapkey::application::assign_action::{ActionPrompt, PromptError};
use tapkey::application::dispatch_tag::{
    ActionSource, DispatchEngine, DispatchOutcome, EventError, KeyInjector,
};
use tapkey::application::MappingRepository;
use tapkey::event_loop::{self, LoopStats, StopReason};
use tapkey::infrastructure::key_injection::RecordingInjector;
use tapkey::infrastructure::prompt::ScriptedPrompt;
use tapkey::infrastructure::reader::{ScriptedReader, TagReader};
use tapkey::infrastructure::storage::TomlMappingStore;
use tapkey_core::{ActionRegistry, Platform, RawTagEvent, ReaderEvent, TagIdentifier};
use tokio::sync::{mpsc, watch, Notify};
use uuid::Uuid;

/// Temporary directory removed on drop.
struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("tapkey_it_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn mappings(&self) -> PathBuf {
        self.0.join("mappings.toml")
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

fn tap(uid: &[u8]) -> ReaderEvent {
    ReaderEvent::TagPresent(RawTagEvent::with_uid("ACR122U", "TAG_ISO_14443_3", uid.to_vec()))
}

fn tag(s: &str) -> TagIdentifier {
    TagIdentifier::parse(s).unwrap()
}

const TAG_A: [u8; 4] = [0x04, 0xA2, 0x24, 0xB2];
const TAG_B: [u8; 4] = [0x04, 0xB7, 0xC1, 0x9A];

struct Harness {
    engine: DispatchEngine<TomlMappingStore>,
    prompt: Arc<ScriptedPrompt>,
    injector: Arc<RecordingInjector>,
}

fn harness(path: PathBuf, prompt: ScriptedPrompt, injector: RecordingInjector) -> Harness {
    let prompt = Arc::new(prompt);
    let injector = Arc::new(injector);
    let engine = DispatchEngine::new(
        TomlMappingStore::load(path).unwrap(),
        ActionRegistry::new(Platform::Linux),
        Arc::clone(&prompt) as Arc<dyn ActionPrompt>,
        Arc::clone(&injector) as Arc<dyn KeyInjector>,
    );
    Harness {
        engine,
        prompt,
        injector,
    }
}

/// Prompt whose question stays unanswered until `close` is called, like an
/// operator who walked away from the terminal.
#[derive(Default)]
struct UnansweredPrompt {
    asked: Notify,
    released: Notify,
    closed: AtomicBool,
}

#[async_trait]
impl ActionPrompt for UnansweredPrompt {
    async fn ask(
        &self,
        _tag: &TagIdentifier,
        _choices: &[&'static str],
    ) -> Result<Option<String>, PromptError> {
        self.asked.notify_one();
        if !self.closed.load(Ordering::SeqCst) {
            self.released.notified().await;
        }
        Ok(None)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.released.notify_one();
    }
}

/// Runs `events` through the event loop to completion.
async fn run_all(engine: &mut DispatchEngine<TomlMappingStore>, events: Vec<ReaderEvent>) -> LoopStats {
    let rx = ScriptedReader::new(events).start().await.unwrap();
    let (_stop_tx, stop_rx) = watch::channel(false);
    let (reason, stats) = event_loop::run(engine, rx, stop_rx).await;
    assert_eq!(reason, StopReason::ReaderClosed);
    stats
}

#[tokio::test]
async fn test_first_tap_assigns_persists_and_presses() {
    // Arrange
    let dir = TempDir::new();
    let mut h = harness(
        dir.mappings(),
        ScriptedPrompt::new([Some("right")]),
        RecordingInjector::new(),
    );

    // Act
    let result = h.engine.handle(tap(&TAG_A)).await.unwrap();

    // Assert
    assert_eq!(
        result.unwrap(),
        DispatchOutcome::Dispatched {
            tag: tag("04A224B2"),
            action: tapkey_core::ActionName::normalized("right"),
            source: ActionSource::Assigned { persisted: true },
        }
    );
    assert_eq!(h.injector.pressed_actions(), vec!["right"]);
    let on_disk = std::fs::read_to_string(dir.mappings()).unwrap();
    assert!(on_disk.contains("04A224B2 = \"right\""), "got: {on_disk}");
}

#[tokio::test]
async fn test_mapped_tag_presses_without_prompting_even_after_restart() {
    // Arrange: assign in one "process"
    let dir = TempDir::new();
    {
        let mut first = harness(
            dir.mappings(),
            ScriptedPrompt::new([Some("left")]),
            RecordingInjector::new(),
        );
        first.engine.handle(tap(&TAG_A)).await.unwrap().unwrap();
    }

    // Act: reload from disk and tap twice
    let mut second = harness(
        dir.mappings(),
        ScriptedPrompt::default(),
        RecordingInjector::new(),
    );
    let stats = run_all(&mut second.engine, vec![tap(&TAG_A), tap(&TAG_A)]).await;

    // Assert
    assert_eq!(stats.dispatched, 2);
    assert_eq!(second.prompt.ask_count(), 0);
    assert_eq!(second.injector.pressed_actions(), vec!["left", "left"]);
}

#[tokio::test]
async fn test_unknown_action_name_is_rejected_without_side_effects() {
    // Arrange
    let dir = TempDir::new();
    let mut h = harness(
        dir.mappings(),
        ScriptedPrompt::new([Some("banana")]),
        RecordingInjector::new(),
    );

    // Act
    let result = h.engine.handle(tap(&TAG_A)).await.unwrap();

    // Assert
    assert!(matches!(result, Err(EventError::Validation { ref input, .. }) if input == "banana"));
    assert!(h.engine.store().get(&tag("04A224B2")).is_none());
    assert!(h.injector.pressed_actions().is_empty());
    assert!(TomlMappingStore::load(dir.mappings()).unwrap().is_empty());
}

#[tokio::test]
async fn test_declined_prompt_creates_nothing() {
    let dir = TempDir::new();
    let mut h = harness(
        dir.mappings(),
        ScriptedPrompt::new([Some("")]),
        RecordingInjector::new(),
    );

    let result = h.engine.handle(tap(&TAG_A)).await.unwrap();

    assert_eq!(
        result.unwrap(),
        DispatchOutcome::Skipped {
            tag: tag("04A224B2")
        }
    );
    assert!(h.engine.store().is_empty());
    assert!(h.injector.pressed_actions().is_empty());
}

#[tokio::test]
async fn test_injection_failure_is_reported_and_next_tap_still_handled() {
    // Arrange: the tag is already mapped; every press fails
    let dir = TempDir::new();
    std::fs::write(dir.mappings(), "04A224B2 = \"right\"\n").unwrap();
    let mut h = harness(
        dir.mappings(),
        ScriptedPrompt::new([None::<&str>]),
        RecordingInjector::failing(),
    );

    // Act
    let stats = run_all(&mut h.engine, vec![tap(&TAG_A), tap(&TAG_B)]).await;

    // Assert: first tap failed to press, second was prompted and declined
    assert_eq!(
        stats,
        LoopStats {
            dispatched: 0,
            skipped: 1,
            failed: 1
        }
    );
    assert_eq!(h.prompt.ask_count(), 1);
}

#[tokio::test]
async fn test_tags_queued_behind_a_prompt_are_handled_in_order() {
    // Arrange: two unknown tags arrive back to back
    let dir = TempDir::new();
    let mut h = harness(
        dir.mappings(),
        ScriptedPrompt::new([Some("left"), Some("right")]),
        RecordingInjector::new(),
    );

    // Act
    let stats = run_all(
        &mut h.engine,
        vec![tap(&TAG_A), tap(&TAG_B), tap(&TAG_A)],
    )
    .await;

    // Assert
    assert_eq!(stats.dispatched, 3);
    assert_eq!(h.prompt.ask_count(), 2);
    assert_eq!(h.injector.pressed_actions(), vec!["left", "right", "left"]);
    let asked = h.prompt.asked.lock().unwrap().clone();
    assert_eq!(asked, vec![tag("04A224B2"), tag("04B7C19A")]);
}

#[tokio::test]
async fn test_removal_and_identifierless_events_press_nothing() {
    let dir = TempDir::new();
    let mut h = harness(dir.mappings(), ScriptedPrompt::default(), RecordingInjector::new());
    let removal = ReaderEvent::TagRemoved(RawTagEvent::with_uid("r", "t", TAG_A.to_vec()));
    let blank = ReaderEvent::TagPresent(RawTagEvent {
        reader: "r".into(),
        tag_type: "TAG_UNKNOWN".into(),
        ..RawTagEvent::default()
    });

    let stats = run_all(&mut h.engine, vec![removal, blank]).await;

    assert_eq!(stats.failed, 1);
    assert_eq!(h.prompt.ask_count(), 0);
    assert!(h.injector.pressed_actions().is_empty());
}

#[tokio::test]
async fn test_data_blob_identifies_tag_without_uid() {
    // Arrange: an ISO 14443-4 tag answering with data + 90 00 status word
    let dir = TempDir::new();
    let mut h = harness(
        dir.mappings(),
        ScriptedPrompt::new([Some("enter")]),
        RecordingInjector::new(),
    );
    let event = ReaderEvent::TagPresent(RawTagEvent {
        reader: "r".into(),
        tag_type: "TAG_ISO_14443_4".into(),
        uid: None,
        data: Some(vec![0xD2, 0x76, 0x90, 0x00]),
    });

    // Act
    h.engine.handle(event).await.unwrap().unwrap();

    // Assert
    assert_eq!(
        h.engine.store().get(&tag("D276")).unwrap().as_str(),
        "enter"
    );
}

#[tokio::test]
async fn test_shutdown_closes_prompt_and_stops_loop() {
    // Arrange
    let dir = TempDir::new();
    let mut h = harness(dir.mappings(), ScriptedPrompt::default(), RecordingInjector::new());
    let (_tx, rx) = mpsc::channel::<ReaderEvent>(1);
    let (stop_tx, stop_rx) = watch::channel(false);
    stop_tx.send(true).unwrap();

    // Act
    let (reason, stats) = event_loop::run(&mut h.engine, rx, stop_rx).await;

    // Assert
    assert_eq!(reason, StopReason::Shutdown);
    assert_eq!(stats, LoopStats::default());
    assert!(h.prompt.is_closed());
}

#[tokio::test]
async fn test_shutdown_during_pending_prompt_skips_tag_and_stops_loop() {
    // Arrange
    let dir = TempDir::new();
    let prompt = Arc::new(UnansweredPrompt::default());
    let injector = Arc::new(RecordingInjector::new());
    let mut engine = DispatchEngine::new(
        TomlMappingStore::load(dir.mappings()).unwrap(),
        ActionRegistry::new(Platform::Linux),
        Arc::clone(&prompt) as Arc<dyn ActionPrompt>,
        Arc::clone(&injector) as Arc<dyn KeyInjector>,
    );
    let (tx, rx) = mpsc::channel(4);
    let (stop_tx, stop_rx) = watch::channel(false);

    // Act: tap an unknown tag, then interrupt while the question is open,
    // closing the prompt before signalling the loop as main does
    let interrupt = async {
        tx.send(tap(&TAG_A)).await.unwrap();
        prompt.asked.notified().await;
        prompt.close();
        stop_tx.send(true).unwrap();
        tx
    };
    let ((reason, stats), _tx) = tokio::time::timeout(
        Duration::from_secs(5),
        async { tokio::join!(event_loop::run(&mut engine, rx, stop_rx), interrupt) },
    )
    .await
    .expect("loop must exit once the prompt is closed");

    // Assert
    assert_eq!(reason, StopReason::Shutdown);
    assert_eq!(
        stats,
        LoopStats {
            dispatched: 0,
            skipped: 1,
            failed: 0
        }
    );
    assert!(engine.store().is_empty());
    assert!(injector.pressed_actions().is_empty());
}
