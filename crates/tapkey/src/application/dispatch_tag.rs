//! DispatchEngine: reacts to a tag entering the reader's field.
//!
//! This use case is the heart of tapkey.  For every tag-presence event it
//! walks the following state machine to completion before the next event is
//! looked at:
//!
//! ```text
//! IDENTIFIED ─┬─ LOOKUP_HIT ──────────────────────────────┐
//!             └─ LOOKUP_MISS ─ AWAITING_ASSIGNMENT ─┬─ ASSIGNED ─┴─ DISPATCHED
//!                                                   ├─ DECLINED ─── SKIPPED
//!                                                   └─ REJECTED
//! ```
//!
//! # Architecture
//!
//! The engine depends only on traits ([`MappingRepository`], [`ActionPrompt`],
//! [`KeyInjector`]) and core types.  All infrastructure implementations are
//! injected at construction time, making the use case fully unit-testable.
//!
//! Failures never escape an event: every error is returned to the caller (and
//! logged by [`DispatchEngine::handle`]) and the engine is ready for the next
//! tap.

use std::sync::Arc;

use async_trait::async_trait;
use tapkey_core::{
    extract_identifier, ActionName, ActionRegistry, ExtractionError, KeyDescriptor, KeyPayload,
    RawTagEvent, ReaderEvent, TagIdentifier,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::assign_action::{ActionPrompt, AssignmentFlow, AssignmentOutcome, PromptError};
use super::mappings::MappingRepository;

/// Error type for key injection.
#[derive(Debug, Error)]
pub enum InjectionError {
    /// The OS refused to let this process send keystrokes.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The helper program is not installed or not on `PATH`.
    #[error("{program} not found; is it installed?")]
    NotInstalled { program: &'static str },

    /// The helper program could not be started.
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The helper program ran but reported failure.
    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: &'static str,
        status: String,
        stderr: String,
    },

    /// The descriptor was built for a different platform.
    #[error("key payload {0:?} is not supported by this injector")]
    UnsupportedPayload(KeyPayload),
}

/// Platform-agnostic key-injection trait.
///
/// Each supported OS provides an implementation in the infrastructure layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyInjector: Send + Sync {
    /// Presses and releases the key described by `key`.
    async fn press(&self, key: &KeyDescriptor) -> Result<(), InjectionError>;
}

/// Where the dispatched action came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSource {
    /// The tag was already mapped.
    Stored,
    /// The tag was assigned during this event.
    Assigned {
        /// `false` when the mapping is held in memory only.
        persisted: bool,
    },
}

/// Successful end states of a tag-presence event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The key was pressed.
    Dispatched {
        tag: TagIdentifier,
        action: ActionName,
        source: ActionSource,
    },
    /// The operator declined to assign the tag.
    Skipped { tag: TagIdentifier },
}

/// Failure end states of a tag-presence event.
#[derive(Debug, Error)]
pub enum EventError {
    /// The reader event carried no usable identifier.
    #[error("tag ignored: {0}")]
    IdentityExtraction(#[from] ExtractionError),

    /// The operator typed a name that is not a known action.
    #[error("tag {tag}: {input:?} is not a known action")]
    Validation { tag: TagIdentifier, input: String },

    /// The key press failed.
    #[error("tag {tag}: pressing {action:?} failed: {source}")]
    Dispatch {
        tag: TagIdentifier,
        action: ActionName,
        #[source]
        source: InjectionError,
    },

    /// A stored or freshly assigned action is missing from the registry.
    #[error("tag {tag}: action {action:?} is not in the action registry (store and registry are out of sync)")]
    InvariantViolation { tag: TagIdentifier, action: ActionName },

    /// The assignment prompt failed.
    #[error("tag {tag}: assignment prompt failed: {source}")]
    Prompt {
        tag: TagIdentifier,
        #[source]
        source: PromptError,
    },
}

/// The Dispatch Tag use case.
///
/// Owns the mapping store; no other component mutates it.
pub struct DispatchEngine<S: MappingRepository> {
    store: S,
    registry: ActionRegistry,
    assignment: AssignmentFlow,
    injector: Arc<dyn KeyInjector>,
}

impl<S: MappingRepository> DispatchEngine<S> {
    /// Creates a new engine.
    pub fn new(
        store: S,
        registry: ActionRegistry,
        prompt: Arc<dyn ActionPrompt>,
        injector: Arc<dyn KeyInjector>,
    ) -> Self {
        Self {
            store,
            registry,
            assignment: AssignmentFlow::new(prompt, registry),
            injector,
        }
    }

    /// Returns the mapping store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Closes the assignment prompt.  Called on shutdown.
    pub fn close_prompt(&self) {
        self.assignment.close();
    }

    /// Handles one reader event and logs its result.
    ///
    /// Removal events are informational and return `None`.
    pub async fn handle(&mut self, event: ReaderEvent) -> Option<Result<DispatchOutcome, EventError>> {
        match event {
            ReaderEvent::TagRemoved(raw) => {
                debug!(reader = %raw.reader, tag_type = %raw.tag_type, "tag removed");
                None
            }
            ReaderEvent::TagPresent(raw) => {
                let result = self.on_tag_present(&raw).await;
                report(&raw, &result);
                Some(result)
            }
        }
    }

    /// Runs the full reaction to one tag-presence event.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] for every failed end state; the engine stays
    /// usable for the next event.
    pub async fn on_tag_present(&mut self, raw: &RawTagEvent) -> Result<DispatchOutcome, EventError> {
        let tag = extract_identifier(raw)?;

        let (action, source) = match self.store.get(&tag) {
            Some(action) => (action, ActionSource::Stored),
            None => {
                let outcome = self
                    .assignment
                    .request_assignment(&tag, &mut self.store)
                    .await
                    .map_err(|source| EventError::Prompt {
                        tag: tag.clone(),
                        source,
                    })?;
                match outcome {
                    AssignmentOutcome::Assigned {
                        action,
                        persistence_error,
                    } => (
                        action,
                        ActionSource::Assigned {
                            persisted: persistence_error.is_none(),
                        },
                    ),
                    AssignmentOutcome::Declined => return Ok(DispatchOutcome::Skipped { tag }),
                    AssignmentOutcome::Rejected { input } => {
                        return Err(EventError::Validation { tag, input })
                    }
                }
            }
        };

        let Some(key) = self.registry.resolve(action.as_str()) else {
            return Err(EventError::InvariantViolation { tag, action });
        };

        if let Err(source) = self.injector.press(&key).await {
            return Err(EventError::Dispatch {
                tag,
                action,
                source,
            });
        }

        Ok(DispatchOutcome::Dispatched {
            tag,
            action,
            source,
        })
    }
}

/// Logs the end state of one presence event with enough context to diagnose it.
fn report(raw: &RawTagEvent, result: &Result<DispatchOutcome, EventError>) {
    match result {
        Ok(DispatchOutcome::Dispatched {
            tag,
            action,
            source,
        }) => info!(tag = %tag, action = %action, ?source, "key pressed"),
        Ok(DispatchOutcome::Skipped { tag }) => info!(tag = %tag, "assignment declined; tag skipped"),
        Err(e @ EventError::InvariantViolation { .. }) => error!(reader = %raw.reader, "{e}"),
        Err(e @ EventError::IdentityExtraction(_)) => warn!(reader = %raw.reader, "{e}"),
        Err(e @ EventError::Dispatch { source, .. }) => {
            error!(reader = %raw.reader, cause = %source, "{e}");
        }
        Err(e) => warn!(reader = %raw.reader, "{e}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
