//! AssignmentFlow: binds an unknown tag to an action chosen by the operator.
//!
//! Runs only when the mapping store has no entry for a tag.  The flow asks the
//! [`ActionPrompt`] collaborator, then:
//!
//! ```text
//! empty answer / prompt closed  -> Declined   (nothing stored, nothing pressed)
//! unknown action name           -> Rejected   (nothing stored, nothing pressed)
//! known action name             -> store.set, then Assigned (caller presses it)
//! ```
//!
//! Returning the action on success lets the caller press the key right away,
//! so the operator does not have to tap the tag a second time.

use std::sync::Arc;

use async_trait::async_trait;
use tapkey_core::{ActionName, ActionRegistry, TagIdentifier};
use thiserror::Error;
use tracing::{info, warn};

use super::mappings::{MappingRepository, PersistenceError};

/// Error type for the interactive prompt.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Asks an operator which action a tag should trigger.
///
/// The console implementation lives in the infrastructure layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionPrompt: Send + Sync {
    /// Asks for the action of `tag`, offering `choices` in registry order.
    ///
    /// Resolves to `None` when the prompt has been closed (end of input or
    /// shutdown).  Suspends without a timeout until the operator answers.
    async fn ask(
        &self,
        tag: &TagIdentifier,
        choices: &[&'static str],
    ) -> Result<Option<String>, PromptError>;

    /// Stops prompting; later calls to `ask` resolve to `None`.
    fn close(&self);
}

/// Result of one assignment attempt.
#[derive(Debug)]
pub enum AssignmentOutcome {
    /// The operator picked a known action and it was recorded.
    Assigned {
        action: ActionName,
        /// Set when the in-memory entry could not be written to disk.
        persistence_error: Option<PersistenceError>,
    },
    /// Empty answer or closed prompt.
    Declined,
    /// The answer is not a known action name.
    Rejected { input: String },
}

/// The Assign Action use case.
pub struct AssignmentFlow {
    prompt: Arc<dyn ActionPrompt>,
    registry: ActionRegistry,
}

impl AssignmentFlow {
    /// Creates the flow around a prompt and the registry used for validation.
    pub fn new(prompt: Arc<dyn ActionPrompt>, registry: ActionRegistry) -> Self {
        Self { prompt, registry }
    }

    /// Asks the operator for an action for `tag` and records a valid answer.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError`] if the prompt itself failed.
    pub async fn request_assignment<S>(
        &self,
        tag: &TagIdentifier,
        store: &mut S,
    ) -> Result<AssignmentOutcome, PromptError>
    where
        S: MappingRepository + ?Sized,
    {
        let choices = self.registry.known_action_names();
        let answer = self.prompt.ask(tag, &choices).await?;

        let input = match answer {
            Some(line) if !line.trim().is_empty() => line,
            _ => return Ok(AssignmentOutcome::Declined),
        };

        let Some(action) = self.registry.validate(&input) else {
            return Ok(AssignmentOutcome::Rejected {
                input: input.trim().to_string(),
            });
        };

        let persistence_error = match store.set(tag.clone(), action.clone()) {
            Ok(()) => {
                info!(tag = %tag, action = %action, "tag assigned");
                None
            }
            Err(e) => {
                warn!(tag = %tag, action = %action, "assignment kept in memory only: {e}");
                Some(e)
            }
        };

        Ok(AssignmentOutcome::Assigned {
            action,
            persistence_error,
        })
    }

    /// Closes the underlying prompt.
    pub fn close(&self) {
        self.prompt.close();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
