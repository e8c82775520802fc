//! Scripted prompt for tests.
//!
//! Answers questions from a queue.  Each question is recorded so tests can
//! assert which tags were prompted for.  An exhausted script behaves like a
//! closed prompt.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tapkey_core::TagIdentifier;

use crate::application::assign_action::{ActionPrompt, PromptError};

#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<String>>>,
    /// Tags asked about, in order.
    pub asked: Mutex<Vec<TagIdentifier>>,
    closed: AtomicBool,
}

impl ScriptedPrompt {
    /// A prompt that answers `answers` in order; `None` means "closed".
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(|a| a.map(Into::into)).collect()),
            ..Self::default()
        }
    }

    /// Number of questions asked so far.
    pub fn ask_count(&self) -> usize {
        self.asked.lock().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActionPrompt for ScriptedPrompt {
    async fn ask(
        &self,
        tag: &TagIdentifier,
        _choices: &[&'static str],
    ) -> Result<Option<String>, PromptError> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(tag.clone());
        }
        if self.is_closed() {
            return Ok(None);
        }
        Ok(self
            .answers
            .lock()
            .ok()
            .and_then(|mut a| a.pop_front())
            .flatten())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
