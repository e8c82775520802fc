//! Console prompt on stdin/stdout.
//!
//! When an unknown tag is tapped the operator sees:
//!
//! ```text
//! New tag 04A224B2
//!   actions: left, right, up, down, enter, ...
//! Action for this tag (empty to skip): _
//! ```
//!
//! and types an action name followed by Enter.  End of input (Ctrl-D, or a
//! closed pipe) closes the prompt for good: that and every later question
//! resolve to "no answer", which the assignment flow treats as a decline.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tapkey_core::TagIdentifier;
use tokio::io::{
    self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin,
    Stdout,
};
use tokio::sync::{Mutex, Notify};
use tracing::info;

use crate::application::assign_action::{ActionPrompt, PromptError};

/// Line-oriented prompt over any async reader/writer pair.
pub struct ConsolePrompt<R, W> {
    input: Mutex<Lines<R>>,
    output: Mutex<W>,
    closed: AtomicBool,
    shutdown: Notify,
}

impl ConsolePrompt<BufReader<Stdin>, Stdout> {
    /// Prompt on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> ConsolePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input.lines()),
            output: Mutex::new(output),
            closed: AtomicBool::new(false),
            shutdown: Notify::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn write_question(
        &self,
        tag: &TagIdentifier,
        choices: &[&'static str],
    ) -> std::io::Result<()> {
        let text = format!(
            "\nNew tag {tag}\n  actions: {}\nAction for this tag (empty to skip): ",
            choices.join(", ")
        );
        let mut out = self.output.lock().await;
        out.write_all(text.as_bytes()).await?;
        out.flush().await
    }
}

#[async_trait]
impl<R, W> ActionPrompt for ConsolePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn ask(
        &self,
        tag: &TagIdentifier,
        choices: &[&'static str],
    ) -> Result<Option<String>, PromptError> {
        if self.is_closed() {
            return Ok(None);
        }
        self.write_question(tag, choices).await?;

        let mut input = self.input.lock().await;
        tokio::select! {
            line = input.next_line() => match line? {
                Some(line) => Ok(Some(line)),
                None => {
                    info!("prompt input closed; new tags will be skipped");
                    self.closed.store(true, Ordering::SeqCst);
                    Ok(None)
                }
            },
            _ = self.shutdown.notified() => Ok(None),
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        // notify_one keeps a permit if no question is pending yet.
        self.shutdown.notify_one();
    }
}
