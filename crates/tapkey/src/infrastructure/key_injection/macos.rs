//! macOS key injection through AppleScript.
//!
//! Runs:
//!
//! ```text
//! osascript -e 'tell application "System Events" to key code 124'
//! ```
//!
//! `key code` takes the same virtual key numbers as `CGKeyCode`, so the value
//! from [`KeyPayload::AppleScriptKeyCode`] is passed through unchanged.
//!
//! # Permissions
//!
//! System Events only accepts synthetic keystrokes from processes listed under
//! System Settings > Privacy & Security > Accessibility.  Without that grant
//! osascript exits non-zero with error 1002 ("not allowed to send
//! keystrokes"), or -1743 when Automation access was refused.  Both are
//! reported as [`InjectionError::PermissionDenied`] with a hint.

use async_trait::async_trait;
use tapkey_core::{KeyDescriptor, KeyPayload};

use super::command;
use crate::application::dispatch_tag::{InjectionError, KeyInjector};

const PROGRAM: &str = "osascript";

/// Presses keys via `osascript` and System Events.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppleScriptInjector;

impl AppleScriptInjector {
    pub fn new() -> Self {
        Self
    }
}

/// Builds the osascript argument list for `key`.
pub(super) fn arguments(key: &KeyDescriptor) -> Result<Vec<String>, InjectionError> {
    match key.payload {
        KeyPayload::AppleScriptKeyCode(code) => Ok(vec![
            "-e".to_string(),
            format!("tell application \"System Events\" to key code {code}"),
        ]),
        other => Err(InjectionError::UnsupportedPayload(other)),
    }
}

fn classify(stderr: &str) -> Option<String> {
    // osascript appends the error number in parentheses, e.g. "... (1002)".
    let denied =
        stderr.contains("not allowed") || stderr.contains("(1002)") || stderr.contains("(-1743)");
    denied.then(|| {
        "macOS blocked the keystroke; add this terminal (or tapkey) under System Settings > \
         Privacy & Security > Accessibility"
            .to_string()
    })
}

#[async_trait]
impl KeyInjector for AppleScriptInjector {
    async fn press(&self, key: &KeyDescriptor) -> Result<(), InjectionError> {
        let args = arguments(key)?;
        command::run(PROGRAM, &args, classify).await
    }
}
