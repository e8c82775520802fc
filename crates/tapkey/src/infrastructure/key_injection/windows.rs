//! Windows key injection through `WScript.Shell.SendKeys`.
//!
//! Runs PowerShell with a one-line script:
//!
//! ```text
//! powershell -NoProfile -NonInteractive -Command
//!     "(New-Object -ComObject WScript.Shell).SendKeys('{RIGHT}')"
//! ```
//!
//! SendKeys delivers to the foreground window and needs no special
//! permission, except that a normal process cannot send keys to an elevated
//! window (UIPI).  That case is silent, so there is no permission classifier
//! beyond an explicit "Access is denied".

use async_trait::async_trait;
use tapkey_core::{KeyDescriptor, KeyPayload};

use super::command;
use crate::application::dispatch_tag::{InjectionError, KeyInjector};

const PROGRAM: &str = "powershell";

/// Presses keys via PowerShell and SendKeys.
#[derive(Debug, Default, Clone, Copy)]
pub struct SendKeysInjector;

impl SendKeysInjector {
    pub fn new() -> Self {
        Self
    }
}

/// Builds the PowerShell argument list for `key`.
pub(super) fn arguments(key: &KeyDescriptor) -> Result<Vec<String>, InjectionError> {
    let KeyPayload::SendKeysToken(token) = key.payload else {
        return Err(InjectionError::UnsupportedPayload(key.payload));
    };
    // Single-quoted PowerShell strings escape ' by doubling it.
    let quoted = token.replace('\'', "''");
    Ok(vec![
        "-NoProfile".to_string(),
        "-NonInteractive".to_string(),
        "-Command".to_string(),
        format!("(New-Object -ComObject WScript.Shell).SendKeys('{quoted}')"),
    ])
}

fn classify(stderr: &str) -> Option<String> {
    stderr
        .contains("Access is denied")
        .then(|| "Windows denied input; the target window may be running elevated".to_string())
}

#[async_trait]
impl KeyInjector for SendKeysInjector {
    async fn press(&self, key: &KeyDescriptor) -> Result<(), InjectionError> {
        let args = arguments(key)?;
        command::run(PROGRAM, &args, classify).await
    }
}
