//! Linux key injection through `xdotool`.
//!
//! Runs `xdotool key --clearmodifiers <keysym>`.  `--clearmodifiers` releases
//! any modifier the operator happens to be holding so that, for example, a
//! held Shift does not turn `right` into a selection.
//!
//! xdotool talks to the X server named by `DISPLAY`.  Under Wayland it only
//! reaches XWayland windows.  An X server that rejects the connection prints
//! "Authorization required" or "Can't open display", reported as
//! [`InjectionError::PermissionDenied`].

use async_trait::async_trait;
use tapkey_core::{KeyDescriptor, KeyPayload};

use super::command;
use crate::application::dispatch_tag::{InjectionError, KeyInjector};

const PROGRAM: &str = "xdotool";

/// Presses keys via `xdotool`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XdotoolInjector;

impl XdotoolInjector {
    pub fn new() -> Self {
        Self
    }
}

/// Builds the xdotool argument list for `key`.
pub(super) fn arguments(key: &KeyDescriptor) -> Result<Vec<String>, InjectionError> {
    match key.payload {
        KeyPayload::XdotoolKeysym(keysym) => Ok(vec![
            "key".to_string(),
            "--clearmodifiers".to_string(),
            keysym.to_string(),
        ]),
        other => Err(InjectionError::UnsupportedPayload(other)),
    }
}

fn classify(stderr: &str) -> Option<String> {
    (stderr.contains("Authorization required") || stderr.contains("Can't open display")).then(
        || "cannot reach the X display; check DISPLAY and XAUTHORITY for this session".to_string(),
    )
}

#[async_trait]
impl KeyInjector for XdotoolInjector {
    async fn press(&self, key: &KeyDescriptor) -> Result<(), InjectionError> {
        let args = arguments(key)?;
        command::run(PROGRAM, &args, classify).await
    }
}
