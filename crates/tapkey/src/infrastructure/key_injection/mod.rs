//! Platform key injectors.
//!
//! Every backend drives an external tool that ships with (or is commonly
//! installed on) its OS, so none of them need native bindings and all of them
//! compile everywhere.  [`for_platform`] picks the one that matches the
//! registry's payloads.
//!
//! | Platform | Tool                 | Payload                          |
//! |----------|----------------------|----------------------------------|
//! | macOS    | `osascript`          | [`KeyPayload::AppleScriptKeyCode`] |
//! | Windows  | `powershell` SendKeys| [`KeyPayload::SendKeysToken`]    |
//! | Linux    | `xdotool`            | [`KeyPayload::XdotoolKeysym`]    |
//!
//! [`KeyPayload::AppleScriptKeyCode`]: tapkey_core::KeyPayload::AppleScriptKeyCode
//! [`KeyPayload::SendKeysToken`]: tapkey_core::KeyPayload::SendKeysToken
//! [`KeyPayload::XdotoolKeysym`]: tapkey_core::KeyPayload::XdotoolKeysym

use std::sync::Arc;

use tapkey_core::Platform;

use crate::application::dispatch_tag::KeyInjector;

mod command;
pub mod linux;
pub mod macos;
pub mod mock;
pub mod windows;

pub use linux::XdotoolInjector;
pub use macos::AppleScriptInjector;
pub use mock::RecordingInjector;
pub use windows::SendKeysInjector;

/// Returns the injector for `platform`.
pub fn for_platform(platform: Platform) -> Arc<dyn KeyInjector> {
    match platform {
        Platform::MacOs => Arc::new(AppleScriptInjector::new()),
        Platform::Windows => Arc::new(SendKeysInjector::new()),
        Platform::Linux => Arc::new(XdotoolInjector::new()),
    }
}

/// Name of the helper program `platform` needs, for the startup banner.
pub fn helper_program(platform: Platform) -> &'static str {
    match platform {
        Platform::MacOs => "osascript",
        Platform::Windows => "powershell",
        Platform::Linux => "xdotool",
    }
}
