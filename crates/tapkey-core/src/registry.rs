//! The action registry: the static table of assignable action names.
//!
//! # One action set, many platforms
//!
//! The table below is the single source of truth for which names an operator
//! may bind to a tag.  It is the same on every platform, so a mapping file
//! written on a Mac keeps working on a Linux box.  Only the
//! [`KeyDescriptor`] payload produced by [`ActionRegistry::resolve`] depends on
//! the target [`Platform`].
//!
//! ```rust
//! use tapkey_core::{ActionRegistry, KeyPayload, Platform};
//!
//! let registry = ActionRegistry::new(Platform::Windows);
//! let key = registry.resolve(" Right ").expect("right is a known action");
//! assert_eq!(key.payload, KeyPayload::SendKeysToken("{RIGHT}"));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::domain::action::ActionName;
use crate::keymap::{KeyCode, KeyMapper};

/// Target platform of the key-injection backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    /// Returns the platform this binary was compiled for, if supported.
    pub fn detect() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Platform::MacOs)
        } else if cfg!(target_os = "windows") {
            Some(Platform::Windows)
        } else if cfg!(target_os = "linux") {
            Some(Platform::Linux)
        } else {
            None
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        })
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "macos" | "mac" | "darwin" => Ok(Platform::MacOs),
            "windows" | "win32" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            other => Err(format!("unsupported platform {other:?}")),
        }
    }
}

/// Platform-specific data needed to simulate one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPayload {
    /// Virtual key code for AppleScript `key code` (macOS).
    AppleScriptKeyCode(u16),
    /// Token for `WScript.Shell.SendKeys` (Windows).
    SendKeysToken(&'static str),
    /// KeySym name for `xdotool key` (Linux/X11).
    XdotoolKeysym(&'static str),
}

/// A resolved action: its canonical name, key, and platform payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDescriptor {
    /// Canonical action name from the registry table.
    pub action: &'static str,
    /// Canonical HID key.
    pub key: KeyCode,
    /// What the platform injector actually sends.
    pub payload: KeyPayload,
}

/// `(name, key)` rows in declaration order.
///
/// The order is the order shown to the operator when prompting.
const ACTIONS: &[(&str, KeyCode)] = &[
    ("left", KeyCode::ArrowLeft),
    ("right", KeyCode::ArrowRight),
    ("up", KeyCode::ArrowUp),
    ("down", KeyCode::ArrowDown),
    ("enter", KeyCode::Enter),
    ("space", KeyCode::Space),
    ("escape", KeyCode::Escape),
    ("tab", KeyCode::Tab),
    ("backspace", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("f1", KeyCode::F1),
    ("f2", KeyCode::F2),
    ("f3", KeyCode::F3),
    ("f4", KeyCode::F4),
    ("f5", KeyCode::F5),
    ("f6", KeyCode::F6),
    ("f7", KeyCode::F7),
    ("f8", KeyCode::F8),
    ("f9", KeyCode::F9),
    ("f10", KeyCode::F10),
    ("f11", KeyCode::F11),
    ("f12", KeyCode::F12),
    ("a", KeyCode::KeyA),
    ("b", KeyCode::KeyB),
    ("c", KeyCode::KeyC),
    ("d", KeyCode::KeyD),
    ("e", KeyCode::KeyE),
    ("f", KeyCode::KeyF),
    ("g", KeyCode::KeyG),
    ("h", KeyCode::KeyH),
    ("i", KeyCode::KeyI),
    ("j", KeyCode::KeyJ),
    ("k", KeyCode::KeyK),
    ("l", KeyCode::KeyL),
    ("m", KeyCode::KeyM),
    ("n", KeyCode::KeyN),
    ("o", KeyCode::KeyO),
    ("p", KeyCode::KeyP),
    ("q", KeyCode::KeyQ),
    ("r", KeyCode::KeyR),
    ("s", KeyCode::KeyS),
    ("t", KeyCode::KeyT),
    ("u", KeyCode::KeyU),
    ("v", KeyCode::KeyV),
    ("w", KeyCode::KeyW),
    ("x", KeyCode::KeyX),
    ("y", KeyCode::KeyY),
    ("z", KeyCode::KeyZ),
    ("0", KeyCode::Digit0),
    ("1", KeyCode::Digit1),
    ("2", KeyCode::Digit2),
    ("3", KeyCode::Digit3),
    ("4", KeyCode::Digit4),
    ("5", KeyCode::Digit5),
    ("6", KeyCode::Digit6),
    ("7", KeyCode::Digit7),
    ("8", KeyCode::Digit8),
    ("9", KeyCode::Digit9),
];

/// Lookup from action names to [`KeyDescriptor`]s for one target platform.
#[derive(Debug, Clone, Copy)]
pub struct ActionRegistry {
    platform: Platform,
}

impl ActionRegistry {
    /// Creates a registry producing descriptors for `platform`.
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Returns the target platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns every known action name in declaration order.
    pub fn known_action_names(&self) -> Vec<&'static str> {
        ACTIONS.iter().map(|(name, _)| *name).collect()
    }

    /// Normalizes `input` and returns it as an [`ActionName`] if it is known.
    ///
    /// `None` is a validation signal, not an error.
    pub fn validate(&self, input: &str) -> Option<ActionName> {
        let name = ActionName::normalized(input);
        find(name.as_str()).map(|_| name)
    }

    /// Resolves an action name (trimmed, case-insensitive) to its descriptor.
    pub fn resolve(&self, name: &str) -> Option<KeyDescriptor> {
        let normalized = ActionName::normalized(name);
        let (action, key) = find(normalized.as_str())?;
        Some(KeyDescriptor {
            action,
            key,
            payload: self.payload_for(key),
        })
    }

    fn payload_for(&self, key: KeyCode) -> KeyPayload {
        match self.platform {
            Platform::MacOs => KeyPayload::AppleScriptKeyCode(KeyMapper::to_macos_key_code(key)),
            Platform::Windows => KeyPayload::SendKeysToken(KeyMapper::to_send_keys_token(key)),
            Platform::Linux => KeyPayload::XdotoolKeysym(KeyMapper::to_x11_keysym_name(key)),
        }
    }
}

fn find(normalized: &str) -> Option<(&'static str, KeyCode)> {
    ACTIONS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|&(name, key)| (name, key))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
