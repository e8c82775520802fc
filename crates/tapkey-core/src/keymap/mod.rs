//! Key code translation tables for cross-platform key injection.
//!
//! The canonical representation is USB HID Usage IDs (page 0x07, Keyboard/Keypad).
//! Each platform's injection vocabulary is derived from it at the boundary.

pub mod key;
pub mod linux;
pub mod macos;
pub mod windows;

pub use key::KeyCode;

/// Unified key mapper providing every translation direction.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates a [`KeyCode`] to the macOS virtual key code used by
    /// AppleScript `key code`.
    pub fn to_macos_key_code(key: KeyCode) -> u16 {
        macos::key_code(key)
    }

    /// Translates a [`KeyCode`] to a Windows `SendKeys` token.
    pub fn to_send_keys_token(key: KeyCode) -> &'static str {
        windows::send_keys_token(key)
    }

    /// Translates a [`KeyCode`] to the X11 KeySym name used by `xdotool key`.
    pub fn to_x11_keysym_name(key: KeyCode) -> &'static str {
        linux::keysym_name(key)
    }
}
