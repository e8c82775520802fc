//! KeyCode to macOS virtual key code translation table.
//!
//! AppleScript's `key code N` statement (System Events) takes the same
//! numbers as `CGKeyCode`, defined in Carbon Events.h (HIToolbox framework).
//! They identify ANSI key positions, not characters.

use super::key::KeyCode;

/// Translates a [`KeyCode`] to the macOS virtual key code.
///
/// Every assignable key has a macOS code, so this never fails.
pub fn key_code(key: KeyCode) -> u16 {
    match key {
        // Letters (macOS uses ANSI key position codes, not ASCII)
        KeyCode::KeyA => 0x00, // kVK_ANSI_A
        KeyCode::KeyB => 0x0B, // kVK_ANSI_B
        KeyCode::KeyC => 0x08, // kVK_ANSI_C
        KeyCode::KeyD => 0x02, // kVK_ANSI_D
        KeyCode::KeyE => 0x0E, // kVK_ANSI_E
        KeyCode::KeyF => 0x03, // kVK_ANSI_F
        KeyCode::KeyG => 0x05, // kVK_ANSI_G
        KeyCode::KeyH => 0x04, // kVK_ANSI_H
        KeyCode::KeyI => 0x22, // kVK_ANSI_I
        KeyCode::KeyJ => 0x26, // kVK_ANSI_J
        KeyCode::KeyK => 0x28, // kVK_ANSI_K
        KeyCode::KeyL => 0x25, // kVK_ANSI_L
        KeyCode::KeyM => 0x2E, // kVK_ANSI_M
        KeyCode::KeyN => 0x2D, // kVK_ANSI_N
        KeyCode::KeyO => 0x1F, // kVK_ANSI_O
        KeyCode::KeyP => 0x23, // kVK_ANSI_P
        KeyCode::KeyQ => 0x0C, // kVK_ANSI_Q
        KeyCode::KeyR => 0x0F, // kVK_ANSI_R
        KeyCode::KeyS => 0x01, // kVK_ANSI_S
        KeyCode::KeyT => 0x11, // kVK_ANSI_T
        KeyCode::KeyU => 0x20, // kVK_ANSI_U
        KeyCode::KeyV => 0x09, // kVK_ANSI_V
        KeyCode::KeyW => 0x0D, // kVK_ANSI_W
        KeyCode::KeyX => 0x07, // kVK_ANSI_X
        KeyCode::KeyY => 0x10, // kVK_ANSI_Y
        KeyCode::KeyZ => 0x06, // kVK_ANSI_Z

        // Digits
        KeyCode::Digit0 => 0x1D, // kVK_ANSI_0
        KeyCode::Digit1 => 0x12, // kVK_ANSI_1
        KeyCode::Digit2 => 0x13, // kVK_ANSI_2
        KeyCode::Digit3 => 0x14, // kVK_ANSI_3
        KeyCode::Digit4 => 0x15, // kVK_ANSI_4
        KeyCode::Digit5 => 0x17, // kVK_ANSI_5
        KeyCode::Digit6 => 0x16, // kVK_ANSI_6
        KeyCode::Digit7 => 0x1A, // kVK_ANSI_7
        KeyCode::Digit8 => 0x1C, // kVK_ANSI_8
        KeyCode::Digit9 => 0x19, // kVK_ANSI_9

        // Control keys
        KeyCode::Enter => 0x24,     // kVK_Return
        KeyCode::Escape => 0x35,    // kVK_Escape
        KeyCode::Backspace => 0x33, // kVK_Delete
        KeyCode::Tab => 0x30,       // kVK_Tab
        KeyCode::Space => 0x31,     // kVK_Space

        // Navigation
        KeyCode::Home => 0x73,     // kVK_Home
        KeyCode::PageUp => 0x74,   // kVK_PageUp
        KeyCode::Delete => 0x75,   // kVK_ForwardDelete
        KeyCode::End => 0x77,      // kVK_End
        KeyCode::PageDown => 0x79, // kVK_PageDown

        // Arrow keys
        KeyCode::ArrowLeft => 0x7B,  // kVK_LeftArrow
        KeyCode::ArrowRight => 0x7C, // kVK_RightArrow
        KeyCode::ArrowDown => 0x7D,  // kVK_DownArrow
        KeyCode::ArrowUp => 0x7E,    // kVK_UpArrow

        // Function keys
        KeyCode::F1 => 0x7A,  // kVK_F1
        KeyCode::F2 => 0x78,  // kVK_F2
        KeyCode::F3 => 0x63,  // kVK_F3
        KeyCode::F4 => 0x76,  // kVK_F4
        KeyCode::F5 => 0x60,  // kVK_F5
        KeyCode::F6 => 0x61,  // kVK_F6
        KeyCode::F7 => 0x62,  // kVK_F7
        KeyCode::F8 => 0x64,  // kVK_F8
        KeyCode::F9 => 0x65,  // kVK_F9
        KeyCode::F10 => 0x6D, // kVK_F10
        KeyCode::F11 => 0x67, // kVK_F11
        KeyCode::F12 => 0x6F, // kVK_F12
    }
}
