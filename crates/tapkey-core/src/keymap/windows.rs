//! KeyCode to Windows `SendKeys` token translation table.
//!
//! `WScript.Shell.SendKeys` takes a string in which plain characters type
//! themselves and special keys are written as brace-enclosed tokens such as
//! `{RIGHT}` or `{PGDN}`.
//!
//! # Escaping (for beginners)
//!
//! A handful of characters (`+ ^ % ~ ( ) { } [ ]`) are modifiers or syntax in
//! the SendKeys grammar and must be wrapped in braces to be typed literally.
//! None of the assignable keys produce those characters, so letters and digits
//! are passed through bare.

use super::key::KeyCode;

/// Translates a [`KeyCode`] to its `SendKeys` token.
pub fn send_keys_token(key: KeyCode) -> &'static str {
    match key {
        KeyCode::KeyA => "a",
        KeyCode::KeyB => "b",
        KeyCode::KeyC => "c",
        KeyCode::KeyD => "d",
        KeyCode::KeyE => "e",
        KeyCode::KeyF => "f",
        KeyCode::KeyG => "g",
        KeyCode::KeyH => "h",
        KeyCode::KeyI => "i",
        KeyCode::KeyJ => "j",
        KeyCode::KeyK => "k",
        KeyCode::KeyL => "l",
        KeyCode::KeyM => "m",
        KeyCode::KeyN => "n",
        KeyCode::KeyO => "o",
        KeyCode::KeyP => "p",
        KeyCode::KeyQ => "q",
        KeyCode::KeyR => "r",
        KeyCode::KeyS => "s",
        KeyCode::KeyT => "t",
        KeyCode::KeyU => "u",
        KeyCode::KeyV => "v",
        KeyCode::KeyW => "w",
        KeyCode::KeyX => "x",
        KeyCode::KeyY => "y",
        KeyCode::KeyZ => "z",

        KeyCode::Digit0 => "0",
        KeyCode::Digit1 => "1",
        KeyCode::Digit2 => "2",
        KeyCode::Digit3 => "3",
        KeyCode::Digit4 => "4",
        KeyCode::Digit5 => "5",
        KeyCode::Digit6 => "6",
        KeyCode::Digit7 => "7",
        KeyCode::Digit8 => "8",
        KeyCode::Digit9 => "9",

        KeyCode::Enter => "{ENTER}",
        KeyCode::Escape => "{ESC}",
        KeyCode::Backspace => "{BACKSPACE}",
        KeyCode::Tab => "{TAB}",
        KeyCode::Space => " ",

        KeyCode::Home => "{HOME}",
        KeyCode::PageUp => "{PGUP}",
        KeyCode::Delete => "{DELETE}",
        KeyCode::End => "{END}",
        KeyCode::PageDown => "{PGDN}",

        KeyCode::ArrowLeft => "{LEFT}",
        KeyCode::ArrowRight => "{RIGHT}",
        KeyCode::ArrowDown => "{DOWN}",
        KeyCode::ArrowUp => "{UP}",

        KeyCode::F1 => "{F1}",
        KeyCode::F2 => "{F2}",
        KeyCode::F3 => "{F3}",
        KeyCode::F4 => "{F4}",
        KeyCode::F5 => "{F5}",
        KeyCode::F6 => "{F6}",
        KeyCode::F7 => "{F7}",
        KeyCode::F8 => "{F8}",
        KeyCode::F9 => "{F9}",
        KeyCode::F10 => "{F10}",
        KeyCode::F11 => "{F11}",
        KeyCode::F12 => "{F12}",
    }
}
