//! KeyCode to X11 KeySym name translation table for Linux.
//!
//! `xdotool key` takes KeySym *names* as defined in X11/keysymdef.h with the
//! `XK_` prefix removed (`XK_Right` becomes `Right`).
//! Reference: https://gitlab.freedesktop.org/xorg/proto/xorgproto/-/blob/master/include/X11/keysymdef.h
//!
//! Letters map to their lowercase KeySym so no Shift is synthesized.

use super::key::KeyCode;

/// Translates a [`KeyCode`] to an X11 KeySym name.
pub fn keysym_name(key: KeyCode) -> &'static str {
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

        KeyCode::Enter => "Return",        // XK_Return
        KeyCode::Escape => "Escape",       // XK_Escape
        KeyCode::Backspace => "BackSpace", // XK_BackSpace
        KeyCode::Tab => "Tab",             // XK_Tab
        KeyCode::Space => "space",         // XK_space

        KeyCode::Home => "Home",          // XK_Home
        KeyCode::PageUp => "Page_Up",     // XK_Page_Up
        KeyCode::Delete => "Delete",      // XK_Delete
        KeyCode::End => "End",            // XK_End
        KeyCode::PageDown => "Page_Down", // XK_Page_Down

        KeyCode::ArrowLeft => "Left",   // XK_Left
        KeyCode::ArrowRight => "Right", // XK_Right
        KeyCode::ArrowDown => "Down",   // XK_Down
        KeyCode::ArrowUp => "Up",       // XK_Up

        KeyCode::F1 => "F1",
        KeyCode::F2 => "F2",
        KeyCode::F3 => "F3",
        KeyCode::F4 => "F4",
        KeyCode::F5 => "F5",
        KeyCode::F6 => "F6",
        KeyCode::F7 => "F7",
        KeyCode::F8 => "F8",
        KeyCode::F9 => "F9",
        KeyCode::F10 => "F10",
        KeyCode::F11 => "F11",
        KeyCode::F12 => "F12",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keysyms() {
        assert_eq!(keysym_name(KeyCode::ArrowLeft), "Left");
        assert_eq!(keysym_name(KeyCode::ArrowUp), "Up");
        assert_eq!(keysym_name(KeyCode::ArrowRight), "Right");
        assert_eq!(keysym_name(KeyCode::ArrowDown), "Down");
    }

    #[test]
    fn test_enter_is_return_keysym() {
        assert_eq!(keysym_name(KeyCode::Enter), "Return");
    }

    #[test]
    fn test_letters_are_lowercase() {
        assert_eq!(keysym_name(KeyCode::KeyQ), "q");
    }
}
