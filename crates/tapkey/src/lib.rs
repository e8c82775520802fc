//! tapkey library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does tapkey do?
//!
//! tapkey turns NFC tags into keyboard keys.  Tap a tag on the reader and the
//! key it is mapped to (for example the right arrow, to advance a slide) is
//! pressed in whatever window has focus.  Tapping a tag nobody has mapped yet
//! asks the operator, once, which key it should be; the answer is saved and
//! pressed straight away.
//!
//! 1. A reader feed delivers tag-presence events (`infrastructure::reader`).
//! 2. The dispatch engine extracts the tag identifier and looks it up in the
//!    mapping store (`application::dispatch_tag`).
//! 3. Unknown tags go through the assignment prompt
//!    (`application::assign_action`).
//! 4. The action is resolved to a platform key and pressed
//!    (`infrastructure::key_injection`).

/// Application layer: use cases and the traits they depend on.
pub mod application;

/// The serial loop feeding reader events to the dispatch engine.
pub mod event_loop;

/// Infrastructure layer: storage, key injection, reader feeds and prompt.
pub mod infrastructure;
