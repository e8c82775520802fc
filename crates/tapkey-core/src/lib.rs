//! # tapkey-core
//!
//! Shared library for tapkey containing the tag identity model, the canonical
//! action registry, and the per-platform key translation tables.
//!
//! It has zero dependencies on OS APIs, process spawning, or file I/O, so every
//! piece of it can be unit-tested on any machine.
//!
//! # Architecture overview (for beginners)
//!
//! tapkey turns an NFC tag into a keyboard key.  A reader reports that a tag is
//! in range, the tag's UID is looked up in a small table, and the matching key
//! press is injected into whatever application has focus (for example a slide
//! deck, where tags labelled "next" and "previous" replace a clicker).
//!
//! This crate defines:
//!
//! - **`domain`** – The value types that flow through the system: the raw
//!   event reported by a reader, the normalized [`TagIdentifier`] extracted
//!   from it, and the validated [`ActionName`] a tag is mapped to.
//!
//! - **`keymap`** – The canonical [`KeyCode`] (a USB HID Usage ID) and the
//!   tables that translate it into each platform's key-injection vocabulary.
//!
//! - **`registry`** – The static table of action names the operator may
//!   assign, and the lookup that turns an action name into a
//!   platform-specific [`KeyDescriptor`].

pub mod domain;
pub mod keymap;
pub mod registry;

pub use domain::action::ActionName;
pub use domain::tag::{extract_identifier, ExtractionError, RawTagEvent, ReaderEvent, TagIdentifier};
pub use keymap::key::KeyCode;
pub use registry::{ActionRegistry, KeyDescriptor, KeyPayload, Platform};
