//! Application layer use cases for tapkey.
//!
//! # What use cases does tapkey have?
//!
//! - **`dispatch_tag`** – The end-to-end reaction to a tag entering the
//!   reader's field: extract the identifier, look up the mapped action, fall
//!   back to interactive assignment, and press the key through an injected
//!   [`KeyInjector`](dispatch_tag::KeyInjector).
//!
//! - **`assign_action`** – Asks the operator which action an unknown tag
//!   should trigger, validates the answer against the action registry, and
//!   records it in the mapping store.
//!
//! - **`mappings`** – The storage seam: the [`MappingRepository`] trait the
//!   use cases read and write through, and its error type.
//!
//! Every collaborator is a trait injected at construction time, so the whole
//! layer is tested without a reader, a terminal, or an OS key-injection API.

pub mod assign_action;
pub mod dispatch_tag;
pub mod mappings;

pub use mappings::{MappingRepository, PersistenceError};
