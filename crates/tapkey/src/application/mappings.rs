//! Storage seam between the use cases and the mapping store.

use std::path::PathBuf;

use tapkey_core::{ActionName, ExtractionError, TagIdentifier};
use thiserror::Error;

/// Error type for mapping store operations.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing mapping store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a valid mapping table.
    #[error("mapping store at {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A key in the store file is not a usable tag identifier.
    #[error("mapping store at {path} has an invalid tag key {key:?}: {source}")]
    InvalidTag {
        path: PathBuf,
        key: String,
        #[source]
        source: ExtractionError,
    },

    /// Two keys in the store file normalize to the same tag.
    #[error(
        "mapping store at {path} maps tag {tag} twice: {first_key:?} = {first_action:?} \
         and {second_key:?} = {second_action:?}"
    )]
    DuplicateTag {
        path: PathBuf,
        tag: TagIdentifier,
        first_key: String,
        first_action: String,
        second_key: String,
        second_action: String,
    },

    /// The table could not be serialized.
    #[error("failed to serialize mappings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The store failed to load at startup and no longer writes to disk.
    #[error("mapping store at {path} could not be loaded; changes are kept in memory only")]
    InMemoryOnly { path: PathBuf },
}

/// Read/write access to the TagIdentifier -> ActionName table.
///
/// Only the dispatch path calls [`set`](MappingRepository::set), one event at
/// a time, so implementations need no internal locking.
pub trait MappingRepository: Send {
    /// Looks up the action mapped to `id`.  No side effects.
    fn get(&self, id: &TagIdentifier) -> Option<ActionName>;

    /// Maps `id` to `action` and persists the whole table.
    ///
    /// The in-memory entry is kept even when the durable write fails.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the table could not be written.
    fn set(&mut self, id: TagIdentifier, action: ActionName) -> Result<(), PersistenceError>;
}
