//! TOML-backed mapping store.
//!
//! The whole TagIdentifier -> ActionName table lives in one small TOML file:
//!
//! ```toml
//! # tapkey tag mappings (tag UID = action)
//! 04A224B2 = "right"
//! 04B7C19A = "left"
//! ```
//!
//! The file is rewritten in full on every [`set`](MappingRepository::set).
//! Writes go to a temporary file in the same directory which is then renamed
//! over the real one, so a crash mid-write leaves either the old table or the
//! new one on disk, never a truncated file.
//!
//! Keys are normalized like every other [`TagIdentifier`] (trimmed,
//! uppercased).  A hand-edited file whose keys collapse onto the same tag,
//! such as `"04a224b2"` and `04A224B2`, is rejected rather than silently
//! merged.
//!
//! # Degraded mode
//!
//! If the file exists but cannot be parsed, [`TomlMappingStore::open`] logs the
//! problem and returns an empty, in-memory-only store.  The broken file is left
//! untouched for the operator to inspect; assignments made in this mode work
//! until the process exits and each one reports
//! [`PersistenceError::InMemoryOnly`].

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tapkey_core::{ActionName, ActionRegistry, TagIdentifier};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::{MappingRepository, PersistenceError};

/// Comment written at the top of every mapping file.
const FILE_HEADER: &str = "# tapkey tag mappings (tag UID = action)\n";

/// Mapping store persisted as a flat TOML table.
#[derive(Debug)]
pub struct TomlMappingStore {
    path: PathBuf,
    table: BTreeMap<TagIdentifier, ActionName>,
    durable: bool,
}

impl TomlMappingStore {
    /// Reads the store at `path`, creating an empty file if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Malformed`] if the file is not a valid
    /// table and [`PersistenceError::Io`] for other file-system failures.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();

        let raw: BTreeMap<String, ActionName> = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|source| PersistenceError::Malformed {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let store = Self {
                    path,
                    table: BTreeMap::new(),
                    durable: true,
                };
                store.persist()?;
                info!(path = %store.path.display(), "created empty mapping store");
                return Ok(store);
            }
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };
        let table = normalize_keys(&path, raw)?;

        Ok(Self {
            path,
            table,
            durable: true,
        })
    }

    /// Loads the store, degrading to an empty in-memory table on failure.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load(path.clone()) {
            Ok(store) => store,
            Err(e) => {
                error!("{e}; continuing with an empty in-memory mapping table");
                Self::in_memory(path)
            }
        }
    }

    /// Creates an empty store that never writes to `path`.
    pub fn in_memory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: BTreeMap::new(),
            durable: false,
        }
    }

    /// Logs a warning for every entry whose action `registry` does not know.
    ///
    /// Such entries are kept; tapping them reports an invariant violation.
    pub fn warn_unknown_actions(&self, registry: &ActionRegistry) -> usize {
        let mut unknown = 0;
        for (tag, action) in &self.table {
            if registry.resolve(action.as_str()).is_none() {
                warn!(tag = %tag, action = %action, "mapping refers to an unknown action");
                unknown += 1;
            }
        }
        unknown
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `false` when running in degraded, in-memory-only mode.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Number of mapped tags.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// `true` when no tag is mapped.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Writes the full table via temp-file-then-rename.
    fn persist(&self) -> Result<(), PersistenceError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|source| PersistenceError::Io {
            path: dir.clone(),
            source,
        })?;

        let body = toml::to_string(&self.table)?;
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mappings.toml".to_string());
        let tmp_path = dir.join(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

        let write_tmp = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(FILE_HEADER.as_bytes())?;
            file.write_all(body.as_bytes())?;
            file.sync_all()
        };
        if let Err(source) = write_tmp().and_then(|()| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(PersistenceError::Io {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }
}

/// Parses every file key into a [`TagIdentifier`], refusing collisions.
fn normalize_keys(
    path: &Path,
    raw: BTreeMap<String, ActionName>,
) -> Result<BTreeMap<TagIdentifier, ActionName>, PersistenceError> {
    let mut seen: BTreeMap<TagIdentifier, (String, ActionName)> = BTreeMap::new();
    for (key, action) in raw {
        let tag = TagIdentifier::parse(&key).map_err(|source| PersistenceError::InvalidTag {
            path: path.to_path_buf(),
            key: key.clone(),
            source,
        })?;
        if let Some((first_key, first_action)) = seen.get(&tag) {
            return Err(PersistenceError::DuplicateTag {
                path: path.to_path_buf(),
                first_key: first_key.clone(),
                first_action: first_action.to_string(),
                second_key: key,
                second_action: action.to_string(),
                tag,
            });
        }
        seen.insert(tag, (key, action));
    }
    Ok(seen
        .into_iter()
        .map(|(tag, (_, action))| (tag, action))
        .collect())
}

impl MappingRepository for TomlMappingStore {
    fn get(&self, id: &TagIdentifier) -> Option<ActionName> {
        self.table.get(id).cloned()
    }

    fn set(&mut self, id: TagIdentifier, action: ActionName) -> Result<(), PersistenceError> {
        self.table.insert(id, action);
        if !self.durable {
            return Err(PersistenceError::InMemoryOnly {
                path: self.path.clone(),
            });
        }
        self.persist()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use tapkey_core::Platform;

    use super::*;

    /// Temporary directory removed on drop.
    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("tapkey_test_{}", Uuid::new_v4()));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn file(&self, name: &str) -> PathBuf {
            self.0.join(name)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            fs::remove_dir_all(&self.0).ok();
        }
    }

    fn tag(s: &str) -> TagIdentifier {
        TagIdentifier::parse(s).unwrap()
    }

    // ── load ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_missing_file_creates_empty_store() {
        // Arrange
        let dir = TempDir::new();
        let path = dir.file("nested/mappings.toml");

        // Act
        let store = TomlMappingStore::load(&path).unwrap();

        // Assert
        assert!(store.is_empty());
        assert!(store.is_durable());
        assert!(path.exists(), "bootstrap must create the file");
    }

    #[test]
    fn test_load_is_idempotent_on_bootstrapped_file() {
        let dir = TempDir::new();
        let path = dir.file("mappings.toml");

        TomlMappingStore::load(&path).unwrap();
        let again = TomlMappingStore::load(&path).unwrap();

        assert!(again.is_empty());
    }

    #[test]
    fn test_load_normalizes_hand_written_entries() {
        let dir = TempDir::new();
        let path = dir.file("mappings.toml");
        fs::write(&path, "\"04a224b2\" = \"RIGHT\"\n").unwrap();

        let store = TomlMappingStore::load(&path).unwrap();

        assert_eq!(store.get(&tag("04A224B2")).unwrap().as_str(), "right");
    }

    #[test]
    fn test_load_rejects_keys_that_collapse_onto_one_tag() {
        // Arrange: same tag written twice with different case
        let dir = TempDir::new();
        let path = dir.file("mappings.toml");
        fs::write(&path, "\"04a224b2\" = \"left\"\n04A224B2 = \"right\"\n").unwrap();

        // Act
        let err = TomlMappingStore::load(&path).unwrap_err();

        // Assert – both entries are named so the operator can pick one
        match err {
            PersistenceError::DuplicateTag {
                tag: dup,
                first_key,
                first_action,
                second_key,
                second_action,
                ..
            } => {
                assert_eq!(dup, tag("04A224B2"));
                assert_eq!((first_key.as_str(), first_action.as_str()), ("04A224B2", "right"));
                assert_eq!((second_key.as_str(), second_action.as_str()), ("04a224b2", "left"));
            }
            other => panic!("expected DuplicateTag, got {other:?}"),
        }
    }

    #[test]
    fn test_open_with_colliding_keys_keeps_file_intact() {
        let dir = TempDir::new();
        let path = dir.file("mappings.toml");
        let content = "\" 04A224B2\" = \"left\"\n04A224B2 = \"right\"\n";
        fs::write(&path, content).unwrap();

        let mut store = TomlMappingStore::open(&path);
        let result = store.set(tag("CAFE"), ActionName::normalized("enter"));

        assert!(!store.is_durable());
        assert!(matches!(result, Err(PersistenceError::InMemoryOnly { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_load_blank_key_is_an_invalid_tag() {
        let dir = TempDir::new();
        let path = dir.file("mappings.toml");
        fs::write(&path, "\"  \" = \"left\"\n").unwrap();

        let err = TomlMappingStore::load(&path).unwrap_err();

        assert!(matches!(err, PersistenceError::InvalidTag { ref key, .. } if key == "  "));
    }

    #[test]
    fn test_load_malformed_file_is_an_error() {
        let dir = TempDir::new();
        let path = dir.file("mappings.toml");
        fs::write(&path, "[[[ not toml").unwrap();

        let err = TomlMappingStore::load(&path).unwrap_err();

        assert!(matches!(err, PersistenceError::Malformed { .. }));
    }

    #[test]
    fn test_open_degrades_to_in_memory_and_leaves_file_untouched() {
        // Arrange
        let dir = TempDir::new();
        let path = dir.file("mappings.toml");
        fs::write(&path, "04A224B2 = [1, 2]\n").unwrap();

        // Act
        let mut store = TomlMappingStore::open(&path);
        let result = store.set(tag("CAFE"), ActionName::normalized("left"));

        // Assert
        assert!(!store.is_durable());
        assert!(matches!(result, Err(PersistenceError::InMemoryOnly { .. })));
        assert_eq!(store.get(&tag("CAFE")).unwrap().as_str(), "left");
        assert_eq!(fs::read_to_string(&path).unwrap(), "04A224B2 = [1, 2]\n");
    }

    // ── set ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_set_then_get_round_trips_across_reload() {
        // Arrange
        let dir = TempDir::new();
        let path = dir.file("mappings.toml");
        let mut store = TomlMappingStore::load(&path).unwrap();

        // Act
        store
            .set(tag("04A224B2"), ActionName::normalized("right"))
            .unwrap();
        let reloaded = TomlMappingStore::load(&path).unwrap();

        // Assert
        assert_eq!(store.get(&tag("04A224B2")).unwrap().as_str(), "right");
        assert_eq!(reloaded.get(&tag("04A224B2")).unwrap().as_str(), "right");
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_set_is_last_write_wins() {
        let dir = TempDir::new();
        let path = dir.file("mappings.toml");
        let mut store = TomlMappingStore::load(&path).unwrap();

        store.set(tag("AA"), ActionName::normalized("left")).unwrap();
        store.set(tag("AA"), ActionName::normalized("right")).unwrap();

        let reloaded = TomlMappingStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get(&tag("AA")).unwrap().as_str(), "right");
    }

    #[test]
    fn test_set_writes_human_readable_file_without_leftover_temp_files() {
        let dir = TempDir::new();
        let path = dir.file("mappings.toml");
        let mut store = TomlMappingStore::load(&path).unwrap();

        store
            .set(tag("04A224B2"), ActionName::normalized("right"))
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(FILE_HEADER));
        assert!(content.contains("04A224B2 = \"right\""), "got: {content}");
        let entries: Vec<_> = fs::read_dir(&dir.0).unwrap().collect();
        assert_eq!(entries.len(), 1, "only the mapping file may remain");
    }

    #[test]
    fn test_set_failure_keeps_in_memory_entry() {
        // Arrange: the store path is a directory, so the final rename fails
        let dir = TempDir::new();
        let path = dir.file("mappings.toml");
        let mut store = TomlMappingStore::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        fs::create_dir_all(path.join("blocker")).unwrap();

        // Act
        let result = store.set(tag("BEEF"), ActionName::normalized("enter"));

        // Assert
        assert!(matches!(result, Err(PersistenceError::Io { .. })));
        assert_eq!(store.get(&tag("BEEF")).unwrap().as_str(), "enter");
    }

    // ── diagnostics ───────────────────────────────────────────────────────────

    #[test]
    fn test_warn_unknown_actions_counts_but_keeps_entries() {
        let dir = TempDir::new();
        let path = dir.file("mappings.toml");
        fs::write(&path, "AA = \"left\"\nBB = \"banana\"\n").unwrap();
        let store = TomlMappingStore::load(&path).unwrap();

        let unknown = store.warn_unknown_actions(&ActionRegistry::new(Platform::Linux));

        assert_eq!(unknown, 1);
        assert_eq!(store.len(), 2);
    }
}
