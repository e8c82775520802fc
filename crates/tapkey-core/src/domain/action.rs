//! The [`ActionName`] a tag is mapped to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical name of a keyboard action, e.g. `"right"` or `"enter"`.
///
/// Names are case-insensitive and stored trimmed and lowercased.  Membership
/// in the known set is checked by
/// [`ActionRegistry::validate`](crate::registry::ActionRegistry::validate),
/// which is the only constructor used on the assignment path.  Names read back
/// from disk go through [`ActionName::normalized`] and are checked again when
/// they are resolved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ActionName(String);

impl ActionName {
    /// Normalizes `raw` without checking it against the registry.
    pub fn normalized(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Returns the normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ActionName {
    fn from(value: String) -> Self {
        Self::normalized(&value)
    }
}

impl From<ActionName> for String {
    fn from(name: ActionName) -> Self {
        name.0
    }
}
