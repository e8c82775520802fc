//! Raw reader events and the [`TagIdentifier`] extracted from them.
//!
//! # Where does a tag identifier come from? (for beginners)
//!
//! Every NFC tag reports a UID (unique identifier) when it enters the field
//! of a reader.  For most tag families (MIFARE, NTAG, ...) the UID is a short
//! byte string such as `04 A2 24 B2`.  Some ISO 14443-4 devices (phones doing
//! card emulation, for example) hide their UID and instead answer an
//! application-select command with a data blob.  The reader driver hands us
//! whichever of the two it obtained, and [`extract_identifier`] turns it into
//! one normalized string key.
//!
//! # Normalization
//!
//! Identifiers are normalized exactly once, here, at ingestion:
//!
//! - byte strings are rendered as uppercase hex without separators;
//! - textual identifiers are trimmed and ASCII-uppercased.
//!
//! Downstream code (the mapping store, the dispatch engine) compares
//! identifiers byte-for-byte and never normalizes again.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// ISO 7816 "success" status word appended to application responses.
const STATUS_OK: [u8; 2] = [0x90, 0x00];

/// Error returned when a reader event carries no usable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// Neither a UID nor an application-data blob was reported.
    #[error("reader {reader:?} reported a {tag_type} tag without a usable identifier")]
    NoIdentifier { reader: String, tag_type: String },

    /// A textual identifier was empty after trimming.
    #[error("tag identifier is empty")]
    Empty,
}

/// Normalized identifier of a physical tag, used as the mapping key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagIdentifier(String);

impl TagIdentifier {
    /// Parses a textual identifier, trimming whitespace and uppercasing.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Empty`] if nothing is left after trimming.
    pub fn parse(raw: &str) -> Result<Self, ExtractionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Builds an identifier from raw UID bytes (uppercase hex).
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Empty`] for an empty byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractionError> {
        if bytes.is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(Self(to_hex_upper(bytes)))
    }

    /// Returns the normalized identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TagIdentifier {
    type Error = ExtractionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TagIdentifier> for String {
    fn from(id: TagIdentifier) -> Self {
        id.0
    }
}

/// A tag event as reported by a reader driver, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTagEvent {
    /// Name of the reader that saw the tag (e.g. `"ACS ACR122U"`).
    pub reader: String,
    /// Driver-specific tag family label (e.g. `"TAG_ISO_14443_3"`).
    pub tag_type: String,
    /// Raw UID bytes, when the tag family exposes one.
    pub uid: Option<Vec<u8>>,
    /// Application response blob, for tags that answer a select instead.
    pub data: Option<Vec<u8>>,
}

impl RawTagEvent {
    /// Convenience constructor for a UID-bearing event.
    pub fn with_uid(reader: impl Into<String>, tag_type: impl Into<String>, uid: Vec<u8>) -> Self {
        Self {
            reader: reader.into(),
            tag_type: tag_type.into(),
            uid: Some(uid),
            data: None,
        }
    }
}

/// Events produced by a tag reader adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    /// A tag entered the reader's field.
    TagPresent(RawTagEvent),
    /// A tag left the reader's field.  Informational only.
    TagRemoved(RawTagEvent),
}

/// Extracts the [`TagIdentifier`] from a raw reader event.
///
/// A non-empty UID wins.  Otherwise the application-data blob is used, with a
/// trailing `90 00` status word removed.
///
/// # Errors
///
/// Returns [`ExtractionError::NoIdentifier`] when neither source yields bytes.
pub fn extract_identifier(event: &RawTagEvent) -> Result<TagIdentifier, ExtractionError> {
    if let Some(uid) = event.uid.as_deref().filter(|uid| !uid.is_empty()) {
        return TagIdentifier::from_bytes(uid);
    }

    if let Some(data) = event.data.as_deref() {
        let payload = data.strip_suffix(&STATUS_OK[..]).unwrap_or(data);
        if payload.len() != data.len() {
            debug!(reader = %event.reader, "stripped status word from application data");
        }
        if !payload.is_empty() {
            return TagIdentifier::from_bytes(payload);
        }
    }

    Err(ExtractionError::NoIdentifier {
        reader: event.reader.clone(),
        tag_type: event.tag_type.clone(),
    })
}

fn to_hex_upper(bytes: &[u8]) -> String {
    use fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        // Writing into a String cannot fail.
        let _ = write!(out, "{b:02X}");
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
