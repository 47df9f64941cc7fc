//! Fixed-width names as stored in G3D records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Width in bytes of every name and texture field on disk.
pub const NAME_FIELD_LEN: usize = 64;

/// A text value stored on disk as a null-padded 64-byte field.
///
/// Decoded names remember the exact bytes of their field, including whatever
/// follows the first NUL, so that re-encoding reproduces the source bit for
/// bit. Replacing the text drops those bytes and the name is re-padded with
/// NULs when written. Equality and hashing only look at the text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixedName {
    text: String,
    #[serde(skip)]
    field: Option<Vec<u8>>,
}

impl FixedName {
    /// Create a name from text; it will be null-padded when encoded
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            field: None,
        }
    }

    /// Create a name from a raw on-disk field, keeping the field verbatim
    pub fn from_field(field: &[u8; NAME_FIELD_LEN]) -> Self {
        let end = field.iter().position(|&b| b == 0).unwrap_or(NAME_FIELD_LEN);
        let text = String::from_utf8_lossy(&field[..end]).trim().to_string();
        Self {
            text,
            field: Some(field.to_vec()),
        }
    }

    /// The text of the name, up to the first NUL
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Check if the name is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length of the text in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Replace the text, discarding any preserved on-disk bytes
    pub fn set<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
        self.field = None;
    }

    /// Whether this name still carries the exact bytes it was decoded from
    pub fn is_verbatim(&self) -> bool {
        self.field.is_some()
    }

    /// Produce the 64-byte on-disk field.
    ///
    /// Returns `None` when the text does not fit in the field.
    pub fn to_field(&self) -> Option<[u8; NAME_FIELD_LEN]> {
        let mut out = [0u8; NAME_FIELD_LEN];
        match &self.field {
            Some(field) => out.copy_from_slice(field),
            None => {
                let bytes = self.text.as_bytes();
                if bytes.len() > NAME_FIELD_LEN {
                    return None;
                }
                out[..bytes.len()].copy_from_slice(bytes);
            }
        }
        Some(out)
    }
}

impl PartialEq for FixedName {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for FixedName {}

impl Hash for FixedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for FixedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for FixedName {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for FixedName {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
