//! The [`FileId`] identifier type.

use crate::{UuidError, UuidResult};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Identifier of a single upload, always held in canonical hyphenated lowercase form.
///
/// # Construction
/// - [`FileId::new`] generates a fresh random identifier for a new upload.
/// - [`FileId::parse`] validates an identifier supplied by a client.
///
/// Once you hold a `FileId` the string form is guaranteed canonical, so it can be compared,
/// stored and turned into a file name without further checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileId(Uuid);

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl FileId {
    /// Generates a new random identifier (RFC 4122 version 4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// Uppercase, braced, URN and simple (no hyphen) spellings are rejected rather than
    /// normalised.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not canonical.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "file id must be a lowercase hyphenated UUID, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("invalid file id '{}': {}", input, e)))
    }

    /// Returns true if `input` is a lowercase hyphenated UUID (`8-4-4-4-12` hex groups).
    pub fn is_canonical(input: &str) -> bool {
        let bytes = input.as_bytes();
        bytes.len() == 36
            && bytes.iter().enumerate().all(|(i, b)| match i {
                8 | 13 | 18 | 23 => *b == b'-',
                _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
            })
    }

    /// Returns the underlying `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// File name of the upload target: `<id>.<ext>`, or `<id>` for an empty extension.
    pub fn storage_file_name(&self, ext: &str) -> String {
        if ext.is_empty() {
            self.to_string()
        } else {
            format!("{}.{}", self, ext)
        }
    }

    /// Full path of the upload target under `upload_dir`.
    pub fn storage_path(&self, upload_dir: &Path, ext: &str) -> PathBuf {
        upload_dir.join(self.storage_file_name(ext))
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for FileId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FileId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FileId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FileId::parse(&s).map_err(serde::de::Error::custom)
    }
}
