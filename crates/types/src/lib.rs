//! Validated text types shared across the upload tracker crates.
//!
//! Values arriving from clients are plain strings. These wrappers make the checks explicit at the
//! boundary so that the core can rely on them afterwards:
//! - [`NonEmptyText`] for the original file name
//! - [`FileExtension`] for the extension that becomes part of the on-disk file name

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,

    /// The extension would escape the upload directory or is not a plain name
    #[error("invalid file extension: '{0}'")]
    InvalidExtension(String),
}

/// A string type that guarantees non-blank content.
///
/// The input is kept exactly as given, surrounding whitespace included. Only an input that is
/// empty or all whitespace is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the input is empty or contains only whitespace.
    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(input))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A file extension that is safe to append to a server-generated file name.
///
/// The extension may be empty (the upload is stored without a suffix). A single leading `.` is
/// accepted and dropped, so `"png"` and `".png"` are equivalent. Anything that could change the
/// directory the file lands in (separators, `..`, NUL) is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileExtension(String);

impl FileExtension {
    /// Validates a client-supplied extension.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::InvalidExtension`] if the extension contains a path separator,
    /// a `..` sequence, or a NUL byte.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let raw = input.as_ref().trim();
        let ext = raw.strip_prefix('.').unwrap_or(raw);

        if ext.contains(['/', '\\', '\0']) || raw.contains("..") {
            return Err(TextError::InvalidExtension(raw.to_owned()));
        }

        Ok(Self(ext.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
