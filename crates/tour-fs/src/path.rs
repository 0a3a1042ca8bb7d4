//! Archive-internal entry paths

use crate::{Error, Result};

/// A path inside a zip archive.
///
/// Always uses forward slashes, carries no leading `/`, and contains no
/// empty or `.` segments. `..` segments are rejected so an entry can never
/// point outside the archive root when extracted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryPath {
    inner: String,
}

impl EntryPath {
    /// Normalize an entry name such as `/copiedDebug.log` or `docs\\a.txt`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEntryPath`] if the name is empty after
    /// normalization or contains a `..` segment.
    pub fn new(entry: &str) -> Result<Self> {
        let normalized = entry.replace('\\', "/");
        let mut segments = Vec::new();
        for segment in normalized.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(Error::InvalidEntryPath {
                        entry: entry.to_string(),
                    });
                }
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(Error::InvalidEntryPath {
                entry: entry.to_string(),
            });
        }

        Ok(Self {
            inner: segments.join("/"),
        })
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl std::fmt::Display for EntryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
