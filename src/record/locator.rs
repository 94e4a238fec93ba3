//! Record locators
//!
//! A locator is the name a record is stored under. Directory entries live at
//! `<name>_FAT`, fragments at `<name>_part<N>` with N starting at 1.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FatError, Result};

/// Suffix of every directory entry locator
pub const ENTRY_SUFFIX: &str = "_FAT";

/// Marker between the logical name and the fragment position
pub const FRAGMENT_MARKER: &str = "_part";

/// Identifier of a persisted record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Wrap an existing record name
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Locator of the directory entry for `name`
    pub fn directory_entry(name: &str) -> Self {
        Self(format!("{}{}", name, ENTRY_SUFFIX))
    }

    /// Locator of fragment `position` (1-based) of `name`'s chain
    pub fn fragment(name: &str, position: usize) -> Self {
        Self(format!("{}{}{}", name, FRAGMENT_MARKER, position))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Chain position if this is a fragment locator of `name`
    /// ("notes", "notes_part3") → Some(3)
    pub fn fragment_position(&self, name: &str) -> Option<usize> {
        self.0
            .strip_prefix(name)?
            .strip_prefix(FRAGMENT_MARKER)?
            .parse()
            .ok()
    }

    /// Logical file name if this is a directory entry locator
    /// "notes_FAT" → Some("notes")
    pub fn entry_name(&self) -> Option<&str> {
        self.0.strip_suffix(ENTRY_SUFFIX)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check a logical file name and return it trimmed
///
/// Names must map to exactly one record file inside the data directory, so
/// path separators, NUL and the relative directory names are rejected.
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(FatError::InvalidInput(
            "file name must not be empty".to_string(),
        ));
    }

    if trimmed == "." || trimmed == ".." {
        return Err(FatError::InvalidInput(format!(
            "'{}' is not a valid file name",
            trimmed
        )));
    }

    if let Some(bad) = trimmed.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(FatError::InvalidInput(format!(
            "file name '{}' contains forbidden character {:?}",
            trimmed.escape_default(),
            bad
        )));
    }

    Ok(trimmed)
}
