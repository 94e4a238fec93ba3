//! Directory entries
//!
//! Metadata for one logical file plus the head of its fragment chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Locator;

/// Directory entry for a logical file
///
/// Invariants kept by the methods below:
/// - `deleted_at.is_some() == is_deleted`
/// - `length` is the character total of the current chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub name: String,

    /// First fragment of the chain; `None` for an empty file
    #[serde(rename = "firstFragmentPath")]
    pub first_fragment: Option<Locator>,

    pub is_deleted: bool,

    /// Character count of the content at last write
    pub length: usize,

    pub created_at: DateTime<Utc>,

    pub modified_at: DateTime<Utc>,

    pub deleted_at: Option<DateTime<Utc>>,
}

impl DirectoryEntry {
    /// Create a live entry stamped with `now`
    pub fn new(
        name: impl Into<String>,
        first_fragment: Option<Locator>,
        length: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            first_fragment,
            is_deleted: false,
            length,
            created_at: now,
            modified_at: now,
            deleted_at: None,
        }
    }

    /// Point the entry at a new chain, keeping creation time and delete state
    pub fn replace_chain(
        &mut self,
        first_fragment: Option<Locator>,
        length: usize,
        now: DateTime<Utc>,
    ) {
        self.first_fragment = first_fragment;
        self.length = length;
        self.modified_at = now;
    }

    /// Soft-delete; re-stamps `deleted_at` when already deleted
    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(now);
    }

    /// Undo a soft-delete
    pub fn mark_recovered(&mut self, now: DateTime<Utc>) {
        self.is_deleted = false;
        self.deleted_at = None;
        self.modified_at = now;
    }

    pub fn summary(&self) -> FileSummary {
        FileSummary {
            name: self.name.clone(),
            length: self.length,
            created_at: self.created_at,
            modified_at: self.modified_at,
            deleted_at: self.deleted_at,
        }
    }
}

/// Listing row for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub length: usize,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
