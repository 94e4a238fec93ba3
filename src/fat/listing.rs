//! Lazy file listings
//!
//! A listing snapshots the directory entry locators when created and loads
//! each entry only when the iterator reaches it.

use std::vec::IntoIter;

use crate::error::Result;
use crate::record::{self, DirectoryEntry, FileSummary, Locator};
use crate::store::RecordStore;

/// Which entries a listing yields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    /// Entries that are not soft-deleted
    Live,

    /// Soft-deleted entries only
    Deleted,
}

impl ListFilter {
    fn accepts(self, entry: &DirectoryEntry) -> bool {
        match self {
            ListFilter::Live => !entry.is_deleted,
            ListFilter::Deleted => entry.is_deleted,
        }
    }
}

/// Iterator over file summaries, ordered by file name
///
/// Entries removed after the scan are skipped. Entries that fail to load
/// are yielded as errors and iteration can continue past them.
pub struct FileListing<'a, S: RecordStore> {
    store: &'a S,
    locators: IntoIter<Locator>,
    filter: ListFilter,
}

impl<'a, S: RecordStore> FileListing<'a, S> {
    pub(crate) fn new(store: &'a S, mut locators: Vec<Locator>, filter: ListFilter) -> Self {
        // Sort by logical name, not by raw locator: "a!" must not precede "a"
        locators.sort_by(|a, b| a.entry_name().cmp(&b.entry_name()));

        Self {
            store,
            locators: locators.into_iter(),
            filter,
        }
    }

    /// Number of entries still to be examined (before filtering)
    pub fn remaining(&self) -> usize {
        self.locators.len()
    }
}

impl<S: RecordStore> Iterator for FileListing<'_, S> {
    type Item = Result<FileSummary>;

    fn next(&mut self) -> Option<Self::Item> {
        for locator in self.locators.by_ref() {
            let bytes = match self.store.get(&locator) {
                Ok(Some(bytes)) => bytes,
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            };

            let entry: DirectoryEntry = match record::decode(&bytes) {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e)),
            };

            if self.filter.accepts(&entry) {
                return Some(Ok(entry.summary()));
            }
        }

        None
    }
}
