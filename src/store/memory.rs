//! In-memory record store
//!
//! BTreeMap-based store with RwLock for concurrency.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::Result;
use crate::record::Locator;

use super::RecordStore;

/// Record store that keeps everything in RAM
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryRecordStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, locator: &Locator) -> Result<Option<Vec<u8>>> {
        Ok(self.records.read().get(locator.as_str()).cloned())
    }

    fn put(&self, locator: &Locator, bytes: &[u8]) -> Result<()> {
        self.records
            .write()
            .insert(locator.as_str().to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, locator: &Locator) -> Result<bool> {
        Ok(self.records.write().remove(locator.as_str()).is_some())
    }

    fn list(&self, suffix: &str) -> Result<Vec<Locator>> {
        // BTreeMap iteration is already sorted
        Ok(self
            .records
            .read()
            .keys()
            .filter(|key| key.ends_with(suffix))
            .map(|key| Locator::new(key.as_str()))
            .collect())
    }

    fn contains(&self, locator: &Locator) -> Result<bool> {
        Ok(self.records.read().contains_key(locator.as_str()))
    }
}
