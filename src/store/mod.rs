//! Record Store Module
//!
//! Persistence seam for directory entries and fragments.
//!
//! ## Responsibilities
//! - Get/put/delete opaque record documents by locator
//! - List locators by suffix (used to enumerate directory entries)
//!
//! ## Implementations
//! - `FsRecordStore`: one `<locator>.json` host file per record
//! - `MemoryRecordStore`: ordered in-memory map, for tests and benchmarks

mod fs;
mod memory;

pub use fs::FsRecordStore;
pub use memory::MemoryRecordStore;

use crate::error::Result;
use crate::record::Locator;

/// Storage backend for records
///
/// All methods take `&self`; implementations handle their own interior
/// mutability so a store can sit behind a shared `FatSystem`.
pub trait RecordStore: Send + Sync {
    /// Load a record
    ///
    /// Returns:
    /// - `Ok(Some(bytes))` — record exists
    /// - `Ok(None)` — no record under this locator
    fn get(&self, locator: &Locator) -> Result<Option<Vec<u8>>>;

    /// Create or replace a record
    fn put(&self, locator: &Locator, bytes: &[u8]) -> Result<()>;

    /// Remove a record, returning whether it existed
    fn delete(&self, locator: &Locator) -> Result<bool>;

    /// All locators ending in `suffix`, sorted
    fn list(&self, suffix: &str) -> Result<Vec<Locator>>;

    /// Whether a record exists under `locator`
    fn contains(&self, locator: &Locator) -> Result<bool> {
        Ok(self.get(locator)?.is_some())
    }
}
