//! FAT system
//!
//! Owns the mapping from logical file names to directory entries and chains.

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::{Config, ExistingFilePolicy};
use crate::error::{FatError, Result};
use crate::record::{self, validate_name, DirectoryEntry, FragmentRecord, Locator, ENTRY_SUFFIX};
use crate::store::{FsRecordStore, RecordStore};

use super::chain::{
    build_chain, chain_start, collect_locators, discard_chain, fragment_count, walk_chain,
    write_chain,
};
use super::listing::{FileListing, ListFilter};

/// The storage service
///
/// ## Concurrency Model
///
/// Every operation holds `op_lock` for its whole duration, so one instance
/// can be shared between threads. Nothing guards against a second process
/// working on the same data directory; callers must serialize that
/// externally.
///
/// Listings are lazy and do not hold the lock while iterating.
pub struct FatSystem<S: RecordStore = FsRecordStore> {
    /// Instance configuration
    config: Config,

    /// Where records live
    store: S,

    /// Serializes operations
    op_lock: Mutex<()>,
}

impl FatSystem<FsRecordStore> {
    /// Open or create a filesystem-backed instance in `config.data_dir`
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let store = FsRecordStore::open(&config.data_dir)?;
        info!(data_dir = %config.data_dir.display(), "opened record store");
        Ok(Self::with_store(config, store))
    }
}

impl<S: RecordStore> FatSystem<S> {
    /// Build an instance over any record store
    pub fn with_store(config: Config, store: S) -> Self {
        Self {
            config,
            store,
            op_lock: Mutex::new(()),
        }
    }

    /// Create a file from `data`
    ///
    /// Steps:
    /// 1. Validate the name and apply the collision policy
    /// 2. Write every fragment, first to last (numbered from 1, or clear of
    ///    the old chain on overwrite)
    /// 3. Write the directory entry pointing at the first fragment
    /// 4. On overwrite, drop the old chain
    ///
    /// If a write fails, the fragments written so far are removed and any
    /// previous entry keeps pointing at its untouched chain.
    pub fn create_file(&self, name: &str, data: &str) -> Result<()> {
        let name = validate_name(name)?;
        let _guard = self.op_lock.lock();

        let entry_locator = Locator::directory_entry(name);
        let previous = self.load_entry(&entry_locator)?;

        let stale = match (&previous, self.config.on_existing) {
            (Some(_), ExistingFilePolicy::Reject) => {
                return Err(FatError::AlreadyExists(name.to_string()));
            }
            (Some(old), ExistingFilePolicy::Overwrite) => {
                info!(file = name, "overwriting existing file");
                collect_locators(&self.store, old)?
            }
            (None, _) => Vec::new(),
        };

        let start = chain_start(name, &stale, fragments_for(data));
        let chain = build_chain(name, data, start);
        write_chain(&self.store, &chain)?;

        let length = data.chars().count();
        let entry = DirectoryEntry::new(name, head_of(&chain), length, Utc::now());
        self.commit_entry(&entry_locator, &entry, &chain)?;

        self.prune(&stale, &chain)?;

        info!(file = name, length, fragments = chain.len(), "created file");
        Ok(())
    }

    /// Read a file's content by walking its chain
    ///
    /// Soft-deleted files are still readable.
    pub fn read_file(&self, name: &str) -> Result<String> {
        let name = validate_name(name)?;
        let _guard = self.op_lock.lock();

        let entry = self.require_entry(name)?;
        let chain = walk_chain(&self.store, &entry)?;

        let mut content = String::with_capacity(entry.length);
        for (_, fragment) in &chain {
            content.push_str(&fragment.payload);
        }

        debug!(file = name, fragments = chain.len(), "read file");
        Ok(content)
    }

    /// Replace a file's content
    ///
    /// Keeps `created_at` and the soft-delete state; bumps `modified_at`.
    /// The new chain is written at positions the old chain does not use,
    /// the entry is switched over in a single write, then the old chain is
    /// deleted. A failed write leaves the old entry and chain as they were.
    pub fn modify_file(&self, name: &str, new_data: &str) -> Result<()> {
        let name = validate_name(name)?;
        let _guard = self.op_lock.lock();

        let mut entry = self.require_entry(name)?;
        let old = collect_locators(&self.store, &entry)?;

        let start = chain_start(name, &old, fragments_for(new_data));
        let chain = build_chain(name, new_data, start);
        write_chain(&self.store, &chain)?;

        let length = new_data.chars().count();
        entry.replace_chain(head_of(&chain), length, Utc::now());
        self.commit_entry(&Locator::directory_entry(name), &entry, &chain)?;

        let removed = self.prune(&old, &chain)?;

        info!(
            file = name,
            length,
            fragments = chain.len(),
            removed,
            "modified file"
        );
        Ok(())
    }

    /// Soft-delete a file; fragments are left untouched
    pub fn delete_file(&self, name: &str) -> Result<()> {
        let name = validate_name(name)?;
        let _guard = self.op_lock.lock();

        let mut entry = self.require_entry(name)?;
        entry.mark_deleted(Utc::now());
        self.save_entry(name, &entry)?;

        info!(file = name, "deleted file");
        Ok(())
    }

    /// Undo a soft-delete
    pub fn recover_file(&self, name: &str) -> Result<()> {
        let name = validate_name(name)?;
        let _guard = self.op_lock.lock();

        let mut entry = self.require_entry(name)?;
        entry.mark_recovered(Utc::now());
        self.save_entry(name, &entry)?;

        info!(file = name, "recovered file");
        Ok(())
    }

    /// Lazily list files that are not soft-deleted, ordered by name
    pub fn list_files(&self) -> Result<FileListing<'_, S>> {
        self.listing(ListFilter::Live)
    }

    /// Lazily list soft-deleted files, ordered by name
    pub fn list_deleted_files(&self) -> Result<FileListing<'_, S>> {
        self.listing(ListFilter::Deleted)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Load the directory entry of `name`
    pub fn entry(&self, name: &str) -> Result<DirectoryEntry> {
        let name = validate_name(name)?;
        let _guard = self.op_lock.lock();
        self.require_entry(name)
    }

    /// Walk and validate the chain of `name`, returning every fragment in order
    pub fn fragments(&self, name: &str) -> Result<Vec<(Locator, FragmentRecord)>> {
        let name = validate_name(name)?;
        let _guard = self.op_lock.lock();

        let entry = self.require_entry(name)?;
        walk_chain(&self.store, &entry)
    }

    /// Whether `name` has a directory entry, live or deleted
    pub fn exists(&self, name: &str) -> Result<bool> {
        let name = validate_name(name)?;
        let _guard = self.op_lock.lock();
        self.store.contains(&Locator::directory_entry(name))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the underlying record store
    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn listing(&self, filter: ListFilter) -> Result<FileListing<'_, S>> {
        let locators = {
            let _guard = self.op_lock.lock();
            self.store.list(ENTRY_SUFFIX)?
        };
        debug!(?filter, candidates = locators.len(), "listing files");
        Ok(FileListing::new(&self.store, locators, filter))
    }

    fn load_entry(&self, locator: &Locator) -> Result<Option<DirectoryEntry>> {
        match self.store.get(locator)? {
            Some(bytes) => record::decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    fn require_entry(&self, name: &str) -> Result<DirectoryEntry> {
        self.load_entry(&Locator::directory_entry(name))?
            .ok_or_else(|| FatError::NotFound(name.to_string()))
    }

    /// Write the entry for a freshly written chain; drop the chain if that fails
    fn commit_entry(
        &self,
        locator: &Locator,
        entry: &DirectoryEntry,
        chain: &[(Locator, FragmentRecord)],
    ) -> Result<()> {
        let written = record::encode(entry).and_then(|bytes| self.store.put(locator, &bytes));
        if let Err(e) = written {
            discard_chain(&self.store, chain);
            return Err(e);
        }
        Ok(())
    }

    fn save_entry(&self, name: &str, entry: &DirectoryEntry) -> Result<()> {
        self.store
            .put(&Locator::directory_entry(name), &record::encode(entry)?)
    }

    /// Delete `old` locators that the new `chain` does not occupy
    fn prune(&self, old: &[Locator], chain: &[(Locator, FragmentRecord)]) -> Result<usize> {
        let mut removed = 0;
        for locator in old {
            if chain.iter().any(|(kept, _)| kept == locator) {
                continue;
            }
            if self.store.delete(locator)? {
                debug!(locator = %locator, "removed stale fragment");
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn fragments_for(data: &str) -> usize {
    fragment_count(data.chars().count())
}

fn head_of(chain: &[(Locator, FragmentRecord)]) -> Option<Locator> {
    chain.first().map(|(locator, _)| locator.clone())
}
