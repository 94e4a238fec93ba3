//! Filesystem record store
//!
//! Each record is a `<locator>.json` file directly inside the data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::record::Locator;

use super::RecordStore;

/// Record store backed by a host directory
pub struct FsRecordStore {
    /// Directory where record files are stored
    root: PathBuf,
}

impl FsRecordStore {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const RECORD_EXTENSION: &'static str = "json";
    const TEMP_EXTENSION: &'static str = "json.tmp";

    /// Open or create a store in the given directory
    pub fn open(path: &Path) -> Result<Self> {
        fs::create_dir_all(path)?;

        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    /// Get the root directory path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host path of the file holding `locator`
    pub fn record_path(&self, locator: &Locator) -> PathBuf {
        let file_name = format!("{}.{}", locator.as_str(), Self::RECORD_EXTENSION);
        self.root.join(file_name)
    }

    fn temp_path(&self, locator: &Locator) -> PathBuf {
        let file_name = format!("{}.{}", locator.as_str(), Self::TEMP_EXTENSION);
        self.root.join(file_name)
    }

    /// Parse a locator from a record filename
    /// "notes_part3.json" → Some("notes_part3")
    fn parse_locator(path: &Path) -> Option<Locator> {
        let file_name = path.file_name()?.to_str()?;
        let stem = file_name.strip_suffix(Self::RECORD_EXTENSION)?.strip_suffix('.')?;
        Some(Locator::new(stem))
    }
}

impl RecordStore for FsRecordStore {
    fn get(&self, locator: &Locator) -> Result<Option<Vec<u8>>> {
        match fs::read(self.record_path(locator)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a temp file first, then rename over the target, so readers
    /// never observe a half-written record.
    fn put(&self, locator: &Locator, bytes: &[u8]) -> Result<()> {
        let temp = self.temp_path(locator);
        fs::write(&temp, bytes)?;

        if let Err(e) = fs::rename(&temp, self.record_path(locator)) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        Ok(())
    }

    fn delete(&self, locator: &Locator) -> Result<bool> {
        match fs::remove_file(self.record_path(locator)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, suffix: &str) -> Result<Vec<Locator>> {
        let mut locators = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let path = entry.path();
            if let Some(locator) = Self::parse_locator(&path) {
                if locator.as_str().ends_with(suffix) {
                    locators.push(locator);
                }
            }
        }

        locators.sort();
        Ok(locators)
    }

    fn contains(&self, locator: &Locator) -> Result<bool> {
        match fs::metadata(self.record_path(locator)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
