//! Configuration for fatsim
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{FatError, Result};

/// Main configuration for a fatsim instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all record files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── {name}_FAT.json      (directory entry)
    ///     └── {name}_part{N}.json  (fragment N of the chain)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Directory Configuration
    // -------------------------------------------------------------------------
    /// What `create_file` does when the name already has an entry
    pub on_existing: ExistingFilePolicy,
}

/// Name collision policy for `create_file`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingFilePolicy {
    /// Fail with `AlreadyExists` (live or soft-deleted entries alike)
    Reject,

    /// Replace the old file with a brand-new one (fresh creation time, live)
    Overwrite,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./fatsim_data"),
            on_existing: ExistingFilePolicy::Reject,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config before opening a filesystem-backed instance
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(FatError::Config("data_dir must not be empty".to_string()));
        }
        if self.data_dir.is_file() {
            return Err(FatError::Config(format!(
                "data_dir {} is a file, expected a directory",
                self.data_dir.display()
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all records)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the name collision policy for `create_file`
    pub fn on_existing(mut self, policy: ExistingFilePolicy) -> Self {
        self.config.on_existing = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
