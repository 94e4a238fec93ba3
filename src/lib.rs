//! # fatsim
//!
//! A simulated File Allocation Table on top of a record store:
//! - Each logical file is a directory entry plus a linked chain of fragments
//! - Fragments hold at most 20 characters and point at their successor
//! - Soft delete and recovery touch only the directory entry
//! - Records are human-readable JSON documents, one per host file
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         CLI / Shell                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        FatSystem                             │
//! │        (create / read / modify / delete / recover / list)    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Directory  │          │  Fragment   │
//!   │   Entries   │ ───────► │   Chains    │
//!   └──────┬──────┘          └──────┬──────┘
//!          └────────────┬────────────┘
//!                       ▼
//!               ┌──────────────┐
//!               │ RecordStore  │
//!               │ (fs / memory)│
//!               └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod store;
pub mod fat;
pub mod command;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FatError, Result};
pub use config::{Config, ExistingFilePolicy};
pub use command::{Command, Outcome};
pub use fat::FatSystem;
pub use record::{DirectoryEntry, FileSummary, FragmentRecord, Locator, MAX_FRAGMENT_LEN};
pub use store::{FsRecordStore, MemoryRecordStore, RecordStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of fatsim
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
