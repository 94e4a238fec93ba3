//! Record Module
//!
//! The two persisted record kinds and how they are named and encoded.
//!
//! ## Responsibilities
//! - Directory entries: metadata and chain head for one logical file
//! - Fragment records: one chain node holding up to `MAX_FRAGMENT_LEN` characters
//! - Locators: derive record names from logical file names
//! - JSON codec shared by both record kinds
//!
//! ## Record Layout
//! ```text
//!  report_FAT          report_part1         report_part2
//! ┌──────────────┐    ┌──────────────┐     ┌──────────────┐
//! │ name         │    │ payload (20) │     │ payload (5)  │
//! │ length = 25  │    │ next ────────┼───► │ next = null  │
//! │ first ───────┼──► │ isEnd = false│     │ isEnd = true │
//! └──────────────┘    └──────────────┘     └──────────────┘
//! ```

mod codec;
mod entry;
mod fragment;
mod locator;

pub use codec::{decode, encode};
pub use entry::{DirectoryEntry, FileSummary};
pub use fragment::{FragmentRecord, MAX_FRAGMENT_LEN};
pub use locator::{validate_name, Locator, ENTRY_SUFFIX, FRAGMENT_MARKER};
