//! FAT Module
//!
//! The storage service: builds, walks and replaces fragment chains and
//! manages the soft-delete state of directory entries.
//!
//! ## Responsibilities
//! - Split content into fixed-size fragments and persist the chain
//! - Reassemble content by walking the chain with a hard step bound
//! - Replace a chain in place on modify
//! - Soft-delete / recover directory entries
//! - Lazily enumerate live and deleted files
//!
//! ## Write Ordering
//! Fragments are always written before the directory entry that points at
//! them, and a replacement chain never reuses a locator of the chain it
//! replaces. The entry write is the single switch-over point: if anything
//! fails before it, the previous entry still points at its intact chain and
//! the fragments written so far are removed again.

mod chain;
mod listing;
mod system;

pub use chain::{fragment_count, split_payload};
pub use listing::{FileListing, ListFilter};
pub use system::FatSystem;
