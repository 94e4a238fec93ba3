//! Tests for FatSystem
//!
//! These tests verify:
//! - Create/read round trips, including empty and exact-multiple payloads
//! - Fragment sizing and chain termination
//! - Modify replaces the chain and keeps the creation time
//! - Soft delete / recover and the listings
//! - Name validation and collision policy

use std::collections::HashSet;

use fatsim::config::{Config, ExistingFilePolicy};
use fatsim::fat::{fragment_count, FatSystem};
use fatsim::record::{Locator, MAX_FRAGMENT_LEN};
use fatsim::store::{MemoryRecordStore, RecordStore};
use fatsim::FatError;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_memory_fat() -> FatSystem<MemoryRecordStore> {
    FatSystem::with_store(Config::default(), MemoryRecordStore::new())
}

fn setup_overwriting_fat() -> FatSystem<MemoryRecordStore> {
    let config = Config::builder()
        .on_existing(ExistingFilePolicy::Overwrite)
        .build();
    FatSystem::with_store(config, MemoryRecordStore::new())
}

fn live_names(fat: &FatSystem<MemoryRecordStore>) -> Vec<String> {
    fat.list_files()
        .unwrap()
        .map(|summary| summary.unwrap().name)
        .collect()
}

fn deleted_names(fat: &FatSystem<MemoryRecordStore>) -> Vec<String> {
    fat.list_deleted_files()
        .unwrap()
        .map(|summary| summary.unwrap().name)
        .collect()
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_create_read_round_trip() {
    let fat = setup_memory_fat();

    let inputs = [
        "",
        "a",
        "short text",
        "exactly twenty chars",
        "0123456789012345678901234567890123456789",
        "0123456789012345678901234",
        "a considerably longer piece of text that spans several fragments in the chain",
    ];

    for (i, input) in inputs.iter().enumerate() {
        let name = format!("file{}", i);
        fat.create_file(&name, input).unwrap();
        assert_eq!(fat.read_file(&name).unwrap(), *input, "input #{}", i);
    }
}

#[test]
fn test_round_trip_multibyte_characters() {
    let fat = setup_memory_fat();
    let text = "ñandú café 東京 résumé Ωmega ünïcödé";

    fat.create_file("utf8", text).unwrap();

    assert_eq!(fat.read_file("utf8").unwrap(), text);
    assert_eq!(fat.entry("utf8").unwrap().length, text.chars().count());
    for (_, fragment) in fat.fragments("utf8").unwrap() {
        assert!(fragment.payload.chars().count() <= MAX_FRAGMENT_LEN);
    }
}

#[test]
fn test_empty_file_has_no_fragments() {
    let fat = setup_memory_fat();

    fat.create_file("empty", "").unwrap();

    let entry = fat.entry("empty").unwrap();
    assert_eq!(entry.length, 0);
    assert_eq!(entry.first_fragment, None);
    assert!(fat.fragments("empty").unwrap().is_empty());
    assert_eq!(fat.read_file("empty").unwrap(), "");
    // Only the directory entry was written
    assert_eq!(fat.store().len(), 1);
}

// =============================================================================
// Fragmentation Tests
// =============================================================================

#[test]
fn test_fragment_count_matches_length() {
    let fat = setup_memory_fat();

    for len in [1usize, 19, 20, 21, 39, 40, 41, 100] {
        let name = format!("len{}", len);
        let data = "x".repeat(len);
        fat.create_file(&name, &data).unwrap();

        let fragments = fat.fragments(&name).unwrap();
        assert_eq!(fragments.len(), fragment_count(len), "length {}", len);

        let (last, body) = fragments.split_last().unwrap();
        for (_, fragment) in body {
            assert_eq!(fragment.payload.len(), MAX_FRAGMENT_LEN);
        }
        let remainder = len - MAX_FRAGMENT_LEN * body.len();
        assert_eq!(last.1.payload.len(), remainder);
    }
}

#[test]
fn test_fragment_locators_follow_naming() {
    let fat = setup_memory_fat();

    fat.create_file("report", &"r".repeat(45)).unwrap();

    let locators: Vec<Locator> = fat
        .fragments("report")
        .unwrap()
        .into_iter()
        .map(|(locator, _)| locator)
        .collect();

    assert_eq!(
        locators,
        vec![
            Locator::new("report_part1"),
            Locator::new("report_part2"),
            Locator::new("report_part3"),
        ]
    );
    assert!(fat
        .store()
        .contains(&Locator::new("report_FAT"))
        .unwrap());
}

#[test]
fn test_chain_terminates_once() {
    let fat = setup_memory_fat();
    let data = "z".repeat(73);

    fat.create_file("chain", &data).unwrap();
    let fragments = fat.fragments("chain").unwrap();

    assert!(fragments.len() <= fragment_count(73));

    let ends: Vec<_> = fragments.iter().filter(|(_, f)| f.is_end).collect();
    assert_eq!(ends.len(), 1);
    assert!(fragments.last().unwrap().1.is_end);
    assert!(fragments.last().unwrap().1.next_fragment.is_none());

    let unique: HashSet<_> = fragments.iter().map(|(l, _)| l.clone()).collect();
    assert_eq!(unique.len(), fragments.len());

    // Every link points at the next fragment in order
    for pair in fragments.windows(2) {
        assert_eq!(pair[0].1.next_fragment.as_ref(), Some(&pair[1].0));
    }
}

// =============================================================================
// Modify Tests
// =============================================================================

#[test]
fn test_modify_replaces_content() {
    let fat = setup_memory_fat();

    fat.create_file("a", "0123456789012345678901234").unwrap();
    assert_eq!(fat.fragments("a").unwrap().len(), 2);

    fat.modify_file("a", "x").unwrap();

    assert_eq!(fat.read_file("a").unwrap(), "x");
    let fragments = fat.fragments("a").unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].1.payload, "x");

    // The replacement chain sits clear of the old one, which is gone
    assert_eq!(fragments[0].0, Locator::new("a_part3"));
    assert!(!fat.store().contains(&Locator::new("a_part1")).unwrap());
    assert!(!fat.store().contains(&Locator::new("a_part2")).unwrap());
    assert_eq!(fat.entry("a").unwrap().length, 1);
}

#[test]
fn test_repeated_modify_leaves_no_stale_fragments() {
    let fat = setup_memory_fat();

    fat.create_file("churn", &"c".repeat(45)).unwrap();

    for len in [5usize, 70, 20, 0, 33, 41] {
        let data = "n".repeat(len);
        fat.modify_file("churn", &data).unwrap();

        assert_eq!(fat.read_file("churn").unwrap(), data);
        let fragments = fat.fragments("churn").unwrap();
        assert_eq!(fragments.len(), fragment_count(len));
        // entry + exactly the live chain
        assert_eq!(fat.store().len(), 1 + fragments.len(), "length {}", len);
    }
}

#[test]
fn test_modify_grows_chain() {
    let fat = setup_memory_fat();

    fat.create_file("grow", "tiny").unwrap();
    let longer = "g".repeat(61);
    fat.modify_file("grow", &longer).unwrap();

    assert_eq!(fat.read_file("grow").unwrap(), longer);
    assert_eq!(fat.fragments("grow").unwrap().len(), 4);
}

#[test]
fn test_modify_empty_file() {
    let fat = setup_memory_fat();

    fat.create_file("blank", "").unwrap();
    fat.modify_file("blank", "now has content").unwrap();
    assert_eq!(fat.read_file("blank").unwrap(), "now has content");

    fat.modify_file("blank", "").unwrap();
    assert_eq!(fat.read_file("blank").unwrap(), "");
    assert!(!fat.store().contains(&Locator::new("blank_part1")).unwrap());
    assert_eq!(fat.entry("blank").unwrap().first_fragment, None);
}

#[test]
fn test_modify_preserves_created_at() {
    let fat = setup_memory_fat();

    fat.create_file("dated", "first").unwrap();
    let before = fat.entry("dated").unwrap();

    fat.modify_file("dated", "second version").unwrap();
    let after = fat.entry("dated").unwrap();

    assert_eq!(after.created_at, before.created_at);
    assert!(after.modified_at >= before.modified_at);
}

#[test]
fn test_modify_keeps_soft_delete_state() {
    let fat = setup_memory_fat();

    fat.create_file("binned", "content").unwrap();
    fat.delete_file("binned").unwrap();
    fat.modify_file("binned", "edited in the bin").unwrap();

    let entry = fat.entry("binned").unwrap();
    assert!(entry.is_deleted);
    assert!(entry.deleted_at.is_some());
    assert_eq!(fat.read_file("binned").unwrap(), "edited in the bin");
}

#[test]
fn test_modify_nonexistent_file() {
    let fat = setup_memory_fat();

    let result = fat.modify_file("ghost", "data");

    assert!(matches!(result, Err(FatError::NotFound(name)) if name == "ghost"));
    assert!(fat.store().is_empty());
}

// =============================================================================
// Soft Delete Tests
// =============================================================================

#[test]
fn test_delete_is_idempotent() {
    let fat = setup_memory_fat();

    fat.create_file("doc", "payload").unwrap();
    fat.delete_file("doc").unwrap();
    let first = fat.entry("doc").unwrap();

    fat.delete_file("doc").unwrap();
    let second = fat.entry("doc").unwrap();

    assert!(second.is_deleted);
    assert!(second.deleted_at.unwrap() >= first.deleted_at.unwrap());
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.modified_at, first.modified_at);
    assert_eq!(second.length, first.length);

    assert!(live_names(&fat).is_empty());
    assert_eq!(deleted_names(&fat), vec!["doc".to_string()]);
}

#[test]
fn test_delete_leaves_fragments() {
    let fat = setup_memory_fat();

    fat.create_file("kept", &"k".repeat(30)).unwrap();
    let records_before = fat.store().len();

    fat.delete_file("kept").unwrap();

    assert_eq!(fat.store().len(), records_before);
    assert_eq!(fat.read_file("kept").unwrap(), "k".repeat(30));
}

#[test]
fn test_recover_inverts_delete() {
    let fat = setup_memory_fat();

    fat.create_file("phoenix", "rises").unwrap();
    fat.delete_file("phoenix").unwrap();
    fat.recover_file("phoenix").unwrap();

    let entry = fat.entry("phoenix").unwrap();
    assert!(!entry.is_deleted);
    assert_eq!(entry.deleted_at, None);
    assert_eq!(live_names(&fat), vec!["phoenix".to_string()]);
    assert!(deleted_names(&fat).is_empty());
}

#[test]
fn test_recover_live_file_is_noop_on_state() {
    let fat = setup_memory_fat();

    fat.create_file("alive", "still here").unwrap();
    let before = fat.entry("alive").unwrap();

    fat.recover_file("alive").unwrap();
    let after = fat.entry("alive").unwrap();

    assert!(!after.is_deleted);
    assert_eq!(after.deleted_at, None);
    assert!(after.modified_at >= before.modified_at);
}

#[test]
fn test_delete_and_recover_nonexistent() {
    let fat = setup_memory_fat();

    assert!(matches!(fat.delete_file("nope"), Err(FatError::NotFound(_))));
    assert!(matches!(fat.recover_file("nope"), Err(FatError::NotFound(_))));
}

// =============================================================================
// Listing Tests
// =============================================================================

#[test]
fn test_listings_sorted_by_name() {
    let fat = setup_memory_fat();

    for name in ["delta", "alpha", "charlie", "bravo", "a!"] {
        fat.create_file(name, name).unwrap();
    }
    fat.delete_file("charlie").unwrap();
    fat.delete_file("a!").unwrap();

    assert_eq!(live_names(&fat), vec!["alpha", "bravo", "delta"]);
    assert_eq!(deleted_names(&fat), vec!["a!", "charlie"]);
}

#[test]
fn test_listing_summaries() {
    let fat = setup_memory_fat();

    fat.create_file("sized", &"s".repeat(42)).unwrap();

    let summaries: Vec<_> = fat.list_files().unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "sized");
    assert_eq!(summaries[0].length, 42);
    assert_eq!(summaries[0].deleted_at, None);
}

#[test]
fn test_listing_rescans_each_call() {
    let fat = setup_memory_fat();

    assert_eq!(fat.list_files().unwrap().count(), 0);

    fat.create_file("later", "x").unwrap();
    assert_eq!(fat.list_files().unwrap().count(), 1);
    assert_eq!(fat.list_files().unwrap().count(), 1);
}

#[test]
fn test_listing_ignores_fragments() {
    let fat = setup_memory_fat();

    fat.create_file("many", &"m".repeat(200)).unwrap();

    let listing = fat.list_files().unwrap();
    assert_eq!(listing.remaining(), 1);
    assert_eq!(listing.count(), 1);
}

// =============================================================================
// Read Tests
// =============================================================================

#[test]
fn test_read_missing_file() {
    let fat = setup_memory_fat();

    let result = fat.read_file("nope");

    assert!(matches!(result, Err(FatError::NotFound(name)) if name == "nope"));
}

#[test]
fn test_read_deleted_file_succeeds() {
    let fat = setup_memory_fat();

    fat.create_file("trash", "still readable").unwrap();
    fat.delete_file("trash").unwrap();

    assert_eq!(fat.read_file("trash").unwrap(), "still readable");
}

// =============================================================================
// Name Tests
// =============================================================================

#[test]
fn test_blank_name_rejected() {
    let fat = setup_memory_fat();

    for name in ["", "   ", "\t"] {
        assert!(matches!(
            fat.create_file(name, "data"),
            Err(FatError::InvalidInput(_))
        ));
    }
    assert!(fat.store().is_empty());
}

#[test]
fn test_path_like_names_rejected() {
    let fat = setup_memory_fat();

    for name in ["../escape", "a/b", "a\\b", ".", "..", "nul\0byte"] {
        assert!(
            matches!(fat.create_file(name, "data"), Err(FatError::InvalidInput(_))),
            "{:?} should be rejected",
            name
        );
    }
}

#[test]
fn test_names_are_trimmed() {
    let fat = setup_memory_fat();

    fat.create_file("  padded  ", "content").unwrap();

    assert_eq!(fat.read_file("padded").unwrap(), "content");
    assert_eq!(fat.entry(" padded").unwrap().name, "padded");
}

// =============================================================================
// Collision Policy Tests
// =============================================================================

#[test]
fn test_create_existing_rejected_by_default() {
    let fat = setup_memory_fat();

    fat.create_file("dup", "original").unwrap();
    let result = fat.create_file("dup", "replacement");

    assert!(matches!(result, Err(FatError::AlreadyExists(name)) if name == "dup"));
    assert_eq!(fat.read_file("dup").unwrap(), "original");
}

#[test]
fn test_create_existing_deleted_rejected_by_default() {
    let fat = setup_memory_fat();

    fat.create_file("gone", "original").unwrap();
    fat.delete_file("gone").unwrap();

    assert!(matches!(
        fat.create_file("gone", "again"),
        Err(FatError::AlreadyExists(_))
    ));
}

#[test]
fn test_create_overwrite_policy() {
    let fat = setup_overwriting_fat();

    fat.create_file("dup", &"o".repeat(50)).unwrap();
    fat.delete_file("dup").unwrap();

    fat.create_file("dup", "fresh").unwrap();

    assert_eq!(fat.read_file("dup").unwrap(), "fresh");
    let entry = fat.entry("dup").unwrap();
    assert!(!entry.is_deleted);
    assert_eq!(entry.length, 5);
    assert!(!fat.store().contains(&Locator::new("dup_part2")).unwrap());
    assert!(!fat.store().contains(&Locator::new("dup_part3")).unwrap());
    // entry + one fragment
    assert_eq!(fat.store().len(), 2);
}

#[test]
fn test_exists() {
    let fat = setup_memory_fat();

    assert!(!fat.exists("thing").unwrap());
    fat.create_file("thing", "").unwrap();
    assert!(fat.exists("thing").unwrap());
    fat.delete_file("thing").unwrap();
    assert!(fat.exists("thing").unwrap());
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_shared_across_threads() {
    use std::sync::Arc;
    use std::thread;

    let fat = Arc::new(setup_memory_fat());
    let mut handles = Vec::new();

    for t in 0..4 {
        let fat = Arc::clone(&fat);
        handles.push(thread::spawn(move || {
            for i in 0..10 {
                let name = format!("t{}_{}", t, i);
                let data = format!("{}-{}", name, "p".repeat(i * 7));
                fat.create_file(&name, &data).unwrap();
                assert_eq!(fat.read_file(&name).unwrap(), data);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(fat.list_files().unwrap().count(), 40);
}
