//! Chain construction and traversal

use std::collections::HashSet;

use tracing::warn;

use crate::error::{FatError, Result};
use crate::record::{self, DirectoryEntry, FragmentRecord, Locator, MAX_FRAGMENT_LEN};
use crate::store::RecordStore;

/// Number of fragments needed for `len` characters
pub fn fragment_count(len: usize) -> usize {
    len.div_ceil(MAX_FRAGMENT_LEN)
}

/// Split `data` into chunks of at most `MAX_FRAGMENT_LEN` characters
///
/// Splits on character boundaries, never inside a multi-byte character.
/// Empty input yields no chunks.
pub fn split_payload(data: &str) -> Vec<&str> {
    let mut chunks = Vec::with_capacity(fragment_count(data.chars().count()));
    let mut rest = data;

    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(MAX_FRAGMENT_LEN)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(cut);
        chunks.push(head);
        rest = tail;
    }

    chunks
}

/// First position for a chain of `count` fragments that shares no locator
/// with `occupied`
///
/// A fresh file starts at 1. A replacement chain goes below the old one when
/// it fits there, otherwise right after it, so the old chain stays intact
/// until the directory entry is switched over.
pub(crate) fn chain_start(name: &str, occupied: &[Locator], count: usize) -> usize {
    let positions: Vec<usize> = occupied
        .iter()
        .filter_map(|locator| locator.fragment_position(name))
        .collect();

    match (positions.iter().min(), positions.iter().max()) {
        (Some(&low), Some(&high)) if count >= low => high + 1,
        _ => 1,
    }
}

/// Build the records of a chain for `name`, first to last, numbered from `start`
pub(crate) fn build_chain(
    name: &str,
    data: &str,
    start: usize,
) -> Vec<(Locator, FragmentRecord)> {
    let chunks = split_payload(data);
    let last = start + chunks.len().saturating_sub(1);

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            let position = start + i;
            let next = (position < last).then(|| Locator::fragment(name, position + 1));
            (Locator::fragment(name, position), FragmentRecord::new(chunk, next))
        })
        .collect()
}

/// Persist a chain in order; the caller writes the directory entry afterwards
///
/// On failure every fragment this call may have written is removed again
/// before the error is returned.
pub(crate) fn write_chain<S: RecordStore>(
    store: &S,
    chain: &[(Locator, FragmentRecord)],
) -> Result<()> {
    let encoded = chain
        .iter()
        .map(|(_, fragment)| record::encode(fragment))
        .collect::<Result<Vec<_>>>()?;

    for (i, ((locator, _), bytes)) in chain.iter().zip(&encoded).enumerate() {
        if let Err(e) = store.put(locator, bytes) {
            discard_chain(store, &chain[..=i]);
            return Err(e);
        }
    }
    Ok(())
}

/// Best-effort removal of fragments that no entry references
pub(crate) fn discard_chain<S: RecordStore>(store: &S, chain: &[(Locator, FragmentRecord)]) {
    for (locator, _) in chain {
        if let Err(e) = store.delete(locator) {
            warn!(locator = %locator, error = %e, "could not remove unreferenced fragment");
        }
    }
}

/// Walk and validate the chain of `entry`
///
/// Bounded by `fragment_count(entry.length)` steps. Any of these is
/// `CorruptChain`: too many links, a revisited locator, a missing or
/// undecodable fragment, an inconsistent end marker, or a payload total that
/// differs from `entry.length`.
pub(crate) fn walk_chain<S: RecordStore>(
    store: &S,
    entry: &DirectoryEntry,
) -> Result<Vec<(Locator, FragmentRecord)>> {
    // Empty files have no chain, whatever the head pointer says
    if entry.length == 0 {
        return Ok(Vec::new());
    }

    let first = entry.first_fragment.clone().ok_or_else(|| {
        FatError::CorruptChain(format!(
            "'{}' has length {} but no first fragment",
            entry.name, entry.length
        ))
    })?;

    let limit = fragment_count(entry.length);
    let mut visited = HashSet::new();
    let mut fragments = Vec::with_capacity(limit);
    let mut total = 0usize;
    let mut next = Some(first);

    while let Some(locator) = next {
        if fragments.len() == limit {
            return Err(FatError::CorruptChain(format!(
                "'{}' chain continues past {} fragments at {}",
                entry.name, limit, locator
            )));
        }

        if !visited.insert(locator.clone()) {
            return Err(FatError::CorruptChain(format!(
                "'{}' chain revisits {}",
                entry.name, locator
            )));
        }

        let fragment = load_fragment(store, &locator)?.ok_or_else(|| {
            FatError::CorruptChain(format!("'{}' is missing fragment {}", entry.name, locator))
        })?;

        if let Some(defect) = fragment.defect() {
            return Err(FatError::CorruptChain(format!("{}: {}", locator, defect)));
        }

        total += fragment.char_len();
        next = fragment.next_fragment.clone();
        fragments.push((locator, fragment));
    }

    if total != entry.length {
        return Err(FatError::CorruptChain(format!(
            "'{}' chain holds {} characters, entry records {}",
            entry.name, total, entry.length
        )));
    }

    Ok(fragments)
}

/// Collect the locators of an existing chain for teardown
///
/// Unlike `walk_chain` this never fails on a broken chain: it stops at the
/// first missing, undecodable or revisited link so a damaged file can still
/// be replaced.
pub(crate) fn collect_locators<S: RecordStore>(
    store: &S,
    entry: &DirectoryEntry,
) -> Result<Vec<Locator>> {
    let mut locators: Vec<Locator> = Vec::new();
    let mut visited = HashSet::new();
    let mut next = entry.first_fragment.clone();

    while let Some(locator) = next.take() {
        if !visited.insert(locator.clone()) {
            warn!(
                file = %entry.name,
                locator = %locator,
                "chain cycle while collecting old fragments"
            );
            break;
        }

        let fragment = match load_fragment(store, &locator) {
            Ok(Some(fragment)) => fragment,
            Ok(None) => break,
            Err(FatError::CorruptChain(reason)) => {
                warn!(
                    file = %entry.name,
                    locator = %locator,
                    %reason,
                    "unreadable old fragment"
                );
                locators.push(locator);
                break;
            }
            Err(e) => return Err(e),
        };

        next = fragment.next_fragment;
        locators.push(locator);
    }

    Ok(locators)
}

fn load_fragment<S: RecordStore>(store: &S, locator: &Locator) -> Result<Option<FragmentRecord>> {
    let Some(bytes) = store.get(locator)? else {
        return Ok(None);
    };

    record::decode(&bytes).map(Some).map_err(|e| {
        FatError::CorruptChain(format!("fragment {} cannot be decoded: {}", locator, e))
    })
}
