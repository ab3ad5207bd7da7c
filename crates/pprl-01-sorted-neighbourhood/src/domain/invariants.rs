//! Domain invariants for Sorted-Neighbourhood Blocking

use super::entities::{PartyIndex, RepresentativeIndex};
use super::representative::Representatives;
use std::collections::HashSet;

/// INVARIANT-1: Coverage
/// Buckets cover every position 0..=N exactly once, in order, and each key
/// is a contiguous strictly increasing run.
pub fn invariant_positions_covered(index: &PartyIndex) -> bool {
    let mut expected = 0;
    for bucket in index.buckets() {
        for &pos in bucket.key.positions() {
            if pos != expected {
                return false;
            }
            expected += 1;
        }
    }
    expected == index.positions().len()
}

/// INVARIANT-2: k-Anonymity
/// Every bucket holds at least k records.
pub fn invariant_min_bucket_size(index: &PartyIndex, k: usize) -> bool {
    index.buckets().iter().all(|b| b.records.len() >= k)
}

/// INVARIANT-3: Each record is placed in exactly one bucket.
pub fn invariant_records_unique(index: &PartyIndex) -> bool {
    let mut seen = HashSet::new();
    index
        .buckets()
        .iter()
        .flat_map(|b| b.records.iter())
        .all(|id| seen.insert(id))
}

/// INVARIANT-4: Representative ownership
/// Every exposed value resolves to a bucket of the index, and that bucket
/// actually contains the value's position.
pub fn invariant_representatives_resolve(
    index: &PartyIndex,
    reps: &Representatives,
) -> bool {
    reps.values
        .iter()
        .all(|value| owner_contains(index, &reps.index, value))
}

fn owner_contains(index: &PartyIndex, reps: &RepresentativeIndex, value: &str) -> bool {
    let Some(key) = reps.owner(value) else {
        return false;
    };
    index.records(key).is_some()
        && key
            .positions()
            .iter()
            .any(|&pos| index.positions().value(pos) == Some(value))
}
