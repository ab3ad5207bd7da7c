//! Core entities for Sorted-Neighbourhood Blocking

use serde::{Deserialize, Serialize};
use shared_types::{Party, RecordId};
use std::collections::HashMap;
use std::fmt;

/// Smallest possible reference value, always at position 0
pub const SENTINEL: &str = "";

/// Sorted, de-duplicated reference values of one party
///
/// The empty string is reserved for the sentinel and never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceValues {
    sorted: Vec<String>,
}

impl ReferenceValues {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sorted: Vec<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| v.as_str() != SENTINEL)
            .collect();
        sorted.sort();
        sorted.dedup();
        Self { sorted }
    }

    /// Wrap values the caller guarantees to be sorted, unique and non-empty.
    pub(crate) fn from_sorted(sorted: Vec<String>) -> Self {
        debug_assert!(sorted.windows(2).all(|w| w[0] < w[1]));
        Self { sorted }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.sorted
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Assign dense positions: sentinel at 0, values at 1..=N.
    pub fn into_position_index(self) -> PositionIndex {
        let mut values = Vec::with_capacity(self.sorted.len() + 1);
        values.push(SENTINEL.to_string());
        values.extend(self.sorted);
        PositionIndex { values }
    }
}

/// position → reference value, dense over 0..=N
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionIndex {
    values: Vec<String>,
}

impl PositionIndex {
    /// Reference value at `position`.
    pub fn value(&self, position: usize) -> Option<&str> {
        self.values.get(position).map(String::as_str)
    }

    /// Position of the greatest reference value ≤ `skv`, 0 when `skv`
    /// precedes every reference value.
    pub fn locate(&self, skv: &str) -> usize {
        self.values[1..].partition_point(|v| v.as_str() <= skv)
    }

    /// Highest position N.
    pub fn last_position(&self) -> usize {
        self.values.len() - 1
    }

    /// Number of positions including the sentinel.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false, the sentinel is always present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered, contiguous reference positions identifying a bucket
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketKey(Vec<usize>);

impl BucketKey {
    /// Key covering `first..first + len`.
    pub fn range(first: usize, len: usize) -> Self {
        Self((first..first + len).collect())
    }

    pub fn positions(&self) -> &[usize] {
        &self.0
    }

    pub fn first(&self) -> Option<usize> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenate with the key that follows this one.
    pub fn extended_with(&self, next: &BucketKey) -> BucketKey {
        let mut positions = self.0.clone();
        positions.extend_from_slice(&next.0);
        BucketKey(positions)
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b_")?;
        for pos in &self.0 {
            write!(f, "{}_", pos)?;
        }
        Ok(())
    }
}

/// Records sharing a contiguous range of reference positions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: BucketKey,
    pub records: Vec<RecordId>,
}

/// A party's finalized buckets in position order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartyIndex {
    pub party: Party,
    positions: PositionIndex,
    buckets: Vec<Bucket>,
    by_key: HashMap<BucketKey, usize>,
}

impl PartyIndex {
    pub fn new(party: Party, positions: PositionIndex, buckets: Vec<Bucket>) -> Self {
        let by_key = buckets
            .iter()
            .enumerate()
            .map(|(i, b)| (b.key.clone(), i))
            .collect();
        Self {
            party,
            positions,
            buckets,
            by_key,
        }
    }

    pub fn positions(&self) -> &PositionIndex {
        &self.positions
    }

    /// Records of the bucket with `key`.
    pub fn records(&self, key: &BucketKey) -> Option<&[RecordId]> {
        self.by_key
            .get(key)
            .map(|&i| self.buckets[i].records.as_slice())
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Bucket sizes in position order.
    pub fn sizes(&self) -> Vec<usize> {
        self.buckets.iter().map(|b| b.records.len()).collect()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Exposed reference value → owning bucket key
///
/// The first bucket registering a value keeps it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepresentativeIndex {
    owners: HashMap<String, BucketKey>,
}

impl RepresentativeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` for `key` unless already owned. Returns whether
    /// the value was newly registered.
    pub fn register(&mut self, value: &str, key: &BucketKey) -> bool {
        if self.owners.contains_key(value) {
            return false;
        }
        self.owners.insert(value.to_string(), key.clone());
        true
    }

    pub fn owner(&self, value: &str) -> Option<&BucketKey> {
        self.owners.get(value)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
