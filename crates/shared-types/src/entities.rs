//! # Core Domain Entities
//!
//! Defines the entities shared by both blocking strategies.
//!
//! ## Clusters
//!
//! - **Input**: `RecordTable`, `RecordId`, `Party`
//! - **Output**: `CandidateBlock`, `CandidateBlockTable`
//! - **Reports**: `IndexBuildReport`, `BlockingReport`

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::errors::BlockingError;
use crate::stats::BlockStats;

// =============================================================================
// CLUSTER A: INPUT
// =============================================================================

/// Identifier of a record inside one party's collection.
pub type RecordId = String;

/// Number of records between two progress checkpoints while iterating a table.
pub const PROGRESS_CHECKPOINT: usize = 10_000;

/// One of the two data owners taking part in the linkage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Party {
    /// First data owner.
    Alice,
    /// Second data owner.
    Bob,
}

impl Party {
    /// Both parties, Alice first.
    pub const ALL: [Party; 2] = [Party::Alice, Party::Bob];

    /// The counterpart of this party.
    pub fn other(self) -> Party {
        match self {
            Party::Alice => Party::Bob,
            Party::Bob => Party::Alice,
        }
    }

    /// Lower-case name, used in log fields and file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Party::Alice => "alice",
            Party::Bob => "bob",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A party's record collection: record id → ordered attribute values.
///
/// Iteration follows insertion order, so every index derived from the table
/// lists record ids deterministically. Re-inserting an existing id replaces
/// its attributes in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordRows", into = "RecordRows")]
pub struct RecordTable {
    records: RecordRows,
    positions: HashMap<RecordId, usize>,
}

/// Serialized form of a `RecordTable`: rows in insertion order.
pub type RecordRows = Vec<(RecordId, Vec<String>)>;

impl From<RecordRows> for RecordTable {
    fn from(rows: RecordRows) -> Self {
        let mut table = RecordTable::with_capacity(rows.len());
        for (id, attrs) in rows {
            table.insert(id, attrs);
        }
        table
    }
}

impl From<RecordTable> for RecordRows {
    fn from(table: RecordTable) -> Self {
        table.records
    }
}

impl RecordTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, id: impl Into<RecordId>, attributes: Vec<String>) {
        let id = id.into();
        match self.positions.get(&id) {
            Some(&pos) => self.records[pos].1 = attributes,
            None => {
                self.positions.insert(id.clone(), self.records.len());
                self.records.push((id, attributes));
            }
        }
    }

    /// Attribute values of a record.
    pub fn get(&self, id: &str) -> Option<&[String]> {
        self.positions
            .get(id)
            .map(|&pos| self.records[pos].1.as_slice())
    }

    /// Iterate `(record id, attributes)` in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&RecordId, &[String])> + '_ {
        self.records.iter().map(|(id, attrs)| (id, attrs.as_slice()))
    }

    /// Records as a slice, for parallel iteration.
    pub fn as_slice(&self) -> &[(RecordId, Vec<String>)] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<I, A> FromIterator<(I, A)> for RecordTable
where
    I: Into<RecordId>,
    A: IntoIterator,
    A::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (I, A)>>(iter: T) -> Self {
        let mut table = RecordTable::new();
        for (id, attrs) in iter {
            table.insert(id, attrs.into_iter().map(Into::into).collect());
        }
        table
    }
}

/// Concatenate the selected attributes of a record into one string.
///
/// Used as the sort key value of the sorted-neighbourhood strategy and as
/// the n-gram source of the p-sig strategy.
pub fn concatenate_attributes(
    record_id: &str,
    attributes: &[String],
    selection: &[usize],
) -> Result<String, BlockingError> {
    let mut value = String::new();
    for &column in selection {
        let attr = attributes.get(column).ok_or_else(|| {
            BlockingError::Configuration(format!(
                "attribute {} out of range for record {} ({} attributes)",
                column,
                record_id,
                attributes.len()
            ))
        })?;
        value.push_str(attr);
    }
    Ok(value)
}

// =============================================================================
// CLUSTER B: OUTPUT
// =============================================================================

/// One candidate group: records of both parties to be compared pairwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateBlock {
    /// Alice's record ids.
    pub alice: Vec<RecordId>,
    /// Bob's record ids.
    pub bob: Vec<RecordId>,
}

impl CandidateBlock {
    /// Number of record pairs this block generates.
    pub fn pair_count(&self) -> usize {
        self.alice.len() * self.bob.len()
    }
}

/// Final output: sequential candidate id → candidate block.
///
/// Ids are dense and start at 0; the table is written once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateBlockTable {
    blocks: Vec<CandidateBlock>,
}

impl CandidateBlockTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block under the next sequential id and return that id.
    pub fn push(&mut self, alice: Vec<RecordId>, bob: Vec<RecordId>) -> u64 {
        let id = self.blocks.len() as u64;
        self.blocks.push(CandidateBlock { alice, bob });
        id
    }

    /// Block stored under `id`.
    pub fn get(&self, id: u64) -> Option<&CandidateBlock> {
        usize::try_from(id).ok().and_then(|i| self.blocks.get(i))
    }

    /// Iterate `(id, block)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &CandidateBlock)> + '_ {
        self.blocks.iter().enumerate().map(|(i, b)| (i as u64, b))
    }

    /// Number of candidate blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no candidate block was produced.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total number of record pairs over all blocks.
    pub fn total_pairs(&self) -> usize {
        self.blocks.iter().map(CandidateBlock::pair_count).sum()
    }
}

// =============================================================================
// CLUSTER C: REPORTS
// =============================================================================

/// Result of building one party's index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexBuildReport {
    /// Party whose index was built.
    pub party: Party,
    /// Block-size statistics of the built index.
    pub stats: BlockStats,
    /// Wall-clock time of the build.
    pub elapsed: Duration,
}

/// Result of generating the candidate block table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingReport {
    /// Number of candidate blocks.
    pub candidate_count: usize,
    /// Wall-clock time of block generation.
    pub elapsed: Duration,
}
