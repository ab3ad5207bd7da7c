//! Reference-based bucket construction
//!
//! 1. Sort reference values and assign positions (sentinel at 0)
//! 2. Place every record at the greatest reference value ≤ its sort key
//! 3. Sweep positions left to right, grouping them into buckets
//! 4. Merge an undersized trailing group into its predecessor

use rayon::prelude::*;
use shared_types::{
    concatenate_attributes, BlockingError, Party, RecordId, RecordTable, PROGRESS_CHECKPOINT,
};
use tracing::debug;

use super::pruning::prune_reference_values;
use crate::config::{MergeCriterion, SortedNeighbourhoodConfig};
use crate::domain::{Bucket, BucketKey, PartyIndex, PositionIndex, ReferenceValues, SimilarityMeasure};

/// Builder for one party's `PartyIndex`.
///
/// Constructed per party, fed that party's inputs and consumed by `build`.
pub struct PartyIndexer<'a> {
    party: Party,
    config: &'a SortedNeighbourhoodConfig,
    similarity: &'a dyn SimilarityMeasure,
    reference_values: Option<&'a ReferenceValues>,
    records: Option<&'a RecordTable>,
    attributes: Option<Vec<usize>>,
}

impl<'a> PartyIndexer<'a> {
    pub fn new(
        party: Party,
        config: &'a SortedNeighbourhoodConfig,
        similarity: &'a dyn SimilarityMeasure,
    ) -> Self {
        Self {
            party,
            config,
            similarity,
            reference_values: None,
            records: None,
            attributes: None,
        }
    }

    pub fn reference_values(mut self, values: &'a ReferenceValues) -> Self {
        self.reference_values = Some(values);
        self
    }

    pub fn records(mut self, records: &'a RecordTable) -> Self {
        self.records = Some(records);
        self
    }

    /// Columns concatenated into each record's sort key value.
    pub fn attributes(mut self, selection: &[usize]) -> Self {
        self.attributes = Some(selection.to_vec());
        self
    }

    pub fn build(self) -> Result<PartyIndex, BlockingError> {
        const OP: &str = "PartyIndexer::build";
        let records = self
            .records
            .ok_or_else(|| BlockingError::precondition(OP, format!("record table of {}", self.party)))?;
        let reference_values = self.reference_values.ok_or_else(|| {
            BlockingError::precondition(OP, format!("reference values of {}", self.party))
        })?;
        let attributes = self
            .attributes
            .as_deref()
            .ok_or_else(|| BlockingError::precondition(OP, "attribute selection"))?;

        let positions = match &self.config.pruning {
            Some(pruning) => {
                let pruned = prune_reference_values(reference_values, pruning, self.similarity);
                debug!(
                    party = %self.party,
                    before = reference_values.len(),
                    after = pruned.len(),
                    "Reference values pruned"
                );
                pruned.into_position_index()
            }
            None => reference_values.clone().into_position_index(),
        };

        let slots = assign_records(self.party, records, attributes, &positions)?;
        let buckets = merge_positions(self.config, self.similarity, &positions, slots)?;

        debug!(
            party = %self.party,
            positions = positions.len(),
            buckets = buckets.len(),
            "Buckets formed"
        );
        Ok(PartyIndex::new(self.party, positions, buckets))
    }
}

/// Record ids per position, in record-table order.
fn assign_records(
    party: Party,
    records: &RecordTable,
    attributes: &[usize],
    positions: &PositionIndex,
) -> Result<Vec<Vec<RecordId>>, BlockingError> {
    let located: Vec<usize> = records
        .as_slice()
        .par_iter()
        .map(|(id, attrs)| concatenate_attributes(id, attrs, attributes).map(|skv| positions.locate(&skv)))
        .collect::<Result<_, _>>()?;

    let mut slots = vec![Vec::new(); positions.len()];
    for (done, ((id, _), pos)) in records.iter().zip(located).enumerate() {
        if (done + 1) % PROGRESS_CHECKPOINT == 0 {
            debug!(party = %party, done = done + 1, total = records.len(), "Assigning records");
        }
        slots[pos].push(id.clone());
    }
    Ok(slots)
}

/// Left-to-right sweep grouping positions into buckets of at least k records.
fn merge_positions(
    config: &SortedNeighbourhoodConfig,
    similarity: &dyn SimilarityMeasure,
    positions: &PositionIndex,
    mut slots: Vec<Vec<RecordId>>,
) -> Result<Vec<Bucket>, BlockingError> {
    let k = config.k;
    let n = slots.len();
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut i = 0;

    while i < n {
        let mut records: Vec<RecordId> = Vec::new();
        let mut j = 0;

        match config.merge_criterion {
            MergeCriterion::Sim => {
                let mut sim = 0.0;
                while i + j < n && (records.len() <= k || sim >= config.min_sim_threshold) {
                    records.append(&mut slots[i + j]);
                    sim = positions
                        .value(i + j)
                        .zip(positions.value(i + j + 1))
                        .map_or(0.0, |(this, next)| similarity.similarity(this, next));
                    j += 1;
                }
            }
            MergeCriterion::Size => {
                while i + j < n && records.len() < k {
                    records.append(&mut slots[i + j]);
                    j += 1;
                }
            }
        }

        let mut bucket = Bucket {
            key: BucketKey::range(i, j),
            records,
        };

        if bucket.records.len() < k {
            let Some(mut prev) = buckets.pop() else {
                return Err(BlockingError::MergeUnderflow {
                    position: i,
                    size: bucket.records.len(),
                    k,
                });
            };
            debug!(
                into = %prev.key,
                from = %bucket.key,
                size = bucket.records.len(),
                "Merging undersized trailing bucket"
            );
            prev.records.append(&mut bucket.records);
            bucket = Bucket {
                key: prev.key.extended_with(&bucket.key),
                records: prev.records,
            };
        }

        buckets.push(bucket);
        i += j;
    }

    Ok(buckets)
}
