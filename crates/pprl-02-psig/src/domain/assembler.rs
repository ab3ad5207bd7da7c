//! Candidate block assembly for p-sig
//!
//! The join key is the literal n-gram string, so both sides must have been
//! built with identical q-gram and Bloom parameters.

use std::collections::HashSet;

use shared_types::{BlockingError, CandidateBlockTable, Party, RecordId};

use super::microblocks::MicroBlocks;

/// Ids in first-occurrence order, each once.
fn distinct(ids: &[RecordId]) -> Vec<RecordId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().filter(|id| seen.insert(*id)).cloned().collect()
}

/// Join Alice's and Bob's microblocks on their n-gram.
///
/// Candidate ids follow Alice's n-gram order. A record listed several times
/// under one n-gram appears once in the candidate block.
pub fn assemble_blocks(
    alice: &MicroBlocks,
    bob: &MicroBlocks,
) -> Result<CandidateBlockTable, BlockingError> {
    if alice.party != Party::Alice || bob.party != alice.party.other() {
        return Err(BlockingError::Configuration(format!(
            "expected microblocks of alice and bob, got {} and {}",
            alice.party, bob.party
        )));
    }
    if alice.params != bob.params {
        return Err(BlockingError::Configuration(format!(
            "microblocks built with different parameters: {:?} vs {:?}",
            alice.params, bob.params
        )));
    }

    let mut table = CandidateBlockTable::new();
    for (gram, alice_ids) in alice.iter() {
        if let Some(bob_ids) = bob.get(gram) {
            table.push(distinct(alice_ids), distinct(bob_ids));
        }
    }
    Ok(table)
}
