//! Candidate block assembly for sorted-neighbourhood blocking
//!
//! Each candidate value pair is resolved locally: value → owning bucket key
//! → record ids. Both resolutions must succeed.

use shared_types::{BlockingError, CandidateBlockTable, Party, RecordId};

use crate::domain::{PartyIndex, RepresentativeIndex};

fn resolve(
    index: &PartyIndex,
    representatives: &RepresentativeIndex,
    value: &str,
) -> Result<Vec<RecordId>, BlockingError> {
    let key = representatives
        .owner(value)
        .ok_or_else(|| BlockingError::IncompleteIndex {
            party: index.party,
            detail: format!("exposed value {:?} has no owning bucket", value),
        })?;
    index
        .records(key)
        .map(<[RecordId]>::to_vec)
        .ok_or_else(|| BlockingError::IncompleteIndex {
            party: index.party,
            detail: format!("bucket {} is not part of the index", key),
        })
}

/// Resolve `pairs` into the candidate block table, ids in pair order.
pub fn assemble_candidates(
    pairs: &[(String, String)],
    alice: (&PartyIndex, &RepresentativeIndex),
    bob: (&PartyIndex, &RepresentativeIndex),
) -> Result<CandidateBlockTable, BlockingError> {
    if alice.0.party != Party::Alice || bob.0.party != alice.0.party.other() {
        return Err(BlockingError::Configuration(format!(
            "expected indexes of alice and bob, got {} and {}",
            alice.0.party, bob.0.party
        )));
    }

    let mut table = CandidateBlockTable::new();
    for (alice_value, bob_value) in pairs {
        let alice_ids = resolve(alice.0, alice.1, alice_value)?;
        let bob_ids = resolve(bob.0, bob.1, bob_value)?;
        table.push(alice_ids, bob_ids);
    }
    Ok(table)
}
