//! Microblock filter
//!
//! INVARIANT: an n-gram survives only if its own signature is a full subset
//! of the common signature. Partial overlap is not enough, otherwise an
//! n-gram unknown to the other party could leak through.

use std::collections::BTreeMap;

use shared_types::{BlockingError, Party, RecordId};

use super::config::SignatureParams;
use super::encoder::SignatureEncoder;
use super::index::PartySignatures;
use crate::events::CommonSignatureMessage;

/// n-gram blocks of one party that passed the common-signature filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MicroBlocks {
    pub party: Party,
    pub params: SignatureParams,
    blocks: BTreeMap<String, Vec<RecordId>>,
}

impl MicroBlocks {
    pub fn get(&self, gram: &str) -> Option<&[RecordId]> {
        self.blocks.get(gram).map(Vec::as_slice)
    }

    /// Blocks in n-gram order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<RecordId>)> + '_ {
        self.blocks.iter()
    }

    /// Block sizes in n-gram order.
    pub fn sizes(&self) -> Vec<usize> {
        self.blocks.values().map(Vec::len).collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Keep the n-gram index entries whose signature lies inside `common`.
pub fn filter_microblocks(
    signatures: &PartySignatures,
    common: &CommonSignatureMessage,
    encoder: &mut SignatureEncoder,
) -> Result<MicroBlocks, BlockingError> {
    if signatures.params != common.params || encoder.params() != common.params {
        return Err(BlockingError::Configuration(format!(
            "{} index parameters {:?} differ from common signature parameters {:?}",
            signatures.party, signatures.params, common.params
        )));
    }

    let mut blocks = BTreeMap::new();
    for (gram, ids) in signatures.ngram_index.iter() {
        if encoder.encode_cached(gram).is_subset_of(&common.signature) {
            blocks.insert(gram.clone(), ids.clone());
        }
    }

    Ok(MicroBlocks {
        party: signatures.party,
        params: signatures.params,
        blocks,
    })
}
