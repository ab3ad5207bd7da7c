//! Per-party n-gram index and aggregate signature
//!
//! `SignatureIndexer` is a value-holding builder: construct it for one
//! party, feed it that party's records and attribute selection, then consume
//! it into `PartySignatures`. Nothing is shared between parties.

use std::collections::BTreeMap;

use shared_types::{
    concatenate_attributes, BlockingError, Party, RecordId, RecordTable, PROGRESS_CHECKPOINT,
};
use tracing::debug;

use super::config::SignatureParams;
use super::encoder::SignatureEncoder;
use super::signature::Signature;
use crate::events::SignatureMessage;

/// n-gram → ids of the records containing it, in record order.
///
/// A record is listed once per occurrence, so "nana" lists its id twice
/// under "na". Block sizes count occurrences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NGramIndex {
    entries: BTreeMap<String, Vec<RecordId>>,
}

impl NGramIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `record_id` contains `gram`.
    pub fn add(&mut self, gram: &str, record_id: &RecordId) {
        self.entries
            .entry(gram.to_string())
            .or_default()
            .push(record_id.clone());
    }

    pub fn get(&self, gram: &str) -> Option<&[RecordId]> {
        self.entries.get(gram).map(Vec::as_slice)
    }

    /// Entries in n-gram order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<RecordId>)> + '_ {
        self.entries.iter()
    }

    /// The party-wide n-gram set.
    pub fn ngrams(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One party's n-gram index and aggregate Bloom signature.
#[derive(Clone, Debug)]
pub struct PartySignatures {
    pub party: Party,
    pub params: SignatureParams,
    pub ngram_index: NGramIndex,
    /// Union of the signatures of every n-gram in `ngram_index`.
    pub aggregate: Signature,
}

impl PartySignatures {
    /// The only part of this index that crosses the trust boundary.
    pub fn announce(&self) -> SignatureMessage {
        SignatureMessage {
            sender: self.party,
            params: self.params,
            signature: self.aggregate.clone(),
        }
    }
}

/// Builder for one party's `PartySignatures`.
#[derive(Debug)]
pub struct SignatureIndexer<'a> {
    party: Party,
    records: Option<&'a RecordTable>,
    attributes: Option<Vec<usize>>,
}

impl<'a> SignatureIndexer<'a> {
    pub fn new(party: Party) -> Self {
        Self {
            party,
            records: None,
            attributes: None,
        }
    }

    pub fn records(mut self, records: &'a RecordTable) -> Self {
        self.records = Some(records);
        self
    }

    /// Columns concatenated into the value the n-grams are taken from.
    pub fn attributes(mut self, selection: &[usize]) -> Self {
        self.attributes = Some(selection.to_vec());
        self
    }

    /// Extract n-grams of every record and build the aggregate signature.
    pub fn build(self, encoder: &mut SignatureEncoder) -> Result<PartySignatures, BlockingError> {
        const OP: &str = "SignatureIndexer::build";
        let records = self
            .records
            .ok_or_else(|| BlockingError::precondition(OP, format!("record table of {}", self.party)))?;
        let attributes = self
            .attributes
            .ok_or_else(|| BlockingError::precondition(OP, "attribute selection"))?;

        let params = encoder.params();
        let mut ngram_index = NGramIndex::new();

        for (done, (rec_id, attrs)) in records.iter().enumerate() {
            if (done + 1) % PROGRESS_CHECKPOINT == 0 {
                debug!(party = %self.party, done = done + 1, total = records.len(), "Extracting n-grams");
            }
            let value = concatenate_attributes(rec_id, attrs, &attributes)?;
            for gram in params.qgram.qgrams(&value) {
                ngram_index.add(&gram, rec_id);
            }
        }

        let grams: Vec<&str> = ngram_index.ngrams().collect();
        let aggregate = encoder.encode_all(grams);

        debug!(
            party = %self.party,
            ngrams = ngram_index.len(),
            bits_set = aggregate.count_ones(),
            "Aggregate signature built"
        );

        Ok(PartySignatures {
            party: self.party,
            params,
            ngram_index,
            aggregate,
        })
    }
}
