//! Inbound Ports (Driving Ports)
//!
//! The API callers use to run p-sig blocking between Alice and Bob.

use shared_types::{BlockingResult, CandidateBlockTable, IndexBuildReport, Party, RecordTable};

use crate::domain::Signature;

/// Primary p-sig blocking API (Driving Port)
///
/// Call order: `load_records` for both parties, `common_bloom_filter`,
/// `build_index` for both parties, `generate_blocks`. Calling a step early
/// fails with `BlockingError::PreconditionViolation`.
pub trait PSigBlockingApi: Send + Sync {
    /// Replace the record table of one party.
    ///
    /// Drops every index derived from the previous table.
    fn load_records(&mut self, party: Party, records: RecordTable);

    /// Build both parties' n-gram indexes over `attributes` and intersect
    /// their aggregate signatures.
    ///
    /// # Returns
    /// The common signature, the only value both parties see
    fn common_bloom_filter(&mut self, attributes: &[usize]) -> BlockingResult<Signature>;

    /// Filter one party's n-gram index against the common signature.
    fn build_index(&mut self, party: Party) -> BlockingResult<IndexBuildReport>;

    fn build_index_alice(&mut self) -> BlockingResult<IndexBuildReport> {
        self.build_index(Party::Alice)
    }

    fn build_index_bob(&mut self) -> BlockingResult<IndexBuildReport> {
        self.build_index(Party::Bob)
    }

    /// Join both microblock sets into the candidate block table.
    ///
    /// # Returns
    /// Number of candidate blocks
    fn generate_blocks(&mut self) -> BlockingResult<usize>;

    /// Candidate blocks of the last successful `generate_blocks`.
    fn candidate_blocks(&self) -> BlockingResult<&CandidateBlockTable>;
}
