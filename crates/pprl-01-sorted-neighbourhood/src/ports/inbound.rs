//! Inbound Ports (Driving Ports / API)

use shared_types::{
    BlockingReport, BlockingResult, CandidateBlockTable, IndexBuildReport, Party, RecordTable,
};

/// Primary Sorted-Neighbourhood Blocking API
pub trait SortedNeighbourhoodApi: Send + Sync {
    /// Replace the record table of one party.
    fn load_records(&mut self, party: Party, records: RecordTable);

    /// Replace the reference values of one party.
    ///
    /// Values are sorted and de-duplicated; the empty string is reserved
    /// for the sentinel and ignored.
    fn set_reference_values(&mut self, party: Party, values: Vec<String>);

    /// Build one party's bucket index and select its representatives.
    ///
    /// Requires the party's records and reference values. On failure the
    /// party has no index until the next successful build.
    fn build_index(
        &mut self,
        party: Party,
        attributes: &[usize],
    ) -> BlockingResult<IndexBuildReport>;

    /// Exchange representatives, slide the window and fill the candidate
    /// block table. Requires both indexes.
    fn generate_blocks(&mut self) -> BlockingResult<BlockingReport>;

    /// Candidate blocks of the last successful `generate_blocks`.
    fn candidate_blocks(&self) -> BlockingResult<&CandidateBlockTable>;
}
