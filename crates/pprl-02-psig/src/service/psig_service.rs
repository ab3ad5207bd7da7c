//! P-sig Blocking Service
//!
//! Orchestrates the per-party domain pipelines and the signature exchange.

use std::sync::Arc;
use std::time::{Duration, Instant};

use shared_types::{
    BlockSizeSink, BlockStatistics, BlockingError, BlockingResult, CandidateBlockTable,
    DescriptiveStatistics, IndexBuildReport, NoOpSink, Party, RecordTable,
};
use tracing::{debug, info, warn};

use crate::domain::{
    assemble_blocks, expected_fill_ratio, filter_microblocks, FilterSizing, MicroBlocks, PSigConfig,
    PartySignatures, Signature, SignatureEncoder, SignatureIndexer,
};
use crate::events::CommonSignatureMessage;
use crate::ports::PSigBlockingApi;

/// Tag under which block sizes are forwarded to the sink
pub const STRATEGY_TAG: &str = "PSIG";

/// Above this fill ratio the common signature lets almost every n-gram pass.
const SATURATION_WARNING: f64 = 0.9;

/// False positive rate the filter length is measured against.
const TARGET_FPR: f64 = 0.01;

/// Everything one party owns. Never read by the other party's pipeline.
#[derive(Debug)]
struct PartyState {
    party: Party,
    encoder: SignatureEncoder,
    records: Option<RecordTable>,
    signatures: Option<PartySignatures>,
    microblocks: Option<MicroBlocks>,
}

impl PartyState {
    fn new(party: Party, config: &PSigConfig) -> Self {
        Self {
            party,
            encoder: SignatureEncoder::new(config),
            records: None,
            signatures: None,
            microblocks: None,
        }
    }

    fn index_signatures(&mut self, attributes: &[usize]) -> BlockingResult<()> {
        let records = self.records.as_ref().ok_or_else(|| {
            BlockingError::precondition(
                "PSigService::common_bloom_filter",
                format!("record table of {}", self.party),
            )
        })?;

        let signatures = SignatureIndexer::new(self.party)
            .records(records)
            .attributes(attributes)
            .build(&mut self.encoder)?;
        self.signatures = Some(signatures);
        Ok(())
    }

    fn filter(
        &mut self,
        common: Option<&CommonSignatureMessage>,
    ) -> BlockingResult<MicroBlocks> {
        const OP: &str = "PSigService::build_index";
        self.microblocks = None;

        let common = common.ok_or_else(|| BlockingError::precondition(OP, "common Bloom filter"))?;
        let signatures = self.signatures.as_ref().ok_or_else(|| {
            BlockingError::precondition(OP, format!("n-gram index of {}", self.party))
        })?;
        filter_microblocks(signatures, common, &mut self.encoder)
    }
}

/// P-sig blocking service
///
/// Implements the `PSigBlockingApi` port. Statistics and the block-size sink
/// are injected driven ports.
pub struct PSigService<S: BlockStatistics = DescriptiveStatistics, K: BlockSizeSink = NoOpSink> {
    config: PSigConfig,
    statistics: Arc<S>,
    sink: Arc<K>,
    alice: PartyState,
    bob: PartyState,
    common: Option<CommonSignatureMessage>,
    candidates: Option<CandidateBlockTable>,
}

impl PSigService {
    /// Create a service with descriptive statistics and no sink
    pub fn new(config: PSigConfig) -> BlockingResult<Self> {
        Self::with_ports(
            config,
            Arc::new(DescriptiveStatistics),
            Arc::new(NoOpSink),
        )
    }
}

impl<S: BlockStatistics, K: BlockSizeSink> PSigService<S, K> {
    /// Create a service with custom driven ports
    pub fn with_ports(
        config: PSigConfig,
        statistics: Arc<S>,
        sink: Arc<K>,
    ) -> BlockingResult<Self> {
        config.validate()?;
        Ok(Self {
            alice: PartyState::new(Party::Alice, &config),
            bob: PartyState::new(Party::Bob, &config),
            config,
            statistics,
            sink,
            common: None,
            candidates: None,
        })
    }

    pub fn config(&self) -> &PSigConfig {
        &self.config
    }

    /// The common signature of the last `common_bloom_filter` call
    pub fn common_signature(&self) -> Option<&CommonSignatureMessage> {
        self.common.as_ref()
    }

    /// Microblocks of one party, once its index is built
    pub fn microblocks(&self, party: Party) -> Option<&MicroBlocks> {
        self.state(party).microblocks.as_ref()
    }

    /// Filter both parties' n-gram indexes in parallel.
    pub fn build_both(&mut self) -> BlockingResult<(IndexBuildReport, IndexBuildReport)> {
        let start = Instant::now();
        self.candidates = None;

        let common = self.common.as_ref();
        let (alice, bob) = (&mut self.alice, &mut self.bob);
        let (alice_blocks, bob_blocks) =
            rayon::join(|| alice.filter(common), || bob.filter(common));
        let (alice_blocks, bob_blocks) = (alice_blocks?, bob_blocks?);

        let elapsed = start.elapsed();
        Ok((
            self.finish(Party::Alice, alice_blocks, elapsed)?,
            self.finish(Party::Bob, bob_blocks, elapsed)?,
        ))
    }

    fn state(&self, party: Party) -> &PartyState {
        match party {
            Party::Alice => &self.alice,
            Party::Bob => &self.bob,
        }
    }

    fn state_mut(&mut self, party: Party) -> &mut PartyState {
        match party {
            Party::Alice => &mut self.alice,
            Party::Bob => &mut self.bob,
        }
    }

    /// Report statistics and sizes, then keep the microblocks.
    fn finish(
        &mut self,
        party: Party,
        microblocks: MicroBlocks,
        elapsed: Duration,
    ) -> BlockingResult<IndexBuildReport> {
        let sizes = microblocks.sizes();
        let stats = self.statistics.block_stats(&sizes);
        self.sink.record(STRATEGY_TAG, party, &sizes)?;

        let state = self.state_mut(party);
        let ngrams = state.signatures.as_ref().map_or(0, |s| s.ngram_index.len());
        info!(
            party = %party,
            blocks = microblocks.len(),
            dropped = ngrams.saturating_sub(microblocks.len()),
            elapsed_ms = elapsed.as_millis() as u64,
            "P-sig index built"
        );

        state.microblocks = Some(microblocks);
        Ok(IndexBuildReport {
            party,
            stats,
            elapsed,
        })
    }

    /// Forget everything derived from the common signature
    fn clear_derived(&mut self) {
        for state in [&mut self.alice, &mut self.bob] {
            state.signatures = None;
            state.microblocks = None;
        }
        self.common = None;
        self.candidates = None;
    }
}

impl<S: BlockStatistics, K: BlockSizeSink> PSigBlockingApi for PSigService<S, K> {
    fn load_records(&mut self, party: Party, records: RecordTable) {
        debug!(party = %party, records = records.len(), "Record table loaded");
        self.clear_derived();
        match party {
            Party::Alice => self.alice.records = Some(records),
            Party::Bob => self.bob.records = Some(records),
        }
    }

    fn common_bloom_filter(&mut self, attributes: &[usize]) -> BlockingResult<Signature> {
        let start = Instant::now();
        self.clear_derived();

        let (alice, bob) = (&mut self.alice, &mut self.bob);
        let (alice_result, bob_result) = rayon::join(
            || alice.index_signatures(attributes),
            || bob.index_signatures(attributes),
        );
        alice_result?;
        bob_result?;

        let (alice, bob) = match (&self.alice.signatures, &self.bob.signatures) {
            (Some(alice), Some(bob)) => (alice, bob),
            _ => {
                return Err(BlockingError::precondition(
                    "PSigService::common_bloom_filter",
                    "aggregate signatures of both parties",
                ))
            }
        };

        for signatures in [alice, bob] {
            debug!(
                party = %signatures.party,
                ngrams = signatures.ngram_index.len(),
                fill_ratio = signatures.aggregate.fill_ratio(),
                expected_fill_ratio = expected_fill_ratio(
                    self.config.bf_len,
                    signatures.ngram_index.len(),
                    self.config.num_hash_funct,
                ),
                "Aggregate signature"
            );
        }

        let ngrams = alice.ngram_index.len().max(bob.ngram_index.len());
        let (bf_len, num_hash_funct) = (self.config.bf_len, self.config.num_hash_funct);
        let sizing = FilterSizing::assess(bf_len, ngrams, num_hash_funct, TARGET_FPR);
        if sizing.is_undersized(bf_len) || sizing.hash_count_off(num_hash_funct) {
            warn!(
                bf_len,
                num_hash_funct,
                ngrams,
                fpr = sizing.fpr,
                optimal_k = sizing.optimal_k,
                minimum_bits = sizing.minimum_bits,
                "Bloom filter parameters are far from optimal for this many n-grams"
            );
        }

        let common = CommonSignatureMessage::intersect(&alice.announce(), &bob.announce())?;
        let fill_ratio = common.signature.fill_ratio();
        if fill_ratio > SATURATION_WARNING {
            warn!(
                fill_ratio,
                bf_len = self.config.bf_len,
                "Common signature is nearly saturated; consider a longer Bloom filter"
            );
        }

        info!(
            alice_ngrams = alice.ngram_index.len(),
            bob_ngrams = bob.ngram_index.len(),
            bits_set = common.signature.count_ones(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Common Bloom filter computed"
        );

        let signature = common.signature.clone();
        self.common = Some(common);
        Ok(signature)
    }

    fn build_index(&mut self, party: Party) -> BlockingResult<IndexBuildReport> {
        let start = Instant::now();
        self.candidates = None;

        let common = self.common.as_ref();
        let state = match party {
            Party::Alice => &mut self.alice,
            Party::Bob => &mut self.bob,
        };
        let microblocks = state.filter(common)?;
        self.finish(party, microblocks, start.elapsed())
    }

    fn generate_blocks(&mut self) -> BlockingResult<usize> {
        const OP: &str = "PSigService::generate_blocks";
        let start = Instant::now();
        self.candidates = None;

        let alice = self
            .alice
            .microblocks
            .as_ref()
            .ok_or_else(|| BlockingError::precondition(OP, "index of alice"))?;
        let bob = self
            .bob
            .microblocks
            .as_ref()
            .ok_or_else(|| BlockingError::precondition(OP, "index of bob"))?;

        let table = assemble_blocks(alice, bob)?;
        let count = table.len();
        info!(
            candidates = count,
            pairs = table.total_pairs(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "P-sig candidate blocks generated"
        );

        self.candidates = Some(table);
        Ok(count)
    }

    fn candidate_blocks(&self) -> BlockingResult<&CandidateBlockTable> {
        self.candidates.as_ref().ok_or_else(|| {
            BlockingError::precondition("PSigService::candidate_blocks", "generated candidate blocks")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PSigConfigBuilder;
    use shared_types::MemorySink;

    fn config() -> PSigConfig {
        PSigConfigBuilder::new()
            .num_hash_funct(3)
            .bf_len(1800)
            .qgram_len(2)
            .padding('^', '$')
            .build()
            .expect("valid config")
    }

    fn table(rows: &[(&str, &str)]) -> RecordTable {
        rows.iter().map(|(id, name)| (*id, vec![*name])).collect()
    }

    fn loaded<K: BlockSizeSink>(sink: Arc<K>) -> PSigService<DescriptiveStatistics, K> {
        let mut service =
            PSigService::with_ports(config(), Arc::new(DescriptiveStatistics), sink).expect("service");
        service.load_records(Party::Alice, table(&[("a1", "smith"), ("a2", "jones")]));
        service.load_records(Party::Bob, table(&[("b1", "smyth"), ("b2", "brown")]));
        service
    }

    #[test]
    fn test_full_flow_records_sizes_in_sink() {
        let sink = Arc::new(MemorySink::new());
        let mut service = loaded(sink.clone());

        let common = service.common_bloom_filter(&[0]).expect("common");
        assert!(common.count_ones() > 0);

        let report = service.build_index_alice().expect("alice");
        assert_eq!(report.party, Party::Alice);
        service.build_index_bob().expect("bob");

        let count = service.generate_blocks().expect("blocks");
        assert!(count > 0);
        assert_eq!(service.candidate_blocks().expect("table").len(), count);

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.strategy == STRATEGY_TAG));
        assert_eq!(entries[0].party, Party::Alice);
        assert_eq!(entries[1].party, Party::Bob);
    }

    #[test]
    fn test_sink_counts_every_gram_occurrence() {
        let sink = Arc::new(MemorySink::new());
        let mut service =
            PSigService::with_ports(config(), Arc::new(DescriptiveStatistics), sink.clone())
                .expect("service");
        service.load_records(Party::Alice, table(&[("a1", "nana")]));
        service.load_records(Party::Bob, table(&[("b1", "nana")]));

        service.common_bloom_filter(&[0]).expect("common");
        service.build_both().expect("both");
        let count = service.generate_blocks().expect("blocks");

        // ^n, a$, an, na
        for entry in sink.entries() {
            assert_eq!(entry.sizes, vec![1, 1, 1, 2]);
        }
        assert_eq!(count, 4);
        for (_, block) in service.candidate_blocks().expect("table").iter() {
            assert_eq!(block.alice, vec!["a1".to_string()]);
            assert_eq!(block.bob, vec!["b1".to_string()]);
        }
    }

    #[test]
    fn test_build_both_matches_sequential_builds() {
        let mut parallel = loaded(Arc::new(NoOpSink));
        let mut sequential = loaded(Arc::new(NoOpSink));
        for service in [&mut parallel, &mut sequential] {
            service.common_bloom_filter(&[0]).expect("common");
        }

        let (alice, bob) = parallel.build_both().expect("both");
        assert_eq!((alice.party, bob.party), (Party::Alice, Party::Bob));
        sequential.build_index_alice().expect("alice");
        sequential.build_index_bob().expect("bob");

        for party in Party::ALL {
            assert_eq!(parallel.microblocks(party), sequential.microblocks(party));
        }
    }

    #[test]
    fn test_build_both_before_common_filter() {
        let mut service = loaded(Arc::new(NoOpSink));
        assert!(matches!(
            service.build_both(),
            Err(BlockingError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_common_filter_requires_both_tables() {
        let mut service = PSigService::new(config()).expect("service");
        service.load_records(Party::Alice, table(&[("a1", "smith")]));

        assert!(matches!(
            service.common_bloom_filter(&[0]),
            Err(BlockingError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_build_index_before_common_filter() {
        let mut service = loaded(Arc::new(NoOpSink));
        assert!(matches!(
            service.build_index(Party::Bob),
            Err(BlockingError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_generate_blocks_needs_both_indexes() {
        let mut service = loaded(Arc::new(NoOpSink));
        service.common_bloom_filter(&[0]).expect("common");
        service.build_index(Party::Alice).expect("alice");

        assert!(matches!(
            service.generate_blocks(),
            Err(BlockingError::PreconditionViolation { .. })
        ));
        assert!(service.candidate_blocks().is_err());
    }

    #[test]
    fn test_reloading_records_clears_indexes() {
        let mut service = loaded(Arc::new(NoOpSink));
        service.common_bloom_filter(&[0]).expect("common");
        service.build_index_alice().expect("alice");
        service.build_index_bob().expect("bob");

        service.load_records(Party::Bob, table(&[("b9", "smith")]));
        assert!(service.common_signature().is_none());
        assert!(service.microblocks(Party::Alice).is_none());
        assert!(service.generate_blocks().is_err());
    }

    #[test]
    fn test_invalid_attribute_selection_fails() {
        let mut service = loaded(Arc::new(NoOpSink));
        assert!(matches!(
            service.common_bloom_filter(&[3]),
            Err(BlockingError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = PSigConfig {
            bf_len: 0,
            ..Default::default()
        };
        assert!(PSigService::new(config).is_err());
    }
}
