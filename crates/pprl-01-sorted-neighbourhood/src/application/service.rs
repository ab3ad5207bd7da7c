//! Sorted-Neighbourhood Blocking Service
//!
//! Main service implementing SortedNeighbourhoodApi.

use std::sync::Arc;
use std::time::{Duration, Instant};

use shared_types::{
    BlockSizeSink, BlockStatistics, BlockingError, BlockingReport, BlockingResult,
    CandidateBlockTable, DescriptiveStatistics, IndexBuildReport, NoOpSink, Party, RecordTable,
};
use tracing::{debug, info, warn};

use crate::algorithms::{assemble_candidates, candidate_value_pairs, PartyIndexer};
use crate::config::SortedNeighbourhoodConfig;
use crate::domain::{
    select_representatives, ExposeAll, PartyIndex, QGramDice, ReferenceValues,
    RepresentativePolicy, Representatives, SimilarityMeasure,
};
use crate::events::RepresentativeMessage;
use crate::ports::inbound::SortedNeighbourhoodApi;

/// Tag under which block sizes are forwarded to the sink
pub const STRATEGY_TAG: &str = "SNN_2P";

/// Index, local reverse lookup and announcement of one built party
#[derive(Debug)]
struct BuiltParty {
    index: PartyIndex,
    representatives: Representatives,
    message: RepresentativeMessage,
}

#[derive(Debug, Default)]
struct PartyState {
    records: Option<RecordTable>,
    reference_values: Option<ReferenceValues>,
    built: Option<BuiltParty>,
}

/// Read-only pipeline of one party; runs without touching the other party.
fn index_party(
    party: Party,
    state: &PartyState,
    config: &SortedNeighbourhoodConfig,
    similarity: &dyn SimilarityMeasure,
    policy: &dyn RepresentativePolicy,
    attributes: &[usize],
) -> BlockingResult<BuiltParty> {
    let mut indexer = PartyIndexer::new(party, config, similarity).attributes(attributes);
    if let Some(records) = &state.records {
        indexer = indexer.records(records);
    }
    if let Some(values) = &state.reference_values {
        indexer = indexer.reference_values(values);
    }
    let index = indexer.build()?;

    let representatives = select_representatives(&index, policy);
    debug!(
        party = %party,
        exposed = representatives.values.len(),
        owners = representatives.index.len(),
        "Representatives selected"
    );
    let message = RepresentativeMessage::new(party, &representatives);

    Ok(BuiltParty {
        index,
        representatives,
        message,
    })
}

/// Sorted-Neighbourhood Blocking Service
///
/// Orchestrates the pipeline:
/// 1. Build each party's bucket index from its own records
/// 2. Select the representative values each party exposes
/// 3. Slide the window over both parties' representatives
/// 4. Resolve candidate value pairs to record lists
pub struct SortedNeighbourhoodService<
    S: BlockStatistics = DescriptiveStatistics,
    K: BlockSizeSink = NoOpSink,
> {
    config: SortedNeighbourhoodConfig,
    similarity: Arc<dyn SimilarityMeasure>,
    policy: Arc<dyn RepresentativePolicy>,
    statistics: Arc<S>,
    sink: Arc<K>,
    alice: PartyState,
    bob: PartyState,
    candidates: Option<CandidateBlockTable>,
}

impl SortedNeighbourhoodService {
    /// Create a service with bigram Dice similarity, expose-all
    /// representatives, descriptive statistics and no sink
    pub fn new(config: SortedNeighbourhoodConfig) -> BlockingResult<Self> {
        Self::with_ports(config, Arc::new(DescriptiveStatistics), Arc::new(NoOpSink))
    }
}

impl<S: BlockStatistics, K: BlockSizeSink> SortedNeighbourhoodService<S, K> {
    /// Create a service with custom driven ports
    pub fn with_ports(
        config: SortedNeighbourhoodConfig,
        statistics: Arc<S>,
        sink: Arc<K>,
    ) -> BlockingResult<Self> {
        config.validate()?;
        if config.overlap != 0 {
            warn!(overlap = config.overlap, "overlap is accepted but has no effect");
        }
        Ok(Self {
            config,
            similarity: Arc::new(QGramDice::default()),
            policy: Arc::new(ExposeAll),
            statistics,
            sink,
            alice: PartyState::default(),
            bob: PartyState::default(),
            candidates: None,
        })
    }

    /// Replace the similarity measure used for merging and pruning
    pub fn with_similarity(mut self, similarity: Arc<dyn SimilarityMeasure>) -> Self {
        self.similarity = similarity;
        self
    }

    /// Replace the representative selection policy
    pub fn with_policy(mut self, policy: Arc<dyn RepresentativePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &SortedNeighbourhoodConfig {
        &self.config
    }

    /// Bucket index of one party, once built
    pub fn index(&self, party: Party) -> Option<&PartyIndex> {
        self.state(party).built.as_ref().map(|b| &b.index)
    }

    /// What one party discloses to the other, once built
    pub fn announcement(&self, party: Party) -> Option<&RepresentativeMessage> {
        self.state(party).built.as_ref().map(|b| &b.message)
    }

    /// Build both parties' indexes in parallel.
    pub fn build_both(
        &mut self,
        alice_attributes: &[usize],
        bob_attributes: &[usize],
    ) -> BlockingResult<(IndexBuildReport, IndexBuildReport)> {
        let start = Instant::now();
        self.candidates = None;
        self.alice.built = None;
        self.bob.built = None;

        let (config, similarity, policy) =
            (&self.config, self.similarity.as_ref(), self.policy.as_ref());
        let (alice, bob) = (&self.alice, &self.bob);
        let (alice_built, bob_built) = rayon::join(
            || index_party(Party::Alice, alice, config, similarity, policy, alice_attributes),
            || index_party(Party::Bob, bob, config, similarity, policy, bob_attributes),
        );
        let (alice_built, bob_built) = (alice_built?, bob_built?);

        let elapsed = start.elapsed();
        Ok((
            self.finish(Party::Alice, alice_built, elapsed)?,
            self.finish(Party::Bob, bob_built, elapsed)?,
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

    /// Report statistics and sizes, then keep the built party.
    fn finish(
        &mut self,
        party: Party,
        built: BuiltParty,
        elapsed: Duration,
    ) -> BlockingResult<IndexBuildReport> {
        let sizes = built.index.sizes();
        let stats = self.statistics.block_stats(&sizes);
        self.sink.record(STRATEGY_TAG, party, &sizes)?;

        info!(
            party = %party,
            buckets = built.index.len(),
            records = sizes.iter().sum::<usize>(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Sorted-neighbourhood index built"
        );

        self.state_mut(party).built = Some(built);
        Ok(IndexBuildReport {
            party,
            stats,
            elapsed,
        })
    }
}

impl<S: BlockStatistics, K: BlockSizeSink> SortedNeighbourhoodApi for SortedNeighbourhoodService<S, K> {
    fn load_records(&mut self, party: Party, records: RecordTable) {
        debug!(party = %party, records = records.len(), "Record table loaded");
        self.candidates = None;
        let state = self.state_mut(party);
        state.records = Some(records);
        state.built = None;
    }

    fn set_reference_values(&mut self, party: Party, values: Vec<String>) {
        let values = ReferenceValues::new(values);
        debug!(party = %party, values = values.len(), "Reference values set");
        self.candidates = None;
        let state = self.state_mut(party);
        state.reference_values = Some(values);
        state.built = None;
    }

    fn build_index(
        &mut self,
        party: Party,
        attributes: &[usize],
    ) -> BlockingResult<IndexBuildReport> {
        let start = Instant::now();
        self.candidates = None;
        self.state_mut(party).built = None;

        let built = index_party(
            party,
            self.state(party),
            &self.config,
            self.similarity.as_ref(),
            self.policy.as_ref(),
            attributes,
        )?;
        self.finish(party, built, start.elapsed())
    }

    fn generate_blocks(&mut self) -> BlockingResult<BlockingReport> {
        const OP: &str = "SortedNeighbourhoodService::generate_blocks";
        let start = Instant::now();
        self.candidates = None;

        let alice = self
            .alice
            .built
            .as_ref()
            .ok_or_else(|| BlockingError::precondition(OP, "index of alice"))?;
        let bob = self
            .bob
            .built
            .as_ref()
            .ok_or_else(|| BlockingError::precondition(OP, "index of bob"))?;

        let pairs = candidate_value_pairs(&alice.message.values, &bob.message.values, self.config.w);
        let table = assemble_candidates(
            &pairs,
            (&alice.index, &alice.representatives.index),
            (&bob.index, &bob.representatives.index),
        )?;

        let elapsed = start.elapsed();
        let candidate_count = table.len();
        info!(
            candidates = candidate_count,
            pairs = table.total_pairs(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Sorted-neighbourhood candidate blocks generated"
        );

        self.candidates = Some(table);
        Ok(BlockingReport {
            candidate_count,
            elapsed,
        })
    }

    fn candidate_blocks(&self) -> BlockingResult<&CandidateBlockTable> {
        self.candidates.as_ref().ok_or_else(|| {
            BlockingError::precondition(
                "SortedNeighbourhoodService::candidate_blocks",
                "generated candidate blocks",
            )
        })
    }
}
