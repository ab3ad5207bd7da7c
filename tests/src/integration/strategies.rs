//! # End-to-End Blocking Runs
//!
//! Both strategies on the same synthetic parties.
//!
//! ## Flows Tested:
//!
//! 1. **Sorted neighbourhood**: records → buckets → representatives → window → blocks
//! 2. **P-sig**: records → signatures → common signature → microblocks → blocks
//!
//! ## Properties:
//!
//! - Exact duplicates always meet in at least one candidate block
//! - Sorted-neighbourhood blocks hold at least k records per side
//! - Both strategies report to a shared block-size sink under their own tag

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use pprl_01_sorted_neighbourhood::{
        SortedNeighbourhoodApi, SortedNeighbourhoodConfigBuilder, SortedNeighbourhoodService,
    };
    use pprl_02_psig::{PSigBlockingApi, PSigConfigBuilder, PSigService};
    use shared_types::{
        CandidateBlockTable, DescriptiveStatistics, MemorySink, Party, RecordId, RecordTable,
    };

    use crate::fixtures::{init_tracing, overlapping_parties, reference_values, SURNAME};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const SIZE: usize = 150;
    const SHARED: usize = 50;
    const SEED: u64 = 2024;

    /// (alice id, bob id) of every pair whose selected attributes agree exactly
    fn exact_pairs(
        alice: &RecordTable,
        bob: &RecordTable,
        columns: &[usize],
    ) -> Vec<(RecordId, RecordId)> {
        let key = |attrs: &[String]| -> Vec<String> {
            columns.iter().map(|&c| attrs[c].clone()).collect()
        };
        let mut by_key: HashMap<Vec<String>, Vec<&RecordId>> = HashMap::new();
        for (id, attrs) in bob.iter() {
            by_key.entry(key(attrs)).or_default().push(id);
        }

        let mut pairs = Vec::new();
        for (a, attrs) in alice.iter() {
            for b in by_key.get(&key(attrs)).into_iter().flatten() {
                pairs.push((a.clone(), (*b).clone()));
            }
        }
        pairs
    }

    fn covered(table: &CandidateBlockTable, alice: &str, bob: &str) -> bool {
        table.iter().any(|(_, block)| {
            block.alice.iter().any(|id| id == alice) && block.bob.iter().any(|id| id == bob)
        })
    }

    // =============================================================================
    // SORTED NEIGHBOURHOOD
    // =============================================================================

    fn sorted_neighbourhood(
        alice: RecordTable,
        bob: RecordTable,
        sink: Arc<MemorySink>,
    ) -> SortedNeighbourhoodService<DescriptiveStatistics, MemorySink> {
        let config = SortedNeighbourhoodConfigBuilder::new()
            .k(3)
            .w(2)
            .build()
            .expect("valid config");
        let mut service =
            SortedNeighbourhoodService::with_ports(config, Arc::new(DescriptiveStatistics), sink)
                .expect("service");
        service.load_records(Party::Alice, alice);
        service.load_records(Party::Bob, bob);
        service.set_reference_values(Party::Alice, reference_values());
        service.set_reference_values(Party::Bob, reference_values());
        service.build_both(&[SURNAME], &[SURNAME]).expect("indexes");
        service.generate_blocks().expect("blocks");
        service
    }

    #[test]
    fn test_sorted_neighbourhood_finds_exact_duplicates() {
        init_tracing();
        let (alice, bob) = overlapping_parties(SIZE, SHARED, SEED);
        let pairs = exact_pairs(&alice, &bob, &[SURNAME]);
        assert!(!pairs.is_empty());

        let service = sorted_neighbourhood(alice, bob, Arc::new(MemorySink::new()));
        let table = service.candidate_blocks().expect("blocks");

        for (a, b) in &pairs {
            assert!(covered(table, a, b), "pair ({}, {}) not blocked together", a, b);
        }
    }

    #[test]
    fn test_sorted_neighbourhood_blocks_are_k_anonymous() {
        let (alice, bob) = overlapping_parties(SIZE, SHARED, SEED);
        let service = sorted_neighbourhood(alice, bob, Arc::new(MemorySink::new()));

        for (_, block) in service.candidate_blocks().expect("blocks").iter() {
            assert!(block.alice.len() >= 3);
            assert!(block.bob.len() >= 3);
        }
    }

    #[test]
    fn test_sorted_neighbourhood_buckets_place_every_record() {
        let (alice, bob) = overlapping_parties(SIZE, SHARED, SEED);
        let sink = Arc::new(MemorySink::new());
        sorted_neighbourhood(alice, bob, sink.clone());

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        for entry in &entries {
            assert_eq!(entry.strategy, "SNN_2P");
            assert_eq!(entry.sizes.iter().sum::<usize>(), SIZE);
        }
    }

    // =============================================================================
    // P-SIG
    // =============================================================================

    fn psig(
        alice: RecordTable,
        bob: RecordTable,
        sink: Arc<MemorySink>,
    ) -> PSigService<DescriptiveStatistics, MemorySink> {
        let config = PSigConfigBuilder::new()
            .num_hash_funct(4)
            .bf_len(4096)
            .qgram_len(2)
            .padding('^', '$')
            .build()
            .expect("valid config");
        let mut service = PSigService::with_ports(config, Arc::new(DescriptiveStatistics), sink)
            .expect("service");
        service.load_records(Party::Alice, alice);
        service.load_records(Party::Bob, bob);
        service.common_bloom_filter(&[0, SURNAME]).expect("common filter");
        service.build_index_alice().expect("alice index");
        service.build_index_bob().expect("bob index");
        service.generate_blocks().expect("blocks");
        service
    }

    #[test]
    fn test_psig_finds_exact_duplicates() {
        init_tracing();
        let (alice, bob) = overlapping_parties(SIZE, SHARED, SEED);
        let pairs = exact_pairs(&alice, &bob, &[0, SURNAME]);
        assert!(!pairs.is_empty());

        let service = psig(alice, bob, Arc::new(MemorySink::new()));
        let table = service.candidate_blocks().expect("blocks");

        for (a, b) in &pairs {
            assert!(covered(table, a, b), "pair ({}, {}) not blocked together", a, b);
        }
    }

    #[test]
    fn test_psig_blocks_only_name_loaded_records() {
        let (alice, bob) = overlapping_parties(SIZE, SHARED, SEED);
        let (alice_ids, bob_ids) = (alice.clone(), bob.clone());
        let service = psig(alice, bob, Arc::new(MemorySink::new()));

        for (_, block) in service.candidate_blocks().expect("blocks").iter() {
            assert!(!block.alice.is_empty() && !block.bob.is_empty());
            assert!(block.alice.iter().all(|id| alice_ids.get(id).is_some()));
            assert!(block.bob.iter().all(|id| bob_ids.get(id).is_some()));
        }
    }

    // =============================================================================
    // SHARED SINK
    // =============================================================================

    #[test]
    fn test_strategies_share_one_sink() {
        let (alice, bob) = overlapping_parties(60, 20, SEED);
        let sink = Arc::new(MemorySink::new());

        sorted_neighbourhood(alice.clone(), bob.clone(), sink.clone());
        psig(alice, bob, sink.clone());

        let tags: Vec<(String, Party)> = sink
            .entries()
            .into_iter()
            .map(|e| (e.strategy, e.party))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("SNN_2P".to_string(), Party::Alice),
                ("SNN_2P".to_string(), Party::Bob),
                ("PSIG".to_string(), Party::Alice),
                ("PSIG".to_string(), Party::Bob),
            ]
        );
    }
}
