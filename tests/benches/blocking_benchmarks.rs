//! # PPRL Blocking Benchmarks
//!
//! | Strategy | Stage | Input |
//! |----------|-------|-------|
//! | Sorted neighbourhood | Both indexes, blocks | 500 / 2000 records per party |
//! | P-sig | Common signature, indexes, blocks | 500 / 2000 records per party |
//! | Window scan | Value pairs only | 18 surnames, w = 1..4 |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use pprl_01_sorted_neighbourhood::algorithms::candidate_value_pairs;
use pprl_01_sorted_neighbourhood::{
    SortedNeighbourhoodApi, SortedNeighbourhoodConfigBuilder, SortedNeighbourhoodService,
};
use pprl_02_psig::{PSigBlockingApi, PSigConfigBuilder, PSigService};
use pprl_tests::fixtures::{overlapping_parties, reference_values, SURNAME};
use shared_types::Party;

const SIZES: [usize; 2] = [500, 2000];

// ============================================================================
// Sorted neighbourhood
// ============================================================================

fn bench_sorted_neighbourhood(c: &mut Criterion) {
    let mut group = c.benchmark_group("pprl-01-sorted-neighbourhood");
    group.measurement_time(Duration::from_secs(10));

    for size in SIZES {
        let (alice, bob) = overlapping_parties(size, size / 3, 42);
        let config = SortedNeighbourhoodConfigBuilder::new()
            .k(5)
            .w(2)
            .build()
            .expect("valid config");

        group.throughput(Throughput::Elements(2 * size as u64));
        group.bench_with_input(BenchmarkId::new("full_run", size), &size, |b, _| {
            b.iter(|| {
                let mut service = SortedNeighbourhoodService::new(config.clone()).expect("service");
                service.load_records(Party::Alice, alice.clone());
                service.load_records(Party::Bob, bob.clone());
                service.set_reference_values(Party::Alice, reference_values());
                service.set_reference_values(Party::Bob, reference_values());
                service.build_both(&[SURNAME], &[SURNAME]).expect("indexes");
                black_box(service.generate_blocks().expect("blocks"))
            })
        });
    }

    group.finish();
}

fn bench_window_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("pprl-01-window-scan");
    let values = reference_values();
    let (alice, bob) = values.split_at(values.len() / 2);

    for w in 1..=4 {
        group.bench_with_input(BenchmarkId::new("candidate_value_pairs", w), &w, |b, &w| {
            b.iter(|| black_box(candidate_value_pairs(alice, bob, w)))
        });
    }

    group.finish();
}

// ============================================================================
// P-sig
// ============================================================================

fn bench_psig(c: &mut Criterion) {
    let mut group = c.benchmark_group("pprl-02-psig");
    group.measurement_time(Duration::from_secs(10));

    let config = PSigConfigBuilder::new()
        .num_hash_funct(4)
        .bf_len(4096)
        .qgram_len(2)
        .padding('^', '$')
        .build()
        .expect("valid config");

    for size in SIZES {
        let (alice, bob) = overlapping_parties(size, size / 3, 42);

        group.throughput(Throughput::Elements(2 * size as u64));
        group.bench_with_input(BenchmarkId::new("full_run", size), &size, |b, _| {
            b.iter(|| {
                let mut service = PSigService::new(config.clone()).expect("service");
                service.load_records(Party::Alice, alice.clone());
                service.load_records(Party::Bob, bob.clone());
                service.common_bloom_filter(&[0, SURNAME]).expect("common filter");
                service.build_index_alice().expect("alice index");
                service.build_index_bob().expect("bob index");
                black_box(service.generate_blocks().expect("blocks"))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sorted_neighbourhood,
    bench_window_scan,
    bench_psig
);
criterion_main!(benches);
