//! Representative value selection
//!
//! A party discloses reference values, never records, to align its buckets
//! with the other party's. The policy decides how many values of each bucket
//! are disclosed; every policy exposes at least one value per bucket.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;
use shared_types::BlockingError;

use super::entities::{BucketKey, PartyIndex, RepresentativeIndex};

/// Chooses which positions of a bucket key are exposed
pub trait RepresentativePolicy: Send + Sync {
    /// Positions of `key` to expose, in key order.
    fn select(&self, key: &BucketKey) -> Vec<usize>;
}

/// Expose every position of every bucket
#[derive(Clone, Copy, Debug, Default)]
pub struct ExposeAll;

impl RepresentativePolicy for ExposeAll {
    fn select(&self, key: &BucketKey) -> Vec<usize> {
        key.positions().to_vec()
    }
}

/// Expose a seeded random fraction of each bucket's positions
#[derive(Clone, Copy, Debug)]
pub struct FractionSample {
    fraction: f64,
    seed: u64,
}

impl FractionSample {
    /// `fraction` must lie in (0, 1].
    pub fn new(fraction: f64, seed: u64) -> Result<Self, BlockingError> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(BlockingError::Configuration(format!(
                "representative fraction {} outside (0, 1]",
                fraction
            )));
        }
        Ok(Self { fraction, seed })
    }
}

impl RepresentativePolicy for FractionSample {
    fn select(&self, key: &BucketKey) -> Vec<usize> {
        let amount = (key.len() as f64 * self.fraction).ceil() as usize;
        sample_positions(key, amount, self.seed)
    }
}

/// Expose a seeded random fixed number of each bucket's positions
#[derive(Clone, Copy, Debug)]
pub struct FixedCountSample {
    count: usize,
    seed: u64,
}

impl FixedCountSample {
    /// `count` must be positive; buckets with fewer positions expose all.
    pub fn new(count: usize, seed: u64) -> Result<Self, BlockingError> {
        if count == 0 {
            return Err(BlockingError::Configuration(
                "representative count must be positive".to_string(),
            ));
        }
        Ok(Self { count, seed })
    }
}

impl RepresentativePolicy for FixedCountSample {
    fn select(&self, key: &BucketKey) -> Vec<usize> {
        sample_positions(key, self.count, self.seed)
    }
}

/// Per-bucket RNG so the choice does not depend on bucket iteration order.
///
/// Position 0 holds the sentinel, which no window ever pairs; it is only
/// exposed when it is the bucket's sole position.
fn sample_positions(key: &BucketKey, amount: usize, seed: u64) -> Vec<usize> {
    let candidates = match key.positions() {
        [0, rest @ ..] if !rest.is_empty() => rest,
        all => all,
    };
    let len = candidates.len();
    let amount = amount.clamp(1, len.max(1));
    if amount >= len {
        return candidates.to_vec();
    }

    let bucket_seed = seed ^ (key.first().unwrap_or(0) as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut rng = StdRng::seed_from_u64(bucket_seed);
    let mut picked = sample(&mut rng, len, amount).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| candidates[i]).collect()
}

/// Values a party exposes plus its local reverse lookup
#[derive(Clone, Debug, Default)]
pub struct Representatives {
    /// Exposed values in bucket order; may repeat across buckets
    pub values: Vec<String>,
    pub index: RepresentativeIndex,
}

/// Resolve the positions chosen by `policy` to reference values.
pub fn select_representatives(
    index: &PartyIndex,
    policy: &dyn RepresentativePolicy,
) -> Representatives {
    let mut reps = Representatives::default();
    for bucket in index.buckets() {
        for pos in policy.select(&bucket.key) {
            let Some(value) = index.positions().value(pos) else {
                continue;
            };
            reps.values.push(value.to_string());
            reps.index.register(value, &bucket.key);
        }
    }
    reps
}
