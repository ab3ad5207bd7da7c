//! Reference-value pruning
//!
//! Collapses runs of sorted reference values that share a similar prefix,
//! keeping the longest value of each run, then optionally draws a seeded
//! sample. Fewer reference values mean fewer, larger buckets.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;

use crate::config::PruningConfig;
use crate::domain::{ReferenceValues, SimilarityMeasure};

/// First `chars` characters of `s`.
fn prefix(s: &str, chars: usize) -> &str {
    s.char_indices().nth(chars).map_or(s, |(i, _)| &s[..i])
}

/// Prune `values` according to `config`. The result stays sorted.
pub fn prune_reference_values(
    values: &ReferenceValues,
    config: &PruningConfig,
    similarity: &dyn SimilarityMeasure,
) -> ReferenceValues {
    let mut kept: Vec<String> = Vec::with_capacity(values.len());

    for value in values.as_slice() {
        let Some(prev) = kept.last() else {
            kept.push(value.clone());
            continue;
        };

        let (value_len, prev_len) = (value.chars().count(), prev.chars().count());
        let prefix_len = (value_len.min(prev_len) / 4).max(1);
        let sim = similarity.similarity(prefix(value, prefix_len), prefix(prev, prefix_len));

        if sim < config.similarity_threshold {
            kept.push(value.clone());
        } else if value_len > prev_len {
            if let Some(last) = kept.last_mut() {
                *last = value.clone();
            }
        }
    }

    if let Some(max) = config.max_values {
        if kept.len() > max {
            let mut rng = StdRng::seed_from_u64(config.seed);
            let mut picked = sample(&mut rng, kept.len(), max).into_vec();
            picked.sort_unstable();
            kept = picked.into_iter().map(|i| kept[i].clone()).collect();
        }
    }

    ReferenceValues::from_sorted(kept)
}
