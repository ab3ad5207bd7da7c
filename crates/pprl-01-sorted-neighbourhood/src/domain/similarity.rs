//! String similarity measures
//!
//! A measure returns a value in [0, 1]; 1 means identical.

use std::collections::HashMap;

/// Pluggable similarity between two reference values
pub trait SimilarityMeasure: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

impl<F> SimilarityMeasure for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// 1.0 for equal strings, 0.0 otherwise
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactMatch;

impl SimilarityMeasure for ExactMatch {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            1.0
        } else {
            0.0
        }
    }
}

/// Dice coefficient over q-gram multisets
#[derive(Clone, Copy, Debug)]
pub struct QGramDice {
    pub q: usize,
}

impl Default for QGramDice {
    fn default() -> Self {
        Self { q: 2 }
    }
}

impl QGramDice {
    fn qgram_counts<'a>(&self, s: &'a str) -> (HashMap<&'a str, usize>, usize) {
        let bounds: Vec<usize> = s
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(s.len()))
            .collect();
        let mut counts = HashMap::new();
        let mut total = 0;
        for w in bounds.windows(self.q + 1) {
            *counts.entry(&s[w[0]..w[self.q]]).or_insert(0) += 1;
            total += 1;
        }
        (counts, total)
    }
}

impl SimilarityMeasure for QGramDice {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        if self.q == 0 {
            return 0.0;
        }
        let (a_grams, a_total) = self.qgram_counts(a);
        let (b_grams, b_total) = self.qgram_counts(b);
        if a_total + b_total == 0 {
            return 0.0;
        }
        let common: usize = a_grams
            .iter()
            .map(|(gram, &n)| n.min(b_grams.get(gram).copied().unwrap_or(0)))
            .sum();
        2.0 * common as f64 / (a_total + b_total) as f64
    }
}
