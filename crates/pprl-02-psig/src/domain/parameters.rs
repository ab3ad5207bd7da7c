//! Bloom signature sizing
//!
//! Formulas for a filter of m bits, n inserted n-grams and k hash functions:
//! - fill = 1 - e^(-kn/m)     -- expected fraction of set bits
//! - FPR  = fill^k            -- chance an absent n-gram looks present
//! - k    = (m/n) * ln(2)     -- optimal hash functions
//!
//! For p-sig the FPR is the chance that an n-gram unknown to the other party
//! still passes the common-signature filter.

use std::f64::consts::LN_2;

/// Expected fraction of set bits after inserting `n` elements.
pub fn expected_fill_ratio(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    1.0 - exponent.exp()
}

/// False positive rate of a filter with the given parameters.
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    expected_fill_ratio(m, n, k).powi(k as i32)
}

/// Optimal number of hash functions for m bits and n elements.
pub fn optimal_k(m: usize, n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    (((m as f64 / n as f64) * LN_2).round() as usize).max(1)
}

/// Minimum filter length that keeps `n` elements under `target_fpr`.
pub fn minimum_bits(n: usize, target_fpr: f64) -> usize {
    let ln2_squared = LN_2 * LN_2;
    (-(n as f64) * target_fpr.ln() / ln2_squared).ceil() as usize
}

/// How a configured filter compares with the optimum for its load.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterSizing {
    /// False positive rate at the configured length and hash count
    pub fpr: f64,
    /// Hash count that minimises the FPR at the configured length
    pub optimal_k: usize,
    /// Shortest filter meeting the target FPR
    pub minimum_bits: usize,
}

impl FilterSizing {
    /// Assess a filter of `m` bits and `k` hash functions holding `n` elements.
    pub fn assess(m: usize, n: usize, k: usize, target_fpr: f64) -> Self {
        Self {
            fpr: calculate_fpr(m, n, k),
            optimal_k: optimal_k(m, n),
            minimum_bits: minimum_bits(n, target_fpr),
        }
    }

    /// The filter is shorter than the target FPR requires.
    pub fn is_undersized(&self, m: usize) -> bool {
        m < self.minimum_bits
    }

    /// `k` is off from the optimum by more than a factor of two.
    pub fn hash_count_off(&self, k: usize) -> bool {
        k * 2 < self.optimal_k || k > self.optimal_k * 2
    }
}
