//! Block-size statistics port.
//!
//! The statistics collaborator is consumed as a black box: strategies hand it
//! the sizes of their blocks once per party build and forward the result.
//! `DescriptiveStatistics` is the default adapter.

use serde::{Deserialize, Serialize};

/// Summary of the block sizes of one index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockStats {
    pub min: usize,
    pub median: f64,
    pub max: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// Block sizes in index order.
    pub sizes: Vec<usize>,
}

/// Statistics collaborator (driven port).
pub trait BlockStatistics: Send + Sync {
    /// Summarize the given block sizes.
    fn block_stats(&self, sizes: &[usize]) -> BlockStats;
}

/// Min / median / max / mean / population standard deviation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptiveStatistics;

impl BlockStatistics for DescriptiveStatistics {
    fn block_stats(&self, sizes: &[usize]) -> BlockStats {
        if sizes.is_empty() {
            return BlockStats::default();
        }

        let mut sorted = sizes.to_vec();
        sorted.sort_unstable();
        let n = sorted.len();

        let median = if n % 2 == 1 {
            sorted[n / 2] as f64
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
        };
        let mean = sorted.iter().sum::<usize>() as f64 / n as f64;
        let variance = sorted
            .iter()
            .map(|&s| {
                let d = s as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n as f64;

        BlockStats {
            min: sorted[0],
            median,
            max: sorted[n - 1],
            mean,
            std_dev: variance.sqrt(),
            sizes: sizes.to_vec(),
        }
    }
}
