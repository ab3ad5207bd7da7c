//! Configuration for Sorted-Neighbourhood Blocking

use serde::{Deserialize, Serialize};
use shared_types::BlockingError;
use std::fmt;
use std::str::FromStr;

/// How adjacent reference positions are grouped into buckets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MergeCriterion {
    /// Grow while the group holds at most k records or the next reference
    /// value is similar enough to the current one
    #[default]
    Sim,
    /// Grow until the group holds at least k records
    Size,
}

impl FromStr for MergeCriterion {
    type Err = BlockingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SIM" => Ok(Self::Sim),
            "SIZE" => Ok(Self::Size),
            other => Err(BlockingError::Configuration(format!(
                "unknown merge criterion {:?}, expected SIM or SIZE",
                other
            ))),
        }
    }
}

impl fmt::Display for MergeCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sim => write!(f, "SIM"),
            Self::Size => write!(f, "SIZE"),
        }
    }
}

/// Reference-value pruning applied before positions are assigned
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PruningConfig {
    /// Prefix similarity at or above which two neighbouring values collapse
    pub similarity_threshold: f64,
    /// Keep at most this many values after collapsing (random sample)
    pub max_values: Option<usize>,
    /// Seed of the sample
    pub seed: u64,
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.6,
            max_values: None,
            seed: 10,
        }
    }
}

/// Sorted-neighbourhood configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SortedNeighbourhoodConfig {
    /// Minimum number of records per bucket
    pub k: usize,
    /// Window half-width over the exchanged representative values
    pub w: usize,
    /// Similarity at or above which SIM mode keeps growing a bucket
    pub min_sim_threshold: f64,
    /// Accepted for compatibility; has no effect on blocking
    pub overlap: usize,
    pub merge_criterion: MergeCriterion,
    /// Disabled when `None`
    pub pruning: Option<PruningConfig>,
}

impl Default for SortedNeighbourhoodConfig {
    fn default() -> Self {
        Self {
            k: 3,
            w: 2,
            min_sim_threshold: 0.8,
            overlap: 0,
            merge_criterion: MergeCriterion::Sim,
            pruning: None,
        }
    }
}

impl SortedNeighbourhoodConfig {
    pub fn validate(&self) -> Result<(), BlockingError> {
        if self.k == 0 {
            return Err(BlockingError::Configuration("k must be positive".to_string()));
        }
        if self.w == 0 {
            return Err(BlockingError::Configuration("w must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.min_sim_threshold) {
            return Err(BlockingError::Configuration(format!(
                "min_sim_threshold {} outside [0, 1]",
                self.min_sim_threshold
            )));
        }
        if let Some(pruning) = &self.pruning {
            if !(0.0..=1.0).contains(&pruning.similarity_threshold) {
                return Err(BlockingError::Configuration(format!(
                    "pruning similarity_threshold {} outside [0, 1]",
                    pruning.similarity_threshold
                )));
            }
            if pruning.max_values == Some(0) {
                return Err(BlockingError::Configuration(
                    "pruning max_values must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Builder for SortedNeighbourhoodConfig with validation
#[derive(Debug, Default)]
pub struct SortedNeighbourhoodConfigBuilder {
    config: SortedNeighbourhoodConfig,
}

impl SortedNeighbourhoodConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn k(mut self, k: usize) -> Self {
        self.config.k = k;
        self
    }

    pub fn w(mut self, w: usize) -> Self {
        self.config.w = w;
        self
    }

    pub fn min_sim_threshold(mut self, threshold: f64) -> Self {
        self.config.min_sim_threshold = threshold;
        self
    }

    pub fn overlap(mut self, overlap: usize) -> Self {
        self.config.overlap = overlap;
        self
    }

    pub fn merge_criterion(mut self, criterion: MergeCriterion) -> Self {
        self.config.merge_criterion = criterion;
        self
    }

    pub fn pruning(mut self, pruning: PruningConfig) -> Self {
        self.config.pruning = Some(pruning);
        self
    }

    pub fn build(self) -> Result<SortedNeighbourhoodConfig, BlockingError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
