//! P-sig configuration and validation
//!
//! # Example
//!
//! ```
//! use pprl_02_psig::domain::PSigConfigBuilder;
//!
//! let config = PSigConfigBuilder::new()
//!     .num_hash_funct(3)
//!     .bf_len(1800)
//!     .qgram_len(2)
//!     .padding('^', '$')
//!     .build()
//!     .expect("Valid config");
//! assert_eq!(config.bf_len, 1800);
//! ```

use serde::{Deserialize, Serialize};
use shared_types::BlockingError;

use super::ngram::{Padding, QGramConfig};

/// P-sig blocking configuration
///
/// Both parties must run with equal values; the assembler rejects indexes
/// built under different parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PSigConfig {
    /// Number of hash functions per q-gram
    pub num_hash_funct: usize,
    /// Bloom filter length in bits
    pub bf_len: usize,
    /// Q-gram length and padding
    pub qgram: QGramConfig,
    /// Capacity of the per-encoder signature cache (0 disables caching)
    pub cache_capacity: usize,
}

impl Default for PSigConfig {
    fn default() -> Self {
        Self {
            num_hash_funct: 3,
            bf_len: 1800,
            qgram: QGramConfig::default(),
            cache_capacity: 10_000,
        }
    }
}

impl PSigConfig {
    /// Create a new configuration with validation
    pub fn new(num_hash_funct: usize, bf_len: usize, qgram: QGramConfig) -> Result<Self, BlockingError> {
        let config = Self {
            num_hash_funct,
            bf_len,
            qgram,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject non-positive filter parameters and invalid q-gram settings
    pub fn validate(&self) -> Result<(), BlockingError> {
        if self.num_hash_funct == 0 {
            return Err(BlockingError::Configuration(
                "num_hash_funct must be positive".to_string(),
            ));
        }
        if self.bf_len == 0 {
            return Err(BlockingError::Configuration(
                "bf_len must be positive".to_string(),
            ));
        }
        self.qgram.validate()
    }

    /// The subset of parameters that must agree between both parties
    pub fn fingerprint(&self) -> SignatureParams {
        SignatureParams {
            num_hash_funct: self.num_hash_funct,
            bf_len: self.bf_len,
            qgram: self.qgram,
        }
    }
}

/// Parameters that determine n-gram keys and their signatures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureParams {
    pub num_hash_funct: usize,
    pub bf_len: usize,
    pub qgram: QGramConfig,
}

/// Builder for PSigConfig with validation
#[derive(Debug, Default)]
pub struct PSigConfigBuilder {
    num_hash_funct: Option<usize>,
    bf_len: Option<usize>,
    qgram_len: Option<usize>,
    padding: Option<Padding>,
    cache_capacity: Option<usize>,
}

impl PSigConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_hash_funct(mut self, k: usize) -> Self {
        self.num_hash_funct = Some(k);
        self
    }

    pub fn bf_len(mut self, bits: usize) -> Self {
        self.bf_len = Some(bits);
        self
    }

    pub fn qgram_len(mut self, q: usize) -> Self {
        self.qgram_len = Some(q);
        self
    }

    /// Enable padding with distinct start and end characters
    pub fn padding(mut self, start: char, end: char) -> Self {
        self.padding = Some(Padding { start, end });
        self
    }

    /// Set signature cache capacity (0 disables caching)
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Build the PSigConfig, validating all parameters
    pub fn build(self) -> Result<PSigConfig, BlockingError> {
        let defaults = PSigConfig::default();

        let config = PSigConfig {
            num_hash_funct: self.num_hash_funct.unwrap_or(defaults.num_hash_funct),
            bf_len: self.bf_len.unwrap_or(defaults.bf_len),
            qgram: QGramConfig {
                q: self.qgram_len.unwrap_or(defaults.qgram.q),
                padding: self.padding.or(defaults.qgram.padding),
            },
            cache_capacity: self.cache_capacity.unwrap_or(defaults.cache_capacity),
        };

        config.validate()?;
        Ok(config)
    }
}
