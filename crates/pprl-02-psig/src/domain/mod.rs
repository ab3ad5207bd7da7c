//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - Hash functions and the bitset Bloom signature
//! - Q-gram extraction
//! - Per-party n-gram index and aggregate signature
//! - Microblock filter and candidate block assembly
//! - Configuration and sizing formulas
//!
//! RULES:
//! - No I/O operations
//! - No state shared between parties

pub mod assembler;
pub mod config;
pub mod encoder;
pub mod hash_functions;
pub mod index;
pub mod microblocks;
pub mod ngram;
pub mod parameters;
pub mod signature;

pub use assembler::assemble_blocks;
pub use config::{PSigConfig, PSigConfigBuilder, SignatureParams};
pub use encoder::SignatureEncoder;
pub use index::{NGramIndex, PartySignatures, SignatureIndexer};
pub use microblocks::{filter_microblocks, MicroBlocks};
pub use ngram::{Padding, QGramConfig, QGrams};
pub use parameters::{expected_fill_ratio, FilterSizing};
pub use signature::Signature;
