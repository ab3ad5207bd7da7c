//! Algorithms module for Sorted-Neighbourhood Blocking
//!
//! Contains:
//! - Reference-based bucket construction
//! - Reference-value pruning
//! - Sliding window over representative values
//! - Candidate block assembly

pub mod assembler;
pub mod indexer;
pub mod pruning;
pub mod window;

pub use assembler::assemble_candidates;
pub use indexer::PartyIndexer;
pub use pruning::prune_reference_values;
pub use window::candidate_value_pairs;
