//! Domain module for Sorted-Neighbourhood Blocking
//!
//! Contains core entities, similarity measures, representative selection,
//! and invariants.

pub mod entities;
pub mod invariants;
pub mod representative;
pub mod similarity;

pub use entities::*;
pub use representative::{
    select_representatives, ExposeAll, FixedCountSample, FractionSample, RepresentativePolicy,
    Representatives,
};
pub use similarity::{ExactMatch, QGramDice, SimilarityMeasure};
