//! # Shared Types Crate
//!
//! This crate contains the entities exchanged between the two blocking
//! strategies and their callers.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `RecordTable`, `Party` and
//!   `CandidateBlockTable` are defined once and used by every strategy.
//! - **Owned Party State**: nothing here is global; every structure is
//!   created by its owner and passed explicitly.
//! - **Ports for Collaborators**: block statistics and block-size logging are
//!   traits (`BlockStatistics`, `BlockSizeSink`) with default adapters.

pub mod entities;
pub mod errors;
pub mod sink;
pub mod stats;

pub use entities::*;
pub use errors::*;
pub use sink::{BlockSizeSink, CsvBlockSizeSink, MemorySink, NoOpSink, SinkEntry};
pub use stats::{BlockStatistics, BlockStats, DescriptiveStatistics};
