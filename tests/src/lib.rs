//! # PPRL Blocking Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Seeded synthetic record tables
//! └── integration/      # Both strategies end to end
//!     ├── strategies.rs # Full blocking runs per strategy
//!     └── sink_output.rs# Block-size CSV files on disk
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p pprl-tests
//!
//! # By category
//! cargo test -p pprl-tests integration::
//!
//! # Benchmarks
//! cargo bench -p pprl-tests
//! ```

pub mod fixtures;
pub mod integration;
