//! Ports module for Sorted-Neighbourhood Blocking
//!
//! Driven ports (block statistics, block-size sink) are shared by both
//! strategies and live in `shared-types`.

pub mod inbound;

pub use inbound::SortedNeighbourhoodApi;
pub use shared_types::{BlockSizeSink, BlockStatistics};
