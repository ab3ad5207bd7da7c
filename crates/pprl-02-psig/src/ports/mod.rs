//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for external callers
//! - Driven Ports - block statistics and block-size sink, shared by both
//!   strategies and defined in `shared-types`

pub mod inbound;

pub use inbound::PSigBlockingApi;
pub use shared_types::{BlockSizeSink, BlockStatistics};
