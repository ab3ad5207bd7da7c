//! # Integration Tests
//!
//! Complete two-party runs through the public service APIs.

pub mod sink_output;
pub mod strategies;
