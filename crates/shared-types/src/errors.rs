//! # Error Types
//!
//! Defines the error type shared by both blocking strategies.
//!
//! Every variant signals a programming or configuration fault. None of them
//! is transient, so callers never retry on them.

use thiserror::Error;

use crate::entities::Party;

/// Errors that can occur while building indexes or generating blocks.
#[derive(Debug, Error)]
pub enum BlockingError {
    /// Required state was not set before an operation was invoked.
    #[error("Precondition violated in {operation}: {missing} not set")]
    PreconditionViolation {
        operation: &'static str,
        missing: String,
    },

    /// A trailing bucket is undersized and has no predecessor to absorb it.
    #[error("Merge underflow at position {position}: bucket holds {size} records, k = {k}")]
    MergeUnderflow { position: usize, size: usize, k: usize },

    /// Invalid or inconsistent configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An exchanged value could not be resolved against a party's index.
    #[error("Incomplete index for {party}: {detail}")]
    IncompleteIndex { party: Party, detail: String },

    /// The block-size sink failed to persist sizes.
    #[error("Block size sink error: {0}")]
    Sink(#[from] std::io::Error),
}

impl BlockingError {
    /// Shorthand for a `PreconditionViolation`.
    pub fn precondition(operation: &'static str, missing: impl Into<String>) -> Self {
        Self::PreconditionViolation {
            operation,
            missing: missing.into(),
        }
    }
}

/// Result alias used throughout the workspace.
pub type BlockingResult<T> = Result<T, BlockingError>;
