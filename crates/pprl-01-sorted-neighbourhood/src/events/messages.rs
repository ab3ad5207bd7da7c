//! Exchange Messages
//!
//! Each party announces the reference values it is willing to disclose.
//! Bucket keys and record ids stay local.

use serde::{Deserialize, Serialize};
use shared_types::Party;

use crate::domain::Representatives;

/// A party's exposed representative values
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeMessage {
    /// Announcing party
    pub sender: Party,
    /// Exposed values in bucket order
    pub values: Vec<String>,
}

impl RepresentativeMessage {
    pub fn new(sender: Party, representatives: &Representatives) -> Self {
        Self {
            sender,
            values: representatives.values.clone(),
        }
    }
}
