//! Exchange Messages
//!
//! Each party announces its aggregate signature; the intersection of the two
//! announcements is the common signature both parties filter against.

use serde::{Deserialize, Serialize};
use shared_types::{BlockingError, Party};

use crate::domain::{Signature, SignatureParams};

/// A party's aggregate signature
///
/// Carries the bit set only, never the n-grams it was built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureMessage {
    /// Announcing party
    pub sender: Party,
    /// Parameters the signature was built with
    pub params: SignatureParams,
    /// Union of the signatures of the sender's n-grams
    pub signature: Signature,
}

/// Intersection of both parties' aggregate signatures
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonSignatureMessage {
    /// Parameters shared by both announcements
    pub params: SignatureParams,
    /// Bits set in both aggregate signatures
    pub signature: Signature,
}

impl CommonSignatureMessage {
    /// Intersect two announcements.
    ///
    /// Rejects two announcements from the same party and announcements built
    /// under different parameters.
    pub fn intersect(
        first: &SignatureMessage,
        second: &SignatureMessage,
    ) -> Result<Self, BlockingError> {
        if first.sender == second.sender {
            return Err(BlockingError::Configuration(format!(
                "both signatures announced by {}",
                first.sender
            )));
        }
        if first.params != second.params {
            return Err(BlockingError::Configuration(format!(
                "signature parameters differ: {:?} vs {:?}",
                first.params, second.params
            )));
        }
        Ok(Self {
            params: first.params,
            signature: first.signature.intersection(&second.signature)?,
        })
    }
}
