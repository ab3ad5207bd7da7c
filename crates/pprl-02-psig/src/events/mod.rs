//! Events Layer - Exchange Message Types
//!
//! The messages that cross the trust boundary between Alice and Bob. Each is
//! delivered once and in full; there is no streaming or partial delivery.

pub mod messages;

pub use messages::{CommonSignatureMessage, SignatureMessage};
