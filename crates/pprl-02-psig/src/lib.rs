//! # PPRL-02 P-sig Blocking
//!
//! Probability-signature blocking for two-party record linkage.
//!
//! Both parties turn the q-grams of their records into Bloom signatures and
//! announce only the union of those signatures. The intersection of the two
//! announcements is the common signature; an n-gram is used as a block key
//! only when its own signature lies entirely inside it.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `Signature`: Fixed-length bitset Bloom signature
//!   - `QGramConfig`: Q-gram extraction with optional padding
//!   - `SignatureIndexer`: Per-party n-gram index and aggregate signature
//!   - `MicroBlocks`: n-gram blocks that survived the common-signature filter
//!   - `PSigConfig`: Configuration with validation
//!
//! - **Events Layer** (`events/`): What crosses the trust boundary
//!   - `SignatureMessage`, `CommonSignatureMessage`
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `PSigBlockingApi`: Driving port (inbound API)
//!   - `BlockStatistics`, `BlockSizeSink`: Driven ports from `shared-types`
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `PSigService`: Implements `PSigBlockingApi`
//!
//! ## Invariants
//!
//! - A signature of length `bf_len` never sets a bit at or past `bf_len`
//! - Common signature ⊆ Alice aggregate ∩ Bob aggregate
//! - A microblock n-gram's own signature ⊆ common signature
//!
//! ## Usage Example
//!
//! ```
//! use pprl_02_psig::{PSigBlockingApi, PSigConfigBuilder, PSigService};
//! use shared_types::{Party, RecordTable};
//!
//! let config = PSigConfigBuilder::new()
//!     .qgram_len(2)
//!     .padding('^', '$')
//!     .build()
//!     .expect("valid config");
//! let mut service = PSigService::new(config).expect("service");
//!
//! let alice: RecordTable = [("1", vec!["smith"])].into_iter().collect();
//! let bob: RecordTable = [("1", vec!["smyth"])].into_iter().collect();
//! service.load_records(Party::Alice, alice);
//! service.load_records(Party::Bob, bob);
//!
//! service.common_bloom_filter(&[0]).expect("common filter");
//! service.build_index_alice().expect("alice index");
//! service.build_index_bob().expect("bob index");
//! let count = service.generate_blocks().expect("blocks");
//! assert!(count > 0);
//! ```

pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    MicroBlocks, NGramIndex, PSigConfig, PSigConfigBuilder, PartySignatures, QGramConfig,
    Signature, SignatureEncoder, SignatureIndexer, SignatureParams,
};
pub use events::{CommonSignatureMessage, SignatureMessage};
pub use ports::PSigBlockingApi;
pub use service::{PSigService, STRATEGY_TAG};
