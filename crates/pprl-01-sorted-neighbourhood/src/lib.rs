//! # PPRL-01: Sorted-Neighbourhood Blocking
//!
//! Two-party k-anonymous blocking over a shared sort order.
//!
//! Each party places its records between reference values, groups adjacent
//! positions into buckets of at least k records, and discloses only a few
//! reference values per bucket. A window slides over the union of both
//! parties' disclosed values; every cross-party value pair inside a window
//! becomes a candidate block.
//!
//! ## Architecture
//!
//! - **Domain**: Core entities (ReferenceValues, BucketKey, PartyIndex),
//!   similarity measures, representative policies, invariants
//! - **Algorithms**: Bucket construction, pruning, window scan, assembly
//! - **Events**: RepresentativeMessage, the only value crossing parties
//! - **Ports**: Inbound (SortedNeighbourhoodApi); statistics and block-size
//!   sink come from `shared-types`
//! - **Application**: Service orchestration
//!
//! ## Usage Example
//!
//! ```
//! use pprl_01_sorted_neighbourhood::{
//!     SortedNeighbourhoodApi, SortedNeighbourhoodConfigBuilder, SortedNeighbourhoodService,
//! };
//! use shared_types::{Party, RecordTable};
//!
//! let config = SortedNeighbourhoodConfigBuilder::new()
//!     .k(1)
//!     .w(1)
//!     .build()
//!     .expect("valid config");
//! let mut service = SortedNeighbourhoodService::new(config).expect("service");
//!
//! let alice: RecordTable = [("a1", vec!["smith"]), ("a2", vec!["jones"])].into_iter().collect();
//! let bob: RecordTable = [("b1", vec!["smyth"]), ("b2", vec!["jonas"])].into_iter().collect();
//! service.load_records(Party::Alice, alice);
//! service.load_records(Party::Bob, bob);
//! service.set_reference_values(Party::Alice, vec!["jones".into(), "smith".into()]);
//! service.set_reference_values(Party::Bob, vec!["jonas".into(), "smyth".into()]);
//!
//! service.build_both(&[0], &[0]).expect("indexes");
//! let report = service.generate_blocks().expect("blocks");
//! assert!(report.candidate_count > 0);
//! ```

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod events;
pub mod ports;

pub use application::{SortedNeighbourhoodService, STRATEGY_TAG};
pub use config::{MergeCriterion, PruningConfig, SortedNeighbourhoodConfig, SortedNeighbourhoodConfigBuilder};
pub use domain::{
    BucketKey, ExactMatch, ExposeAll, FixedCountSample, FractionSample, PartyIndex, QGramDice,
    ReferenceValues, RepresentativePolicy, SimilarityMeasure,
};
pub use events::RepresentativeMessage;
pub use ports::SortedNeighbourhoodApi;
