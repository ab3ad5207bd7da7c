//! Service Layer
//!
//! Contains the application service that runs both party pipelines and
//! the signature exchange through the domain layer.

pub mod psig_service;

pub use psig_service::{PSigService, STRATEGY_TAG};
