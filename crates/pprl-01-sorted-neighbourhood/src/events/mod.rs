//! Events crossing the party boundary

pub mod messages;

pub use messages::RepresentativeMessage;
