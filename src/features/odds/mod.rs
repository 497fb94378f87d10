//! Bookmaker odds and value-bet analysis for a match.

pub mod client;
pub mod types;

pub use types::BetType;
