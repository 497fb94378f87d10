//! Matches, predictions, standings and competitions.

pub mod client;
pub mod types;

pub use client::{DEFAULT_MATCH_LIMIT, MatchFilter};
