//! Core data models for the match predictor.

mod fixture;
mod ids;
mod stats;

pub use fixture::*;
pub use ids::*;
pub use stats::*;
