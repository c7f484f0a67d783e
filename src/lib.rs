//! # Cup Predictor
//!
//! Historical World Cup match statistics and match prediction.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, teams, derived statistics)
//! - **storage**: Dataset loading (per-year tournament files, JSONL exports) and the match store
//! - **calculate**: Team statistics, momentum, streaks, indirect wins and predictions
//! - **validate**: Consistency checks for the dataset files
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;
pub mod validate;

pub use models::*;
