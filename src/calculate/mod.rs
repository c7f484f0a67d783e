//! Statistics calculation engine.
//!
//! Computes derived metrics from the match store:
//! - Team summaries, goal statistics and home/away splits
//! - Head-to-head records
//! - EMA momentum and streak/transition analysis
//! - Indirect dominance over the "beat" graph
//! - Weighted-factor match prediction
//!
//! Every function here is a pure read over a `MatchStore`.

pub mod availability;
pub mod graph;
pub mod head_to_head;
pub mod momentum;
pub mod prediction;
pub mod streaks;
pub mod team_stats;

pub use availability::{effectiveness, goal_percentage, possession};
pub use graph::indirect_wins;
pub use head_to_head::head_to_head;
pub use momentum::momentum;
pub use prediction::{blend_probabilities, predict_match};
pub use streaks::{streak_stats, streaks_from_results};
pub use team_stats::{goal_stats, home_away, team_stats};

use thiserror::Error;

/// Errors raised by the calculators.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Reject a comparison of a team with itself.
pub(crate) fn ensure_distinct(a: &str, b: &str) -> Result<(), AnalyticsError> {
    if a == b {
        return Err(AnalyticsError::InvalidInput(format!(
            "cannot compare team {} with itself",
            a
        )));
    }
    Ok(())
}

/// Round to `places` decimal places, half away from zero.
///
/// Every rounded figure in an API response goes through this function.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `count / total * 100` rounded to 2 places; 0 when `total` is 0.
pub fn percentage(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to(count as f64 / total as f64 * 100.0, 2)
    }
}

/// `sum / n` rounded to 2 places; 0 when `n` is 0.
pub fn average(sum: u32, n: u32) -> f64 {
    if n == 0 {
        0.0
    } else {
        round_to(sum as f64 / n as f64, 2)
    }
}
