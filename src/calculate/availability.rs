//! Derived features that depend on data the dataset may not carry.
//!
//! The historical records hold scores and scorers only, so features built on
//! shots or possession report themselves unavailable instead of failing.

use tracing::debug;

use super::average;
use crate::models::{FeatureReport, GoalRate};
use crate::storage::MatchStore;

/// Goals scored per match.
pub fn goal_percentage(store: &dyn MatchStore, code: &str) -> FeatureReport<GoalRate> {
    let mut total_goals: u32 = 0;
    let mut matches_played = 0;

    for m in store.matches_for_team(code) {
        if let Some((gf, _)) = m.goals_for_against(code) {
            total_goals = total_goals.saturating_add(gf);
            matches_played += 1;
        }
    }

    if matches_played == 0 {
        debug!("Goal percentage unavailable for {}: no matches", code);
        return FeatureReport::unavailable(format!("No matches recorded for team {}", code));
    }

    FeatureReport::available(
        GoalRate {
            goals_per_match: average(total_goals, matches_played),
            total_goals,
            matches_played,
        },
        "Computed from the available match history",
    )
}

/// Goals per shot on target. Needs shot data the dataset does not have.
pub fn effectiveness(code: &str) -> FeatureReport {
    debug!("Effectiveness requested for {}: no shot data", code);
    FeatureReport::unavailable("Data not available: requires shots on target in the dataset")
}

/// Possession in the attacking third. Needs possession data the dataset does not have.
pub fn possession(code: &str) -> FeatureReport {
    debug!("Possession requested for {}: no possession data", code);
    FeatureReport::unavailable(
        "Data not available: requires attacking-third possession in the dataset",
    )
}
