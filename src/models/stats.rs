//! Derived statistics models.
//!
//! Every aggregate here is rebuilt from the match store on each request and
//! serialized straight into the API response.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Match, MatchResult};

/// Win/loss/draw summary for one team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub total_matches: u32,

    /// Percentages in 0..=100, rounded to 2 places; all 0 with no matches
    pub win_percentage: f64,
    pub loss_percentage: f64,
    pub draw_percentage: f64,

    pub goals_for: u32,
    pub goals_against: u32,
}

/// Record of direct meetings between two teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadStats {
    /// First queried code; `wins_a` and `goals_a` refer to it
    pub team_a: String,
    pub team_b: String,
    pub total_matches: u32,
    pub wins_a: u32,
    pub wins_b: u32,
    pub draws: u32,
    pub goals_a: u32,
    pub goals_b: u32,

    /// Most recent first, capped
    pub recent_matches: Vec<Match>,
}

/// Goal totals and averages over a set of matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalTotals {
    pub goals_for: u32,
    pub goals_against: u32,
    pub matches_played: u32,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub goal_difference: i64,
}

/// Goals for/against, overall and per competition edition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalStats {
    pub global: GoalTotals,

    /// Keyed by "<competition> <year>", e.g. "World Cup 2014"
    pub by_competition: BTreeMap<String, GoalTotals>,
}

/// Record for one side of the fixture (home = listed first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub win_percentage: f64,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeAwayStats {
    pub home: VenueRecord,
    pub away: VenueRecord,
}

/// One entry of the momentum series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumPoint {
    pub opponent: String,
    pub opponent_code: String,
    pub result: MatchResult,
    pub points: u32,
    pub year: u16,
    pub competition: String,

    /// EMA of points after this match
    pub momentum_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentumStats {
    pub current_momentum: f64,
    pub history: Vec<MomentumPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentStreak {
    /// None when the team has no matches
    #[serde(rename = "type")]
    pub kind: Option<MatchResult>,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LongestStreaks {
    #[serde(rename = "W")]
    pub wins: u32,
    #[serde(rename = "D")]
    pub draws: u32,
    #[serde(rename = "L")]
    pub losses: u32,
    #[serde(rename = "Unbeaten")]
    pub unbeaten: u32,
}

impl LongestStreaks {
    pub fn for_result(&self, result: MatchResult) -> u32 {
        match result {
            MatchResult::Win => self.wins,
            MatchResult::Draw => self.draws,
            MatchResult::Loss => self.losses,
        }
    }
}

/// Relative frequency of the next result after a given result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionBucket {
    #[serde(rename = "W")]
    pub win: f64,
    #[serde(rename = "D")]
    pub draw: f64,
    #[serde(rename = "L")]
    pub loss: f64,
    pub sample_size: u32,
}

impl TransitionBucket {
    pub fn total(&self) -> f64 {
        self.win + self.draw + self.loss
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transitions {
    #[serde(rename = "W")]
    pub after_win: TransitionBucket,
    #[serde(rename = "D")]
    pub after_draw: TransitionBucket,
    #[serde(rename = "L")]
    pub after_loss: TransitionBucket,
}

impl Transitions {
    pub fn after(&self, previous: MatchResult) -> &TransitionBucket {
        match previous {
            MatchResult::Win => &self.after_win,
            MatchResult::Draw => &self.after_draw,
            MatchResult::Loss => &self.after_loss,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakStats {
    pub current_streak: CurrentStreak,
    pub longest_streaks: LongestStreaks,
    pub transitions: Transitions,
    pub total_matches: u32,
}

/// A two-hop "beat" path: subject beat `intermediate`, which beat `indirect_victim`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndirectWin {
    pub intermediate_team: String,
    pub indirect_victim: String,
    pub intermediate_code: String,
    pub indirect_victim_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub indirect_wins: Vec<IndirectWin>,
    pub total_indirect_wins: u32,
}

/// Relative weight of each prediction factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    #[serde(default = "default_h2h_weight")]
    pub h2h: f64,

    #[serde(default = "default_momentum_weight")]
    pub momentum: f64,

    #[serde(default = "default_goal_weight")]
    pub goals: f64,

    #[serde(default = "default_streak_weight")]
    pub streak: f64,
}

fn default_h2h_weight() -> f64 {
    0.30
}

fn default_momentum_weight() -> f64 {
    0.25
}

fn default_goal_weight() -> f64 {
    0.25
}

fn default_streak_weight() -> f64 {
    0.20
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            h2h: default_h2h_weight(),
            momentum: default_momentum_weight(),
            goals: default_goal_weight(),
            streak: default_streak_weight(),
        }
    }
}

impl BlendWeights {
    pub fn sum(&self) -> f64 {
        self.h2h + self.momentum + self.goals + self.streak
    }
}

/// Per-factor scores (each in 0..=1) behind a prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionDetails {
    pub h2h_score_a: f64,
    pub h2h_score_b: f64,
    pub momentum_score_a: f64,
    pub momentum_score_b: f64,
    pub goal_power_a: f64,
    pub goal_power_b: f64,
    pub streak_score_a: f64,
    pub streak_score_b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPrediction {
    pub team_a: String,
    pub team_b: String,

    /// Whole percentages; always sum to 100
    pub probability_a: u32,
    pub probability_b: u32,

    pub details: PredictionDetails,
    pub factors: BlendWeights,
}

/// Goal rate payload for the goal-percentage feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRate {
    pub goals_per_match: f64,
    pub total_goals: u32,
    pub matches_played: u32,
}

/// A derived feature that may not be computable from the loaded data.
///
/// Unavailable features are a normal outcome, not an error: the payload is
/// `{"available": false, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureReport<T = ()> {
    pub available: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    pub message: String,
}

impl<T> FeatureReport<T> {
    pub fn available(data: T, message: impl Into<String>) -> Self {
        Self {
            available: true,
            data: Some(data),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            available: false,
            data: None,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_stats_default_is_all_zero() {
        let stats = TeamStats::default();
        assert_eq!(stats.total_matches, 0);
        assert_eq!(stats.win_percentage, 0.0);
    }

    #[test]
    fn test_streak_json_keys() {
        let stats = StreakStats {
            current_streak: CurrentStreak {
                kind: Some(MatchResult::Loss),
                count: 1,
            },
            longest_streaks: LongestStreaks {
                wins: 2,
                draws: 0,
                losses: 1,
                unbeaten: 2,
            },
            transitions: Transitions::default(),
            total_matches: 3,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["current_streak"]["type"], "L");
        assert_eq!(json["longest_streaks"]["W"], 2);
        assert_eq!(json["longest_streaks"]["Unbeaten"], 2);
        assert_eq!(json["transitions"]["W"]["sample_size"], 0);
    }

    #[test]
    fn test_empty_current_streak_serializes_null_type() {
        let json = serde_json::to_value(CurrentStreak::default()).unwrap();
        assert!(json["type"].is_null());
        assert_eq!(json["count"], 0);
    }

    #[test]
    fn test_blend_weights_default_sum() {
        let w = BlendWeights::default();
        assert!((w.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_weights_partial_toml() {
        let w: BlendWeights = toml::from_str("h2h = 0.5").unwrap();
        assert_eq!(w.h2h, 0.5);
        assert_eq!(w.streak, 0.20);
    }

    #[test]
    fn test_unavailable_feature_shape() {
        let report: FeatureReport = FeatureReport::unavailable("no shots data");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"available": false, "message": "no shots data"})
        );
    }

    #[test]
    fn test_available_feature_flattens_data() {
        let report = FeatureReport::available(
            GoalRate {
                goals_per_match: 1.5,
                total_goals: 3,
                matches_played: 2,
            },
            "ok",
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["available"], true);
        assert_eq!(json["goals_per_match"], 1.5);
        assert_eq!(json["matches_played"], 2);
    }
}
