//! Weighted-factor match prediction.
//!
//! Four factors are scored per team, each normalized to `[0, 1]`:
//! head-to-head record, momentum, goal power and current streak. Each team's
//! total is the weighted sum of its scores and the two totals are turned into
//! whole-number win probabilities.

use tracing::debug;

use super::{
    ensure_distinct, goal_stats, head_to_head, momentum, round_to, streak_stats, AnalyticsError,
};
use crate::config::AnalyticsConfig;
use crate::models::{
    BlendWeights, CurrentStreak, MatchPrediction, MatchResult, PredictionDetails,
};
use crate::storage::MatchStore;

/// Scores for one team, before weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FactorScores {
    h2h: f64,
    momentum: f64,
    goal_power: f64,
    streak: f64,
}

impl FactorScores {
    fn total(&self, weights: &BlendWeights) -> f64 {
        self.h2h * weights.h2h
            + self.momentum * weights.momentum
            + self.goal_power * weights.goals
            + self.streak * weights.streak
    }
}

/// Momentum is points per match, so 3.0 is a perfect run.
fn momentum_score(current_momentum: f64) -> f64 {
    (current_momentum / 3.0).clamp(0.0, 1.0)
}

/// Map the current streak onto `[0, 1]`; draws count a fifth of a win.
fn streak_score(streak: &CurrentStreak) -> f64 {
    let count = streak.count as f64;
    let value = match streak.kind {
        Some(MatchResult::Win) => count,
        Some(MatchResult::Draw) => 0.2 * count,
        Some(MatchResult::Loss) => -count,
        None => 0.0,
    };
    ((value + 5.0) / 10.0).clamp(0.0, 1.0)
}

/// Split two non-negative quantities into shares of their sum (0.5 each if both are 0).
fn shares(a: f64, b: f64) -> (f64, f64) {
    let total = a + b;
    if total <= 0.0 {
        (0.5, 0.5)
    } else {
        (a / total, b / total)
    }
}

/// Whole-number probabilities from two weighted totals; always sums to 100.
pub fn blend_probabilities(total_a: f64, total_b: f64) -> (u32, u32) {
    let sum = total_a + total_b;
    if sum <= 0.0 || sum.is_nan() {
        return (50, 50);
    }
    let probability_a = (100.0 * total_a / sum).round().clamp(0.0, 100.0) as u32;
    (probability_a, 100 - probability_a)
}

/// Predict `team_a` vs `team_b` from their historical records.
pub fn predict_match(
    store: &dyn MatchStore,
    team_a: &str,
    team_b: &str,
    config: &AnalyticsConfig,
) -> Result<MatchPrediction, AnalyticsError> {
    ensure_distinct(team_a, team_b)?;

    // Head-to-head: half a point per draw
    let h2h = head_to_head(store, team_a, team_b, 0)?;
    let (h2h_a, h2h_b) = if h2h.total_matches == 0 {
        (0.5, 0.5)
    } else {
        let meetings = h2h.total_matches as f64;
        let draws = 0.5 * h2h.draws as f64;
        (
            (h2h.wins_a as f64 + draws) / meetings,
            (h2h.wins_b as f64 + draws) / meetings,
        )
    };

    let momentum_a = momentum(store, team_a, config.momentum_span).current_momentum;
    let momentum_b = momentum(store, team_b, config.momentum_span).current_momentum;

    // Goal power: own attack boosted by the opponent's leakiness
    let goals_a = goal_stats(store, team_a).global;
    let goals_b = goal_stats(store, team_b).global;
    let power_a = goals_a.avg_goals_for * (1.0 + goals_b.avg_goals_against / 2.0);
    let power_b = goals_b.avg_goals_for * (1.0 + goals_a.avg_goals_against / 2.0);
    let (goal_power_a, goal_power_b) = shares(power_a, power_b);

    let scores_a = FactorScores {
        h2h: h2h_a,
        momentum: momentum_score(momentum_a),
        goal_power: goal_power_a,
        streak: streak_score(&streak_stats(store, team_a).current_streak),
    };
    let scores_b = FactorScores {
        h2h: h2h_b,
        momentum: momentum_score(momentum_b),
        goal_power: goal_power_b,
        streak: streak_score(&streak_stats(store, team_b).current_streak),
    };

    let weights = config.weights;
    let total_a = scores_a.total(&weights);
    let total_b = scores_b.total(&weights);
    let (probability_a, probability_b) = blend_probabilities(total_a, total_b);

    debug!(
        "Prediction {} v {}: totals {:.3}/{:.3} -> {}%/{}%",
        team_a, team_b, total_a, total_b, probability_a, probability_b
    );

    Ok(MatchPrediction {
        team_a: team_a.to_string(),
        team_b: team_b.to_string(),
        probability_a,
        probability_b,
        details: PredictionDetails {
            h2h_score_a: round_to(scores_a.h2h, 2),
            h2h_score_b: round_to(scores_b.h2h, 2),
            momentum_score_a: round_to(scores_a.momentum, 2),
            momentum_score_b: round_to(scores_b.momentum, 2),
            goal_power_a: round_to(scores_a.goal_power, 2),
            goal_power_b: round_to(scores_b.goal_power, 2),
            streak_score_a: round_to(scores_a.streak, 2),
            streak_score_b: round_to(scores_b.streak, 2),
        },
        factors: weights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{game, store};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blend_probabilities_sum_to_100() {
        for (a, b) in [(0.94, 0.06), (0.5, 0.5), (0.333, 0.667), (1.0, 0.0), (0.125, 0.875)] {
            let (pa, pb) = blend_probabilities(a, b);
            assert_eq!(pa + pb, 100, "{} {}", a, b);
        }
        assert_eq!(blend_probabilities(0.125, 0.875), (13, 87));
    }

    #[test]
    fn test_blend_probabilities_zero_totals() {
        assert_eq!(blend_probabilities(0.0, 0.0), (50, 50));
    }

    #[test]
    fn test_streak_score() {
        let streak = |kind, count| CurrentStreak {
            kind: Some(kind),
            count,
        };
        assert_eq!(streak_score(&CurrentStreak::default()), 0.5);
        assert_eq!(streak_score(&streak(MatchResult::Win, 2)), 0.7);
        assert_eq!(streak_score(&streak(MatchResult::Win, 9)), 1.0);
        assert_eq!(streak_score(&streak(MatchResult::Loss, 7)), 0.0);
        assert!((streak_score(&streak(MatchResult::Draw, 5)) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_dominant_team() {
        let store = store(vec![
            game("BRA", "HAI", (3, 0), 2010),
            game("HAI", "BRA", (0, 3), 2014),
        ]);
        let p = predict_match(&store, "BRA", "HAI", &AnalyticsConfig::default()).unwrap();

        assert_eq!(
            p.details,
            PredictionDetails {
                h2h_score_a: 1.0,
                h2h_score_b: 0.0,
                momentum_score_a: 1.0,
                momentum_score_b: 0.0,
                goal_power_a: 1.0,
                goal_power_b: 0.0,
                streak_score_a: 0.7,
                streak_score_b: 0.3,
            }
        );
        // 0.94 vs 0.06
        assert_eq!((p.probability_a, p.probability_b), (94, 6));
        assert_eq!(p.factors, BlendWeights::default());
    }

    #[test]
    fn test_unknown_teams_are_even() {
        let p = predict_match(&store(vec![]), "AAA", "BBB", &AnalyticsConfig::default()).unwrap();
        assert_eq!((p.probability_a, p.probability_b), (50, 50));
        assert_eq!(p.details.h2h_score_a, 0.5);
        assert_eq!(p.details.goal_power_b, 0.5);
        assert_eq!(p.details.momentum_score_a, 0.0);
        assert_eq!(p.details.streak_score_b, 0.5);
    }

    #[test]
    fn test_probabilities_always_sum_to_100() {
        let store = store(vec![
            game("ARG", "FRA", (3, 3), 2022),
            game("ARG", "CRO", (3, 0), 2022),
            game("FRA", "MAR", (2, 0), 2022),
            game("CRO", "MAR", (2, 1), 2022),
            game("ARG", "KSA", (1, 2), 2022),
            game("FRA", "TUN", (0, 1), 2022),
        ]);
        let teams = ["ARG", "FRA", "CRO", "MAR", "KSA", "TUN", "ZZZ"];
        for a in teams {
            for b in teams {
                if a == b {
                    continue;
                }
                let p = predict_match(&store, a, b, &AnalyticsConfig::default()).unwrap();
                assert_eq!(p.probability_a + p.probability_b, 100, "{} v {}", a, b);
            }
        }
    }

    #[test]
    fn test_swapping_sides_mirrors_probabilities() {
        let store = store(vec![
            game("GER", "ARG", (1, 0), 2014),
            game("ARG", "GER", (3, 2), 1986),
            game("GER", "BRA", (7, 1), 2014),
        ]);
        let config = AnalyticsConfig::default();
        let ab = predict_match(&store, "GER", "ARG", &config).unwrap();
        let ba = predict_match(&store, "ARG", "GER", &config).unwrap();

        assert_eq!(ab.details.h2h_score_a, ba.details.h2h_score_b);
        assert_eq!(ab.details.goal_power_a, ba.details.goal_power_b);
        assert!(ab.probability_a > 50);
    }

    #[test]
    fn test_custom_weights_are_reported() {
        let store = store(vec![game("ENG", "USA", (0, 0), 2022)]);
        let config = AnalyticsConfig {
            weights: BlendWeights {
                h2h: 1.0,
                momentum: 0.0,
                goals: 0.0,
                streak: 0.0,
            },
            ..AnalyticsConfig::default()
        };
        let p = predict_match(&store, "ENG", "USA", &config).unwrap();
        assert_eq!(p.factors.h2h, 1.0);
        assert_eq!((p.probability_a, p.probability_b), (50, 50));
    }

    #[test]
    fn test_identical_codes_rejected() {
        let err = predict_match(&store(vec![]), "BRA", "BRA", &AnalyticsConfig::default())
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));
    }
}
