//! Exponential moving average of points per match.

use tracing::debug;

use super::round_to;
use crate::models::{MomentumPoint, MomentumStats};
use crate::storage::MatchStore;

/// Default EMA span (α = 2 / (span + 1) ≈ 0.333).
pub const DEFAULT_SPAN: u32 = 5;

/// Smoothing factor for a span. A span of 0 is treated as 1.
pub fn smoothing_factor(span: u32) -> f64 {
    2.0 / (span.max(1) as f64 + 1.0)
}

/// Momentum series over the team's whole history, oldest first.
///
/// The first match seeds the EMA with its points; each later match blends in
/// with `α = 2 / (span + 1)`. Scores are rounded only on output, so rounding
/// never compounds along the series.
pub fn momentum(store: &dyn MatchStore, code: &str, span: u32) -> MomentumStats {
    let alpha = smoothing_factor(span);
    let mut ema: Option<f64> = None;
    let mut history = Vec::new();

    for m in store.chronological_matches(code) {
        let (Some(result), Some((opponent, opponent_code))) =
            (m.result_for(code), m.opponent_of(code))
        else {
            continue;
        };

        let points = result.points();
        let value = match ema {
            None => points as f64,
            Some(prev) => alpha * points as f64 + (1.0 - alpha) * prev,
        };
        ema = Some(value);

        history.push(MomentumPoint {
            opponent: opponent.to_string(),
            opponent_code: opponent_code.to_string(),
            result,
            points,
            year: m.year,
            competition: m.competition.clone(),
            momentum_score: round_to(value, 2),
        });
    }

    let current_momentum = history.last().map_or(0.0, |p| p.momentum_score);
    debug!(
        "Momentum for {}: {} over {} matches (span {})",
        code,
        current_momentum,
        history.len(),
        span
    );

    MomentumStats {
        current_momentum,
        history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{game, store};
    use crate::models::MatchResult;

    #[test]
    fn test_smoothing_factor() {
        assert!((smoothing_factor(5) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(smoothing_factor(1), 1.0);
        assert_eq!(smoothing_factor(0), 1.0);
    }

    #[test]
    fn test_series_is_chronological_and_complete() {
        let store = store(vec![
            game("ESP", "NED", (1, 0), 2010),
            game("NED", "ESP", (5, 1), 2014),
            game("ESP", "SUI", (0, 1), 2010),
            game("CHI", "ESP", (2, 0), 2014),
            game("ESP", "AUS", (3, 0), 2014),
        ]);
        let stats = momentum(&store, "ESP", DEFAULT_SPAN);

        let opponents: Vec<&str> = stats
            .history
            .iter()
            .map(|p| p.opponent_code.as_str())
            .collect();
        assert_eq!(opponents, vec!["NED", "SUI", "NED", "CHI", "AUS"]);
        assert_eq!(stats.history.len(), 5);
        assert_eq!(stats.current_momentum, stats.history[4].momentum_score);
    }

    #[test]
    fn test_ema_values() {
        let store = store(vec![
            game("BRA", "SCO", (2, 1), 1998),
            game("BRA", "NOR", (1, 1), 1998),
            game("MAR", "BRA", (3, 0), 1998),
        ]);
        let stats = momentum(&store, "BRA", 5);
        let scores: Vec<f64> = stats.history.iter().map(|p| p.momentum_score).collect();

        // 3, then 1/3*1 + 2/3*3, then 2/3 of that
        assert_eq!(scores, vec![3.0, 2.33, 1.56]);
        assert_eq!(stats.history[2].result, MatchResult::Loss);
        assert_eq!(stats.history[2].points, 0);
        assert_eq!(stats.history[2].opponent, "MAR");
        assert_eq!(stats.current_momentum, 1.56);
    }

    #[test]
    fn test_scores_stay_within_point_range() {
        let store = store(vec![
            game("URU", "ARG", (4, 2), 1930),
            game("URU", "BRA", (2, 1), 1950),
            game("URU", "HUN", (2, 4), 1954),
            game("URU", "ENG", (0, 0), 1966),
        ]);
        for p in momentum(&store, "URU", 3).history {
            assert!((0.0..=3.0).contains(&p.momentum_score));
        }
    }

    #[test]
    fn test_no_matches() {
        let stats = momentum(&store(vec![]), "BRA", DEFAULT_SPAN);
        assert_eq!(stats.current_momentum, 0.0);
        assert!(stats.history.is_empty());
    }
}
