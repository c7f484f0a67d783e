//! Streaks and result-to-result transitions.

use tracing::debug;

use super::round_to;
use crate::models::{
    CurrentStreak, LongestStreaks, MatchResult, StreakStats, TransitionBucket, Transitions,
};
use crate::storage::MatchStore;

/// Streak analysis over a team's chronological results.
pub fn streak_stats(store: &dyn MatchStore, code: &str) -> StreakStats {
    let results: Vec<MatchResult> = store
        .chronological_matches(code)
        .iter()
        .filter_map(|m| m.result_for(code))
        .collect();

    let stats = streaks_from_results(&results);
    debug!(
        "Streaks for {}: current {:?} x{} over {} matches",
        code, stats.current_streak.kind, stats.current_streak.count, stats.total_matches
    );
    stats
}

#[derive(Default)]
struct TransitionCounts {
    next: [u32; 3],
}

impl TransitionCounts {
    fn record(&mut self, result: MatchResult) {
        self.next[index(result)] += 1;
    }

    fn bucket(&self) -> TransitionBucket {
        let sample_size: u32 = self.next.iter().sum();
        if sample_size == 0 {
            return TransitionBucket::default();
        }
        let freq = |r: MatchResult| round_to(self.next[index(r)] as f64 / sample_size as f64, 2);
        TransitionBucket {
            win: freq(MatchResult::Win),
            draw: freq(MatchResult::Draw),
            loss: freq(MatchResult::Loss),
            sample_size,
        }
    }
}

fn index(result: MatchResult) -> usize {
    match result {
        MatchResult::Win => 0,
        MatchResult::Draw => 1,
        MatchResult::Loss => 2,
    }
}

/// Single left-to-right scan over results, oldest first.
pub fn streaks_from_results(results: &[MatchResult]) -> StreakStats {
    let mut longest = LongestStreaks::default();
    let mut current = CurrentStreak::default();
    let mut unbeaten_run = 0u32;
    let mut transitions: [TransitionCounts; 3] = Default::default();
    let mut previous: Option<MatchResult> = None;

    for &result in results {
        if current.kind == Some(result) {
            current.count += 1;
        } else {
            current = CurrentStreak {
                kind: Some(result),
                count: 1,
            };
        }

        let best = match result {
            MatchResult::Win => &mut longest.wins,
            MatchResult::Draw => &mut longest.draws,
            MatchResult::Loss => &mut longest.losses,
        };
        *best = (*best).max(current.count);

        if result.is_unbeaten() {
            unbeaten_run += 1;
            longest.unbeaten = longest.unbeaten.max(unbeaten_run);
        } else {
            unbeaten_run = 0;
        }

        if let Some(prev) = previous {
            transitions[index(prev)].record(result);
        }
        previous = Some(result);
    }

    StreakStats {
        current_streak: current,
        longest_streaks: longest,
        transitions: Transitions {
            after_win: transitions[index(MatchResult::Win)].bucket(),
            after_draw: transitions[index(MatchResult::Draw)].bucket(),
            after_loss: transitions[index(MatchResult::Loss)].bucket(),
        },
        total_matches: results.len() as u32,
    }
}
