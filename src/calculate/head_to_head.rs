//! Head-to-head record between two teams.

use tracing::debug;

use super::{ensure_distinct, AnalyticsError};
use crate::models::{HeadToHeadStats, Match, MatchResult};
use crate::storage::MatchStore;

/// Default cap on `recent_matches`.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Direct meetings between `team_a` and `team_b`.
///
/// `wins_a`/`goals_a` always refer to `team_a`, whichever side it occupied in
/// the stored record. `recent_matches` is newest year first, at most
/// `recent_limit` entries; `total_matches` counts every meeting.
pub fn head_to_head(
    store: &dyn MatchStore,
    team_a: &str,
    team_b: &str,
    recent_limit: usize,
) -> Result<HeadToHeadStats, AnalyticsError> {
    ensure_distinct(team_a, team_b)?;

    let meetings = store.matches_between(team_a, team_b);

    let mut stats = HeadToHeadStats {
        team_a: team_a.to_string(),
        team_b: team_b.to_string(),
        total_matches: 0,
        wins_a: 0,
        wins_b: 0,
        draws: 0,
        goals_a: 0,
        goals_b: 0,
        recent_matches: Vec::new(),
    };

    for m in &meetings {
        let Some((goals_a, goals_b)) = m.goals_for_against(team_a) else {
            continue;
        };

        stats.total_matches += 1;
        stats.goals_a = stats.goals_a.saturating_add(goals_a);
        stats.goals_b = stats.goals_b.saturating_add(goals_b);

        match MatchResult::from_goals(goals_a, goals_b) {
            MatchResult::Win => stats.wins_a += 1,
            MatchResult::Loss => stats.wins_b += 1,
            MatchResult::Draw => stats.draws += 1,
        }
    }

    let mut recent: Vec<&Match> = meetings;
    recent.sort_by(|a, b| b.year.cmp(&a.year));
    stats.recent_matches = recent.into_iter().take(recent_limit).cloned().collect();

    debug!(
        "Head-to-head {} v {}: {}-{}-{} in {} meetings",
        team_a, team_b, stats.wins_a, stats.draws, stats.wins_b, stats.total_matches
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{game, store};

    fn rivalry() -> crate::storage::InMemoryMatchStore {
        store(vec![
            game("ARG", "ENG", (1, 1), 1962),
            game("ENG", "ARG", (1, 0), 1966),
            game("ARG", "ENG", (2, 1), 1986),
            game("ENG", "ARG", (2, 2), 1998),
            game("ARG", "ENG", (0, 1), 2002),
            game("ARG", "NGA", (2, 1), 2014),
            game("ENG", "ARG", (3, 0), 2010),
            game("ARG", "ENG", (2, 0), 1986),
        ])
    }

    #[test]
    fn test_attribution_follows_query_order() {
        let h2h = head_to_head(&rivalry(), "ARG", "ENG", 5).unwrap();

        assert_eq!(h2h.total_matches, 7);
        assert_eq!(h2h.wins_a, 2);
        assert_eq!(h2h.wins_b, 3);
        assert_eq!(h2h.draws, 2);
        assert_eq!(h2h.goals_a, 7);
        assert_eq!(h2h.goals_b, 9);
    }

    #[test]
    fn test_symmetry() {
        let store = rivalry();
        let ab = head_to_head(&store, "ARG", "ENG", 5).unwrap();
        let ba = head_to_head(&store, "ENG", "ARG", 5).unwrap();

        assert_eq!(ab.wins_a, ba.wins_b);
        assert_eq!(ab.wins_b, ba.wins_a);
        assert_eq!(ab.goals_a, ba.goals_b);
        assert_eq!(ab.draws, ba.draws);
    }

    #[test]
    fn test_recent_matches_newest_first_and_capped() {
        let h2h = head_to_head(&rivalry(), "ARG", "ENG", 5).unwrap();
        let years: Vec<u16> = h2h.recent_matches.iter().map(|m| m.year).collect();
        assert_eq!(years, vec![2010, 2002, 1998, 1986, 1986]);
        // same-year meetings keep dataset order
        assert_eq!(h2h.recent_matches[3].score_a, 2);
        assert_eq!(h2h.recent_matches[3].score_b, 1);
    }

    #[test]
    fn test_identical_codes_rejected() {
        let err = head_to_head(&rivalry(), "ARG", "ARG", 5).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));
    }

    #[test]
    fn test_never_met() {
        let h2h = head_to_head(&rivalry(), "NGA", "ENG", 5).unwrap();
        assert_eq!(h2h.total_matches, 0);
        assert!(h2h.recent_matches.is_empty());
    }
}
