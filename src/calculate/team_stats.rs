//! Per-team aggregates: win/loss/draw summary, goals and home/away split.

use std::collections::BTreeMap;

use tracing::debug;

use super::{average, percentage};
use crate::models::{
    GoalStats, GoalTotals, HomeAwayStats, MatchResult, Side, TeamStats, VenueRecord,
};
use crate::storage::MatchStore;

/// Win/loss/draw counts and goals for a team.
///
/// An unknown code yields an all-zero summary rather than an error.
pub fn team_stats(store: &dyn MatchStore, code: &str) -> TeamStats {
    let mut stats = TeamStats::default();

    for m in store.matches_for_team(code) {
        let Some((gf, ga)) = m.goals_for_against(code) else {
            continue;
        };

        match MatchResult::from_goals(gf, ga) {
            MatchResult::Win => stats.wins += 1,
            MatchResult::Draw => stats.draws += 1,
            MatchResult::Loss => stats.losses += 1,
        }
        stats.goals_for = stats.goals_for.saturating_add(gf);
        stats.goals_against = stats.goals_against.saturating_add(ga);
        stats.total_matches += 1;
    }

    stats.win_percentage = percentage(stats.wins, stats.total_matches);
    stats.loss_percentage = percentage(stats.losses, stats.total_matches);
    stats.draw_percentage = percentage(stats.draws, stats.total_matches);

    debug!(
        "Team {}: {}W {}D {}L over {} matches",
        code, stats.wins, stats.draws, stats.losses, stats.total_matches
    );
    stats
}

#[derive(Default)]
struct GoalTally {
    goals_for: u32,
    goals_against: u32,
    matches_played: u32,
}

impl GoalTally {
    fn add(&mut self, gf: u32, ga: u32) {
        self.goals_for = self.goals_for.saturating_add(gf);
        self.goals_against = self.goals_against.saturating_add(ga);
        self.matches_played += 1;
    }

    fn totals(&self) -> GoalTotals {
        GoalTotals {
            goals_for: self.goals_for,
            goals_against: self.goals_against,
            matches_played: self.matches_played,
            avg_goals_for: average(self.goals_for, self.matches_played),
            avg_goals_against: average(self.goals_against, self.matches_played),
            goal_difference: self.goals_for as i64 - self.goals_against as i64,
        }
    }
}

/// Goals for/against overall and per competition edition.
pub fn goal_stats(store: &dyn MatchStore, code: &str) -> GoalStats {
    let mut global = GoalTally::default();
    let mut by_competition: BTreeMap<String, GoalTally> = BTreeMap::new();

    for m in store.matches_for_team(code) {
        let Some((gf, ga)) = m.goals_for_against(code) else {
            continue;
        };
        global.add(gf, ga);
        by_competition
            .entry(format!("{} {}", m.competition, m.year))
            .or_default()
            .add(gf, ga);
    }

    GoalStats {
        global: global.totals(),
        by_competition: by_competition
            .into_iter()
            .map(|(key, tally)| (key, tally.totals()))
            .collect(),
    }
}

#[derive(Default)]
struct VenueTally {
    record: VenueRecord,
}

impl VenueTally {
    fn add(&mut self, gf: u32, ga: u32) {
        let r = &mut self.record;
        r.matches_played += 1;
        r.goals_for = r.goals_for.saturating_add(gf);
        r.goals_against = r.goals_against.saturating_add(ga);
        match MatchResult::from_goals(gf, ga) {
            MatchResult::Win => r.wins += 1,
            MatchResult::Draw => r.draws += 1,
            MatchResult::Loss => r.losses += 1,
        }
    }

    fn finish(mut self) -> VenueRecord {
        let r = &mut self.record;
        r.win_percentage = percentage(r.wins, r.matches_played);
        r.avg_goals_for = average(r.goals_for, r.matches_played);
        r.avg_goals_against = average(r.goals_against, r.matches_played);
        self.record
    }
}

/// Split of a team's record by listed side: `team_a` is home, `team_b` away.
pub fn home_away(store: &dyn MatchStore, code: &str) -> HomeAwayStats {
    let mut home = VenueTally::default();
    let mut away = VenueTally::default();

    for m in store.matches_for_team(code) {
        match m.side_of(code) {
            Some(Side::A) => home.add(m.score_a, m.score_b),
            Some(Side::B) => away.add(m.score_b, m.score_a),
            None => {}
        }
    }

    HomeAwayStats {
        home: home.finish(),
        away: away.finish(),
    }
}
