//! Read-only match store.
//!
//! Calculators only see the `MatchStore` trait, so the in-memory store can be
//! swapped for any other read-only source without touching them.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::models::{Match, Team};

/// Read-only access to the historical match collection.
pub trait MatchStore: Send + Sync {
    /// All matches, in dataset order.
    fn matches(&self) -> &[Match];

    fn is_empty(&self) -> bool {
        self.matches().is_empty()
    }

    /// Matches the team played on either side, in dataset order.
    fn matches_for_team(&self, code: &str) -> Vec<&Match> {
        self.matches().iter().filter(|m| m.involves(code)).collect()
    }

    /// Matches between exactly these two teams, either way round.
    fn matches_between(&self, a: &str, b: &str) -> Vec<&Match> {
        self.matches().iter().filter(|m| m.is_between(a, b)).collect()
    }

    /// The team's matches ordered by year; same-year matches keep dataset order.
    fn chronological_matches(&self, code: &str) -> Vec<&Match> {
        let mut matches = self.matches_for_team(code);
        matches.sort_by_key(|m| m.year);
        matches
    }

    /// Every team appearing in at least one match, sorted by name.
    ///
    /// When a code appears under several names the last one wins.
    fn teams(&self) -> Vec<Team> {
        let mut names: BTreeMap<&str, &str> = BTreeMap::new();
        for m in self.matches() {
            names.insert(&m.team_a_code, &m.team_a);
            names.insert(&m.team_b_code, &m.team_b);
        }

        let mut teams: Vec<Team> = names
            .into_iter()
            .map(|(code, name)| Team::new(name, code))
            .collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
        teams
    }

    /// Display name for a code, if the team appears in the store.
    fn team_name(&self, code: &str) -> Option<String> {
        self.matches().iter().rev().find_map(|m| match m.side_of(code)? {
            crate::models::Side::A => Some(m.team_a.clone()),
            crate::models::Side::B => Some(m.team_b.clone()),
        })
    }
}

/// Match store backed by a vector loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMatchStore {
    matches: Vec<Match>,
}

impl InMemoryMatchStore {
    /// Build a store, dropping records where both sides share a code.
    pub fn new(matches: Vec<Match>) -> Self {
        let total = matches.len();
        let matches: Vec<Match> = matches
            .into_iter()
            .filter(|m| {
                let valid = m.team_a_code != m.team_b_code;
                if !valid {
                    warn!(
                        "Skipping match {} ({} {}): both sides are {}",
                        m.id, m.competition, m.year, m.team_a_code
                    );
                }
                valid
            })
            .collect();

        debug!("Match store holds {} of {} records", matches.len(), total);
        Self { matches }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

impl MatchStore for InMemoryMatchStore {
    fn matches(&self) -> &[Match] {
        &self.matches
    }
}
