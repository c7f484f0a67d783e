//! Indirect dominance over the directed "beat" graph.
//!
//! An edge `X -> Y` exists when X won at least one match against Y; draws add
//! no edge. The graph is rebuilt from the store on every call.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::models::{GraphStats, IndirectWin};
use crate::storage::MatchStore;

type BeatGraph<'a> = BTreeMap<&'a str, BTreeSet<&'a str>>;

fn beat_graph(store: &dyn MatchStore) -> BeatGraph<'_> {
    let mut graph = BeatGraph::new();
    for m in store.matches() {
        if let Some((winner, loser)) = m.winner_loser() {
            graph.entry(winner).or_default().insert(loser);
        }
    }
    graph
}

fn display_names(store: &dyn MatchStore) -> BTreeMap<&str, &str> {
    let mut names = BTreeMap::new();
    for m in store.matches() {
        names.insert(m.team_a_code.as_str(), m.team_a.as_str());
        names.insert(m.team_b_code.as_str(), m.team_b.as_str());
    }
    names
}

/// Every `(Z, Y)` with `code -> Z -> Y`, ordered by Z then Y.
///
/// Paths back to the subject itself and victims the subject already beat
/// directly are not reported.
pub fn indirect_wins(store: &dyn MatchStore, code: &str) -> GraphStats {
    let graph = beat_graph(store);
    let Some(direct) = graph.get(code) else {
        return GraphStats::default();
    };
    let names = display_names(store);
    let name_of = |c: &str| names.get(c).copied().unwrap_or(c).to_string();

    let mut indirect_wins = Vec::new();
    for &intermediate in direct {
        let Some(victims) = graph.get(intermediate) else {
            continue;
        };
        for &victim in victims {
            if victim == code || direct.contains(victim) {
                continue;
            }
            indirect_wins.push(IndirectWin {
                intermediate_team: name_of(intermediate),
                indirect_victim: name_of(victim),
                intermediate_code: intermediate.to_string(),
                indirect_victim_code: victim.to_string(),
            });
        }
    }

    debug!(
        "Indirect wins for {}: {} via {} direct victims",
        code,
        indirect_wins.len(),
        direct.len()
    );
    GraphStats {
        total_indirect_wins: indirect_wins.len() as u32,
        indirect_wins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{game, store};
    use crate::models::{Match, Team};
    use pretty_assertions::assert_eq;

    fn pairs(stats: &GraphStats) -> Vec<(&str, &str)> {
        stats
            .indirect_wins
            .iter()
            .map(|w| (w.intermediate_code.as_str(), w.indirect_victim_code.as_str()))
            .collect()
    }

    #[test]
    fn test_two_hop_path() {
        let store = store(vec![
            Match::new(
                Team::new("Aland", "AAA"),
                Team::new("Borduria", "BBB"),
                (2, 1),
                2014,
                "World Cup",
            ),
            Match::new(
                Team::new("Borduria", "BBB"),
                Team::new("Carpania", "CCC"),
                (1, 0),
                2014,
                "World Cup",
            ),
        ]);
        let stats = indirect_wins(&store, "AAA");

        assert_eq!(stats.total_indirect_wins, 1);
        assert_eq!(
            stats.indirect_wins[0],
            IndirectWin {
                intermediate_team: "Borduria".to_string(),
                indirect_victim: "Carpania".to_string(),
                intermediate_code: "BBB".to_string(),
                indirect_victim_code: "CCC".to_string(),
            }
        );
    }

    #[test]
    fn test_excludes_self_and_direct_victims() {
        let store = store(vec![
            game("FRA", "BRA", (3, 0), 1998),
            game("FRA", "CRO", (2, 1), 1998),
            game("BRA", "FRA", (1, 0), 2002),
            game("BRA", "CRO", (1, 0), 2006),
            game("BRA", "GER", (2, 0), 2002),
            game("CRO", "ENG", (2, 1), 2018),
        ]);
        let stats = indirect_wins(&store, "FRA");

        assert_eq!(pairs(&stats), vec![("BRA", "GER"), ("CRO", "ENG")]);
        for w in &stats.indirect_wins {
            assert_ne!(w.indirect_victim_code, "FRA");
        }
    }

    #[test]
    fn test_draws_add_no_edge_and_pairs_unique() {
        let store = store(vec![
            game("ESP", "POR", (3, 3), 2018),
            game("POR", "MAR", (1, 0), 2018),
            game("ESP", "IRN", (1, 0), 2018),
            game("ESP", "IRN", (2, 0), 2022),
            game("IRN", "MAR", (1, 0), 2018),
            game("IRN", "MAR", (2, 1), 2022),
            game("IRN", "WAL", (2, 0), 2022),
        ]);
        let stats = indirect_wins(&store, "ESP");
        assert_eq!(pairs(&stats), vec![("IRN", "MAR"), ("IRN", "WAL")]);
        assert_eq!(stats.total_indirect_wins, 2);
    }

    #[test]
    fn test_deterministic() {
        let matches = vec![
            game("A", "D", (1, 0), 2000),
            game("A", "B", (1, 0), 2000),
            game("D", "E", (1, 0), 2000),
            game("B", "F", (1, 0), 2000),
            game("B", "C", (1, 0), 2000),
        ];
        let first = indirect_wins(&store(matches.clone()), "A");
        let mut reversed = matches;
        reversed.reverse();
        let second = indirect_wins(&store(reversed), "A");

        assert_eq!(first, second);
        assert_eq!(pairs(&first), vec![("B", "C"), ("B", "F"), ("D", "E")]);
    }

    #[test]
    fn test_team_without_wins() {
        let store = store(vec![game("KOR", "GER", (2, 0), 2018)]);
        assert_eq!(indirect_wins(&store, "GER"), GraphStats::default());
        assert_eq!(indirect_wins(&store, "ZZZ"), GraphStats::default());
    }
}
