//! Conversion of parsed text sources into the `worldcup.json` layout.
//!
//! Group-stage matches become "Matchday N" rounds, one per match date.
//! Knockout matches are grouped under canonical round names and ordered by
//! their first match date.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::teams::{resolve_team, stadium_key};
use super::text::{self, ParsedGoal, ParsedMatch, ParsedTournament};
use super::worldcup::{
    years_with, GoalInfo, GroupInfo, MatchInfo, RoundInfo, StadiumInfo, WorldCupData,
    WorldCupGroups, WORLDCUP_FILE,
};
use super::{StorageConfig, StorageError};

const KNOCKOUT_ORDER: &[&str] = &[
    "Round of 16",
    "Quarter-finals",
    "Semi-finals",
    "Match for third place",
    "Final",
];

/// A converted year, ready to be validated and written.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub worldcup: WorldCupData,
    pub groups: WorldCupGroups,
}

impl Conversion {
    pub fn match_count(&self) -> usize {
        self.worldcup.rounds.iter().map(|r| r.matches.len()).sum()
    }
}

fn canonical_round_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    if lower.contains("round of 16") || lower.contains("round of sixteen") {
        "Round of 16".to_string()
    } else if lower.contains("quarter") {
        "Quarter-finals".to_string()
    } else if lower.contains("semi") {
        "Semi-finals".to_string()
    } else if lower.contains("third") {
        "Match for third place".to_string()
    } else if lower == "final" {
        "Final".to_string()
    } else {
        name.trim().to_string()
    }
}

/// Goals in scoring order with the running score after each one. A goal
/// counts for the side it is listed under, own goals included.
fn goal_infos(m: &ParsedMatch) -> (Vec<GoalInfo>, Vec<GoalInfo>) {
    let mut all: Vec<(&ParsedGoal, bool)> = m
        .goals1
        .iter()
        .map(|g| (g, true))
        .chain(m.goals2.iter().map(|g| (g, false)))
        .collect();
    all.sort_by_key(|(g, _)| (g.minute, g.offset.unwrap_or(0)));

    let (mut score1, mut score2) = (0u32, 0u32);
    let mut goals1 = Vec::new();
    let mut goals2 = Vec::new();

    for (goal, first_side) in all {
        if first_side {
            score1 = score1.saturating_add(1);
        } else {
            score2 = score2.saturating_add(1);
        }
        let info = GoalInfo {
            name: goal.scorer.clone(),
            minute: goal.minute,
            offset: goal.offset,
            owngoal: goal.owngoal,
            penalty: goal.penalty,
            score1: Some(score1),
            score2: Some(score2),
        };
        if first_side {
            goals1.push(info);
        } else {
            goals2.push(info);
        }
    }

    (goals1, goals2)
}

fn match_info(m: &ParsedMatch) -> MatchInfo {
    let (goals1, goals2) = goal_infos(m);
    let score = &m.score;

    MatchInfo {
        num: m.num,
        date: m
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        time: m.time.clone(),
        team1: resolve_team(&m.team1),
        team2: resolve_team(&m.team2),
        score1: score.score.0,
        score2: score.score.1,
        score1i: score.half_time.map(|s| s.0),
        score2i: score.half_time.map(|s| s.1),
        score1et: score.extra_time.map(|s| s.0),
        score2et: score.extra_time.map(|s| s.1),
        score1p: score.penalties.map(|s| s.0),
        score2p: score.penalties.map(|s| s.1),
        goals1,
        goals2,
        group: m.group.clone(),
        knockout: m.knockout,
        stadium: m.stadium.as_ref().map(|name| StadiumInfo {
            key: stadium_key(name),
            name: name.clone(),
        }),
        city: m.city.clone(),
    }
}

fn sorted_by_num(mut matches: Vec<&ParsedMatch>) -> Vec<MatchInfo> {
    matches.sort_by_key(|m| m.num.unwrap_or(0));
    matches.into_iter().map(match_info).collect()
}

fn group_stage_rounds(matches: &[&ParsedMatch]) -> Vec<RoundInfo> {
    let mut by_date: BTreeMap<Option<NaiveDate>, Vec<&ParsedMatch>> = BTreeMap::new();
    for &m in matches {
        by_date.entry(m.date).or_default().push(m);
    }

    by_date
        .into_values()
        .enumerate()
        .map(|(idx, day)| RoundInfo {
            name: format!("Matchday {}", idx + 1),
            matches: sorted_by_num(day),
        })
        .collect()
}

fn knockout_rounds(matches: &[&ParsedMatch]) -> Vec<RoundInfo> {
    let mut rounds: Vec<(String, Vec<&ParsedMatch>)> = Vec::new();
    for &m in matches {
        let name = m
            .round
            .as_deref()
            .map(canonical_round_name)
            .unwrap_or_else(|| "Knockout".to_string());
        match rounds.iter_mut().find(|(n, _)| *n == name) {
            Some((_, list)) => list.push(m),
            None => rounds.push((name, vec![m])),
        }
    }

    rounds.sort_by_key(|(name, list)| {
        let first_date = list.iter().filter_map(|m| m.date).min();
        let position = KNOCKOUT_ORDER
            .iter()
            .position(|known| *known == name.as_str())
            .unwrap_or(KNOCKOUT_ORDER.len());
        (first_date, position)
    });

    rounds
        .into_iter()
        .map(|(name, list)| RoundInfo {
            name,
            matches: sorted_by_num(list),
        })
        .collect()
}

/// Build the `worldcup.json` document for a parsed tournament.
pub fn to_worldcup(tournament: &ParsedTournament) -> WorldCupData {
    let (knockout, group_stage): (Vec<&ParsedMatch>, Vec<&ParsedMatch>) =
        tournament.matches.iter().partition(|m| m.knockout);

    let mut rounds = group_stage_rounds(&group_stage);
    rounds.extend(knockout_rounds(&knockout));

    WorldCupData {
        name: tournament.name.clone(),
        rounds,
    }
}

/// Build the `worldcup.groups.json` document for a parsed tournament.
pub fn to_groups(tournament: &ParsedTournament) -> WorldCupGroups {
    WorldCupGroups {
        name: tournament.name.clone(),
        groups: tournament
            .groups
            .iter()
            .map(|g| GroupInfo {
                name: g.name.clone(),
                teams: g.teams.iter().map(|t| resolve_team(t)).collect(),
            })
            .collect(),
    }
}

/// Parse and convert one year's text sources.
pub fn convert_year(config: &StorageConfig, year: u16) -> Result<Conversion, StorageError> {
    let parsed = text::read_cup_files(config, year)?;
    Ok(Conversion {
        worldcup: to_worldcup(&parsed),
        groups: to_groups(&parsed),
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json + "\n")?;
    Ok(())
}

/// Write `worldcup.json` and `worldcup.groups.json` into the year directory.
pub fn save_conversion(
    config: &StorageConfig,
    year: u16,
    conversion: &Conversion,
) -> Result<(), StorageError> {
    fs::create_dir_all(config.year_dir(year))?;
    write_json(&config.worldcup_path(year), &conversion.worldcup)?;
    write_json(&config.groups_path(year), &conversion.groups)?;
    info!(
        "Wrote {} matches and {} groups for {}",
        conversion.match_count(),
        conversion.groups.groups.len(),
        year
    );
    Ok(())
}

/// Years with a `cup.txt`. Unless `include_existing` is set, years that
/// already have a `worldcup.json` are left out.
pub fn convertible_years(
    config: &StorageConfig,
    include_existing: bool,
) -> Result<Vec<u16>, StorageError> {
    let mut years = years_with(config, text::CUP_FILE)?;
    if !include_existing {
        let existing = years_with(config, WORLDCUP_FILE)?;
        years.retain(|y| !existing.contains(y));
    }
    Ok(years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::text::parse_cup_text;
    use crate::storage::text::tests::{CUP_1994, FINALS_1994};
    use crate::storage::worldcup::{read_groups, read_worldcup};
    use crate::validate::validate_worldcup;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn tournament_1994() -> ParsedTournament {
        let mut t = parse_cup_text(CUP_1994, 1994, false);
        t.matches
            .extend(parse_cup_text(FINALS_1994, 1994, true).matches);
        t
    }

    fn write_sources(config: &StorageConfig) {
        fs::create_dir_all(config.year_dir(1994)).unwrap();
        fs::write(config.cup_text_path(1994), CUP_1994).unwrap();
        fs::write(config.cup_finals_path(1994), FINALS_1994).unwrap();
    }

    #[test]
    fn test_rounds_layout() {
        let data = to_worldcup(&tournament_1994());

        let names: Vec<&str> = data.rounds.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Matchday 1", "Matchday 2", "Quarter-finals", "Final"]);
        assert_eq!(data.name, "World Cup 1994");

        let nums: Vec<Option<u32>> = data.rounds[0].matches.iter().map(|m| m.num).collect();
        assert_eq!(nums, vec![Some(3), Some(4)]);
    }

    #[test]
    fn test_match_fields() {
        let data = to_worldcup(&tournament_1994());
        let opener = &data.rounds[0].matches[0];

        assert_eq!(opener.team1.code, "USA");
        assert_eq!(opener.team2.code, "SUI");
        assert_eq!(opener.date, "1994-06-18");
        assert_eq!((opener.score1i, opener.score2i), (Some(1), Some(1)));
        assert_eq!(opener.group.as_deref(), Some("Group A"));
        assert!(!opener.knockout);
        assert_eq!(
            opener.stadium,
            Some(StadiumInfo {
                key: "pontiacsilverdome".to_string(),
                name: "Pontiac Silverdome".to_string(),
            })
        );
        assert_eq!(opener.city.as_deref(), Some("Pontiac"));

        let quarter = &data.rounds[2].matches[0];
        assert!(quarter.knockout);
        assert_eq!(quarter.time.as_deref(), Some("16:00"));
        assert_eq!((quarter.score1, quarter.score2), (1, 1));
        assert_eq!((quarter.score1et, quarter.score2et), (Some(2), Some(2)));
        assert_eq!((quarter.score1p, quarter.score2p), (Some(5), Some(4)));
        assert_eq!(quarter.group, None);
    }

    #[test]
    fn test_running_score_follows_minutes() {
        let data = to_worldcup(&tournament_1994());
        let m = &data.rounds[0].matches[1];

        let running: Vec<(u32, Option<u32>, Option<u32>)> = m
            .goals1
            .iter()
            .chain(m.goals2.iter())
            .map(|g| (g.minute, g.score1, g.score2))
            .collect();
        assert_eq!(
            running,
            vec![
                (43, Some(1), Some(2)),
                (16, Some(0), Some(1)),
                (34, Some(0), Some(2)),
                (89, Some(1), Some(3)),
            ]
        );
    }

    #[test]
    fn test_groups_use_canonical_codes() {
        let groups = to_groups(&tournament_1994());
        let codes: Vec<&str> = groups.groups[0]
            .teams
            .iter()
            .map(|t| t.code.as_str())
            .collect();
        assert_eq!(codes, vec!["USA", "SUI", "COL", "ROU"]);
    }

    #[test]
    fn test_canonical_round_name() {
        assert_eq!(canonical_round_name("Quarter-final"), "Quarter-finals");
        assert_eq!(canonical_round_name("Third-place match"), "Match for third place");
        assert_eq!(canonical_round_name("Final"), "Final");
        assert_eq!(canonical_round_name("Final Round"), "Final Round");
    }

    #[test]
    fn test_converted_year_validates() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());
        write_sources(&config);

        let conversion = convert_year(&config, 1994).unwrap();
        assert_eq!(conversion.match_count(), 5);
        assert!(validate_worldcup(&conversion.worldcup).is_valid);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());
        write_sources(&config);

        assert_eq!(convertible_years(&config, false).unwrap(), vec![1994]);

        let conversion = convert_year(&config, 1994).unwrap();
        save_conversion(&config, 1994, &conversion).unwrap();

        assert_eq!(
            read_worldcup(&config.worldcup_path(1994)).unwrap(),
            conversion.worldcup
        );
        assert_eq!(
            read_groups(&config.groups_path(1994)).unwrap(),
            Some(conversion.groups)
        );

        assert!(convertible_years(&config, false).unwrap().is_empty());
        assert_eq!(convertible_years(&config, true).unwrap(), vec![1994]);
    }
}
