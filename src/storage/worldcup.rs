//! Loader for per-year tournament files.
//!
//! Each year directory holds a `worldcup.json` with rounds of matches (and,
//! optionally, a `worldcup.groups.json`). Years that only carry the
//! openfootball text sources (`cup.txt`, `cup_finals.txt`) are parsed and
//! converted on load. Matches are flattened into `Match` records in round
//! order, years ascending.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{convert, text, StorageConfig, StorageError};
use crate::models::{Goal, Match, Team};

/// Competition label attached to every match loaded from the year datasets.
pub const WORLD_CUP: &str = "World Cup";

pub const WORLDCUP_FILE: &str = "worldcup.json";
pub const GROUPS_FILE: &str = "worldcup.groups.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StadiumInfo {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalInfo {
    pub name: String,
    pub minute: u32,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub owngoal: bool,
    #[serde(default)]
    pub penalty: bool,
    /// Running score after this goal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score1: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score2: Option<u32>,
}

impl From<&GoalInfo> for Goal {
    fn from(g: &GoalInfo) -> Self {
        Goal {
            player: g.name.clone(),
            minute: g.minute,
            offset: g.offset,
            owngoal: g.owngoal,
            penalty: g.penalty,
        }
    }
}

/// A match as stored in `worldcup.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    #[serde(default)]
    pub num: Option<u32>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    pub team1: TeamInfo,
    pub team2: TeamInfo,
    pub score1: u32,
    pub score2: u32,
    /// Half-time score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score1i: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score2i: Option<u32>,
    /// Score after extra time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score1et: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score2et: Option<u32>,
    /// Penalty shootout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score1p: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score2p: Option<u32>,
    #[serde(default)]
    pub goals1: Vec<GoalInfo>,
    #[serde(default)]
    pub goals2: Vec<GoalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub knockout: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stadium: Option<StadiumInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundInfo {
    pub name: String,
    #[serde(default)]
    pub matches: Vec<MatchInfo>,
}

/// Root of `worldcup.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldCupData {
    pub name: String,
    #[serde(default)]
    pub rounds: Vec<RoundInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub name: String,
    #[serde(default)]
    pub teams: Vec<TeamInfo>,
}

/// Root of `worldcup.groups.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldCupGroups {
    pub name: String,
    #[serde(default)]
    pub groups: Vec<GroupInfo>,
}

pub fn read_worldcup(path: &Path) -> Result<WorldCupData, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Read a groups file; a missing file is not an error.
pub fn read_groups(path: &Path) -> Result<Option<WorldCupGroups>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Year directories containing `file_name`, ascending.
pub(crate) fn years_with(config: &StorageConfig, file_name: &str) -> Result<Vec<u16>, StorageError> {
    let datasets = config.datasets_dir();
    if !datasets.exists() {
        return Ok(Vec::new());
    }

    let pattern = datasets.join("*").join(file_name);
    let pattern = pattern
        .to_str()
        .ok_or_else(|| StorageError::InvalidPath(format!("{:?}", pattern)))?;

    let mut years: Vec<u16> = glob::glob(pattern)?
        .filter_map(Result::ok)
        .filter_map(|path| {
            path.parent()
                .and_then(|dir| dir.file_name())
                .and_then(|name| name.to_str())
                .and_then(|name| name.parse::<u16>().ok())
        })
        .collect();

    years.sort_unstable();
    years.dedup();
    Ok(years)
}

/// Years that have a `worldcup.json` or a `cup.txt`, ascending.
pub fn available_years(config: &StorageConfig) -> Result<Vec<u16>, StorageError> {
    let mut years = years_with(config, WORLDCUP_FILE)?;
    years.extend(years_with(config, text::CUP_FILE)?);
    years.sort_unstable();
    years.dedup();
    Ok(years)
}

/// A year's tournament, from `worldcup.json` when present, otherwise
/// converted from the text sources.
pub fn read_tournament(config: &StorageConfig, year: u16) -> Result<WorldCupData, StorageError> {
    let json_path = config.worldcup_path(year);
    if json_path.exists() {
        return read_worldcup(&json_path);
    }
    if config.cup_text_path(year).exists() {
        debug!("No {} for {}, converting text sources", WORLDCUP_FILE, year);
        let parsed = text::read_cup_files(config, year)?;
        return Ok(convert::to_worldcup(&parsed));
    }
    Err(StorageError::PathNotFound(json_path))
}

/// Flatten a tournament into match records, in round order.
pub fn flatten_matches(data: &WorldCupData, year: u16, competition: &str) -> Vec<Match> {
    let mut matches = Vec::new();

    for round in &data.rounds {
        for info in &round.matches {
            let goals: Vec<Goal> = info
                .goals1
                .iter()
                .chain(info.goals2.iter())
                .map(Goal::from)
                .collect();

            let mut m = Match::new(
                Team::new(&info.team1.name, &info.team1.code),
                Team::new(&info.team2.name, &info.team2.code),
                (info.score1, info.score2),
                year,
                competition,
            )
            .with_goals(goals)
            .with_round(&round.name);

            if let Some(num) = info.num {
                m = m.with_num(num);
            }
            if let Ok(date) = NaiveDate::parse_from_str(&info.date, "%Y-%m-%d") {
                m = m.with_date(date);
            }
            if let Some(group) = &info.group {
                m = m.with_group(group);
            }

            matches.push(m);
        }
    }

    matches
}

/// Load one year's matches.
pub fn load_year(config: &StorageConfig, year: u16) -> Result<Vec<Match>, StorageError> {
    let data = read_tournament(config, year)?;
    let matches = flatten_matches(&data, year, WORLD_CUP);
    debug!("Loaded {} matches from {} ({})", matches.len(), data.name, year);
    Ok(matches)
}

/// Load every available year, oldest first.
pub fn load_matches(config: &StorageConfig) -> Result<Vec<Match>, StorageError> {
    let years = available_years(config)?;
    let mut all = Vec::new();

    for year in &years {
        all.extend(load_year(config, *year)?);
    }

    info!(
        "Loaded {} matches across {} tournaments from {:?}",
        all.len(),
        years.len(),
        config.datasets_dir()
    );
    Ok(all)
}
