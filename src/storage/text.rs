//! Parser for the openfootball plain-text tournament sources.
//!
//! `cup.txt` holds the group definitions and group-stage matches,
//! `cup_finals.txt` (when present) the knockout rounds:
//!
//! ```text
//! = World Cup 1994
//! Group A  |  United States   Switzerland   Colombia   Romania
//!
//! Group A
//! (3)  18 June   United States   1-1 (1-1)   Switzerland   @ Pontiac Silverdome, Pontiac
//!   [Wynalda 45'; Bregy 39']
//!
//! Quarter-finals
//! (52) Sat Jul/9 16:00  Netherlands  2-3 (0-1)  Brazil  @ Cotton Bowl, Dallas
//! (55) Sun Jul/10  Romania  2-2 a.e.t. (1-1, 1-0)  Sweden
//! ```
//!
//! Lines the parser does not understand are skipped.

use std::fs;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use super::{StorageConfig, StorageError};

pub const CUP_FILE: &str = "cup.txt";
pub const CUP_FINALS_FILE: &str = "cup_finals.txt";

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^=\s*World\s+Cup\s+(\d{4})\s*(?:#\s*(?:in\s+)?(.+))?$").unwrap()
});
static GROUP_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Group\s+([A-H1-4])\s*\|\s*(.+)$").unwrap());
static GROUP_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Group\s+([A-H1-4])\s*$").unwrap());
static ROUND_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(Round\s+of\s+\d+|Quarter-finals?|Semi-finals?|Third[- ]place\s+match|Match\s+for\s+third\s+place|Final|Final\s+Round|First\s+round|Matchday\s+\d+)\s*(?:\|.*)?$",
    )
    .unwrap()
});
static GOALS_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[(.*)\]$").unwrap());
static MATCH_NUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\((\d+)\)\s+").unwrap());
static MATCH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:[A-Za-z]{3}\s+)?([A-Za-z]+)/(\d{1,2})|(\d{1,2})\s+([A-Za-z]+))(?:\s+(\d{1,2}:\d{2}))?\s+",
    )
    .unwrap()
});
static SCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+)\s*-\s*(\d+)(?:\s*pen\.?)?(?:\s*\d+\s*-\s*\d+)?(?:\s*a\.e\.t\.?)?(?:\s*\(\d+\s*-\s*\d+(?:\s*,\s*\d+\s*-\s*\d+)?\))?",
    )
    .unwrap()
});
static PENALTIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)\s*-\s*(\d+)\s*pen\.?").unwrap());
static SCORE_PAIR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*-\s*(\d+)").unwrap());
static PARENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((\d+)\s*-\s*(\d+)(?:\s*,\s*(\d+)\s*-\s*(\d+))?\)\s*$").unwrap()
});
static GOAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:([^\d;,()\[\]]+?)\s+)?(\d+)(?:\+(\d+))?['’](?:\s*\((pen\.?|o\.g\.?)\))?")
        .unwrap()
});

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedGoal {
    pub scorer: String,
    pub minute: u32,
    pub offset: Option<u32>,
    pub penalty: bool,
    pub owngoal: bool,
}

/// Score line of a match. `score` is the result after regulation time when
/// the source gives it, otherwise the result after extra time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreLine {
    pub score: (u32, u32),
    pub half_time: Option<(u32, u32)>,
    pub extra_time: Option<(u32, u32)>,
    pub penalties: Option<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMatch {
    pub num: Option<u32>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub team1: String,
    pub team2: String,
    pub score: ScoreLine,
    pub goals1: Vec<ParsedGoal>,
    pub goals2: Vec<ParsedGoal>,
    pub stadium: Option<String>,
    pub city: Option<String>,
    pub group: Option<String>,
    pub round: Option<String>,
    pub knockout: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedGroup {
    pub name: String,
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTournament {
    pub name: String,
    pub year: u16,
    pub location: Option<String>,
    pub groups: Vec<ParsedGroup>,
    pub matches: Vec<ParsedMatch>,
}

impl ParsedTournament {
    pub fn new(year: u16) -> Self {
        Self {
            name: format!("World Cup {}", year),
            year,
            location: None,
            groups: Vec::new(),
            matches: Vec::new(),
        }
    }
}

fn capture_u32(caps: &Captures, idx: usize) -> Option<u32> {
    caps.get(idx).and_then(|m| m.as_str().parse().ok())
}

fn capture_pair(caps: &Captures, first: usize) -> Option<(u32, u32)> {
    Some((capture_u32(caps, first)?, capture_u32(caps, first + 1)?))
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Group-stage rounds keep the current group; everything else is knockout.
fn is_group_stage_round(name: &str) -> bool {
    let name = name.to_lowercase();
    ["matchday", "group", "first round", "final round"]
        .iter()
        .any(|k| name.contains(k))
}

/// Parse a score such as `4-1 (3-0)`, `2-2 a.e.t. (1-1, 1-0)` or
/// `3-2 pen. 0-0 a.e.t. (0-0)`.
pub fn parse_score(text: &str) -> Option<ScoreLine> {
    let text = text.trim();

    let (penalties, rest) = match PENALTIES.captures(text) {
        Some(caps) => {
            let end = caps.get(0).map_or(0, |m| m.end());
            (Some(capture_pair(&caps, 1)?), &text[end..])
        }
        None => (None, text),
    };
    let extra_time = penalties.is_some() || rest.to_lowercase().contains("a.e.t");

    let (body, full_time, half_time) = match PARENS.captures(rest) {
        Some(caps) => {
            let start = caps.get(0).map_or(rest.len(), |m| m.start());
            let first = capture_pair(&caps, 1)?;
            match capture_pair(&caps, 3) {
                Some(second) => (&rest[..start], Some(first), Some(second)),
                None => (&rest[..start], None, Some(first)),
            }
        }
        None => (rest, None, None),
    };

    let main = SCORE_PAIR
        .captures(body)
        .and_then(|caps| capture_pair(&caps, 1))?;

    if extra_time {
        Some(ScoreLine {
            score: full_time.unwrap_or(main),
            half_time,
            extra_time: Some(main),
            penalties,
        })
    } else {
        Some(ScoreLine {
            score: main,
            half_time,
            extra_time: None,
            penalties: None,
        })
    }
}

fn parse_team_goals(text: &str) -> Vec<ParsedGoal> {
    let text = text.trim();
    if text.is_empty() || text == "-" {
        return Vec::new();
    }

    let mut goals = Vec::new();
    let mut last_scorer: Option<String> = None;

    for caps in GOAL.captures_iter(text) {
        let named = caps
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .filter(|name| !name.is_empty());
        // "Neymar 29' 71'" lists several goals under one name
        let Some(scorer) = named.or_else(|| last_scorer.clone()) else {
            continue;
        };
        let Some(minute) = capture_u32(&caps, 2) else {
            continue;
        };
        let modifier = caps
            .get(4)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default();

        goals.push(ParsedGoal {
            scorer: scorer.clone(),
            minute,
            offset: capture_u32(&caps, 3),
            penalty: modifier.starts_with("pen"),
            owngoal: modifier.starts_with("o.g"),
        });
        last_scorer = Some(scorer);
    }

    goals
}

/// Parse the inside of a goals line: `team1 goals; team2 goals`.
pub fn parse_goals(text: &str) -> (Vec<ParsedGoal>, Vec<ParsedGoal>) {
    let (first, second) = text.split_once(';').unwrap_or((text, ""));
    (parse_team_goals(first), parse_team_goals(second))
}

/// Parse one `(num) date teams score teams @ venue` line.
pub fn parse_match_line(
    line: &str,
    year: u16,
    group: Option<&str>,
    round: Option<&str>,
    knockout: bool,
) -> Option<ParsedMatch> {
    let line = line.trim();
    let num_caps = MATCH_NUM.captures(line)?;
    let num = capture_u32(&num_caps, 1);
    let mut rest = &line[num_caps.get(0).map_or(0, |m| m.end())..];

    let mut date = None;
    let mut time = None;
    if let Some(caps) = MATCH_DATE.captures(rest) {
        let (month, day) = match (caps.get(1), caps.get(2)) {
            (Some(month), Some(_)) => (month.as_str(), capture_u32(&caps, 2)),
            _ => (caps.get(4).map_or("", |m| m.as_str()), capture_u32(&caps, 3)),
        };
        date = month_number(month)
            .zip(day)
            .and_then(|(m, d)| NaiveDate::from_ymd_opt(i32::from(year), m, d));
        if date.is_none() {
            warn!("Unreadable date in match line: {}", line);
        }
        time = caps.get(5).map(|m| m.as_str().to_string());
        rest = &rest[caps.get(0).map_or(0, |m| m.end())..];
    }

    let (teams, venue) = match rest.split_once('@') {
        Some((teams, venue)) => (teams.trim(), Some(venue.trim())),
        None => (rest.trim(), None),
    };

    let score_match = SCORE.find(teams)?;
    let team1 = teams[..score_match.start()].trim();
    let team2 = teams[score_match.end()..].trim();
    if team1.is_empty() || team2.is_empty() {
        return None;
    }
    let score = parse_score(score_match.as_str())?;

    let (stadium, city) = match venue.filter(|v| !v.is_empty()) {
        Some(venue) => match venue.rsplit_once(',') {
            Some((stadium, city)) => (
                Some(stadium.trim().to_string()),
                Some(city.trim().to_string()),
            ),
            None => (Some(venue.to_string()), None),
        },
        None => (None, None),
    };

    Some(ParsedMatch {
        num,
        date,
        time,
        team1: team1.to_string(),
        team2: team2.to_string(),
        score,
        goals1: Vec::new(),
        goals2: Vec::new(),
        stadium,
        city,
        group: if knockout {
            None
        } else {
            group.map(str::to_string)
        },
        round: round.map(str::to_string),
        knockout,
    })
}

/// Parse the contents of a `cup.txt` or `cup_finals.txt` file.
///
/// `year` is used when the file has no `= World Cup YYYY` header. With
/// `finals` set every match is a knockout match.
pub fn parse_cup_text(contents: &str, year: u16, finals: bool) -> ParsedTournament {
    let mut tournament = ParsedTournament::new(year);
    let mut group: Option<String> = None;
    let mut round: Option<String> = None;
    let mut knockout = finals;

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(caps) = HEADER.captures(line) {
            if let Some(y) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
                tournament = ParsedTournament {
                    location: caps.get(2).map(|m| m.as_str().trim().to_string()),
                    ..ParsedTournament::new(y)
                };
            }
            continue;
        }

        if let Some(caps) = GROUP_DEF.captures(line) {
            let teams = caps[2]
                .split("  ")
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            tournament.groups.push(ParsedGroup {
                name: format!("Group {}", caps[1].to_uppercase()),
                teams,
            });
            continue;
        }

        if let Some(caps) = GROUP_HEADER.captures(line) {
            group = Some(format!("Group {}", caps[1].to_uppercase()));
            round = None;
            knockout = finals;
            continue;
        }

        if let Some(caps) = ROUND_HEADER.captures(line) {
            let name = caps[1].to_string();
            knockout = finals || !is_group_stage_round(&name);
            if knockout {
                group = None;
            }
            round = Some(name);
            continue;
        }

        if let Some(caps) = GOALS_LINE.captures(line) {
            if let Some(last) = tournament.matches.last_mut() {
                let (goals1, goals2) = parse_goals(&caps[1]);
                last.goals1 = goals1;
                last.goals2 = goals2;
            }
            continue;
        }

        if line.starts_with('(') {
            match parse_match_line(
                line,
                tournament.year,
                group.as_deref(),
                round.as_deref(),
                knockout,
            ) {
                Some(m) => tournament.matches.push(m),
                None => debug!("Skipping unparseable match line: {}", line),
            }
        }
    }

    tournament
}

/// Read a year's text sources: `cup.txt` is required, `cup_finals.txt`
/// contributes its knockout matches when present.
pub fn read_cup_files(config: &StorageConfig, year: u16) -> Result<ParsedTournament, StorageError> {
    let cup_path = config.cup_text_path(year);
    if !cup_path.exists() {
        return Err(StorageError::PathNotFound(cup_path));
    }
    let mut tournament = parse_cup_text(&fs::read_to_string(&cup_path)?, year, false);

    let finals_path = config.cup_finals_path(year);
    if finals_path.exists() {
        let finals = parse_cup_text(&fs::read_to_string(&finals_path)?, year, true);
        tournament.matches.extend(finals.matches);
    }

    debug!(
        "Parsed {} matches and {} groups from {} text sources",
        tournament.matches.len(),
        tournament.groups.len(),
        year
    );
    Ok(tournament)
}
