//! Consistency checks for the tournament dataset files.
//!
//! Errors make a file invalid; warnings flag data worth a look (incomplete
//! scorer lists, odd codes) but never block loading.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::Serialize;

use crate::storage::worldcup::{MatchInfo, TeamInfo, WorldCupData, WorldCupGroups};

static DATE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static TIME_FORMAT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").unwrap());

const KNOCKOUT_KEYWORDS: &[&str] = &[
    "round of",
    "quarter",
    "semi",
    "final",
    "third place",
    "third-place",
    "knockout",
];

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.merge_prefixed("", other);
    }

    /// Merge another result, prefixing each of its messages.
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationResult) {
        self.is_valid &= other.is_valid;
        self.errors
            .extend(other.errors.into_iter().map(|e| format!("{}{}", prefix, e)));
        self.warnings
            .extend(other.warnings.into_iter().map(|w| format!("{}{}", prefix, w)));
    }
}

/// True for round names such as "Round of 16", "Quarter-finals" or "Final".
pub fn is_knockout_round(name: &str) -> bool {
    let name = name.to_lowercase();
    KNOCKOUT_KEYWORDS.iter().any(|k| name.contains(k))
}

fn validate_teams(m: &MatchInfo) -> ValidationResult {
    let mut result = ValidationResult::new();
    let (t1, t2) = (&m.team1, &m.team2);

    if t1.name.is_empty() {
        result.add_error("Team 1 name is empty");
    }
    if t2.name.is_empty() {
        result.add_error("Team 2 name is empty");
    }
    if !t1.name.is_empty() && t1.name == t2.name {
        result.add_error(format!("Team 1 and Team 2 are the same: {}", t1.name));
    } else if !t1.code.is_empty() && t1.code == t2.code {
        result.add_error(format!("Team 1 and Team 2 share the code {}", t1.code));
    }

    for (label, team) in [("Team 1", t1), ("Team 2", t2)] {
        if !team.code.is_empty() && team.code.chars().count() != 3 {
            result.add_warning(format!("{} code '{}' is not 3 characters", label, team.code));
        }
    }

    result
}

fn validate_halftime(m: &MatchInfo, knockout: bool) -> ValidationResult {
    let mut result = ValidationResult::new();
    if knockout {
        return result;
    }
    if let (Some(h1), Some(h2)) = (m.score1i, m.score2i) {
        if h1 > m.score1 {
            result.add_warning(format!("Halftime score1 ({}) > final score1 ({})", h1, m.score1));
        }
        if h2 > m.score2 {
            result.add_warning(format!("Halftime score2 ({}) > final score2 ({})", h2, m.score2));
        }
    }
    result
}

fn validate_date(date: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if date.is_empty() {
        result.add_error("Date is empty");
    } else if !DATE_FORMAT.is_match(date) {
        result.add_error(format!("Invalid date format: {}. Expected YYYY-MM-DD", date));
    } else if let Err(e) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        result.add_error(format!("Invalid date: {}. {}", date, e));
    }

    result
}

fn validate_time(time: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if time.is_empty() {
        return result;
    }
    if !TIME_FORMAT.is_match(time) {
        result.add_warning(format!("Time format should be HH:MM: {}", time));
    } else if NaiveTime::parse_from_str(time, "%H:%M").is_err() {
        result.add_warning(format!("Invalid time: {}", time));
    }

    result
}

/// Listed scorers vs the final score. Scorer lists are often incomplete in
/// older tournaments, so a mismatch is only a warning.
fn validate_goal_count(m: &MatchInfo) -> ValidationResult {
    let mut result = ValidationResult::new();
    let listed = m.goals1.len() + m.goals2.len();
    let total = u64::from(m.score1) + u64::from(m.score2);

    if listed > 0 && listed as u64 != total {
        result.add_warning(format!(
            "Goals count mismatch: {} goals listed, but score is {}-{} (total: {})",
            listed, m.score1, m.score2, total
        ));
    }
    result
}

fn validate_knockout(m: &MatchInfo) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let (Some(et1), Some(et2)) = (m.score1et, m.score2et) {
        if et1 == et2 && (m.score1p.is_none() || m.score2p.is_none()) {
            result.add_warning(format!(
                "Match ended level after ET ({}-{}) but no penalty scores provided",
                et1, et2
            ));
        }
    }
    if let (Some(p1), Some(p2)) = (m.score1p, m.score2p) {
        if p1 == p2 {
            result.add_error(format!("Penalty shootout ended level: {}-{}", p1, p2));
        }
    }

    result
}

/// Validate a single match. `knockout` enables extra-time/penalty checks.
pub fn validate_match(m: &MatchInfo, knockout: bool) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(validate_teams(m));
    result.merge(validate_halftime(m, knockout));
    result.merge(validate_date(&m.date));
    if let Some(time) = &m.time {
        result.merge(validate_time(time));
    }
    result.merge(validate_goal_count(m));
    if knockout {
        result.merge(validate_knockout(m));
    }

    result
}

/// Validate a whole `worldcup.json`.
pub fn validate_worldcup(data: &WorldCupData) -> ValidationResult {
    let mut result = ValidationResult::new();

    if data.name.trim().is_empty() {
        result.add_error("Tournament name is empty");
    }

    let mut seen_nums = HashSet::new();
    let mut total_matches = 0;

    for round in &data.rounds {
        if round.matches.is_empty() {
            result.add_warning(format!("Round '{}' has no matches", round.name));
            continue;
        }

        let knockout = is_knockout_round(&round.name);
        for (idx, m) in round.matches.iter().enumerate() {
            total_matches += 1;

            if let Some(num) = m.num {
                if !seen_nums.insert(num) {
                    result.add_warning(format!("Duplicate match number {} in {}", num, round.name));
                }
            }

            let label = m.num.unwrap_or(idx as u32 + 1);
            let prefix = format!("Match {} in '{}': ", label, round.name);
            result.merge_prefixed(&prefix, validate_match(m, knockout));
        }
    }

    if total_matches == 0 {
        result.add_warning("No matches found in tournament");
    }

    result
}

/// Validate a `worldcup.groups.json`.
pub fn validate_groups(data: &WorldCupGroups) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();

    for group in &data.groups {
        if group.teams.is_empty() {
            result.add_warning(format!("Group '{}' has no teams", group.name));
            continue;
        }

        for TeamInfo { name, code } in &group.teams {
            if !seen.insert(code.as_str()) {
                result.add_warning(format!("Team {} ({}) appears in multiple groups", code, name));
            }
            if name.is_empty() {
                result.add_error(format!("Team in {} has no name", group.name));
            }
            if code.chars().count() != 3 {
                result.add_warning(format!("Team '{}' has invalid code: '{}'", name, code));
            }
        }
    }

    result
}
