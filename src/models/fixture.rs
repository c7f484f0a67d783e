//! Historical match record model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MatchId;

/// A national team, identified by its short code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub code: String,
}

impl Team {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// A goal scored in a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Scorer name
    pub player: String,

    /// Minute of the goal (1-based)
    pub minute: u32,

    /// Stoppage-time offset (the `X` in 90+X)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,

    #[serde(default)]
    pub owngoal: bool,

    #[serde(default)]
    pub penalty: bool,
}

impl Goal {
    pub fn new(player: impl Into<String>, minute: u32) -> Self {
        Self {
            player: player.into(),
            minute,
            offset: None,
            owngoal: false,
            penalty: false,
        }
    }
}

/// Outcome of a match from one team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl MatchResult {
    pub const ALL: [MatchResult; 3] = [MatchResult::Win, MatchResult::Draw, MatchResult::Loss];

    /// Result for the side that scored `goals_for` and conceded `goals_against`.
    pub fn from_goals(goals_for: u32, goals_against: u32) -> Self {
        match goals_for.cmp(&goals_against) {
            std::cmp::Ordering::Greater => MatchResult::Win,
            std::cmp::Ordering::Equal => MatchResult::Draw,
            std::cmp::Ordering::Less => MatchResult::Loss,
        }
    }

    /// League points: win 3, draw 1, loss 0.
    pub fn points(self) -> u32 {
        match self {
            MatchResult::Win => 3,
            MatchResult::Draw => 1,
            MatchResult::Loss => 0,
        }
    }

    pub fn is_unbeaten(self) -> bool {
        !matches!(self, MatchResult::Loss)
    }

    pub fn letter(self) -> &'static str {
        match self {
            MatchResult::Win => "W",
            MatchResult::Draw => "D",
            MatchResult::Loss => "L",
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.letter())
    }
}

/// Which side of a stored record a team occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// `team_a`, the first-listed (nominal home) side
    A,
    /// `team_b`
    B,
}

/// A historical match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Deterministic identifier (year + competition + number + team codes)
    pub id: MatchId,

    pub team_a: String,
    pub team_b: String,
    pub team_a_code: String,
    pub team_b_code: String,

    pub score_a: u32,
    pub score_b: u32,

    /// Goals of both sides, in source order
    #[serde(default)]
    pub goals: Vec<Goal>,

    /// Tournament year
    pub year: u16,

    /// Competition label, e.g. "World Cup"
    pub competition: String,

    /// Match number within the tournament
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Round label, e.g. "Matchday 1" or "Final"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Match {
    /// Create a new match with an auto-generated ID.
    pub fn new(
        team_a: Team,
        team_b: Team,
        score: (u32, u32),
        year: u16,
        competition: impl Into<String>,
    ) -> Self {
        let competition = competition.into();
        let id = MatchId::for_fixture(year, &competition, None, &team_a.code, &team_b.code);

        Self {
            id,
            team_a: team_a.name,
            team_b: team_b.name,
            team_a_code: team_a.code,
            team_b_code: team_b.code,
            score_a: score.0,
            score_b: score.1,
            goals: Vec::new(),
            year,
            competition,
            num: None,
            date: None,
            round: None,
            group: None,
        }
    }

    /// Set the match number and regenerate the ID with it.
    pub fn with_num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self.id = MatchId::for_fixture(
            self.year,
            &self.competition,
            self.num,
            &self.team_a_code,
            &self.team_b_code,
        );
        self
    }

    pub fn with_goals(mut self, goals: Vec<Goal>) -> Self {
        self.goals = goals;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_round(mut self, round: impl Into<String>) -> Self {
        self.round = Some(round.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn involves(&self, code: &str) -> bool {
        self.team_a_code == code || self.team_b_code == code
    }

    /// True when the unordered pair of codes equals `{a, b}`.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.team_a_code == a && self.team_b_code == b)
            || (self.team_a_code == b && self.team_b_code == a)
    }

    pub fn side_of(&self, code: &str) -> Option<Side> {
        if self.team_a_code == code {
            Some(Side::A)
        } else if self.team_b_code == code {
            Some(Side::B)
        } else {
            None
        }
    }

    /// (goals for, goals against) from `code`'s perspective.
    pub fn goals_for_against(&self, code: &str) -> Option<(u32, u32)> {
        match self.side_of(code)? {
            Side::A => Some((self.score_a, self.score_b)),
            Side::B => Some((self.score_b, self.score_a)),
        }
    }

    pub fn result_for(&self, code: &str) -> Option<MatchResult> {
        self.goals_for_against(code)
            .map(|(gf, ga)| MatchResult::from_goals(gf, ga))
    }

    /// Opponent (name, code) for `code`.
    pub fn opponent_of(&self, code: &str) -> Option<(&str, &str)> {
        match self.side_of(code)? {
            Side::A => Some((self.team_b.as_str(), self.team_b_code.as_str())),
            Side::B => Some((self.team_a.as_str(), self.team_a_code.as_str())),
        }
    }

    /// (winner code, loser code), or None for a draw.
    pub fn winner_loser(&self) -> Option<(&str, &str)> {
        match self.score_a.cmp(&self.score_b) {
            std::cmp::Ordering::Greater => {
                Some((self.team_a_code.as_str(), self.team_b_code.as_str()))
            }
            std::cmp::Ordering::Less => {
                Some((self.team_b_code.as_str(), self.team_a_code.as_str()))
            }
            std::cmp::Ordering::Equal => None,
        }
    }
}
