//! Match formats, limits and the pre-match player checks.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::rules::{default_special_rules, SpecialRule};

/// Balls in an over.
pub const BALLS_PER_OVER: u32 = 6;

/// How a match is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchFormat {
    Overs,
    T20,
    Unlimited,
    #[serde(rename = "1v1")]
    OneVsOne,
}

impl MatchFormat {
    pub const ALL: [MatchFormat; 4] = [
        MatchFormat::Overs,
        MatchFormat::T20,
        MatchFormat::Unlimited,
        MatchFormat::OneVsOne,
    ];

    /// Whether innings close on the over count.
    pub fn is_over_limited(self) -> bool {
        !matches!(self, MatchFormat::Unlimited)
    }

    /// Team formats rotate the batting order on every dismissal.
    pub fn is_team(self) -> bool {
        !matches!(self, MatchFormat::OneVsOne)
    }

    /// Parse the names used on the command line and in config files.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overs" => Some(MatchFormat::Overs),
            "t20" => Some(MatchFormat::T20),
            "unlimited" => Some(MatchFormat::Unlimited),
            "1v1" | "onevsone" | "one_vs_one" => Some(MatchFormat::OneVsOne),
            _ => None,
        }
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchFormat::Overs => write!(f, "Overs"),
            MatchFormat::T20 => write!(f, "T20"),
            MatchFormat::Unlimited => write!(f, "Unlimited"),
            MatchFormat::OneVsOne => write!(f, "1v1"),
        }
    }
}

/// Settings fixed for the lifetime of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSettings {
    pub format: MatchFormat,
    pub overs_per_innings: u32,
    /// In 1v1 this is the life budget for the whole innings.
    pub wickets_per_innings: u32,
    /// Innings per side times the number of sides.
    pub number_of_innings: usize,
    pub special_rules: Vec<SpecialRule>,
}

impl MatchSettings {
    /// Build settings where every player is one side.
    pub fn for_players(
        format: MatchFormat,
        overs_per_innings: u32,
        wickets_per_innings: u32,
        innings_per_side: usize,
        player_count: usize,
        special_rules: Vec<SpecialRule>,
    ) -> Self {
        Self {
            format,
            overs_per_innings,
            wickets_per_innings,
            number_of_innings: innings_per_side * player_count,
            special_rules,
        }
    }

    /// Legal balls after which an innings closes, if the format has a cap.
    pub fn ball_limit(&self) -> Option<u32> {
        self.format
            .is_over_limited()
            .then(|| self.overs_per_innings.saturating_mul(BALLS_PER_OVER))
    }

    /// Overs shown on the scoreboard, `None` when the innings is uncapped.
    pub fn over_limit(&self) -> Option<u32> {
        self.ball_limit().map(|balls| balls / BALLS_PER_OVER)
    }

    /// Look up a rule by id.
    pub fn rule(&self, id: &str) -> Option<&SpecialRule> {
        self.special_rules.iter().find(|r| r.id == id)
    }

    /// Flip a rule on or off. Returns the new state, or `None` for an unknown id.
    pub fn toggle_rule(&mut self, id: &str) -> Option<bool> {
        let rule = self.special_rules.iter_mut().find(|r| r.id == id)?;
        rule.enabled = !rule.enabled;
        Some(rule.enabled)
    }

    /// Enabled rules that carry a one-tap runs/wickets award.
    pub fn custom_awards(&self) -> impl Iterator<Item = &SpecialRule> {
        self.special_rules
            .iter()
            .filter(|r| r.enabled && r.is_custom_award())
    }

    /// Check the limits and the player list against this format.
    pub fn validate_players(&self, players: &[String]) -> Result<(), SetupError> {
        if self.format.is_over_limited() {
            if self.overs_per_innings == 0 {
                return Err(SetupError::ZeroLimit {
                    field: "overs per innings",
                });
            }
            if self.overs_per_innings.checked_mul(BALLS_PER_OVER).is_none() {
                return Err(SetupError::LimitTooLarge {
                    field: "overs per innings",
                    value: self.overs_per_innings,
                });
            }
        }
        if self.wickets_per_innings == 0 {
            return Err(SetupError::ZeroLimit {
                field: "wickets per innings",
            });
        }
        if self.number_of_innings == 0 {
            return Err(SetupError::ZeroLimit {
                field: "number of innings",
            });
        }
        if players.len() < 2 {
            return Err(SetupError::NotEnoughPlayers {
                found: players.len(),
            });
        }
        if self.format == MatchFormat::OneVsOne && players.len() != 2 {
            return Err(SetupError::WrongPlayerCount {
                format: self.format,
                found: players.len(),
            });
        }

        let mut seen = HashSet::new();
        for (position, name) in players.iter().enumerate() {
            let name = name.trim();
            if name.is_empty() {
                return Err(SetupError::EmptyPlayerName { position });
            }
            if !seen.insert(name) {
                return Err(SetupError::DuplicatePlayer {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self::for_players(MatchFormat::Overs, 5, 10, 1, 2, default_special_rules())
    }
}

/// Player names used when nobody has been entered yet.
pub fn default_players() -> Vec<String> {
    vec!["Player 1".to_string(), "Player 2".to_string()]
}
