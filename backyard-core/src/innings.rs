//! Per-innings scorecards and the innings initializer.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::settings::{MatchFormat, MatchSettings, BALLS_PER_OVER};

/// Kind of extra delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtraKind {
    Wide,
    #[serde(rename = "No Ball")]
    NoBall,
}

impl fmt::Display for ExtraKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtraKind::Wide => write!(f, "Wide"),
            ExtraKind::NoBall => write!(f, "No Ball"),
        }
    }
}

/// One batter's line on the scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub out: bool,
    pub out_method: Option<String>,
}

impl PlayerStats {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            runs: 0,
            balls: 0,
            fours: 0,
            sixes: 0,
            out: false,
            out_method: None,
        }
    }

    /// Runs per hundred balls faced.
    pub fn strike_rate(&self) -> f64 {
        if self.balls == 0 {
            0.0
        } else {
            f64::from(self.runs) * 100.0 / f64::from(self.balls)
        }
    }
}

/// A single delivery as it was scored. Never modified after it is logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallRecord {
    pub batter_name: String,
    pub runs: u32,
    pub is_wicket: bool,
    pub extra: Option<ExtraKind>,
    /// Out label, when this delivery sent the striker off.
    pub wicket_label: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl BallRecord {
    pub fn is_extra(&self) -> bool {
        self.extra.is_some()
    }

    /// Runs this delivery added to the innings total.
    pub fn total_runs(&self) -> u32 {
        self.runs.saturating_add(u32::from(self.is_extra()))
    }

    /// Short symbol for a ball-by-ball strip.
    pub fn symbol(&self) -> String {
        if self.is_wicket {
            return "W".to_string();
        }
        match self.extra {
            Some(ExtraKind::Wide) => "Wd".to_string(),
            Some(ExtraKind::NoBall) => "Nb".to_string(),
            None => self.runs.to_string(),
        }
    }
}

/// One side's turn at batting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Innings {
    /// Batting order; the index is the slot.
    pub batters: Vec<PlayerStats>,
    pub balls: Vec<BallRecord>,
    pub total_score: u32,
    pub total_wickets: u32,
    /// Legal deliveries only.
    pub total_balls: u32,
}

impl Innings {
    pub fn new(players: &[String]) -> Self {
        Self {
            batters: players.iter().map(|name| PlayerStats::new(name)).collect(),
            balls: Vec::new(),
            total_score: 0,
            total_wickets: 0,
            total_balls: 0,
        }
    }

    /// Completed overs plus balls as tenths: 14 balls is `2.2`.
    pub fn total_overs(&self) -> f64 {
        f64::from(self.total_balls / BALLS_PER_OVER)
            + f64::from(self.total_balls % BALLS_PER_OVER) / 10.0
    }

    /// The over-dot value as text, without float formatting noise.
    pub fn overs_notation(&self) -> String {
        format!(
            "{}.{}",
            self.total_balls / BALLS_PER_OVER,
            self.total_balls % BALLS_PER_OVER
        )
    }

    /// The last `n` deliveries, newest first.
    pub fn recent_balls(&self, n: usize) -> impl Iterator<Item = &BallRecord> {
        self.balls.iter().rev().take(n)
    }

    /// Highest scorers, ties kept in batting order.
    pub fn top_scorers(&self, n: usize) -> Vec<&PlayerStats> {
        let mut sorted: Vec<&PlayerStats> = self.batters.iter().collect();
        sorted.sort_by(|a, b| b.runs.cmp(&a.runs));
        sorted.truncate(n);
        sorted
    }
}

/// Allocate every innings of the match with zeroed scorecards.
pub fn initialize_innings(
    settings: &MatchSettings,
    players: &[String],
) -> Result<Vec<Innings>, SetupError> {
    if players.is_empty() {
        return Err(SetupError::NotEnoughPlayers { found: 0 });
    }
    Ok((0..settings.number_of_innings)
        .map(|_| Innings::new(players))
        .collect())
}

/// Slot of the opening batter for an innings.
///
/// 1v1 innings alternate between the two players; team innings always open
/// with the first slot.
pub fn opening_striker(format: MatchFormat, innings_index: usize, player_count: usize) -> usize {
    match format {
        MatchFormat::OneVsOne if player_count > 0 => innings_index % player_count,
        _ => 0,
    }
}
