//! End-of-match result and shareable report.

use serde::Serialize;

use crate::innings::{Innings, PlayerStats};

/// Number of top scorers listed per innings.
pub const TOP_SCORERS: usize = 3;

/// Outcome of a finished match, decided on the first two innings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchResult {
    Solo,
    FirstSideWins,
    SecondSideWins,
    Draw,
}

impl MatchResult {
    pub fn decide(innings: &[Innings]) -> Self {
        if innings.len() == 1 {
            return MatchResult::Solo;
        }
        let first = innings.first().map_or(0, |i| i.total_score);
        let second = innings.get(1).map_or(0, |i| i.total_score);
        match first.cmp(&second) {
            std::cmp::Ordering::Greater => MatchResult::FirstSideWins,
            std::cmp::Ordering::Less => MatchResult::SecondSideWins,
            std::cmp::Ordering::Equal => MatchResult::Draw,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            MatchResult::Solo => "Solo Run Completed!",
            MatchResult::FirstSideWins => "Team 1 Dominates!",
            MatchResult::SecondSideWins => "Team 2 Victory!",
            MatchResult::Draw => "Honours Even - A Draw!",
        }
    }
}

/// One innings line of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InningsLine {
    pub number: usize,
    pub score: u32,
    pub wickets: u32,
    pub overs: String,
    pub top_scorers: Vec<PlayerStats>,
}

/// Everything the summary screen and the share text need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub result: MatchResult,
    pub headline: String,
    pub innings: Vec<InningsLine>,
}

impl MatchSummary {
    pub fn from_innings(innings: &[Innings]) -> Self {
        let result = MatchResult::decide(innings);
        Self {
            result,
            headline: result.headline().to_string(),
            innings: innings
                .iter()
                .enumerate()
                .map(|(idx, inn)| InningsLine {
                    number: idx + 1,
                    score: inn.total_score,
                    wickets: inn.total_wickets,
                    overs: inn.overs_notation(),
                    top_scorers: inn.top_scorers(TOP_SCORERS).into_iter().cloned().collect(),
                })
                .collect(),
        }
    }

    /// Short text report for sharing. Missing innings read as 0.
    pub fn share_text(&self) -> String {
        let total = |idx: usize| self.innings.get(idx).map_or(0, |line| line.score);
        format!(
            "🏏 Backyard Bash Result: {}\nInnings 1: {}\nInnings 2: {}\nScored with Backyard Bash App!",
            self.headline,
            total(0),
            total(1)
        )
    }

    /// Highest-scoring innings.
    pub fn best_innings(&self) -> Option<&InningsLine> {
        self.innings.iter().max_by_key(|line| line.score)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
