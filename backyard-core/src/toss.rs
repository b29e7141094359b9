//! Pre-game coin toss deciding the batting order.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinFace {
    Heads,
    Tails,
}

impl CoinFace {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heads" | "h" => Some(CoinFace::Heads),
            "tails" | "t" => Some(CoinFace::Tails),
            _ => None,
        }
    }
}

impl fmt::Display for CoinFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinFace::Heads => write!(f, "Heads"),
            CoinFace::Tails => write!(f, "Tails"),
        }
    }
}

/// What the toss winner elects to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TossDecision {
    Bat,
    Bowl,
}

/// Result of a called toss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TossOutcome {
    pub call: CoinFace,
    pub result: CoinFace,
    pub winner: String,
}

/// Fair coin flip.
pub fn flip<R: Rng + ?Sized>(rng: &mut R) -> CoinFace {
    if rng.gen_bool(0.5) {
        CoinFace::Heads
    } else {
        CoinFace::Tails
    }
}

/// The first player calls; a correct call wins the toss, otherwise the second
/// player does. Returns `None` with fewer than two players.
pub fn call_toss<R: Rng + ?Sized>(
    players: &[String],
    call: CoinFace,
    rng: &mut R,
) -> Option<TossOutcome> {
    let (caller, other) = match players {
        [caller, other, ..] => (caller, other),
        _ => return None,
    };
    let result = flip(rng);
    let winner = if result == call { caller } else { other };
    Some(TossOutcome {
        call,
        result,
        winner: winner.clone(),
    })
}

/// Batting order after the toss. `Bat` sends the winner in first, `Bowl`
/// puts them second; everyone else keeps their place behind.
pub fn batting_order(players: &[String], winner: &str, decision: TossDecision) -> Vec<String> {
    let Some(winner_pos) = players.iter().position(|p| p == winner) else {
        return players.to_vec();
    };
    let other_pos = if winner_pos == 0 { 1 } else { 0 };
    if other_pos >= players.len() {
        return players.to_vec();
    }

    let (first, second) = match decision {
        TossDecision::Bat => (winner_pos, other_pos),
        TossDecision::Bowl => (other_pos, winner_pos),
    };
    let mut order = vec![players[first].clone(), players[second].clone()];
    order.extend(
        players
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != first && *idx != second)
            .map(|(_, p)| p.clone()),
    );
    order
}
