//! The match state machine: scores deliveries and moves between innings.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ParseActionError, SetupError};
use crate::innings::{
    initialize_innings, opening_striker, BallRecord, ExtraKind, Innings, PlayerStats,
};
use crate::rules::{triggered_effects, SpecialRule};
use crate::settings::{MatchFormat, MatchSettings};

/// Number of deliveries shown in the scoreboard strip.
pub const RECENT_BALLS: usize = 10;

/// Where the match is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchState {
    /// Deliveries are accepted against the current innings.
    Live,
    /// The current innings has ended; its final state waits for confirmation.
    PendingTransition { completed: Innings },
    /// Every innings is done.
    Complete,
}

/// What happened to a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallResult {
    /// Dropped: no live innings, the striker is out, or a transition is pending.
    Ignored,
    Continued,
    /// The innings ended and awaits `confirm_transition`.
    InningsOver,
    /// The final innings ended; the match is complete.
    MatchOver,
}

/// What happened to a transition confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    Ignored,
    /// Play moved on to this innings index.
    NextInnings(usize),
    MatchComplete,
}

/// One line of a scoring script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringAction {
    Runs(u32),
    Wicket,
    /// Wide or no ball; one run to the total and nothing to the batter.
    Extra(ExtraKind),
    /// Score an enabled custom-award rule by id.
    Rule(String),
    /// Confirm the pending innings change.
    Confirm,
}

impl FromStr for ScoringAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let lower = token.to_ascii_lowercase();
        let err = || ParseActionError(token.to_string());

        if let Some(id) = token.strip_prefix("rule:") {
            let id = id.trim();
            return if id.is_empty() {
                Err(err())
            } else {
                Ok(ScoringAction::Rule(id.to_string()))
            };
        }

        let action = match lower.as_str() {
            "w" | "out" | "wicket" => ScoringAction::Wicket,
            "wd" | "wide" => ScoringAction::Extra(ExtraKind::Wide),
            "nb" | "noball" | "no-ball" => ScoringAction::Extra(ExtraKind::NoBall),
            "next" | "swap" => ScoringAction::Confirm,
            digits => match digits.parse::<u32>() {
                Ok(runs) if runs <= 6 => ScoringAction::Runs(runs),
                _ => return Err(err()),
            },
        };
        Ok(action)
    }
}

/// Result of applying a scripted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Ball(BallResult),
    Transition(TransitionResult),
}

/// Read-only view of the match for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scoreboard {
    pub format: MatchFormat,
    /// 1-based.
    pub innings_number: usize,
    pub total_innings: usize,
    pub score: u32,
    pub wickets: u32,
    pub wicket_budget: u32,
    pub overs: String,
    pub over_limit: Option<u32>,
    pub striker: Option<PlayerStats>,
    pub next_up: Option<String>,
    pub awaiting_confirmation: bool,
    pub recent: Vec<String>,
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let limit = self
            .over_limit
            .map_or_else(|| "-".to_string(), |o| o.to_string());
        write!(
            f,
            "Innings {} of {}: {}/{} ({} / {} overs)",
            self.innings_number, self.total_innings, self.score, self.wickets, self.overs, limit
        )?;
        if let Some(striker) = &self.striker {
            write!(f, " | {} {} ({})", striker.name, striker.runs, striker.balls)?;
        }
        if !self.recent.is_empty() {
            write!(f, " | last: {}", self.recent.join(" "))?;
        }
        Ok(())
    }
}

/// Scores one match from the first ball to the final innings.
///
/// Only the innings under the cursor changes. A delivery that ends an
/// innings is held in [`MatchState::PendingTransition`] until the operator
/// confirms it, except for the last innings which completes the match at once.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    settings: MatchSettings,
    players: Vec<String>,
    innings: Vec<Innings>,
    current: usize,
    striker: usize,
    state: MatchState,
}

impl MatchEngine {
    /// Validate the setup and allocate every innings.
    pub fn new(settings: MatchSettings, players: Vec<String>) -> Result<Self, SetupError> {
        settings.validate_players(&players)?;
        let players: Vec<String> = players.iter().map(|p| p.trim().to_string()).collect();
        let innings = initialize_innings(&settings, &players)?;
        let striker = opening_striker(settings.format, 0, players.len());

        info!(
            format = %settings.format,
            players = players.len(),
            innings = innings.len(),
            "match started"
        );

        Ok(Self {
            settings,
            players,
            innings,
            current: 0,
            striker,
            state: MatchState::Live,
        })
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn striker_index(&self) -> usize {
        self.striker
    }

    /// Committed innings, including ones not yet started.
    pub fn innings(&self) -> &[Innings] {
        &self.innings
    }

    /// The innings under the cursor as last committed.
    pub fn current_innings(&self) -> Option<&Innings> {
        self.innings.get(self.current)
    }

    /// Final state of an innings waiting on confirmation.
    pub fn pending_innings(&self) -> Option<&Innings> {
        match &self.state {
            MatchState::PendingTransition { completed } => Some(completed),
            _ => None,
        }
    }

    /// The full innings list, once the match is complete.
    pub fn completed_innings(&self) -> Option<&[Innings]> {
        matches!(self.state, MatchState::Complete).then_some(self.innings.as_slice())
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, MatchState::Complete)
    }

    /// Score one delivery against the striker.
    pub fn record_delivery(
        &mut self,
        runs_off_bat: u32,
        is_wicket: bool,
        extra: Option<ExtraKind>,
        wickets_awarded: u32,
    ) -> BallResult {
        if !matches!(self.state, MatchState::Live) {
            debug!(state = ?self.state, "delivery ignored: match not live");
            return BallResult::Ignored;
        }
        let Some(live) = self.innings.get(self.current) else {
            return BallResult::Ignored;
        };
        match live.batters.get(self.striker) {
            Some(striker) if !striker.out => {}
            _ => {
                debug!(striker = self.striker, "delivery ignored: striker unavailable");
                return BallResult::Ignored;
            }
        }

        let format = self.settings.format;
        let effects = triggered_effects(&self.settings.special_rules, runs_off_bat);
        let mut inn = live.clone();

        inn.total_score = inn
            .total_score
            .saturating_add(runs_off_bat)
            .saturating_add(u32::from(extra.is_some()));
        if extra.is_none() {
            inn.total_balls += 1;
        }

        let dismissal = is_wicket || wickets_awarded > 0 || effects.dismissal;
        if dismissal {
            let consumed = if wickets_awarded > 0 { wickets_awarded } else { 1 };
            inn.total_wickets = inn
                .total_wickets
                .saturating_add(consumed)
                .saturating_add(effects.extra_wickets);
        }
        let sends_off = dismissal
            && match format {
                MatchFormat::OneVsOne => inn.total_wickets >= self.settings.wickets_per_innings,
                _ => true,
            };

        let batter = &mut inn.batters[self.striker];
        let batter_name = batter.name.clone();
        batter.runs = batter.runs.saturating_add(runs_off_bat);
        // A no ball still counts as faced by the batter.
        if extra != Some(ExtraKind::Wide) {
            batter.balls += 1;
        }
        match runs_off_bat {
            4 => batter.fours += 1,
            6 => batter.sixes += 1,
            _ => {}
        }
        let wicket_label = sends_off.then(|| {
            let label = effects
                .out_label
                .clone()
                .unwrap_or_else(|| default_out_label(format).to_string());
            batter.out = true;
            batter.out_method = Some(label.clone());
            label
        });

        inn.balls.push(BallRecord {
            batter_name,
            runs: runs_off_bat,
            is_wicket: dismissal,
            extra,
            wicket_label,
            timestamp: Utc::now(),
        });

        debug!(
            runs = runs_off_bat,
            ?extra,
            dismissal,
            score = inn.total_score,
            wickets = inn.total_wickets,
            balls = inn.total_balls,
            "delivery recorded"
        );

        let wickets_done = inn.total_wickets >= self.settings.wickets_per_innings;
        let balls_done = self
            .settings
            .ball_limit()
            .is_some_and(|limit| inn.total_balls >= limit);

        if !(wickets_done || balls_done) {
            if sends_off && format.is_team() {
                // The roster is cycled, so a dismissed slot can come back in.
                let next = (self.striker + 1) % inn.batters.len();
                inn.batters[next].out = false;
                self.striker = next;
            }
            self.innings[self.current] = inn;
            return BallResult::Continued;
        }

        info!(
            innings = self.current + 1,
            score = inn.total_score,
            wickets = inn.total_wickets,
            overs = %inn.overs_notation(),
            "innings over"
        );

        if self.current + 1 >= self.innings.len() {
            self.innings[self.current] = inn;
            self.state = MatchState::Complete;
            info!("match complete");
            BallResult::MatchOver
        } else {
            self.state = MatchState::PendingTransition { completed: inn };
            BallResult::InningsOver
        }
    }

    /// Score an enabled custom-award rule as a single delivery.
    pub fn run_custom_rule(&mut self, rule_id: &str) -> BallResult {
        let award = self
            .settings
            .rule(rule_id)
            .filter(|rule| rule.enabled)
            .and_then(|rule| rule.award());
        match award {
            Some((runs, wickets)) => self.record_delivery(runs, wickets > 0, None, wickets),
            None => {
                debug!(rule_id, "custom rule ignored");
                BallResult::Ignored
            }
        }
    }

    /// Enabled custom-award rules, in the order they were defined.
    pub fn custom_actions(&self) -> Vec<&SpecialRule> {
        self.settings.custom_awards().collect()
    }

    /// Commit the finished innings and move on.
    pub fn confirm_transition(&mut self) -> TransitionResult {
        let completed = match std::mem::replace(&mut self.state, MatchState::Live) {
            MatchState::PendingTransition { completed } => completed,
            other => {
                self.state = other;
                return TransitionResult::Ignored;
            }
        };

        self.innings[self.current] = completed;
        let next = self.current + 1;
        if next < self.innings.len() {
            self.current = next;
            self.striker = opening_striker(self.settings.format, next, self.players.len());
            info!(innings = next + 1, "next innings");
            TransitionResult::NextInnings(next)
        } else {
            self.state = MatchState::Complete;
            info!("match complete");
            TransitionResult::MatchComplete
        }
    }

    /// Apply one scripted action.
    pub fn apply(&mut self, action: &ScoringAction) -> ActionResult {
        match action {
            ScoringAction::Runs(runs) => {
                ActionResult::Ball(self.record_delivery(*runs, false, None, 0))
            }
            ScoringAction::Wicket => ActionResult::Ball(self.record_delivery(0, true, None, 0)),
            ScoringAction::Extra(kind) => {
                ActionResult::Ball(self.record_delivery(0, false, Some(*kind), 0))
            }
            ScoringAction::Rule(id) => ActionResult::Ball(self.run_custom_rule(id)),
            ScoringAction::Confirm => ActionResult::Transition(self.confirm_transition()),
        }
    }

    /// Throw away all progress and start again from the first ball.
    pub fn reset(&mut self) -> Result<(), SetupError> {
        self.innings = initialize_innings(&self.settings, &self.players)?;
        self.current = 0;
        self.striker = opening_striker(self.settings.format, 0, self.players.len());
        self.state = MatchState::Live;
        info!("match reset");
        Ok(())
    }

    /// Label for whoever bats after the current innings.
    pub fn next_up(&self) -> Option<String> {
        let next = self.current + 1;
        if next >= self.innings.len() {
            return None;
        }
        Some(match self.settings.format {
            MatchFormat::OneVsOne => self.players[next % self.players.len()].clone(),
            _ => format!("Innings {}", next + 1),
        })
    }

    pub fn scoreboard(&self) -> Scoreboard {
        let shown = self.pending_innings().or_else(|| self.current_innings());
        let (score, wickets, overs, recent) = shown.map_or_else(
            || (0, 0, "0.0".to_string(), Vec::new()),
            |inn| {
                (
                    inn.total_score,
                    inn.total_wickets,
                    inn.overs_notation(),
                    inn.recent_balls(RECENT_BALLS).map(BallRecord::symbol).collect(),
                )
            },
        );

        Scoreboard {
            format: self.settings.format,
            innings_number: self.current + 1,
            total_innings: self.innings.len(),
            score,
            wickets,
            wicket_budget: self.settings.wickets_per_innings,
            overs,
            over_limit: self.settings.over_limit(),
            striker: shown.and_then(|inn| inn.batters.get(self.striker).cloned()),
            next_up: self.next_up(),
            awaiting_confirmation: self.pending_innings().is_some(),
            recent,
        }
    }
}

fn default_out_label(format: MatchFormat) -> &'static str {
    match format {
        MatchFormat::OneVsOne => "All Lives Lost",
        _ => "Out!",
    }
}
