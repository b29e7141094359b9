pub mod config;
pub mod engine;
pub mod error;
pub mod innings;
pub mod rules;
pub mod settings;
pub mod summary;
pub mod toss;

pub use config::MatchConfig;
pub use engine::{
    ActionResult, BallResult, MatchEngine, MatchState, ScoringAction, TransitionResult,
};
pub use error::{ConfigError, ParseActionError, SetupError};
pub use innings::{BallRecord, ExtraKind, Innings, PlayerStats};
pub use rules::SpecialRule;
pub use settings::{MatchFormat, MatchSettings};
pub use summary::{MatchResult, MatchSummary};

/// A count of how each scripted action landed.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ActionTally {
    pub deliveries: u32,
    pub ignored: u32,
    pub innings_breaks: u32,
    pub confirmations: u32,
}

impl ActionTally {
    pub fn record(&mut self, result: &ActionResult) {
        match result {
            ActionResult::Ball(BallResult::Ignored)
            | ActionResult::Transition(TransitionResult::Ignored) => self.ignored += 1,
            ActionResult::Ball(BallResult::Continued) => self.deliveries += 1,
            ActionResult::Ball(BallResult::InningsOver | BallResult::MatchOver) => {
                self.deliveries += 1;
                self.innings_breaks += 1;
            }
            ActionResult::Transition(_) => self.confirmations += 1,
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "deliveries: {}, ignored: {}, innings breaks: {}, confirmations: {}",
            self.deliveries, self.ignored, self.innings_breaks, self.confirmations
        )
    }
}

/// Outcome of feeding a scoring script into an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptReport {
    pub tally: ActionTally,
    /// Set once the match reached completion.
    pub summary: Option<MatchSummary>,
}

/// Apply every action in order. With `auto_confirm`, innings breaks are
/// confirmed as soon as they happen instead of waiting for a `next` action.
///
/// `observe` sees the engine after every result, including automatic
/// confirmations.
pub fn play_script<F>(
    engine: &mut MatchEngine,
    actions: &[ScoringAction],
    auto_confirm: bool,
    mut observe: F,
) -> ScriptReport
where
    F: FnMut(&MatchEngine, ActionResult),
{
    let mut tally = ActionTally::default();

    for action in actions {
        let result = engine.apply(action);
        tally.record(&result);
        observe(engine, result);

        if auto_confirm && result == ActionResult::Ball(BallResult::InningsOver) {
            let confirmed = ActionResult::Transition(engine.confirm_transition());
            tally.record(&confirmed);
            observe(engine, confirmed);
        }
    }

    ScriptReport {
        tally,
        summary: engine.completed_innings().map(MatchSummary::from_innings),
    }
}

/// Parse a whitespace- or comma-separated scoring script. `#` starts a comment.
pub fn parse_script(script: &str) -> Result<Vec<ScoringAction>, ParseActionError> {
    script
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(|line| line.split(|c: char| c.is_whitespace() || c == ','))
        .filter(|token| !token.is_empty())
        .map(str::parse::<ScoringAction>)
        .collect()
}
