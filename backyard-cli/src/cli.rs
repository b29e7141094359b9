//! Command-line argument parsing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use backyard_core::toss::{CoinFace, TossDecision};
use backyard_core::{MatchConfig, MatchFormat};
use clap::{Parser, ValueEnum};

/// Backyard cricket scorer.
#[derive(Parser, Debug, Clone)]
#[command(name = "backyard")]
#[command(about = "Score a backyard cricket match from a ball-by-ball script")]
#[command(version)]
pub struct Cli {
    /// Match config file (JSON). Flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Match format: overs, t20, unlimited or 1v1.
    #[arg(long, value_parser = parse_format)]
    pub format: Option<MatchFormat>,

    /// Overs per innings.
    #[arg(long)]
    pub overs: Option<u32>,

    /// Wickets per innings (lives in 1v1).
    #[arg(long)]
    pub wickets: Option<u32>,

    /// Innings each side bats.
    #[arg(long)]
    pub innings_per_side: Option<usize>,

    /// Comma-separated player names, in calling order for the toss.
    #[arg(long, value_delimiter = ',')]
    pub players: Option<Vec<String>>,

    /// Turn off a rule by id (repeatable).
    #[arg(long = "disable-rule")]
    pub disable_rules: Vec<String>,

    /// Turn on a rule by id (repeatable).
    #[arg(long = "enable-rule")]
    pub enable_rules: Vec<String>,

    /// Run the coin toss with the first player calling this face.
    #[arg(long, value_parser = parse_face)]
    pub toss: Option<CoinFace>,

    /// What the toss winner elects to do.
    #[arg(long, value_enum, default_value_t = Elect::Bat)]
    pub elect: Elect,

    /// Seed for a reproducible toss.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Scoring script; reads stdin when omitted.
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Confirm innings breaks without a `next` line.
    #[arg(long)]
    pub auto_confirm: bool,

    /// Print the final report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elect {
    Bat,
    Bowl,
}

impl From<Elect> for TossDecision {
    fn from(elect: Elect) -> Self {
        match elect {
            Elect::Bat => TossDecision::Bat,
            Elect::Bowl => TossDecision::Bowl,
        }
    }
}

fn parse_format(s: &str) -> Result<MatchFormat, String> {
    MatchFormat::parse(s).ok_or_else(|| {
        let known: Vec<String> = MatchFormat::ALL.iter().map(ToString::to_string).collect();
        format!("unknown format {:?}, expected one of {}", s, known.join(", "))
    })
}

fn parse_face(s: &str) -> Result<CoinFace, String> {
    CoinFace::parse(s).ok_or_else(|| format!("expected heads or tails, got {:?}", s))
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Load the config file, if any, and apply flag overrides.
    pub fn match_config(&self) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => MatchConfig::default(),
        };

        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(overs) = self.overs {
            config.overs_per_innings = overs;
        }
        if let Some(wickets) = self.wickets {
            config.wickets_per_innings = wickets;
        }
        if let Some(innings) = self.innings_per_side {
            config.innings_per_side = innings;
        }
        if let Some(players) = &self.players {
            config.players = players.clone();
        }
        config.enabled_rules.extend(self.enable_rules.iter().cloned());
        config.disabled_rules.extend(self.disable_rules.iter().cloned());
        Ok(config)
    }
}
