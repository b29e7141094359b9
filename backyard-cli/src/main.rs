mod cli;

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use backyard_core::engine::Scoreboard;
use backyard_core::toss::{batting_order, call_toss};
use backyard_core::{
    parse_script, play_script, ActionResult, BallResult, MatchEngine, MatchSummary,
    TransitionResult,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[derive(Serialize)]
struct Report<'a> {
    complete: bool,
    scoreboard: Scoreboard,
    summary: Option<&'a MatchSummary>,
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let (settings, mut players) = cli
        .match_config()?
        .into_setup()
        .context("invalid match setup")?;

    if let Some(call) = cli.toss {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        if let Some(outcome) = call_toss(&players, call, &mut rng) {
            println!(
                "{} calls {}: it's {}. {} wins the toss and elects to {:?}.",
                players[0], outcome.call, outcome.result, outcome.winner, cli.elect
            );
            players = batting_order(&players, &outcome.winner, cli.elect.into());
        }
    }

    let script = match &cli.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read script from stdin")?;
            buf
        }
    };
    let actions = parse_script(&script).context("invalid scoring script")?;

    let mut engine = MatchEngine::new(settings, players)?;
    info!(actions = actions.len(), "scoring script loaded");

    let custom: Vec<String> = engine
        .custom_actions()
        .iter()
        .map(|rule| format!("rule:{} ({})", rule.id, rule.name))
        .collect();
    if !custom.is_empty() && !cli.json {
        println!("Custom actions: {}", custom.join(", "));
    }

    let report = play_script(&mut engine, &actions, cli.auto_confirm, |engine, result| {
        if cli.json {
            return;
        }
        match result {
            ActionResult::Ball(BallResult::InningsOver) => {
                println!("INNINGS OVER! {}", engine.scoreboard());
                if let Some(next) = engine.next_up() {
                    println!("Coming up next: {}", next);
                }
            }
            ActionResult::Transition(TransitionResult::NextInnings(idx)) => {
                println!("Innings {} under way.", idx + 1);
            }
            _ => {}
        }
    });
    info!(tally = %report.tally.describe(), "script finished");

    let summary = report.summary;

    if cli.json {
        let report = Report {
            complete: engine.is_complete(),
            scoreboard: engine.scoreboard(),
            summary: summary.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &summary {
        Some(summary) => {
            for line in &summary.innings {
                let top: Vec<String> = line
                    .top_scorers
                    .iter()
                    .map(|p| {
                        format!("{} {} ({}, SR {:.1})", p.name, p.runs, p.balls, p.strike_rate())
                    })
                    .collect();
                println!(
                    "Innings {}: {}/{} ({} overs)  {}",
                    line.number,
                    line.score,
                    line.wickets,
                    line.overs,
                    top.join(", ")
                );
            }
            if let Some(best) = summary.best_innings() {
                println!("Best innings: {} with {}", best.number, best.score);
            }
            println!();
            println!("{}", summary.share_text());
        }
        None => {
            println!("Match in progress. {}", engine.scoreboard());
        }
    }

    Ok(())
}
