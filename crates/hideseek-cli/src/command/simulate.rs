use std::path::PathBuf;

use chrono::{DateTime, Utc};
use hideseek_engine::{Grid, PayoffRule, RoundRecord, WorldSeed};
use hideseek_match::{Controller, MatchConfig, MatchSummary, RoundEngine};
use serde::Serialize;

use crate::{command::match_arg::MatchArg, util::Output};

const PROGRESS_INTERVAL: usize = 1000;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    game: MatchArg,
    /// Number of rounds to play
    #[arg(long, default_value_t = 100)]
    rounds: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    generated_at: DateTime<Utc>,
    grid: Grid,
    #[serde(skip_serializing_if = "Option::is_none")]
    world_seed: Option<WorldSeed>,
    payoff_rule: PayoffRule,
    summary: MatchSummary,
    history: Vec<RoundRecord>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let mut config = arg.game.load(MatchConfig::computer_vs_computer())?;
    for participant in &mut config.participants {
        participant.controller = Controller::Automated;
    }
    let payoff_rule = config.payoff_rule;
    let mut engine = RoundEngine::start(config)?;

    eprintln!("Simulating {} rounds...", arg.rounds);
    for _ in 0..arg.rounds {
        engine.open_round(None)?;
        let record = engine.settle_round(None)?;
        if record.round() % PROGRESS_INTERVAL == 0 {
            eprintln!("  {} rounds played", record.round());
        }
    }

    let summary = engine.summary();
    eprintln!(
        "Simulation finished: {} caught, {} escaped",
        summary.caught, summary.escaped
    );
    for participant in &summary.participants {
        eprintln!(
            "  {} ({}): {:+.2}",
            participant.name, participant.role, participant.score
        );
    }

    let state = engine.state();
    let report = SimulationReport {
        generated_at: Utc::now(),
        grid: state.grid().clone(),
        world_seed: state.world_seed(),
        payoff_rule,
        summary,
        history: state.history().to_vec(),
    };
    Output::save_json(&report, arg.output.clone())?;
    Ok(())
}
