use std::path::PathBuf;

use hideseek_engine::{Grid, WorldSeed};
use serde::Serialize;

use crate::{command::match_arg::WorldArg, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct WorldCommandArg {
    #[clap(flatten)]
    world: WorldArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct WorldReport {
    rows: usize,
    cols: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<WorldSeed>,
    grid: Grid,
}

pub(crate) fn run(arg: &WorldCommandArg) -> anyhow::Result<()> {
    let source = arg.world.source().unwrap_or_default();
    let world = source.build()?;
    let report = WorldReport {
        rows: world.grid.rows(),
        cols: world.grid.cols(),
        seed: world.seed,
        grid: world.grid,
    };
    Output::save_json(&report, arg.output.clone())?;
    Ok(())
}
