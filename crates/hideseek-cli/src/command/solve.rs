use std::path::PathBuf;

use hideseek_engine::{Grid, MoveScheduler, PayoffMatrix, PayoffRule, Position, Role, Strategy};
use hideseek_match::MatchConfig;
use hideseek_solver::Equilibrium;
use serde::Serialize;

use crate::{command::match_arg::MatchArg, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SolveArg {
    #[clap(flatten)]
    game: MatchArg,
    /// Number of scheduled moves to preview for each role
    #[arg(long, default_value_t = 0)]
    preview: usize,
    /// Include the payoff matrix in the report
    #[arg(long)]
    matrix: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SolveReport {
    grid: Grid,
    payoff_rule: PayoffRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    payoff_matrix: Option<PayoffMatrix>,
    game_value: f64,
    duality_gap: f64,
    hider: RoleReport,
    seeker: RoleReport,
}

#[derive(Debug, Serialize)]
struct RoleReport {
    strategy: Strategy,
    /// Expected payoff of this role at equilibrium.
    expected_payoff: f64,
    support: Vec<Position>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    preview: Vec<Position>,
}

impl RoleReport {
    fn new(grid: &Grid, equilibrium: &Equilibrium, preview: usize) -> Self {
        let positions: Vec<Position> = grid.positions().collect();
        let strategy = equilibrium.strategy().clone();
        let support = strategy.support().map(|i| positions[i]).collect();
        let mut scheduler = MoveScheduler::new(strategy.clone());
        let preview = (1..=preview)
            .map(|round| positions[scheduler.schedule(round)])
            .collect();
        Self {
            strategy,
            expected_payoff: equilibrium.owner_payoff(),
            support,
            preview,
        }
    }
}

pub(crate) fn run(arg: &SolveArg) -> anyhow::Result<()> {
    let config = arg.game.load(MatchConfig::default())?;
    let world = config.world.build()?;
    let grid = world.grid;
    let matrix = PayoffMatrix::build_with_rule(&grid, config.payoff_rule);

    eprintln!(
        "Solving {n}x{n} payoff matrix...",
        n = matrix.dimension()
    );
    let (hider, seeker) = if config.cross_check {
        let pair = hideseek_solver::solve_both(&matrix)?;
        (pair.hider, pair.seeker)
    } else {
        (
            hideseek_solver::solve(&matrix, Role::Hider)?,
            hideseek_solver::solve(&matrix, Role::Seeker)?,
        )
    };
    eprintln!("Game value: {:.6}", hider.value());

    let report = SolveReport {
        payoff_rule: config.payoff_rule,
        payoff_matrix: arg.matrix.then_some(matrix),
        game_value: hider.value(),
        duality_gap: (hider.value() - seeker.value()).abs(),
        hider: RoleReport::new(&grid, &hider, arg.preview),
        seeker: RoleReport::new(&grid, &seeker, arg.preview),
        grid,
    };
    Output::save_json(&report, arg.output.clone())?;
    Ok(())
}
