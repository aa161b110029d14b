use clap::{Parser, Subcommand};

use self::{play::PlayArg, simulate::SimulateArg, solve::SolveArg, world::WorldCommandArg};

mod match_arg;
mod play;
mod simulate;
mod solve;
mod world;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a match against the computer on the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Print a world grid as JSON
    World(#[clap(flatten)] WorldCommandArg),
    /// Solve the equilibrium strategies of both roles
    Solve(#[clap(flatten)] SolveArg),
    /// Run a computer vs computer match
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::World(arg) => world::run(&arg)?,
        Mode::Solve(arg) => solve::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }
}
