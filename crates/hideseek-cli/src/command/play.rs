use std::io::{self, BufRead, Write as _};

use anyhow::Context;
use hideseek_engine::{Grid, Position, Role};
use hideseek_match::{Controller, MatchConfig, MatchError, RoundEngine};

use crate::command::match_arg::{MatchArg, RoleArg};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    game: MatchArg,
    /// Role to play against the computer (hider or seeker)
    #[arg(long)]
    role: Option<RoleArg>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let mut config = arg.game.load(MatchConfig::default())?;
    if let Some(role) = arg.role {
        config.participants = MatchConfig::human_vs_computer(role.into()).participants;
    }
    if config
        .participants
        .iter()
        .all(|p| p.controller == Controller::Automated)
    {
        anyhow::bail!("no external participant to play; use `simulate` for computer vs computer");
    }
    let mut engine = RoundEngine::start(config)?;

    print_grid(engine.grid());
    println!("Enter positions as `row col`, or `q` to quit.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    'rounds: loop {
        let hider = match external_name(&engine, Role::Hider) {
            Some(name) => match read_position(&mut lines, &name, Role::Hider)? {
                Some(position) => Some(position),
                None => break 'rounds,
            },
            None => None,
        };
        match engine.open_round(hider) {
            Ok(_) => {}
            Err(MatchError::InvalidMove(err)) => {
                println!("{err}");
                continue;
            }
            Err(err) => return Err(err.into()),
        }

        loop {
            let seeker = match external_name(&engine, Role::Seeker) {
                Some(name) => match read_position(&mut lines, &name, Role::Seeker)? {
                    Some(position) => Some(position),
                    None => break 'rounds,
                },
                None => None,
            };
            match engine.settle_round(seeker) {
                Ok(record) => {
                    println!(
                        "Round {}: hider at {}, seeker guessed {} -> {} ({:+})",
                        record.round(),
                        record.hider_position(),
                        record.seeker_position(),
                        record.outcome(),
                        record.score()
                    );
                    print_scores(&engine);
                    break;
                }
                Err(MatchError::InvalidMove(err)) => println!("{err}"),
                Err(err) => return Err(err.into()),
            }
        }
    }

    let summary = engine.summary();
    println!(
        "Match over after {} rounds: {} caught, {} escaped",
        summary.rounds, summary.caught, summary.escaped
    );
    print_scores(&engine);
    Ok(())
}

fn external_name(engine: &RoundEngine, role: Role) -> Option<String> {
    let participant = engine.participant(role);
    (participant.controller == Controller::External).then(|| participant.name.clone())
}

fn print_grid(grid: &Grid) {
    print!("   ");
    for col in 0..grid.cols() {
        print!("{col:>2}");
    }
    println!();
    for (row, cells) in grid.row_strings().enumerate() {
        print!("{row:>2} ");
        for cell in cells.chars() {
            print!("{cell:>2}");
        }
        println!();
    }
}

fn print_scores(engine: &RoundEngine) {
    let state = engine.state();
    for (participant, score) in state.participants().iter().zip(engine.scores()) {
        println!("  {}: {score:+.2}", participant.name);
    }
}

fn read_position<B>(lines: &mut io::Lines<B>, name: &str, role: Role) -> anyhow::Result<Option<Position>>
where
    B: BufRead,
{
    loop {
        print!("{name} ({role})> ");
        io::stdout().flush().context("Failed to flush stdout")?;
        let Some(line) = lines.next() else {
            return Ok(None);
        };
        let line = line.context("Failed to read from stdin")?;
        match parse_input(&line) {
            Ok(Input::Position(position)) => return Ok(Some(position)),
            Ok(Input::Quit) => return Ok(None),
            Err(message) => println!("{message}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Position(Position),
    Quit,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Ok(Input::Quit);
    }
    let mut parts = line.split(|c: char| c.is_whitespace() || c == ',').filter(|s| !s.is_empty());
    let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected `row col`, got {line:?}"));
    };
    let row = row.parse().map_err(|_| format!("invalid row: {row:?}"))?;
    let col = col.parse().map_err(|_| format!("invalid column: {col:?}"))?;
    Ok(Input::Position(Position::new(row, col)))
}
