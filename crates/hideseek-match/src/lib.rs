//! Match orchestration for the hide-and-seek game.
//!
//! A [`RoundEngine`] owns one match: the grid, its payoff matrix, the solved
//! strategies of the automated participants, the move counters, the scores
//! and the round history. Each round is opened (the hider commits) and then
//! settled (the seeker's guess is resolved against the payoff matrix):
//!
//! ```text
//! Idle --open_round--> AwaitingSettlement --settle_round--> Idle --> ...
//! ```
//!
//! A match has no terminal state; it lasts until the host stops it or calls
//! [`RoundEngine::restart`].
//!
//! # Example
//!
//! ```
//! use hideseek_engine::{Position, Role};
//! use hideseek_match::{MatchConfig, RoundEngine};
//!
//! let config = MatchConfig::human_vs_computer(Role::Hider);
//! let mut engine = RoundEngine::start(config).unwrap();
//!
//! engine.open_round(Some(Position::new(0, 3))).unwrap();
//! let record = engine.settle_round(None).unwrap();
//!
//! assert_eq!(record.round(), 1);
//! assert_eq!(engine.scores()[0], record.score());
//! assert_eq!(engine.scores()[1], -record.score());
//! ```

pub use self::{config::*, engine::*, summary::*};

mod config;
mod engine;
mod summary;

use hideseek_engine::{GridError, Position, Role};
use hideseek_solver::SolverError;

/// Rejected match configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigurationError {
    #[display("participant {name:?} has no role")]
    MissingRole {
        #[error(not(source))]
        name: String,
    },
    #[display("both participants play the {role}")]
    DuplicateRole { role: Role },
    #[display("a {rows}x{cols} grid is outside the supported 1..={max_cells} cells")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        max_cells: usize,
    },
    #[display("invalid grid")]
    InvalidGrid { source: GridError },
}

/// Operation not allowed in the current round status.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum SequenceError {
    #[display("the externally driven {role} must supply a position")]
    MissingPosition { role: Role },
    #[display("the {role} is automated; no position is expected")]
    UnexpectedPosition { role: Role },
    #[display("the {role} position has already been supplied")]
    PositionAlreadySupplied { role: Role },
    #[display("round {round} is already open")]
    RoundAlreadyOpen { round: usize },
    #[display("no round is open")]
    NoOpenRound,
}

/// Externally supplied position outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("position {position} is outside the {rows}x{cols} grid")]
pub struct InvalidMoveError {
    pub position: Position,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum MatchError {
    Solver(SolverError),
    Configuration(ConfigurationError),
    Sequence(SequenceError),
    InvalidMove(InvalidMoveError),
}
