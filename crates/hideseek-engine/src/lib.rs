//! Game model of grid hide-and-seek.
//!
//! A match is played on an R×C [`Grid`] of [`CellType`]s. Each round the
//! hider picks a cell, the seeker guesses a cell, and the hider receives the
//! payoff from the [`PayoffMatrix`]; the seeker receives its negation.
//!
//! - [`core`] - grid, cell types, roles, payoff matrix, mixed strategies
//! - [`engine`] - world generation, deterministic move scheduling, round records
//!
//! Equilibrium computation lives in `hideseek-solver` and match orchestration
//! in `hideseek-match`; this crate holds the data they share.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    #[display("grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyDimensions { rows: usize, cols: usize },
    #[display("grid of {rows}x{cols} needs {expected} cells, got {actual}")]
    CellCountMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },
    #[display("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("invalid cell type {ch:?} at ({row}, {col})")]
    InvalidCell { ch: char, row: usize, col: usize },
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StrategyError {
    #[display("strategy has no positions")]
    Empty,
    #[display("probability at position {index} is not finite")]
    NonFinite { index: usize },
    #[display("probability at position {index} is negative ({value})")]
    Negative { index: usize, value: f64 },
    #[display("probabilities sum to {sum}, expected 1")]
    Sum { sum: f64 },
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum PayoffMatrixError {
    #[display("payoff matrix has no rows")]
    Empty,
    #[display("payoff matrix row {row} has {actual} entries, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("payoff matrix entry ({row}, {col}) is not finite")]
    NonFinite { row: usize, col: usize },
}
