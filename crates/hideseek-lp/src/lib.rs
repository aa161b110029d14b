//! Dense linear programming for small game-theoretic models.
//!
//! This crate provides a self-contained primal simplex solver sized for the
//! payoff matrices of grid hide-and-seek games (a few hundred variables at
//! most). It knows nothing about games: callers describe a linear program with
//! [`LinearProgram`] and receive a [`Solution`] or an [`LpError`].
//!
//! # Method
//!
//! - **Standard form**: free variables are split into a positive and a negative
//!   part, right-hand sides are made non-negative, and slack / surplus /
//!   artificial columns are appended.
//! - **Phase 1** minimizes the sum of artificial variables. A positive optimum
//!   means the program is infeasible.
//! - **Phase 2** optimizes the real objective from the feasible basis found in
//!   phase 1.
//!
//! The entering column is the one with the most negative reduced cost, and
//! ratio ties go to the largest pivot element. Payoff matrices produce long
//! runs of degenerate pivots, so after too many of them in a row the solver
//! switches to Bland's rule (lowest eligible column, lowest basic index on
//! ties), which cannot cycle, until the objective improves again. Entries that
//! shrink below [`DROP_TOLERANCE`] during elimination are flushed to zero.
//!
//! # Example
//!
//! ```
//! use hideseek_lp::{LinearProgram, Relation, Sense};
//!
//! // maximize x + y  subject to  x + 2y <= 4,  3x + y <= 6
//! let mut lp = LinearProgram::new(Sense::Maximize, vec![1.0, 1.0]);
//! lp.add_constraint(vec![1.0, 2.0], Relation::LessEq, 4.0);
//! lp.add_constraint(vec![3.0, 1.0], Relation::LessEq, 6.0);
//!
//! let solution = lp.solve().unwrap();
//! assert!((solution.objective() - 2.8).abs() < 1e-9);
//! assert!((solution.value(0) - 1.6).abs() < 1e-9);
//! assert!((solution.value(1) - 1.2).abs() < 1e-9);
//! ```

pub use self::problem::*;

mod problem;
mod simplex;

/// Pivot elements with an absolute value at or below this are treated as zero.
pub const PIVOT_TOLERANCE: f64 = 1e-9;

/// Tableau entries below this magnitude after a pivot are set to zero.
pub const DROP_TOLERANCE: f64 = 1e-12;

/// Largest phase-1 residual (sum of artificial variables) accepted as feasible.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-7;

/// Default pivot budget for [`LinearProgram::solve`].
pub const DEFAULT_ITERATION_LIMIT: usize = 50_000;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum LpError {
    #[display("linear program is infeasible (phase 1 residual {residual:e})")]
    Infeasible { residual: f64 },
    #[display("linear program is unbounded")]
    Unbounded,
    #[display("simplex did not converge within {limit} pivots")]
    IterationLimit { limit: usize },
    #[display("non-finite value in {location}")]
    NonFinite { location: &'static str },
    #[display("constraint {index} has {actual} coefficients, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}
