//! Equilibrium strategies of hide-and-seek payoff matrices.
//!
//! The game is a finite two-player zero-sum game, so by the minimax theorem
//! each role has an optimal mixed strategy and both roles agree on the value.
//! Both strategies are found with linear programming (see [`hideseek_lp`]).
//!
//! # Formulations
//!
//! For the hider (rows of `M`), with mixed strategy `p`:
//!
//! ```text
//! maximize    v
//! subject to  Σ_i p_i M[i][j] >= v    for every seeker column j
//!             Σ_i p_i = 1,  p >= 0,  v free
//! ```
//!
//! For the seeker (columns of `M`), with mixed strategy `q`:
//!
//! ```text
//! minimize    v
//! subject to  Σ_j q_j M[i][j] <= v    for every hider row i
//!             Σ_j q_j = 1,  q >= 0,  v free
//! ```
//!
//! Both programs have `N + 1` variables and `N + 1` constraints. The first `N`
//! solution components form the strategy and the last is the value.
//!
//! # Cross-Checking
//!
//! LP duality makes the two values equal. [`solve_both`] solves both programs
//! and fails with [`SolverError::DualityGap`] when they disagree by more than
//! [`DUALITY_TOLERANCE`], which catches numerical trouble that each program
//! alone would not reveal.
//!
//! # Example
//!
//! ```
//! use hideseek_engine::{Grid, PayoffMatrix, Role};
//!
//! let matrix = PayoffMatrix::build(&Grid::parse_rows(&["MH"]).unwrap());
//! let hider = hideseek_solver::solve(&matrix, Role::Hider).unwrap();
//!
//! assert!((hider.strategy().probability(0) - 4.0 / 7.0).abs() < 1e-9);
//! assert!((hider.value() + 1.0 / 7.0).abs() < 1e-9);
//! ```

pub use self::equilibrium::*;

mod equilibrium;

use hideseek_engine::{Role, StrategyError};
use hideseek_lp::LpError;

/// Largest accepted difference between the hider and seeker game values.
pub const DUALITY_TOLERANCE: f64 = 1e-4;

/// Largest accepted difference between a solved value and the payoff its strategy guarantees.
pub const VALUE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SolverError {
    #[display("equilibrium program is infeasible")]
    Infeasible,
    #[display("equilibrium program is unbounded")]
    Unbounded,
    #[display("equilibrium solve is numerically unstable: {reason}")]
    NumericalInstability {
        #[error(not(source))]
        reason: String,
    },
    #[display("solved {role} strategy is not a distribution")]
    InvalidStrategy { role: Role, source: StrategyError },
    #[display("hider value {hider_value} and seeker value {seeker_value} differ")]
    DualityGap { hider_value: f64, seeker_value: f64 },
}

impl From<LpError> for SolverError {
    fn from(error: LpError) -> Self {
        match error {
            LpError::Infeasible { .. } => SolverError::Infeasible,
            LpError::Unbounded => SolverError::Unbounded,
            LpError::IterationLimit { .. }
            | LpError::NonFinite { .. }
            | LpError::DimensionMismatch { .. } => SolverError::NumericalInstability {
                reason: error.to_string(),
            },
        }
    }
}
