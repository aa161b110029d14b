use hideseek_engine::{PayoffMatrix, Role, Strategy};
use hideseek_lp::{LinearProgram, Relation, Sense, VarBound};
use serde::{Deserialize, Serialize};

use crate::{DUALITY_TOLERANCE, SolverError, VALUE_TOLERANCE};

/// Optimal mixed strategy of one role together with the game value.
///
/// `value` is always expressed as the hider's expected payoff, for both roles,
/// so the two solutions of a matrix can be compared directly. Use
/// [`Equilibrium::owner_payoff`] for the value from the owner's point of view.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Equilibrium {
    role: Role,
    strategy: Strategy,
    value: f64,
}

impl Equilibrium {
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Game value in hider payoff.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Game value from the point of view of [`Self::role`].
    #[must_use]
    pub fn owner_payoff(&self) -> f64 {
        match self.role {
            Role::Hider => self.value,
            Role::Seeker => -self.value,
        }
    }
}

/// Both equilibrium strategies of a matrix, already cross-checked.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EquilibriumPair {
    pub hider: Equilibrium,
    pub seeker: Equilibrium,
}

impl EquilibriumPair {
    #[must_use]
    pub const fn get(&self, role: Role) -> &Equilibrium {
        match role {
            Role::Hider => &self.hider,
            Role::Seeker => &self.seeker,
        }
    }

    /// Absolute difference between the two solved values.
    #[must_use]
    pub fn duality_gap(&self) -> f64 {
        (self.hider.value - self.seeker.value).abs()
    }
}

/// Computes the optimal mixed strategy of `role` for `matrix`.
///
/// # Errors
///
/// Returns an error if the program cannot be solved, if the solved vector is
/// not a probability distribution, or if the solved value does not match the
/// payoff the strategy actually guarantees.
pub fn solve(matrix: &PayoffMatrix, role: Role) -> Result<Equilibrium, SolverError> {
    let program = match role {
        Role::Hider => hider_program(matrix),
        Role::Seeker => seeker_program(matrix),
    };
    let solution = program.solve()?;
    let pivots = solution.pivots();
    let mut values = solution.into_values();
    let value = values.pop().ok_or_else(|| SolverError::NumericalInstability {
        reason: "solution has no value component".to_owned(),
    })?;
    if !value.is_finite() {
        return Err(SolverError::NumericalInstability {
            reason: format!("{role} value is {value}"),
        });
    }
    let strategy = Strategy::new(values).map_err(|source| SolverError::InvalidStrategy { role, source })?;

    let guaranteed = security_level(matrix, role, &strategy);
    if (guaranteed - value).abs() > VALUE_TOLERANCE {
        return Err(SolverError::NumericalInstability {
            reason: format!("{role} value {value} but strategy guarantees {guaranteed}"),
        });
    }

    log::debug!(
        "solved {role} equilibrium of {n}x{n} matrix in {pivots} pivots: value {value:.6}",
        n = matrix.dimension()
    );
    Ok(Equilibrium { role, strategy, value })
}

/// Solves both roles and verifies that their values agree.
///
/// # Errors
///
/// Propagates the errors of [`solve`], and returns
/// [`SolverError::DualityGap`] if the values differ by more than
/// [`DUALITY_TOLERANCE`].
pub fn solve_both(matrix: &PayoffMatrix) -> Result<EquilibriumPair, SolverError> {
    let hider = solve(matrix, Role::Hider)?;
    let seeker = solve(matrix, Role::Seeker)?;
    let gap = cross_check(&hider, &seeker)?;
    log::info!("game value {:.6} (duality gap {gap:e})", hider.value);
    Ok(EquilibriumPair { hider, seeker })
}

/// Compares the values of a hider and a seeker solution and returns their gap.
///
/// # Errors
///
/// Returns [`SolverError::DualityGap`] if the gap exceeds [`DUALITY_TOLERANCE`].
pub fn cross_check(hider: &Equilibrium, seeker: &Equilibrium) -> Result<f64, SolverError> {
    debug_assert!(hider.role.is_hider() && seeker.role.is_seeker());
    let gap = (hider.value - seeker.value).abs();
    if gap > DUALITY_TOLERANCE {
        log::warn!(
            "duality cross-check failed: hider value {}, seeker value {}",
            hider.value,
            seeker.value
        );
        return Err(SolverError::DualityGap {
            hider_value: hider.value,
            seeker_value: seeker.value,
        });
    }
    Ok(gap)
}

/// Expected hider payoff that `strategy` guarantees to `role` against any reply.
///
/// For the hider this is the worst column average, for the seeker the worst
/// (largest) row average.
///
/// # Panics
///
/// Panics if `strategy` does not cover `matrix.dimension()` positions.
#[must_use]
pub fn security_level(matrix: &PayoffMatrix, role: Role, strategy: &Strategy) -> f64 {
    let n = matrix.dimension();
    assert_eq!(strategy.len(), n, "strategy must cover every position");
    let p = strategy.probabilities();
    match role {
        Role::Hider => (0..n)
            .map(|j| matrix.column(j).zip(p).map(|(m, p)| m * p).sum::<f64>())
            .fold(f64::INFINITY, f64::min),
        Role::Seeker => matrix
            .rows()
            .map(|row| row.iter().zip(p).map(|(m, q)| m * q).sum::<f64>())
            .fold(f64::NEG_INFINITY, f64::max),
    }
}

fn value_objective(n: usize) -> Vec<f64> {
    let mut objective = vec![0.0; n + 1];
    objective[n] = 1.0;
    objective
}

fn add_distribution_constraint(program: &mut LinearProgram, n: usize) {
    let mut coefficients = vec![1.0; n + 1];
    coefficients[n] = 0.0;
    program.add_constraint(coefficients, Relation::Equal, 1.0);
}

// Variables: p_0 .. p_{n-1}, v.
fn hider_program(matrix: &PayoffMatrix) -> LinearProgram {
    let n = matrix.dimension();
    let mut program = LinearProgram::new(Sense::Maximize, value_objective(n));
    program.set_bound(n, VarBound::Free);
    for j in 0..n {
        // v - Σ_i p_i M[i][j] <= 0
        let mut coefficients: Vec<f64> = matrix.column(j).map(|m| -m).collect();
        coefficients.push(1.0);
        program.add_constraint(coefficients, Relation::LessEq, 0.0);
    }
    add_distribution_constraint(&mut program, n);
    program
}

// Variables: q_0 .. q_{n-1}, v.
fn seeker_program(matrix: &PayoffMatrix) -> LinearProgram {
    let n = matrix.dimension();
    let mut program = LinearProgram::new(Sense::Minimize, value_objective(n));
    program.set_bound(n, VarBound::Free);
    for row in matrix.rows() {
        // Σ_j q_j M[i][j] - v <= 0
        let mut coefficients = row.to_vec();
        coefficients.push(-1.0);
        program.add_constraint(coefficients, Relation::LessEq, 0.0);
    }
    add_distribution_constraint(&mut program, n);
    program
}

#[cfg(test)]
mod tests {
    use hideseek_engine::{CellType, Grid, PayoffRule};
    use proptest::{prelude::*, strategy::Strategy as _};

    use super::*;
    use hideseek_engine::Strategy;

    const EPS: f64 = 1e-7;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn two_cell_matrix() -> PayoffMatrix {
        PayoffMatrix::build(&Grid::parse_rows(&["MH"]).unwrap())
    }

    #[test]
    fn test_two_cell_hider() {
        let hider = solve(&two_cell_matrix(), Role::Hider).unwrap();
        assert_eq!(hider.role(), Role::Hider);
        assert_close(hider.strategy().probability(0), 4.0 / 7.0);
        assert_close(hider.strategy().probability(1), 3.0 / 7.0);
        assert_close(hider.value(), -1.0 / 7.0);
        assert_close(hider.owner_payoff(), -1.0 / 7.0);
    }

    #[test]
    fn test_two_cell_seeker() {
        let seeker = solve(&two_cell_matrix(), Role::Seeker).unwrap();
        assert_eq!(seeker.role(), Role::Seeker);
        assert_close(seeker.strategy().probability(0), 5.0 / 7.0);
        assert_close(seeker.strategy().probability(1), 2.0 / 7.0);
        assert_close(seeker.value(), -1.0 / 7.0);
        assert_close(seeker.owner_payoff(), 1.0 / 7.0);
    }

    #[test]
    fn test_single_cell() {
        let matrix = PayoffMatrix::build(&Grid::parse_rows(&["H"]).unwrap());
        let pair = solve_both(&matrix).unwrap();
        assert_eq!(pair.hider.strategy().probabilities(), &[1.0]);
        assert_eq!(pair.seeker.strategy().probabilities(), &[1.0]);
        assert_close(pair.hider.value(), -3.0);
    }

    #[test]
    fn test_saddle_point() {
        let matrix = PayoffMatrix::from_rows(&[[1.0, 2.0], [0.0, 3.0]]).unwrap();
        let pair = solve_both(&matrix).unwrap();
        assert_close(pair.hider.strategy().probability(0), 1.0);
        assert_close(pair.seeker.strategy().probability(0), 1.0);
        assert_close(pair.hider.value(), 1.0);
        assert!(pair.duality_gap() < EPS);
    }

    #[test]
    fn test_general_matrix_duality() {
        let matrix =
            PayoffMatrix::from_rows(&[[1.0, -1.0, 3.0], [3.0, 5.0, -3.0], [6.0, 2.0, -2.0]])
                .unwrap();
        let pair = solve_both(&matrix).unwrap();
        assert!(pair.duality_gap() < DUALITY_TOLERANCE);
        for role in Role::ALL {
            let eq = pair.get(role);
            assert_close(security_level(&matrix, role, eq.strategy()), eq.value());
        }
    }

    #[test]
    fn test_classic_world() {
        let matrix = PayoffMatrix::build(&Grid::classic());
        let pair = solve_both(&matrix).unwrap();
        assert_eq!(pair.hider.strategy().len(), 16);
        assert_eq!(pair.seeker.strategy().len(), 16);
        assert!(pair.duality_gap() < DUALITY_TOLERANCE);
        // Every cell pays at least +1 on escape, so a 16-cell world favors the hider.
        assert!(pair.hider.value() > 0.0);
    }

    #[test]
    fn test_cross_check_detects_gap() {
        let matrix = two_cell_matrix();
        let hider = solve(&matrix, Role::Hider).unwrap();
        let mut seeker = solve(&matrix, Role::Seeker).unwrap();
        seeker.value += 0.01;
        assert!(matches!(
            cross_check(&hider, &seeker),
            Err(SolverError::DualityGap { .. })
        ));
    }

    #[test]
    fn test_security_level() {
        let matrix = two_cell_matrix();
        assert_close(security_level(&matrix, Role::Hider, &Strategy::pure(2, 0)), -1.0);
        assert_close(security_level(&matrix, Role::Seeker, &Strategy::pure(2, 0)), 1.0);
        assert_close(
            security_level(&matrix, Role::Hider, &Strategy::uniform(2)),
            -0.5,
        );
    }

    #[test]
    fn test_serialized_form() {
        let hider = solve(&PayoffMatrix::build(&Grid::parse_rows(&["S"]).unwrap()), Role::Hider)
            .unwrap();
        assert_eq!(
            serde_json::to_string(&hider).unwrap(),
            r#"{"role":"hider","strategy":[1.0],"value":-1.0}"#
        );
    }

    #[test]
    fn test_uniform_grids_at_size_limit() {
        for cell in CellType::ALL {
            for (rows, cols) in [(12, 12), (1, 144)] {
                let grid = Grid::new(rows, cols, vec![cell; rows * cols]).unwrap();
                for rule in [PayoffRule::Canonical, PayoffRule::ProximityDiscount] {
                    let matrix = PayoffMatrix::build_with_rule(&grid, rule);
                    let pair = solve_both(&matrix).unwrap_or_else(|err| {
                        panic!("{cell:?} {rows}x{cols} {rule:?}: {err}")
                    });
                    assert!(pair.duality_gap() <= DUALITY_TOLERANCE);
                    for role in Role::ALL {
                        let eq = pair.get(role);
                        let guaranteed = security_level(&matrix, role, eq.strategy());
                        assert!((guaranteed - eq.value()).abs() <= VALUE_TOLERANCE);
                    }
                }
            }
        }
    }

    fn arb_grid_up_to(max_side: usize) -> impl proptest::strategy::Strategy<Value = Grid> {
        (1..=max_side, 1..=max_side).prop_flat_map(|(rows, cols)| {
            proptest::collection::vec(0u8..3, rows * cols).prop_map(move |kinds| {
                let cells = kinds.into_iter().map(|k| CellType::ALL[k as usize]).collect();
                Grid::new(rows, cols, cells).unwrap()
            })
        })
    }

    proptest! {
        #[test]
        fn prop_equilibria_are_consistent(grid in arb_grid_up_to(3), proximity in any::<bool>()) {
            let rule = if proximity { PayoffRule::ProximityDiscount } else { PayoffRule::Canonical };
            let matrix = PayoffMatrix::build_with_rule(&grid, rule);
            let pair = solve_both(&matrix).unwrap();
            prop_assert!(pair.duality_gap() <= DUALITY_TOLERANCE);
            for role in Role::ALL {
                let eq = pair.get(role);
                let probabilities = eq.strategy().probabilities();
                prop_assert_eq!(probabilities.len(), grid.len());
                prop_assert!(probabilities.iter().all(|p| *p >= 0.0));
                prop_assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            }
            // Neither side can do better against the other's optimal strategy.
            let hider_floor = security_level(&matrix, Role::Hider, pair.hider.strategy());
            let seeker_ceiling = security_level(&matrix, Role::Seeker, pair.seeker.strategy());
            prop_assert!(hider_floor <= seeker_ceiling + 1e-6);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_large_grids_solve(grid in arb_grid_up_to(12), proximity in any::<bool>()) {
            let rule = if proximity { PayoffRule::ProximityDiscount } else { PayoffRule::Canonical };
            let matrix = PayoffMatrix::build_with_rule(&grid, rule);
            let pair = solve_both(&matrix);
            prop_assert!(pair.is_ok(), "{}x{} {rule:?}: {pair:?}", grid.rows(), grid.cols());
        }
    }
}
