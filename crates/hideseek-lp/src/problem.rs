use crate::{DEFAULT_ITERATION_LIMIT, LpError, simplex};

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// Relation between the left-hand side and the right-hand side of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessEq,
    GreaterEq,
    Equal,
}

impl Relation {
    #[must_use]
    pub(crate) fn flipped(self) -> Self {
        match self {
            Relation::LessEq => Relation::GreaterEq,
            Relation::GreaterEq => Relation::LessEq,
            Relation::Equal => Relation::Equal,
        }
    }
}

/// Sign restriction of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarBound {
    /// `x >= 0`.
    #[default]
    NonNegative,
    /// Unrestricted in sign.
    Free,
}

/// A single linear constraint `coefficients · x (<=|>=|=) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub coefficients: Vec<f64>,
    pub relation: Relation,
    pub rhs: f64,
}

/// A linear program over `n` decision variables.
///
/// Variables default to [`VarBound::NonNegative`]; use
/// [`LinearProgram::set_bound`] to free individual variables.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    sense: Sense,
    objective: Vec<f64>,
    bounds: Vec<VarBound>,
    constraints: Vec<Constraint>,
    iteration_limit: usize,
}

impl LinearProgram {
    /// Creates a program with the given objective coefficients and no constraints.
    #[must_use]
    pub fn new(sense: Sense, objective: Vec<f64>) -> Self {
        let bounds = vec![VarBound::NonNegative; objective.len()];
        Self {
            sense,
            objective,
            bounds,
            constraints: vec![],
            iteration_limit: DEFAULT_ITERATION_LIMIT,
        }
    }

    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    #[must_use]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    #[must_use]
    pub fn sense(&self) -> Sense {
        self.sense
    }

    #[must_use]
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    #[must_use]
    pub fn bounds(&self) -> &[VarBound] {
        &self.bounds
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    #[must_use]
    pub fn iteration_limit(&self) -> usize {
        self.iteration_limit
    }

    /// Sets the sign restriction of variable `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_bound(&mut self, index: usize, bound: VarBound) {
        self.bounds[index] = bound;
    }

    pub fn set_iteration_limit(&mut self, limit: usize) {
        self.iteration_limit = limit;
    }

    pub fn add_constraint(&mut self, coefficients: Vec<f64>, relation: Relation, rhs: f64) {
        self.constraints.push(Constraint {
            coefficients,
            relation,
            rhs,
        });
    }

    /// Solves the program with the two-phase simplex method.
    pub fn solve(&self) -> Result<Solution, LpError> {
        self.validate()?;
        simplex::solve(self)
    }

    fn validate(&self) -> Result<(), LpError> {
        if self.objective.iter().any(|c| !c.is_finite()) {
            return Err(LpError::NonFinite {
                location: "objective",
            });
        }
        let expected = self.num_variables();
        for (index, constraint) in self.constraints.iter().enumerate() {
            if constraint.coefficients.len() != expected {
                return Err(LpError::DimensionMismatch {
                    index,
                    expected,
                    actual: constraint.coefficients.len(),
                });
            }
            if !constraint.rhs.is_finite() || constraint.coefficients.iter().any(|a| !a.is_finite())
            {
                return Err(LpError::NonFinite {
                    location: "constraint",
                });
            }
        }
        Ok(())
    }
}

/// Optimal point of a [`LinearProgram`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    values: Vec<f64>,
    objective: f64,
    pivots: usize,
}

impl Solution {
    pub(crate) fn new(values: Vec<f64>, objective: f64, pivots: usize) -> Self {
        Self {
            values,
            objective,
            pivots,
        }
    }

    /// Value of every decision variable, in declaration order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Objective value at the optimum, in the program's own sense.
    #[must_use]
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Number of simplex pivots over both phases.
    #[must_use]
    pub fn pivots(&self) -> usize {
        self.pivots
    }

    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_program_defaults() {
        let lp = LinearProgram::new(Sense::Minimize, vec![1.0, 2.0, 3.0]);
        assert_eq!(lp.num_variables(), 3);
        assert_eq!(lp.num_constraints(), 0);
        assert!(lp.bounds().iter().all(|b| *b == VarBound::NonNegative));
        assert_eq!(lp.iteration_limit(), DEFAULT_ITERATION_LIMIT);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut lp = LinearProgram::new(Sense::Maximize, vec![1.0, 1.0]);
        lp.add_constraint(vec![1.0, 1.0], Relation::LessEq, 1.0);
        lp.add_constraint(vec![1.0], Relation::LessEq, 1.0);
        assert_eq!(
            lp.solve(),
            Err(LpError::DimensionMismatch {
                index: 1,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_non_finite_input() {
        let mut lp = LinearProgram::new(Sense::Maximize, vec![1.0, f64::NAN]);
        assert!(matches!(lp.solve(), Err(LpError::NonFinite { .. })));

        lp = LinearProgram::new(Sense::Maximize, vec![1.0, 1.0]);
        lp.add_constraint(vec![f64::INFINITY, 1.0], Relation::LessEq, 1.0);
        assert!(matches!(lp.solve(), Err(LpError::NonFinite { .. })));
    }

    #[test]
    fn test_relation_flipped() {
        assert_eq!(Relation::LessEq.flipped(), Relation::GreaterEq);
        assert_eq!(Relation::GreaterEq.flipped(), Relation::LessEq);
        assert_eq!(Relation::Equal.flipped(), Relation::Equal);
    }
}
