use std::iter;

use crate::{
    DROP_TOLERANCE, FEASIBILITY_TOLERANCE, LinearProgram, LpError, PIVOT_TOLERANCE, Relation,
    Sense, Solution, VarBound,
};

/// Consecutive degenerate pivots per constraint row before falling back to Bland's rule.
const DEGENERATE_PIVOTS_PER_ROW: usize = 2;
const MIN_DEGENERATE_RUN: usize = 50;

/// Choice of the entering column and of the leaving row among ratio ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pricing {
    /// Most negative reduced cost; ties in the ratio test go to the largest pivot element.
    Steepest,
    /// Lowest eligible column; ties go to the lowest basic index. Cannot cycle.
    Bland,
}

/// Column indices of one decision variable in the standard-form tableau.
///
/// Free variables occupy two columns (`x = pos - neg`).
#[derive(Debug, Clone, Copy)]
struct VariableColumns {
    pos: usize,
    neg: Option<usize>,
}

/// Simplex tableau in canonical form.
///
/// Every row stores `width` coefficients followed by the right-hand side.
/// The objective row stores reduced costs `z_j - c_j` of a maximization
/// problem; its last entry is the current objective value.
#[derive(Debug, Clone)]
struct Tableau {
    rows: Vec<Vec<f64>>,
    objective: Vec<f64>,
    basis: Vec<usize>,
    width: usize,
    pivots: usize,
    limit: usize,
}

impl Tableau {
    fn rhs(&self, row: usize) -> f64 {
        self.rows[row][self.width]
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let factor = self.rows[row][col];
        for value in &mut self.rows[row] {
            *value /= factor;
        }
        let pivot_row = self.rows[row].clone();
        for (i, other) in self.rows.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            eliminate(other, &pivot_row, col);
        }
        eliminate(&mut self.objective, &pivot_row, col);
        self.basis[row] = col;
        self.pivots += 1;
    }

    /// Installs `costs` (maximization) as the objective, priced out against the current basis.
    fn set_objective(&mut self, costs: &[f64]) {
        debug_assert_eq!(costs.len(), self.width);
        self.objective = costs.iter().map(|c| -c).chain(iter::once(0.0)).collect();
        for (row, &basic) in self.basis.iter().enumerate() {
            let cost = costs[basic];
            if cost == 0.0 {
                continue;
            }
            for (value, a) in self.objective.iter_mut().zip(&self.rows[row]) {
                *value += cost * a;
            }
        }
    }

    fn entering_column(&self, allowed: usize, pricing: Pricing) -> Option<usize> {
        let mut eligible = (0..allowed).filter(|&j| self.objective[j] < -PIVOT_TOLERANCE);
        match pricing {
            Pricing::Steepest => {
                eligible.min_by(|&a, &b| self.objective[a].total_cmp(&self.objective[b]))
            }
            Pricing::Bland => eligible.next(),
        }
    }

    /// Returns the leaving row of the ratio test and its ratio.
    fn leaving_row(&self, col: usize, pricing: Pricing) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for row in 0..self.rows.len() {
            let a = self.rows[row][col];
            if a <= PIVOT_TOLERANCE {
                continue;
            }
            let ratio = self.rhs(row) / a;
            let Some((best_row, best_ratio)) = best else {
                best = Some((row, ratio));
                continue;
            };
            if ratio < best_ratio - PIVOT_TOLERANCE {
                best = Some((row, ratio));
            } else if ratio <= best_ratio + PIVOT_TOLERANCE {
                let preferred = match pricing {
                    Pricing::Steepest => a > self.rows[best_row][col],
                    Pricing::Bland => self.basis[row] < self.basis[best_row],
                };
                if preferred {
                    best = Some((row, ratio.min(best_ratio)));
                }
            }
        }
        best
    }

    /// Runs primal simplex iterations until optimal, considering only columns `< allowed`.
    ///
    /// Pricing starts with the steepest reduced cost and switches to Bland's
    /// rule after a long run of degenerate pivots, until the objective moves
    /// again.
    fn optimize(&mut self, allowed: usize) -> Result<(), LpError> {
        let bland_after = (DEGENERATE_PIVOTS_PER_ROW * self.rows.len()).max(MIN_DEGENERATE_RUN);
        let mut degenerate_run = 0;
        loop {
            let pricing = if degenerate_run < bland_after {
                Pricing::Steepest
            } else {
                Pricing::Bland
            };
            let Some(col) = self.entering_column(allowed, pricing) else {
                return Ok(());
            };
            if self.pivots >= self.limit {
                return Err(LpError::IterationLimit { limit: self.limit });
            }
            let (row, ratio) = self.leaving_row(col, pricing).ok_or(LpError::Unbounded)?;
            if ratio <= PIVOT_TOLERANCE {
                degenerate_run += 1;
                if degenerate_run == bland_after {
                    log::debug!("{degenerate_run} degenerate pivots in a row, using Bland's rule");
                }
            } else {
                degenerate_run = 0;
            }
            self.pivot(row, col);
        }
    }

    /// Pivots artificial variables out of the basis after phase 1.
    ///
    /// Rows whose artificial cannot be replaced are linearly dependent on the
    /// others and are dropped.
    fn expel_artificials(&mut self, first_artificial: usize) {
        let mut redundant = vec![];
        for row in 0..self.rows.len() {
            if self.basis[row] < first_artificial {
                continue;
            }
            let replacement =
                (0..first_artificial).find(|&j| self.rows[row][j].abs() > PIVOT_TOLERANCE);
            match replacement {
                Some(col) => self.pivot(row, col),
                None => redundant.push(row),
            }
        }
        for row in redundant.into_iter().rev() {
            log::debug!("dropping redundant constraint row {row}");
            self.rows.remove(row);
            self.basis.remove(row);
        }
    }

    fn column_values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.width];
        for (row, &basic) in self.basis.iter().enumerate() {
            values[basic] = self.rhs(row);
        }
        values
    }
}

fn eliminate(target: &mut [f64], pivot_row: &[f64], col: usize) {
    let factor = target[col];
    if factor == 0.0 {
        return;
    }
    for (value, p) in target.iter_mut().zip(pivot_row) {
        *value -= factor * p;
        if value.abs() < DROP_TOLERANCE {
            *value = 0.0;
        }
    }
    target[col] = 0.0;
}

pub(crate) fn solve(lp: &LinearProgram) -> Result<Solution, LpError> {
    let mut next_column = 0;
    let variables: Vec<VariableColumns> = lp
        .bounds()
        .iter()
        .map(|bound| {
            let pos = next_column;
            next_column += 1;
            let neg = match bound {
                VarBound::NonNegative => None,
                VarBound::Free => {
                    next_column += 1;
                    Some(next_column - 1)
                }
            };
            VariableColumns { pos, neg }
        })
        .collect();
    let structural = next_column;

    // Normalize to non-negative right-hand sides.
    let normalized: Vec<(Vec<f64>, Relation, f64)> = lp
        .constraints()
        .iter()
        .map(|c| {
            if c.rhs < 0.0 {
                let coefficients = c.coefficients.iter().map(|a| -a).collect();
                (coefficients, c.relation.flipped(), -c.rhs)
            } else {
                (c.coefficients.clone(), c.relation, c.rhs)
            }
        })
        .collect();

    let num_slack = normalized
        .iter()
        .filter(|(_, relation, _)| *relation != Relation::Equal)
        .count();
    let num_artificial = normalized
        .iter()
        .filter(|(_, relation, _)| *relation != Relation::LessEq)
        .count();
    let first_slack = structural;
    let first_artificial = first_slack + num_slack;
    let width = first_artificial + num_artificial;

    let mut rows = Vec::with_capacity(normalized.len());
    let mut basis = Vec::with_capacity(normalized.len());
    let mut slack = first_slack;
    let mut artificial = first_artificial;
    for (coefficients, relation, rhs) in &normalized {
        let mut row = vec![0.0; width + 1];
        for (a, var) in coefficients.iter().zip(&variables) {
            row[var.pos] = *a;
            if let Some(neg) = var.neg {
                row[neg] = -*a;
            }
        }
        row[width] = *rhs;
        match relation {
            Relation::LessEq => {
                row[slack] = 1.0;
                basis.push(slack);
                slack += 1;
            }
            Relation::GreaterEq => {
                row[slack] = -1.0;
                slack += 1;
                row[artificial] = 1.0;
                basis.push(artificial);
                artificial += 1;
            }
            Relation::Equal => {
                row[artificial] = 1.0;
                basis.push(artificial);
                artificial += 1;
            }
        }
        rows.push(row);
    }

    let mut tableau = Tableau {
        rows,
        objective: vec![0.0; width + 1],
        basis,
        width,
        pivots: 0,
        limit: lp.iteration_limit(),
    };

    if num_artificial > 0 {
        let phase1_costs: Vec<f64> = (0..width)
            .map(|j| if j >= first_artificial { -1.0 } else { 0.0 })
            .collect();
        tableau.set_objective(&phase1_costs);
        tableau.optimize(width)?;
        let residual = -tableau.objective[width];
        if residual > FEASIBILITY_TOLERANCE {
            return Err(LpError::Infeasible { residual });
        }
        tableau.expel_artificials(first_artificial);
        log::debug!(
            "phase 1 finished after {} pivots (residual {residual:e})",
            tableau.pivots
        );
    }

    let sign = match lp.sense() {
        Sense::Maximize => 1.0,
        Sense::Minimize => -1.0,
    };
    let mut phase2_costs = vec![0.0; width];
    for (cost, var) in lp.objective().iter().zip(&variables) {
        phase2_costs[var.pos] = sign * cost;
        if let Some(neg) = var.neg {
            phase2_costs[neg] = -sign * cost;
        }
    }
    tableau.set_objective(&phase2_costs);
    tableau.optimize(first_artificial)?;

    let columns = tableau.column_values();
    let values: Vec<f64> = variables
        .iter()
        .map(|var| columns[var.pos] - var.neg.map_or(0.0, |neg| columns[neg]))
        .collect();
    if values.iter().any(|v| !v.is_finite()) {
        return Err(LpError::NonFinite {
            location: "solution",
        });
    }
    let objective = lp
        .objective()
        .iter()
        .zip(&values)
        .map(|(c, x)| c * x)
        .sum();
    log::debug!(
        "simplex converged after {} pivots, objective {objective}",
        tableau.pivots
    );
    Ok(Solution::new(values, objective, tableau.pivots))
}
