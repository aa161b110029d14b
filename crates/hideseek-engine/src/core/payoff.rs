use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PayoffMatrixError;

use super::{
    cell::CellType,
    grid::{Grid, Position},
};

/// Rule turning a (hider cell, seeker guess) pair into the hider's payoff.
///
/// | cell   | caught | escaped |
/// |--------|--------|---------|
/// | Soft   | -1     | +1      |
/// | Medium | -1     | +2      |
/// | Hard   | -3     | +1      |
///
/// [`PayoffRule::ProximityDiscount`] additionally scales the escape payoff by
/// how close the guess was: ×0.5 at Manhattan distance 1, ×0.75 at distance 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffRule {
    #[default]
    Canonical,
    ProximityDiscount,
}

impl PayoffRule {
    /// Returns the hider's payoff for hiding in `hider` on `grid` while the seeker guesses `seeker`.
    ///
    /// # Panics
    ///
    /// Panics if `hider` is outside the grid.
    #[must_use]
    pub fn hider_payoff(self, grid: &Grid, hider: Position, seeker: Position) -> f64 {
        let cell = grid
            .cell(hider)
            .expect("hider position should be inside the grid");
        if hider == seeker {
            return caught_payoff(cell);
        }
        let base = escape_payoff(cell);
        match self {
            PayoffRule::Canonical => base,
            PayoffRule::ProximityDiscount => base * proximity_factor(hider.manhattan_distance(seeker)),
        }
    }
}

const fn caught_payoff(cell: CellType) -> f64 {
    match cell {
        CellType::Soft | CellType::Medium => -1.0,
        CellType::Hard => -3.0,
    }
}

const fn escape_payoff(cell: CellType) -> f64 {
    match cell {
        CellType::Soft | CellType::Hard => 1.0,
        CellType::Medium => 2.0,
    }
}

const fn proximity_factor(distance: usize) -> f64 {
    match distance {
        1 => 0.5,
        2 => 0.75,
        _ => 1.0,
    }
}

/// Zero-sum payoff matrix of a match.
///
/// Square matrix of dimension `N = rows * cols`, indexed by
/// `(hider position, seeker position)` in flattened row-major order. Entries
/// are the hider's payoff; the seeker's payoff is the negation.
///
/// # Example
///
/// ```
/// use hideseek_engine::{Grid, PayoffMatrix};
///
/// let grid = Grid::parse_rows(&["MH"]).unwrap();
/// let matrix = PayoffMatrix::build(&grid);
///
/// assert_eq!(matrix.row(0), &[-1.0, 2.0]);
/// assert_eq!(matrix.row(1), &[1.0, -3.0]);
/// assert_eq!(matrix.seeker_payoff(1, 1), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffMatrix {
    dimension: usize,
    entries: Vec<f64>,
}

impl Serialize for PayoffMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.rows())
    }
}

impl<'de> Deserialize<'de> for PayoffMatrix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
        PayoffMatrix::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}

impl PayoffMatrix {
    /// Builds the matrix of `grid` under the canonical rule.
    #[must_use]
    pub fn build(grid: &Grid) -> Self {
        Self::build_with_rule(grid, PayoffRule::Canonical)
    }

    /// Builds the matrix of `grid` under `rule`.
    #[must_use]
    pub fn build_with_rule(grid: &Grid, rule: PayoffRule) -> Self {
        let dimension = grid.len();
        let entries = grid
            .positions()
            .flat_map(|hider| {
                grid.positions()
                    .map(move |seeker| rule.hider_payoff(grid, hider, seeker))
            })
            .collect();
        Self { dimension, entries }
    }

    /// Creates a matrix from explicit rows of hider payoffs.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, PayoffMatrixError>
    where
        R: AsRef<[f64]>,
    {
        let dimension = rows.len();
        if dimension == 0 {
            return Err(PayoffMatrixError::Empty);
        }
        let mut entries = Vec::with_capacity(dimension * dimension);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != dimension {
                return Err(PayoffMatrixError::NotSquare {
                    row,
                    expected: dimension,
                    actual: values.len(),
                });
            }
            if let Some(col) = values.iter().position(|v| !v.is_finite()) {
                return Err(PayoffMatrixError::NonFinite { row, col });
            }
            entries.extend_from_slice(values);
        }
        Ok(Self { dimension, entries })
    }

    /// Number of positions `N`; the matrix is N×N.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn hider_payoff(&self, hider: usize, seeker: usize) -> f64 {
        self.row(hider)[seeker]
    }

    #[must_use]
    pub fn seeker_payoff(&self, hider: usize, seeker: usize) -> f64 {
        -self.hider_payoff(hider, seeker)
    }

    /// Hider payoffs for hiding at `hider` against every seeker guess.
    ///
    /// # Panics
    ///
    /// Panics if `hider >= dimension`.
    #[must_use]
    pub fn row(&self, hider: usize) -> &[f64] {
        &self.entries[hider * self.dimension..][..self.dimension]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.entries.chunks_exact(self.dimension)
    }

    /// Hider payoffs against seeker guess `seeker`, for every hider position.
    pub fn column(&self, seeker: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows().map(move |row| row[seeker])
    }
}
