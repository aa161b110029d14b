use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::GridError;

use super::cell::CellType;

/// A cell coordinate on the grid.
///
/// Positions are flattened row-major: index = `row * cols + col`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, derive_more::Display,
)]
#[display("({row}, {col})")]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the Manhattan (taxicab) distance between two positions.
    ///
    /// # Examples
    ///
    /// ```
    /// use hideseek_engine::Position;
    ///
    /// assert_eq!(Position::new(0, 0).manhattan_distance(Position::new(2, 3)), 5);
    /// ```
    #[must_use]
    pub const fn manhattan_distance(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// The world of a match: an R×C grid of [`CellType`]s.
///
/// A grid is immutable once built; a new match builds a new grid.
///
/// # Text Format
///
/// Grids serialize as one string per row, one character per cell
/// (`S` = Soft, `M` = Medium, `H` = Hard):
///
/// ```
/// use hideseek_engine::{CellType, Grid, Position};
///
/// let grid = Grid::parse_rows(&["MH", "SS"]).unwrap();
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.cols(), 2);
/// assert_eq!(grid.cell(Position::new(0, 1)), Some(CellType::Hard));
/// assert_eq!(serde_json::to_string(&grid).unwrap(), r#"["MH","SS"]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellType>,
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.row_strings())
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Grid::parse_rows(&rows).map_err(serde::de::Error::custom)
    }
}

impl Grid {
    /// Rows of the classic 4×4 world.
    pub const CLASSIC_ROWS: usize = 4;
    /// Columns of the classic 4×4 world.
    pub const CLASSIC_COLS: usize = 4;

    const CLASSIC_LAYOUT: [&'static str; Self::CLASSIC_ROWS] = ["HHHS", "MSSH", "SMSH", "SHSS"];

    /// Returns the fixed 4×4 world used by default matches.
    #[must_use]
    pub fn classic() -> Self {
        Self::parse_rows(&Self::CLASSIC_LAYOUT).expect("classic layout should be well-formed")
    }

    /// Creates a grid from row-major cells.
    pub fn new(rows: usize, cols: usize, cells: Vec<CellType>) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyDimensions { rows, cols });
        }
        let expected = rows * cols;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                rows,
                cols,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Creates a grid from nested rows of cells.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GridError>
    where
        R: AsRef<[CellType]>,
    {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (row, cells_in_row) in rows.iter().enumerate() {
            let cells_in_row = cells_in_row.as_ref();
            if cells_in_row.len() != cols {
                return Err(GridError::RaggedRow {
                    row,
                    expected: cols,
                    actual: cells_in_row.len(),
                });
            }
            cells.extend_from_slice(cells_in_row);
        }
        Self::new(rows.len(), cols, cells)
    }

    /// Parses a grid from its text format (see the type-level docs).
    pub fn parse_rows<S>(rows: &[S]) -> Result<Self, GridError>
    where
        S: AsRef<str>,
    {
        let parsed = rows
            .iter()
            .enumerate()
            .map(|(row, line)| {
                line.as_ref()
                    .chars()
                    .enumerate()
                    .map(|(col, ch)| {
                        CellType::from_char(ch).ok_or(GridError::InvalidCell { ch, row, col })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(&parsed)
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells (`rows * cols`), i.e. the number of positions in the game.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: grids have at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }

    /// Returns the flattened index of `position`, or `None` when out of bounds.
    #[must_use]
    pub const fn index_of(&self, position: Position) -> Option<usize> {
        if self.contains(position) {
            Some(position.row * self.cols + position.col)
        } else {
            None
        }
    }

    /// Returns the position of flattened `index`, or `None` when out of bounds.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<Position> {
        (index < self.len()).then(|| Position::new(index / self.cols, index % self.cols))
    }

    #[must_use]
    pub fn cell(&self, position: Position) -> Option<CellType> {
        self.index_of(position).map(|i| self.cells[i])
    }

    /// Returns the cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellType] {
        &self.cells
    }

    /// Returns an iterator over the rows of the grid.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[CellType]> {
        self.cells.chunks_exact(self.cols)
    }

    /// Returns an iterator over every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }

    /// Returns the text form of each row.
    pub fn row_strings(&self) -> impl Iterator<Item = String> + '_ {
        self.iter_rows()
            .map(|row| row.iter().map(|c| c.as_char()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_layout() {
        let grid = Grid::classic();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.len(), 16);
        assert_eq!(grid.cell(Position::new(0, 0)), Some(CellType::Hard));
        assert_eq!(grid.cell(Position::new(1, 0)), Some(CellType::Medium));
        assert_eq!(grid.cell(Position::new(3, 3)), Some(CellType::Soft));
    }

    #[test]
    fn test_index_and_position_are_inverse() {
        let grid = Grid::parse_rows(&["SMH", "HMS"]).unwrap();
        for (index, position) in grid.positions().enumerate() {
            assert_eq!(grid.index_of(position), Some(index));
            assert_eq!(grid.position_of(index), Some(position));
        }
        assert_eq!(grid.position_of(6), None);
        assert_eq!(grid.index_of(Position::new(2, 0)), None);
        assert_eq!(grid.index_of(Position::new(0, 3)), None);
    }

    #[test]
    fn test_empty_dimensions() {
        assert_eq!(
            Grid::new(0, 3, vec![]),
            Err(GridError::EmptyDimensions { rows: 0, cols: 3 })
        );
        let empty: [&str; 0] = [];
        assert!(matches!(
            Grid::parse_rows(&empty),
            Err(GridError::EmptyDimensions { .. })
        ));
    }

    #[test]
    fn test_cell_count_mismatch() {
        let err = Grid::new(2, 2, vec![CellType::Soft; 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::CellCountMismatch {
                rows: 2,
                cols: 2,
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_ragged_rows() {
        let err = Grid::parse_rows(&["SM", "S"]).unwrap_err();
        assert_eq!(
            err,
            GridError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_invalid_cell_character() {
        let err = Grid::parse_rows(&["SM", "SX"]).unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidCell {
                ch: 'X',
                row: 1,
                col: 1
            }
        );
    }

    #[test]
    fn test_serde_roundtrip_keeps_layout() {
        let grid = Grid::classic();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, r#"["HHHS","MSSH","SMSH","SHSS"]"#);
        let parsed: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, grid);
    }

    #[test]
    fn test_deserialize_rejects_ragged_rows() {
        let result: Result<Grid, _> = serde_json::from_str(r#"["SS","S"]"#);
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("row 1"), "unexpected error: {err_msg}");
    }

    #[test]
    fn test_manhattan_distance() {
        let origin = Position::new(1, 1);
        assert_eq!(origin.manhattan_distance(origin), 0);
        assert_eq!(origin.manhattan_distance(Position::new(0, 1)), 1);
        assert_eq!(origin.manhattan_distance(Position::new(0, 0)), 2);
        assert_eq!(origin.manhattan_distance(Position::new(3, 0)), 3);
    }
}
