//! Occupancy grid for the facility floor

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid coordinate, 0-indexed `(row, col)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance, the admissible heuristic for 4-directional unit moves
    pub fn manhattan(self, other: Coord) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True when `other` is exactly one up/down/left/right step away
    #[cfg(test)]
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// A single floor cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Open,
    Blocked,
}

/// Fixed-size occupancy grid. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build from the `0 = open, 1 = blocked` matrix used by map files.
    ///
    /// Returns `None` for an empty or ragged matrix.
    pub fn from_matrix(matrix: &[Vec<u8>]) -> Option<Self> {
        let rows = matrix.len();
        let cols = matrix.first()?.len();
        if cols == 0 || matrix.iter().any(|r| r.len() != cols) {
            return None;
        }

        let cells = matrix
            .iter()
            .flatten()
            .map(|&v| if v == 0 { Cell::Open } else { Cell::Blocked })
            .collect();

        Some(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Out-of-bounds coordinates count as blocked
    pub fn is_blocked(&self, coord: Coord) -> bool {
        !self.in_bounds(coord) || self.cells[coord.row * self.cols + coord.col] == Cell::Blocked
    }

    /// In-bounds neighbours in up, down, left, right order
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        let up = coord.row.checked_sub(1).map(|r| Coord::new(r, coord.col));
        let down = Some(Coord::new(coord.row + 1, coord.col));
        let left = coord.col.checked_sub(1).map(|c| Coord::new(coord.row, c));
        let right = Some(Coord::new(coord.row, coord.col + 1));

        [up, down, left, right]
            .into_iter()
            .flatten()
            .filter(|c| self.in_bounds(*c))
    }

    /// Back to the `0/1` matrix form, for the locations endpoint
    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| {
                row.iter()
                    .map(|c| match c {
                        Cell::Open => 0,
                        Cell::Blocked => 1,
                    })
                    .collect()
            })
            .collect()
    }
}
