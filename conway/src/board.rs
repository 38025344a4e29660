// board.rs - Grid storage for Conway's Game of Life

use std::fmt;

use crate::error::{Result, SimError};

type Row = Vec<bool>;

/// One live cell, in grid coordinates (`x` is the column, `y` the row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub x: usize,
    pub y: usize,
}

impl CellPos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for CellPos {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// Fixed-size `rows x cols` grid of alive/dead cells. No wraparound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Row>,
}

impl Board {
    /// All-dead board. Both dimensions must be positive.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(SimError::InvalidDimension { rows, cols });
        }
        Ok(Self { rows, cols, cells: vec![vec![false; cols]; rows] })
    }

    /// Board of the same dimensions as `self`, every cell dead.
    pub fn empty_like(&self) -> Self {
        Self { rows: self.rows, cols: self.cols, cells: vec![vec![false; self.cols]; self.rows] }
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows
    }

    /// Out-of-range reads count as dead.
    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.cells.get(y).and_then(|row| row.get(x)).copied().unwrap_or(false)
    }

    /// Fresh board of the same dimensions, each cell computed by `state(x, y)`.
    pub fn map_cells(&self, state: impl Fn(usize, usize) -> bool) -> Self {
        let cells = (0..self.rows)
            .map(|y| (0..self.cols).map(|x| state(x, y)).collect())
            .collect();
        Self { rows: self.rows, cols: self.cols, cells }
    }

    fn check(&self, x: usize, y: usize) -> Result<()> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(SimError::OutOfBounds { x, y, cols: self.cols, rows: self.rows })
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<bool> {
        self.check(x, y)?;
        Ok(self.cells[y][x])
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) -> Result<()> {
        self.check(x, y)?;
        self.cells[y][x] = alive;
        Ok(())
    }

    /// Live cells in row-major order (y outer, x inner).
    pub fn live_cells(&self) -> Vec<CellPos> {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &alive)| alive)
                    .map(move |(x, _)| CellPos { x, y })
            })
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().map(|row| row.iter().filter(|&&alive| alive).count()).sum()
    }
}

// '#' for live, '.' for dead, one line per row
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for &alive in row {
                f.write_str(if alive { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
