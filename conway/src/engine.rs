// engine.rs - Generation rule and cell mutation for Conway's Game of Life

use tracing::debug;

use crate::board::{Board, CellPos};
use crate::error::Result;

/// Moore neighborhood: every combination of {-1,0,1} x {-1,0,1} except (0,0).
#[rustfmt::skip]
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

/// Owns the current board and advances it one generation at a time.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    board: Board,
    generation: u64,
}

impl SimulationEngine {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self::from_board(Board::new(rows, cols)?))
    }

    pub fn from_board(board: Board) -> Self {
        Self { board, generation: 0 }
    }

    pub fn board(&self) -> &Board { &self.board }
    pub fn generation(&self) -> u64 { self.generation }

    /// Flip one cell. Coordinates must lie in `[0, cols) x [0, rows)`.
    pub fn toggle_cell(&mut self, x: usize, y: usize) -> Result<()> {
        let alive = self.board.get(x, y)?;
        self.board.set(x, y, !alive)
    }

    /// Live in-bounds neighbors of `(x, y)` on the current board.
    pub fn count_live_neighbors(&self, x: usize, y: usize) -> usize {
        count_neighbors(&self.board, x, y)
    }

    /// Replace the board with its successor. Every count reads the old board.
    pub fn advance_generation(&mut self) {
        let current = &self.board;
        #[rustfmt::skip]
        let next = current.map_cells(|x, y| {
            match (current.is_alive(x, y), count_neighbors(current, x, y)) {
                (true, 2) | (true, 3) => true,   // Survival
                (false, 3)            => true,   // Birth
                _                     => false,  // Death or stays dead
            }
        });

        self.board = next;
        self.generation += 1;
        debug!(generation = self.generation, live = self.board.live_count(), "advanced generation");
    }

    pub fn live_cells(&self) -> Vec<CellPos> {
        self.board.live_cells()
    }

    /// Back to an all-dead board of the same size, generation 0.
    pub fn clear(&mut self) {
        self.board = self.board.empty_like();
        self.generation = 0;
    }
}

fn count_neighbors(board: &Board, x: usize, y: usize) -> usize {
    NEIGHBOR_OFFSETS
        .iter()
        .filter_map(|&(dx, dy)| Some((x.checked_add_signed(dx)?, y.checked_add_signed(dy)?)))
        .filter(|&(nx, ny)| board.is_alive(nx, ny))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn engine_with(rows: usize, cols: usize, cells: &[(usize, usize)]) -> SimulationEngine {
        let mut engine = SimulationEngine::new(rows, cols).unwrap();
        for &(x, y) in cells {
            engine.toggle_cell(x, y).unwrap();
        }
        engine
    }

    fn coords(engine: &SimulationEngine) -> Vec<(usize, usize)> {
        engine.live_cells().iter().map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn toggle_twice_restores_the_cell() {
        let mut engine = engine_with(5, 5, &[(2, 2)]);
        engine.toggle_cell(1, 3).unwrap();
        engine.toggle_cell(1, 3).unwrap();
        assert_eq!(coords(&engine), vec![(2, 2)]);
        engine.toggle_cell(2, 2).unwrap();
        engine.toggle_cell(2, 2).unwrap();
        assert_eq!(coords(&engine), vec![(2, 2)]);
    }

    #[test]
    fn toggle_rejects_x_equal_cols_and_y_equal_rows() {
        let mut engine = SimulationEngine::new(4, 6).unwrap();
        assert!(matches!(engine.toggle_cell(6, 0), Err(SimError::OutOfBounds { .. })));
        assert!(matches!(engine.toggle_cell(0, 4), Err(SimError::OutOfBounds { .. })));
        assert!(matches!(engine.toggle_cell(6, 4), Err(SimError::OutOfBounds { .. })));
        assert!(engine.live_cells().is_empty());
    }

    #[test]
    fn neighbor_count_on_a_full_board() {
        let all: Vec<(usize, usize)> = (0..4).flat_map(|y| (0..4).map(move |x| (x, y))).collect();
        let engine = engine_with(4, 4, &all);
        // corners see 3, edges 5, interior 8: nothing beyond the grid is counted
        assert_eq!(engine.count_live_neighbors(0, 0), 3);
        assert_eq!(engine.count_live_neighbors(3, 3), 3);
        assert_eq!(engine.count_live_neighbors(3, 0), 3);
        assert_eq!(engine.count_live_neighbors(1, 0), 5);
        assert_eq!(engine.count_live_neighbors(0, 2), 5);
        assert_eq!(engine.count_live_neighbors(1, 1), 8);
        assert_eq!(engine.count_live_neighbors(2, 2), 8);
    }

    #[test]
    fn neighbor_count_excludes_the_cell_itself() {
        let engine = engine_with(3, 3, &[(1, 1), (0, 0)]);
        assert_eq!(engine.count_live_neighbors(1, 1), 1);
        assert_eq!(engine.count_live_neighbors(2, 2), 1);
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        let mut engine = engine_with(1, 1, &[(0, 0)]);
        assert_eq!(engine.count_live_neighbors(0, 0), 0);
        engine.advance_generation();
        assert!(engine.live_cells().is_empty());
    }

    #[test]
    fn empty_board_stays_empty() {
        let mut engine = SimulationEngine::new(7, 9).unwrap();
        engine.advance_generation();
        assert!(engine.live_cells().is_empty());
        assert_eq!(engine.generation(), 1);
    }

    #[test]
    fn lone_cell_dies() {
        let mut engine = engine_with(5, 5, &[(2, 2)]);
        engine.advance_generation();
        assert!(engine.live_cells().is_empty());
    }

    #[test]
    fn block_is_a_still_life() {
        let block = [(1, 1), (2, 1), (1, 2), (2, 2)];
        let mut engine = engine_with(4, 4, &block);
        let before = coords(&engine);
        engine.advance_generation();
        assert_eq!(coords(&engine), before);
    }

    #[test]
    fn blinker_has_period_two() {
        let mut engine = engine_with(5, 5, &[(1, 2), (2, 2), (3, 2)]);
        let horizontal = coords(&engine);
        engine.advance_generation();
        assert_eq!(coords(&engine), vec![(2, 1), (2, 2), (2, 3)]);
        engine.advance_generation();
        assert_eq!(coords(&engine), horizontal);
    }

    #[test]
    fn vertical_blinker_on_three_by_three_turns_horizontal() {
        let mut engine = engine_with(3, 3, &[(1, 0), (1, 1), (1, 2)]);
        engine.advance_generation();
        assert_eq!(coords(&engine), vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn births_do_not_feed_counts_within_the_same_generation() {
        // an in-place update would let (1,0)'s birth change (2,0)'s count
        let mut engine = engine_with(3, 4, &[(0, 1), (1, 1), (2, 1)]);
        engine.advance_generation();
        assert_eq!(coords(&engine), vec![(1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn clear_resets_board_and_generation() {
        let mut engine = engine_with(3, 3, &[(0, 0), (1, 1)]);
        engine.advance_generation();
        engine.clear();
        assert!(engine.live_cells().is_empty());
        assert_eq!(engine.generation(), 0);
        assert_eq!((engine.board().rows(), engine.board().cols()), (3, 3));
    }
}
