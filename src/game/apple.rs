use super::grid::{CellState, Grid};
use rand::{seq::IndexedRandom, Rng};
use ratatui::layout::Position;

/// The apple on the board.  `position` is `None` only between the apple
/// being eaten and a new one being placed, or once the board is full.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Apple {
    position: Option<Position>,
}

impl Apple {
    pub(crate) fn new() -> Apple {
        Apple::default()
    }

    pub(crate) fn position(&self) -> Option<Position> {
        self.position
    }

    /// Remove the apple after it has been eaten.  The grid cell is left
    /// alone, as the snake's head is about to occupy it.
    pub(crate) fn eat(&mut self) {
        self.position = None;
    }

    /// Place the apple on an empty cell of `grid` chosen uniformly at random
    /// and mark that cell as holding an apple.  If the board has no empty
    /// cells, nothing happens and `None` is returned.
    pub(crate) fn spawn<R: Rng>(&mut self, grid: &mut Grid, rng: &mut R) -> Option<Position> {
        let pos = grid.empty_cells().choose(rng).copied()?;
        grid.set(pos, CellState::Apple);
        self.position = Some(pos);
        Some(pos)
    }

    /// Put the apple on a specific cell, for setting up test scenarios
    #[cfg(test)]
    pub(crate) fn place(&mut self, grid: &mut Grid, pos: Position) {
        grid.set(pos, CellState::Apple);
        self.position = Some(pos);
    }
}
