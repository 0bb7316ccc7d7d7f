use ratatui::layout::{Position, Positions, Rect, Size};

/// What occupies a single cell of the board
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum CellState {
    #[default]
    Empty,
    Snake,
    Apple,
}

/// Per-cell occupancy of a `width`×`height` board, stored row-major.
///
/// Coordinates are relative to the top-left corner of the board.  Accessing
/// a cell outside the board is a bug in the caller and panics.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    size: Size,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create an empty grid of the given size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub(crate) fn new(size: Size) -> Grid {
        assert!(
            size.width > 0 && size.height > 0,
            "grid dimensions must be positive; got {}×{}",
            size.width,
            size.height
        );
        let len = usize::from(size.width) * usize::from(size.height);
        Grid {
            size,
            cells: vec![CellState::Empty; len],
        }
    }

    pub(crate) fn size(&self) -> Size {
        self.size
    }

    pub(crate) fn width(&self) -> u16 {
        self.size.width
    }

    pub(crate) fn height(&self) -> u16 {
        self.size.height
    }

    /// Total number of cells on the board
    pub(crate) fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn contains(&self, pos: Position) -> bool {
        pos.x < self.size.width && pos.y < self.size.height
    }

    /// # Panics
    ///
    /// Panics if `pos` is outside the board.
    pub(crate) fn get(&self, pos: Position) -> CellState {
        self.cells[self.index(pos)]
    }

    /// # Panics
    ///
    /// Panics if `pos` is outside the board.
    pub(crate) fn set(&mut self, pos: Position, state: CellState) {
        let i = self.index(pos);
        self.cells[i] = state;
    }

    /// Iterate over every position on the board in row-major order
    pub(crate) fn positions(&self) -> Positions {
        Rect::from((Position::ORIGIN, self.size)).positions()
    }

    /// Return all positions that are currently empty.  This scans the whole
    /// board and is only meant for apple placement.
    pub(crate) fn empty_cells(&self) -> Vec<Position> {
        self.positions()
            .filter(|&p| self.get(p) == CellState::Empty)
            .collect()
    }

    /// Count the cells in the given state
    #[cfg(test)]
    pub(crate) fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position ({}, {}) is outside of {}×{} grid",
            pos.x,
            pos.y,
            self.size.width,
            self.size.height
        );
        usize::from(pos.y) * usize::from(self.size.width) + usize::from(pos.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_empty() {
        let grid = Grid::new(Size::new(4, 3));
        assert_eq!(grid.cell_count(), 12);
        assert_eq!(grid.count(CellState::Empty), 12);
        assert_eq!(grid.empty_cells().len(), 12);
    }

    #[test]
    fn set_and_get() {
        let mut grid = Grid::new(Size::new(4, 3));
        grid.set(Position::new(3, 2), CellState::Apple);
        grid.set(Position::new(0, 1), CellState::Snake);
        assert_eq!(grid.get(Position::new(3, 2)), CellState::Apple);
        assert_eq!(grid.get(Position::new(0, 1)), CellState::Snake);
        assert_eq!(grid.get(Position::new(1, 1)), CellState::Empty);
        assert_eq!(grid.count(CellState::Snake), 1);
        assert_eq!(grid.count(CellState::Apple), 1);
    }

    #[test]
    fn empty_cells_excludes_occupied() {
        let mut grid = Grid::new(Size::new(2, 2));
        grid.set(Position::new(0, 0), CellState::Snake);
        grid.set(Position::new(1, 1), CellState::Apple);
        pretty_assertions::assert_eq!(
            grid.empty_cells(),
            vec![Position::new(1, 0), Position::new(0, 1)]
        );
    }

    #[test]
    #[should_panic(expected = "outside of 4×3 grid")]
    fn out_of_range_panics() {
        let grid = Grid::new(Size::new(4, 3));
        let _ = grid.get(Position::new(4, 0));
    }
}
