use crate::consts;
use crate::options::BoundaryPolicy;
use ratatui::layout::{Position, Size};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Return the cell one step from `pos` in this direction on a board of
    /// the given size.  Returns `None` if the step would leave the board and
    /// `walls` is [`BoundaryPolicy::Terminate`].
    pub(crate) fn advance(
        self,
        pos: Position,
        size: Size,
        walls: BoundaryPolicy,
    ) -> Option<Position> {
        let wrap = walls == BoundaryPolicy::Wrap;
        let Position { mut x, mut y } = pos;
        match self {
            Direction::North => y = decrement_in_bounds(y, size.height, wrap)?,
            Direction::East => x = increment_in_bounds(x, size.width, wrap)?,
            Direction::South => y = increment_in_bounds(y, size.height, wrap)?,
            Direction::West => x = decrement_in_bounds(x, size.width, wrap)?,
        }
        Some(Position { x, y })
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub(crate) fn is_reverse_of(self, other: Direction) -> bool {
        self.reverse() == other
    }

    /// Glyph for the head of a snake moving in this direction
    pub(crate) fn head_symbol(self) -> char {
        match self {
            Direction::North => consts::SNAKE_HEAD_NORTH_SYMBOL,
            Direction::East => consts::SNAKE_HEAD_EAST_SYMBOL,
            Direction::South => consts::SNAKE_HEAD_SOUTH_SYMBOL,
            Direction::West => consts::SNAKE_HEAD_WEST_SYMBOL,
        }
    }
}

fn decrement_in_bounds(x: u16, max: u16, wrap: bool) -> Option<u16> {
    if let Some(x2) = x.checked_sub(1) {
        Some(x2)
    } else if wrap {
        max.checked_sub(1)
    } else {
        None
    }
}

fn increment_in_bounds(x: u16, max: u16, wrap: bool) -> Option<u16> {
    if let Some(x2) = x.checked_add(1).filter(|&xx| xx < max) {
        Some(x2)
    } else if wrap {
        Some(0)
    } else {
        None
    }
}
