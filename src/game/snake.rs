use super::apple::Apple;
use super::direction::Direction;
use super::grid::{CellState, Grid};
use crate::consts;
use crate::options::BoundaryPolicy;
use rand::Rng;
use ratatui::layout::Position;
use std::collections::VecDeque;

/// The snake: its body, heading, queued turns & score.
///
/// All positions are relative to the top-left corner of the board the snake
/// is on.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Snake {
    /// The cells occupied by the snake, head first
    segments: VecDeque<Position>,

    /// The direction in which the snake will move on the next tick
    direction: Direction,

    /// Whether `direction` has already been changed since the last tick
    turned: bool,

    /// Direction changes requested after `turned` was set, oldest first
    pending_turns: VecDeque<Direction>,

    /// Number of upcoming ticks on which the tail stays put
    growth_pending: usize,

    score: u32,

    /// Current value of the decaying time bonus, in `[0, bonus_cap]`
    time_bonus: f64,

    bonus_cap: f64,

    /// Multiplied by the score to get the time bonus after eating an apple
    bonus_factor: f64,
}

impl Snake {
    /// Create a snake of length 1 at `head` facing `direction` and mark its
    /// cell on `grid`.
    pub(crate) fn new(head: Position, direction: Direction, grid: &mut Grid) -> Snake {
        grid.set(head, CellState::Snake);
        let cells = f64::from(u32::try_from(grid.cell_count()).unwrap_or(u32::MAX));
        Snake {
            segments: VecDeque::from([head]),
            direction,
            turned: false,
            pending_turns: VecDeque::new(),
            growth_pending: 0,
            score: 0,
            time_bonus: 0.0,
            bonus_cap: (cells.sqrt() * consts::TIME_BONUS_CAP_SCALE * 10.0).round() / 10.0,
            bonus_factor: consts::TIME_BONUS_GAIN / cells,
        }
    }

    pub(crate) fn head(&self) -> Position {
        self.segments[0]
    }

    /// Return the cells occupied by the snake, head first
    pub(crate) fn segments(&self) -> &VecDeque<Position> {
        &self.segments
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn time_bonus(&self) -> f64 {
        self.time_bonus
    }

    pub(crate) fn bonus_cap(&self) -> f64 {
        self.bonus_cap
    }

    #[cfg(test)]
    pub(crate) fn growth_pending(&self) -> usize {
        self.growth_pending
    }

    #[cfg(test)]
    pub(crate) fn pending_turns(&self) -> &VecDeque<Direction> {
        &self.pending_turns
    }

    /// Request a change of direction.  The first acceptable request between
    /// two ticks takes effect at once; later ones are queued (up to
    /// [`MAX_PENDING_TURNS`][consts::MAX_PENDING_TURNS]) and applied one per
    /// tick.  A request is compared against the direction it would follow,
    /// i.e., the most recently queued turn if there is one; reversals and
    /// requests that would not change anything are discarded.
    ///
    /// Returns `true` if the request was applied or queued.
    pub(crate) fn turn(&mut self, direction: Direction) -> bool {
        let effective = self.pending_turns.back().copied().unwrap_or(self.direction);
        if direction == effective || direction.is_reverse_of(effective) {
            false
        } else if !self.turned {
            self.direction = direction;
            self.turned = true;
            true
        } else if self.pending_turns.len() < consts::MAX_PENDING_TURNS {
            self.pending_turns.push_back(direction);
            true
        } else {
            false
        }
    }

    /// Points awarded for eating an apple with the current time bonus
    pub(crate) fn apple_points(&self) -> u32 {
        consts::APPLE_POINTS + consts::TIME_BONUS_POINTS * round_bonus(self.time_bonus)
    }

    /// Move the snake one cell, eating the apple and growing if it's in the
    /// way.
    ///
    /// If the move would leave the board under [`BoundaryPolicy::Terminate`]
    /// or run into the snake's own body, nothing is changed and the outcome
    /// is [`TickOutcome::GameOver`].  The cell the tail is leaving on this
    /// tick does not count as part of the body.
    pub(crate) fn tick<R: Rng>(
        &mut self,
        grid: &mut Grid,
        apple: &mut Apple,
        walls: BoundaryPolicy,
        rng: &mut R,
    ) -> Tick {
        let old_head = self.head();
        let Some(new_head) = self.direction.advance(old_head, grid.size(), walls) else {
            return Tick::game_over();
        };
        let eats = apple.position() == Some(new_head);
        let body_len = if eats || self.growth_pending > 0 {
            self.segments.len()
        } else {
            self.segments.len() - 1
        };
        if self.segments.iter().take(body_len).any(|&p| p == new_head) {
            return Tick::game_over();
        }

        let mut changed = vec![old_head];
        if eats {
            self.score += self.apple_points();
            self.time_bonus = (f64::from(self.score) * self.bonus_factor).min(self.bonus_cap);
            self.growth_pending += 1;
            apple.eat();
        }
        if self.growth_pending > 0 {
            self.growth_pending -= 1;
        } else if let Some(tail) = self.segments.pop_back() {
            grid.set(tail, CellState::Empty);
            changed.push(tail);
        }
        self.segments.push_front(new_head);
        grid.set(new_head, CellState::Snake);
        changed.push(new_head);

        if self.segments.len() >= grid.cell_count() {
            return Tick {
                outcome: TickOutcome::GameWon,
                changed,
            };
        }

        self.turned = false;
        while let Some(direction) = self.pending_turns.pop_front() {
            if direction != self.direction && !direction.is_reverse_of(self.direction) {
                self.direction = direction;
                self.turned = true;
                break;
            }
        }
        if eats {
            changed.extend(apple.spawn(grid, rng));
        }
        self.time_bonus = (self.time_bonus - consts::TIME_BONUS_DECAY).max(0.0);
        Tick {
            outcome: TickOutcome::Continue,
            changed,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_bonus(bonus: f64) -> u32 {
    // The bonus is clamped to a small non-negative range, so this can't
    // truncate.  Halves round to even.
    bonus.max(0.0).round_ties_even() as u32
}

/// The result of advancing the snake by one tick
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Tick {
    pub(crate) outcome: TickOutcome,

    /// Cells whose contents changed during the tick
    pub(crate) changed: Vec<Position>,
}

impl Tick {
    fn game_over() -> Tick {
        Tick {
            outcome: TickOutcome::GameOver,
            changed: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TickOutcome {
    Continue,
    GameOver,
    GameWon,
}

impl TickOutcome {
    pub(crate) fn is_terminal(self) -> bool {
        self != TickOutcome::Continue
    }
}
