use super::apple::Apple;
use super::direction::Direction;
use super::grid::Grid;
use super::snake::{Snake, TickOutcome};
use crate::options::Options;
use crate::scores::{ScoreRecord, ScoreSink};
use crate::util::SaveError;
use rand::Rng;
use ratatui::layout::Position;

/// One game, from the first tick until the snake dies or fills the board
#[derive(Clone, Debug)]
pub(crate) struct GameSession<R = rand::rngs::ThreadRng> {
    grid: Grid,
    snake: Snake,
    apple: Apple,
    rng: R,
    player_name: String,
    options: Options,
    state: SessionState,

    /// Frames elapsed since the last tick
    frame: u32,
}

impl<R: Rng> GameSession<R> {
    /// Start a new game: a one-cell snake in the middle of the board heading
    /// east, plus one apple
    pub(crate) fn new(player_name: &str, options: Options, mut rng: R) -> GameSession<R> {
        let mut grid = Grid::new(options.board_size.as_size());
        let head = Position::new(grid.width() / 2, grid.height() / 2);
        let snake = Snake::new(head, Direction::East, &mut grid);
        let mut apple = Apple::new();
        apple.spawn(&mut grid, &mut rng);
        tracing::info!(
            player = player_name,
            speed = %options.speed,
            board_size = %options.board_size,
            walls = %options.walls,
            "Starting new game"
        );
        GameSession {
            grid,
            snake,
            apple,
            rng,
            player_name: player_name.to_owned(),
            options,
            state: SessionState::Running,
            frame: 0,
        }
    }

    /// Advance the frame clock by one frame, ticking the game if a tick is
    /// due
    pub(crate) fn on_frame<S: ScoreSink + ?Sized>(&mut self, sink: &mut S) -> Option<TickReport> {
        if !self.running() {
            return None;
        }
        self.frame += 1;
        if self.frame < self.options.speed.tick_interval() {
            return None;
        }
        self.frame = 0;
        self.tick(sink)
    }

    /// Move the snake one step.  If this ends the game, the final score is
    /// sent to `sink`.  Returns `None` if the game is already over.
    pub(crate) fn tick<S: ScoreSink + ?Sized>(&mut self, sink: &mut S) -> Option<TickReport> {
        if !self.running() {
            return None;
        }
        let score_before = self.snake.score();
        let tick = self.snake.tick(
            &mut self.grid,
            &mut self.apple,
            self.options.walls,
            &mut self.rng,
        );
        if self.snake.score() != score_before {
            tracing::debug!(
                score = self.snake.score(),
                length = self.snake.len(),
                "Snake ate an apple"
            );
        }
        let save_error = match tick.outcome {
            TickOutcome::Continue => None,
            TickOutcome::GameOver => {
                self.state = SessionState::Over;
                self.finish(sink)
            }
            TickOutcome::GameWon => {
                self.state = SessionState::Won;
                self.finish(sink)
            }
        };
        Some(TickReport {
            outcome: tick.outcome,
            changed: tick.changed,
            save_error,
        })
    }

    fn finish<S: ScoreSink + ?Sized>(&self, sink: &mut S) -> Option<SaveError> {
        tracing::info!(
            player = %self.player_name,
            score = self.snake.score(),
            length = self.snake.len(),
            state = ?self.state,
            "Game finished"
        );
        let record = ScoreRecord::new(&self.player_name, self.options, self.snake.score());
        match sink.save_score(&record) {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(error = %e, "Failed to record score");
                Some(e)
            }
        }
    }
}

impl<R> GameSession<R> {
    /// Request a change of direction.  Ignored once the game is over.
    pub(crate) fn turn(&mut self, direction: Direction) {
        if self.running() {
            self.snake.turn(direction);
        }
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    pub(crate) fn apple(&self) -> Option<Position> {
        self.apple.position()
    }

    pub(crate) fn state(&self) -> SessionState {
        self.state
    }

    pub(crate) fn options(&self) -> Options {
        self.options
    }

    pub(crate) fn player_name(&self) -> &str {
        &self.player_name
    }

    pub(crate) fn score(&self) -> u32 {
        self.snake.score()
    }

    pub(crate) fn running(&self) -> bool {
        self.state == SessionState::Running
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SessionState {
    Running,
    Over,
    Won,
}

/// What happened on a tick of a [`GameSession`]
#[derive(Debug)]
pub(crate) struct TickReport {
    pub(crate) outcome: TickOutcome,

    /// Cells that need to be redrawn.  The screen redraws everything each
    /// frame and lets ratatui diff the buffers, so this is only for partial
    /// redraws.
    pub(crate) changed: Vec<Position>,

    /// Set if the game ended and its score could not be recorded
    pub(crate) save_error: Option<SaveError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::CellState;
    use crate::options::{BoardSize, BoundaryPolicy, Speed};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use ratatui::layout::Size;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    #[derive(Debug, Default)]
    struct RecordingSink(Vec<ScoreRecord>);

    impl ScoreSink for RecordingSink {
        fn save_score(&mut self, record: &ScoreRecord) -> Result<(), SaveError> {
            self.0.push(record.clone());
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct FailingSink(usize);

    impl ScoreSink for FailingSink {
        fn save_score(&mut self, _record: &ScoreRecord) -> Result<(), SaveError> {
            self.0 += 1;
            Err(SaveError::no_path("score"))
        }
    }

    fn session(options: Options) -> GameSession<ChaCha12Rng> {
        GameSession::new("Tester", options, ChaCha12Rng::seed_from_u64(RNG_SEED))
    }

    fn solid_walls() -> Options {
        Options {
            walls: BoundaryPolicy::Terminate,
            ..Options::default()
        }
    }

    /// Tick until the game ends, returning the number of ticks taken and the
    /// final report
    fn run_to_end<S: ScoreSink>(
        game: &mut GameSession<ChaCha12Rng>,
        sink: &mut S,
    ) -> (usize, TickReport) {
        for i in 1..=100 {
            let report = game.tick(sink).expect("game should still be running");
            if report.outcome.is_terminal() {
                return (i, report);
            }
        }
        panic!("game did not end");
    }

    #[test]
    fn new_session() {
        let game = session(Options::default());
        assert!(game.running());
        assert_eq!(game.snake().head(), Position::new(5, 3));
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.snake().direction(), Direction::East);
        assert_eq!(game.score(), 0);
        let apple = game.apple().expect("apple should be placed");
        assert_ne!(apple, game.snake().head());
        assert_eq!(game.grid().get(apple), CellState::Apple);
        assert_eq!(game.grid().count(CellState::Snake), 1);
        assert_eq!(game.grid().count(CellState::Apple), 1);
    }

    #[test]
    fn board_size_sets_grid() {
        let game = session(Options {
            board_size: BoardSize::Large,
            ..Options::default()
        });
        assert_eq!(game.grid().size(), Size::new(20, 12));
        assert_eq!(game.snake().head(), Position::new(10, 6));
    }

    #[test]
    fn ticks_on_frame_interval() {
        let mut game = session(Options {
            speed: Speed::Slow,
            ..Options::default()
        });
        let mut sink = RecordingSink::default();
        for _ in 1..15 {
            assert!(game.on_frame(&mut sink).is_none());
        }
        let report = game.on_frame(&mut sink).expect("15th frame should tick");
        assert_eq!(report.outcome, TickOutcome::Continue);
        assert_eq!(game.snake().head(), Position::new(6, 3));
        for _ in 1..15 {
            assert!(game.on_frame(&mut sink).is_none());
        }
        assert!(game.on_frame(&mut sink).is_some());
        assert_eq!(game.snake().head(), Position::new(7, 3));
    }

    #[test]
    fn fast_ticks_more_often() {
        let mut game = session(Options {
            speed: Speed::Fast,
            ..Options::default()
        });
        let mut sink = RecordingSink::default();
        let ticks = (0..60)
            .filter_map(|_| game.on_frame(&mut sink))
            .count();
        assert_eq!(ticks, 10);
    }

    #[test]
    fn game_over_records_score_once() {
        let mut game = session(solid_walls());
        let mut sink = RecordingSink::default();
        let (ticks, report) = run_to_end(&mut game, &mut sink);
        // From x = 5 to the right-hand edge at x = 9, then into the wall
        assert_eq!(ticks, 5);
        assert_eq!(report.outcome, TickOutcome::GameOver);
        assert!(report.changed.is_empty());
        assert!(report.save_error.is_none());
        assert_eq!(game.state(), SessionState::Over);
        assert_eq!(game.snake().head(), Position::new(9, 3));
        assert_eq!(sink.0.len(), 1);
        let record = &sink.0[0];
        assert_eq!(record.player_name, "Tester");
        assert_eq!(record.speed, Speed::Slow);
        assert_eq!(record.board_size, BoardSize::Small);
        assert_eq!(record.score, game.score());

        assert!(game.tick(&mut sink).is_none());
        for _ in 0..100 {
            assert!(game.on_frame(&mut sink).is_none());
        }
        assert_eq!(sink.0.len(), 1);
    }

    #[test]
    fn turns_are_ignored_after_game_over() {
        let mut game = session(solid_walls());
        let mut sink = RecordingSink::default();
        let _ = run_to_end(&mut game, &mut sink);
        game.turn(Direction::North);
        assert_eq!(game.snake().direction(), Direction::East);
    }

    #[test]
    fn turn_changes_course() {
        let mut game = session(Options::default());
        let mut sink = RecordingSink::default();
        game.turn(Direction::South);
        let _ = game.tick(&mut sink);
        assert_eq!(game.snake().head(), Position::new(5, 4));
    }

    #[test]
    fn save_failure_does_not_change_outcome() {
        let mut game = session(solid_walls());
        let mut sink = FailingSink::default();
        let (_, report) = run_to_end(&mut game, &mut sink);
        assert_eq!(report.outcome, TickOutcome::GameOver);
        let e = report.save_error.expect("save error should be reported");
        assert_eq!(e.to_string(), "failed to save score to disk");
        assert_eq!(game.state(), SessionState::Over);
        assert!(game.tick(&mut sink).is_none());
        assert_eq!(sink.0, 1);
    }

    #[test]
    fn filling_the_board_wins() {
        let mut grid = Grid::new(Size::new(2, 1));
        let snake = Snake::new(Position::new(0, 0), Direction::East, &mut grid);
        let mut apple = Apple::new();
        apple.place(&mut grid, Position::new(1, 0));
        let mut game = GameSession {
            grid,
            snake,
            apple,
            rng: ChaCha12Rng::seed_from_u64(RNG_SEED),
            player_name: String::from("Tester"),
            options: solid_walls(),
            state: SessionState::Running,
            frame: 0,
        };
        let mut sink = RecordingSink::default();
        let report = game.tick(&mut sink).expect("game should be running");
        assert_eq!(report.outcome, TickOutcome::GameWon);
        assert_eq!(game.state(), SessionState::Won);
        assert_eq!(game.apple(), None);
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].score, 10);
        assert!(game.tick(&mut sink).is_none());
    }
}
