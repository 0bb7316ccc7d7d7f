mod apple;
mod direction;
mod grid;
mod paused;
mod session;
mod snake;
use self::direction::Direction;
use self::paused::{PauseMenu, PauseOpt};
use self::session::{GameSession, SessionState};
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::menu::MainMenu;
use crate::options::BoundaryPolicy;
use crate::scores::ScoreLog;
use crate::util::{center_rect, get_display_area, Globals};
use crate::warning::{Warning, WarningOutcome};
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{
    buffer::{Buffer, Cell},
    layout::{Constraint, Layout, Margin, Position, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};
use std::time::Instant;

/// The game screen
#[derive(Clone, Debug)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    session: GameSession<R>,
    scores: ScoreLog,
    paused: Option<PauseMenu>,
    warning: Option<Warning>,
    globals: Globals,
    next_frame: Option<Instant>,
}

impl Game<rand::rngs::ThreadRng> {
    pub(crate) fn new(globals: Globals) -> Self {
        Game::new_with_rng(globals, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(globals: Globals, rng: R) -> Game<R> {
        let session = GameSession::new(&globals.player_name, globals.options, rng);
        let scores = globals.config.score_log();
        Game {
            session,
            scores,
            paused: None,
            warning: None,
            globals,
            next_frame: None,
        }
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        if self.ticking() {
            let deadline = *self
                .next_frame
                .get_or_insert_with(|| Instant::now() + consts::FRAME_PERIOD);
            let wait = deadline.saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                self.next_frame = None;
                self.advance();
                Ok(None)
            } else {
                Ok(self.handle_event(read()?))
            }
        } else {
            self.next_frame = None;
            Ok(self.handle_event(read()?))
        }
    }

    fn advance(&mut self) {
        let Some(report) = self.session.on_frame(&mut self.scores) else {
            return;
        };
        tracing::trace!(outcome = ?report.outcome, changed = ?report.changed, "Tick");
        if report.outcome.is_terminal() {
            self.next_frame = None;
        }
        if let Some(e) = report.save_error {
            self.warning = Some(Warning::from(e));
        }
    }
}

impl<R> Game<R> {
    /// Start the game with a warning pop-up shown and the clock stopped
    pub(crate) fn with_warning(mut self, warning: Option<Warning>) -> Self {
        self.warning = warning;
        self
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    /// Whether the frame clock is currently running
    fn ticking(&self) -> bool {
        self.session.running() && self.paused.is_none() && self.warning.is_none()
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        if event == Event::FocusLost {
            if self.ticking() {
                self.pause();
            }
            return None;
        }
        let cmd = Command::from_key_event(event.as_key_press_event()?)?;
        if let Some(warning) = self.warning.as_mut() {
            match warning.handle_command(cmd)? {
                WarningOutcome::Dismissed => self.warning = None,
                WarningOutcome::Quit => return Some(Screen::Quit),
            }
            return None;
        }
        if let Some(menu) = self.paused.as_mut() {
            match menu.handle_command(cmd)? {
                PauseOpt::Resume => self.paused = None,
                PauseOpt::Restart => return Some(self.restart()),
                PauseOpt::MainMenu => return Some(self.main_menu()),
                PauseOpt::Quit => return Some(Screen::Quit),
            }
            return None;
        }
        match (self.session.state(), cmd) {
            (_, Command::Quit) => return Some(Screen::Quit),
            (SessionState::Running, Command::Up) => self.session.turn(Direction::North),
            (SessionState::Running, Command::Left) => self.session.turn(Direction::West),
            (SessionState::Running, Command::Down) => self.session.turn(Direction::South),
            (SessionState::Running, Command::Right) => self.session.turn(Direction::East),
            (SessionState::Running, Command::Esc | Command::P) => self.pause(),
            (SessionState::Over | SessionState::Won, Command::R) => return Some(self.restart()),
            (SessionState::Over | SessionState::Won, Command::M) => {
                return Some(self.main_menu())
            }
            (SessionState::Over | SessionState::Won, Command::Q) => return Some(Screen::Quit),
            _ => (),
        }
        None
    }

    fn pause(&mut self) {
        tracing::debug!(score = self.session.score(), "Game paused");
        self.paused = Some(PauseMenu::new(self.session.score()));
    }

    fn restart(&self) -> Screen {
        Screen::Game(Game::new(self.globals.clone()))
    }

    fn main_menu(&self) -> Screen {
        Screen::Main(MainMenu::new(self.globals.clone()))
    }
}

/// Return the area in which to draw the bordered board within the area
/// between the score bar and the messages
fn board_area(area: Rect, board: Size) -> Rect {
    center_rect(
        area,
        Size {
            width: board.width.saturating_add(2),
            height: board.height.saturating_add(2),
        },
    )
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, field_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);

        let snake = self.session.snake();
        Line::styled(
            format!(" {}  Score: {}", self.session.player_name(), self.session.score()),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);
        Line::from(format!(
            "Time bonus: {:.1}/{:.1} ",
            snake.time_bonus(),
            snake.bonus_cap()
        ))
        .right_aligned()
        .render(score_area, buf);

        let grid = self.session.grid();
        let block_area = board_area(field_area, grid.size());
        if self.session.options().walls == BoundaryPolicy::Wrap {
            DottedBorder.render(block_area, buf);
        } else {
            Block::bordered().render(block_area, buf);
        }

        let mut canvas = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        if let Some(apple) = self.session.apple() {
            canvas.draw_cell(apple, consts::APPLE_SYMBOL, consts::APPLE_STYLE);
        }
        for &pos in snake.segments().iter().skip(1) {
            canvas.draw_cell(pos, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        // A fatal tick leaves the head where it was, so the collision marker
        // goes there.
        if self.session.state() == SessionState::Over {
            canvas.draw_cell(
                snake.head(),
                consts::COLLISION_SYMBOL,
                consts::COLLISION_STYLE,
            );
        } else {
            canvas.draw_cell(
                snake.head(),
                snake.direction().head_symbol(),
                consts::SNAKE_STYLE,
            );
        }

        match self.session.state() {
            SessionState::Running => (),
            SessionState::Over => {
                Line::from(format!(" GAME OVER: final score {}", self.session.score()))
                    .render(msg1_area, buf);
                choices_line().render(msg2_area, buf);
            }
            SessionState::Won => {
                Line::styled(
                    format!(" GAME WON! Final score {}", self.session.score()),
                    consts::VICTORY_STYLE,
                )
                .render(msg1_area, buf);
                choices_line().render(msg2_area, buf);
            }
        }

        if let Some(menu) = self.paused {
            menu.render(
                center_rect(
                    display,
                    Size {
                        width: PauseMenu::WIDTH,
                        height: PauseMenu::HEIGHT,
                    },
                ),
                buf,
            );
        }
        if let Some(ref warning) = self.warning {
            warning.render(display, buf);
        }
    }
}

fn choices_line() -> Line<'static> {
    Line::from_iter([
        Span::raw(" Restart ("),
        Span::styled("r", consts::KEY_STYLE),
        Span::raw(") · Main Menu ("),
        Span::styled("m", consts::KEY_STYLE),
        Span::raw(") · Quit ("),
        Span::styled("q", consts::KEY_STYLE),
        Span::raw(")"),
    ])
}

/// Draws cells of the board, given in board coordinates
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        let x = self.area.x.checked_add(pos.x)?;
        let y = self.area.y.checked_add(pos.y)?;
        self.buf.cell_mut((x, y))
    }

    fn draw_char(&mut self, pos: Position, symbol: char) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_char(symbol);
        }
    }

    fn draw_cell(&mut self, pos: Position, symbol: char, style: Style) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}

/// Border drawn around the board when the snake can pass through the edges
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder;

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let max_x = area.width.saturating_sub(1);
        let max_y = area.height.saturating_sub(1);
        let mut canvas = Canvas { area, buf };
        for corner in [
            Position::ORIGIN,
            Position::new(max_x, 0),
            Position::new(max_x, max_y),
            Position::new(0, max_y),
        ] {
            canvas.draw_char(corner, '·');
        }
        for x in 1..max_x {
            canvas.draw_char(Position::new(x, 0), '⋯');
            canvas.draw_char(Position::new(x, max_y), '⋯');
        }
        for y in 1..max_y {
            canvas.draw_char(Position::new(0, y), '⋮');
            canvas.draw_char(Position::new(max_x, y), '⋮');
        }
    }
}
