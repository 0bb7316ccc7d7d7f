use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::menu::MainMenu;
use crate::options::{Adjustable, BoardSize, OptKey, OptValue, Speed};
use crate::scores::{ScoreRecord, Scores};
use crate::util::{get_display_area, Globals, LoadError};
use crate::warning::{Warning, WarningOutcome};
use crossterm::event::{read, Event};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::Widget,
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// The high score screen
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Scoreboard {
    globals: Globals,
    scores: Scores,
    speed: Speed,
    board_size: BoardSize,
    view: View,
    warning: Option<Warning>,
}

impl Scoreboard {
    const RANK_WIDTH: usize = 2;
    const SCORE_WIDTH: usize = 6;
    const TABLE_WIDTH: u16 = {
        #[allow(clippy::cast_possible_truncation)]
        let w = (Self::RANK_WIDTH + 2 + consts::MAX_PLAYER_NAME_LEN + 2 + Self::SCORE_WIDTH) as u16;
        w
    };

    /// Show the scores recorded in the configured score log, starting with
    /// the currently selected speed & board size
    pub(crate) fn new(globals: Globals) -> Scoreboard {
        let loaded = globals.config.score_log().load();
        Scoreboard::from_loaded(globals, loaded)
    }

    fn from_loaded(globals: Globals, loaded: Result<Scores, LoadError>) -> Scoreboard {
        let (scores, warning) = match loaded {
            Ok(scores) => {
                tracing::debug!(records = scores.len(), "Loaded score log");
                (scores, None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load score log");
                (Scores::default(), Some(Warning::from(e)))
            }
        };
        Scoreboard {
            speed: globals.options.speed,
            board_size: globals.options.board_size,
            globals,
            scores,
            view: View::default(),
            warning,
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?))
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        let cmd = Command::from_key_event(event.as_key_press_event()?)?;
        if let Some(warning) = self.warning.as_mut() {
            match warning.handle_command(cmd)? {
                WarningOutcome::Dismissed => self.warning = None,
                WarningOutcome::Quit => return Some(Screen::Quit),
            }
            return None;
        }
        match cmd {
            Command::Quit | Command::Q => return Some(Screen::Quit),
            Command::Esc | Command::Enter | Command::M => {
                return Some(Screen::Main(MainMenu::new(self.globals.clone())));
            }
            Command::Left => self.speed.decrease(),
            Command::Right => self.speed.increase(),
            Command::Up => self.board_size.decrease(),
            Command::Down => self.board_size.increase(),
            Command::Next | Command::Prev | Command::Space => self.view = self.view.toggled(),
            _ => (),
        }
        None
    }

    fn entries(&self) -> Vec<&ScoreRecord> {
        match self.view {
            View::Best => {
                self.scores
                    .leaderboard(self.speed, self.board_size, consts::LEADERBOARD_SIZE)
            }
            View::Recent => {
                self.scores
                    .history(self.speed, self.board_size, consts::LEADERBOARD_SIZE)
            }
        }
    }

    fn table_row(rank: &str, name: &str, score: &str) -> String {
        format!(
            "{rank:>rwidth$}  {name}  {score:>swidth$}",
            rwidth = Self::RANK_WIDTH,
            name = fit(name, consts::MAX_PLAYER_NAME_LEN),
            swidth = Self::SCORE_WIDTH,
        )
    }
}

/// Truncate or pad `s` to exactly `width` terminal columns
fn fit(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for g in s.graphemes(true) {
        let w = g.width();
        if used + w > width {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

fn selector(key: OptKey, value: OptValue) -> String {
    format!(
        "{key:kwidth$}  {value}",
        kwidth = usize::from(OptKey::DISPLAY_WIDTH)
    )
}

impl Widget for &Scoreboard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [title_area, _, speed_area, size_area, _, view_area, _, header_area, table_area, _, footer_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(
                    u16::try_from(consts::LEADERBOARD_SIZE).unwrap_or(u16::MAX),
                ),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .areas(display);

        Line::from("HIGH SCORES")
            .style(consts::VICTORY_STYLE)
            .centered()
            .render(title_area, buf);
        Line::from(selector(OptKey::Speed, self.speed.into()))
            .centered()
            .render(speed_area, buf);
        Line::from(selector(OptKey::BoardSize, self.board_size.into()))
            .centered()
            .render(size_area, buf);

        let style_for = |view: View| {
            if view == self.view {
                consts::MENU_SELECTION_STYLE
            } else {
                Style::new()
            }
        };
        Line::from_iter([
            Span::styled("Best", style_for(View::Best)),
            Span::raw("  ·  "),
            Span::styled("Recent", style_for(View::Recent)),
        ])
        .centered()
        .render(view_area, buf);

        let [header_area] = Layout::horizontal([Scoreboard::TABLE_WIDTH])
            .flex(Flex::Center)
            .areas(header_area);
        let [table_area] = Layout::horizontal([Scoreboard::TABLE_WIDTH])
            .flex(Flex::Center)
            .areas(table_area);
        Line::from(Scoreboard::table_row("#", "Player", "Score")).render(header_area, buf);
        let entries = self.entries();
        if entries.is_empty() {
            Line::from("No games yet").centered().render(table_area, buf);
        } else {
            Text::from_iter(entries.into_iter().enumerate().map(|(i, rec)| {
                Line::from(Scoreboard::table_row(
                    &(i + 1).to_string(),
                    &rec.player_name,
                    &rec.score.to_string(),
                ))
            }))
            .render(table_area, buf);
        }

        let mut footer = Line::default();
        for (i, (label, key)) in [
            ("Speed", "←/→"),
            ("Board", "↑/↓"),
            ("View", "Tab"),
            ("Back", "m"),
            ("Quit", "q"),
        ]
        .into_iter()
        .enumerate()
        {
            if i > 0 {
                footer.push_span(" · ");
            }
            footer.push_span(format!("{label} ("));
            footer.push_span(Span::styled(key, consts::KEY_STYLE));
            footer.push_span(")");
        }
        footer.centered().render(footer_area, buf);

        if let Some(ref warning) = self.warning {
            warning.render(display, buf);
        }
    }
}

/// Which list of scores is shown
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum View {
    /// Each player's best score
    #[default]
    Best,

    /// The latest games
    Recent,
}

impl View {
    fn toggled(self) -> View {
        match self {
            View::Best => View::Recent,
            View::Recent => View::Best,
        }
    }
}
