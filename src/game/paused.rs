use crate::command::Command;
use crate::consts;
use crate::util::EnumExt;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
};

/// Pop-up menu shown while the game is paused
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct PauseMenu {
    selection: PauseOpt,
    score: u32,
}

impl PauseMenu {
    pub(super) const HEIGHT: u16 = 8;
    pub(super) const WIDTH: u16 = 19;

    pub(super) fn new(score: u32) -> PauseMenu {
        PauseMenu {
            selection: PauseOpt::min(),
            score,
        }
    }

    /// Returns `Some` once the player has picked an option
    pub(super) fn handle_command(&mut self, cmd: Command) -> Option<PauseOpt> {
        match cmd {
            Command::Esc | Command::P => return Some(PauseOpt::Resume),
            Command::R => return Some(PauseOpt::Restart),
            Command::M => return Some(PauseOpt::MainMenu),
            Command::Q | Command::Quit => return Some(PauseOpt::Quit),
            Command::Enter | Command::Space => return Some(self.selection),
            Command::Up => self.selection = self.selection.prev().unwrap_or(self.selection),
            Command::Down => self.selection = self.selection.next().unwrap_or(self.selection),
            Command::Next => self.selection = self.selection.next().unwrap_or_else(PauseOpt::min),
            Command::Prev => self.selection = self.selection.prev().unwrap_or_else(PauseOpt::max),
            Command::Home => self.selection = PauseOpt::min(),
            Command::End => self.selection = PauseOpt::max(),
            _ => (),
        }
        None
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(super) enum PauseOpt {
    Resume,
    Restart,
    MainMenu,
    Quit,
}

impl PauseOpt {
    fn label(self) -> (&'static str, &'static str) {
        match self {
            PauseOpt::Resume => ("Resume", "Esc"),
            PauseOpt::Restart => ("Restart", "r"),
            PauseOpt::MainMenu => ("Main Menu", "m"),
            PauseOpt::Quit => ("Quit", "q"),
        }
    }

    fn to_line(self, selected: bool) -> Line<'static> {
        let (name, key) = self.label();
        let line = Line::from_iter([
            Span::raw(if selected { "» " } else { "  " }),
            Span::raw(format!("{name} (")),
            Span::styled(key, consts::KEY_STYLE),
            Span::raw(")"),
        ]);
        if selected {
            line.style(consts::MENU_SELECTION_STYLE)
        } else {
            line
        }
    }
}

impl Widget for PauseMenu {
    /*
     * ┌──── PAUSED ─────┐
     * │   Score: 120    │
     * │                 │
     * │ » Resume (Esc)  │
     * │   Restart (r)   │
     * │   Main Menu (m) │
     * │   Quit (q)      │
     * └─────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        block.render(area, buf);
        let [score_area, opts_area] = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)])
            .spacing(1)
            .areas(inner);
        Line::from(format!("Score: {}", self.score))
            .centered()
            .render(score_area, buf);
        for (opt, row) in PauseOpt::iter().zip(opts_area.rows()) {
            opt.to_line(self.selection == opt).render(row, buf);
        }
    }
}
