use crate::command::Command;
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect, Size},
    text::{Line, Text},
    widgets::{
        block::{Block, Padding},
        Clear, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use std::borrow::Cow;

/// Pop-up describing a non-fatal error and its causes
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Warning {
    lines: Vec<String>,
    scroll_offset: usize,
    max_scroll: usize,
}

impl Warning {
    const MAX_LINES: u16 = 16;
    const TEXT_WIDTH: u16 = 48;
    const WIDTH: u16 = Self::TEXT_WIDTH + 4;

    pub(crate) fn handle_command(&mut self, cmd: Command) -> Option<WarningOutcome> {
        match cmd {
            Command::Enter | Command::Esc => return Some(WarningOutcome::Dismissed),
            Command::Quit => return Some(WarningOutcome::Quit),
            Command::Up if self.scrolling() => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            Command::Down if self.scrolling() => {
                if self.scroll_offset + 1 < self.max_scroll {
                    self.scroll_offset += 1;
                }
            }
            _ => (),
        }
        None
    }

    fn scrolling(&self) -> bool {
        self.lines.len() > usize::from(Self::MAX_LINES)
    }

    /// Build a warning from an error message followed by the messages of its
    /// causes, outermost first
    fn from_messages(msgs: Vec<String>) -> Warning {
        let mut msgs = msgs.into_iter();
        let mut lines = Vec::new();
        wrap_into(
            &mut lines,
            &msgs.next().unwrap_or_else(|| String::from("Unknown error")),
            "",
            "",
        );
        let causes = msgs.collect::<Vec<_>>();
        if !causes.is_empty() {
            lines.push(String::new());
            lines.push(String::from("Caused by:"));
            if let [cause] = causes.as_slice() {
                wrap_into(&mut lines, cause, "    ", "    ");
            } else {
                for (i, cause) in causes.iter().enumerate() {
                    wrap_into(&mut lines, cause, &format!("{i:>5}: "), "       ");
                }
            }
        }
        let max_scroll = lines
            .len()
            .saturating_sub(usize::from(Warning::MAX_LINES) - 1);
        Warning {
            lines,
            scroll_offset: 0,
            max_scroll,
        }
    }
}

fn wrap_into(lines: &mut Vec<String>, text: &str, initial_indent: &str, subsequent_indent: &str) {
    let opts = textwrap::Options::new(usize::from(Warning::TEXT_WIDTH))
        .break_words(true)
        .initial_indent(initial_indent)
        .subsequent_indent(subsequent_indent);
    lines.extend(textwrap::wrap(text, opts).into_iter().map(Cow::into_owned));
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WarningOutcome {
    Dismissed,
    Quit,
}

impl<E: std::error::Error> From<E> for Warning {
    fn from(e: E) -> Warning {
        let mut msgs = vec![e.to_string()];
        let mut source = e.source();
        while let Some(src) = source {
            msgs.push(src.to_string());
            source = src.source();
        }
        Warning::from_messages(msgs)
    }
}

impl Widget for &Warning {
    // `area` is the whole display, not just the pop-up.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = u16::try_from(self.lines.len())
            .unwrap_or(u16::MAX)
            .min(Warning::MAX_LINES)
            .saturating_add(4);
        let block_area = center_rect(
            area,
            Size {
                width: Warning::WIDTH.saturating_add(u16::from(self.scrolling()) * 2),
                height,
            },
        );
        let block = Block::bordered()
            .title(" WARNING ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let [text_area, ok_area] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
            .flex(Flex::Start)
            .spacing(1)
            .areas(block.inner(block_area));
        Clear.render(block_area, buf);
        block.render(block_area, buf);
        if self.scrolling() {
            let [text_area, scrollbar_area] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(1)])
                    .flex(Flex::Start)
                    .spacing(1)
                    .areas(text_area);
            Text::from_iter(
                self.lines
                    .iter()
                    .skip(self.scroll_offset)
                    .take(usize::from(Warning::MAX_LINES))
                    .map(String::as_str),
            )
            .render(text_area, buf);
            let mut scroll_state =
                ScrollbarState::new(self.max_scroll).position(self.scroll_offset);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .track_symbol(Some(ratatui::symbols::shade::MEDIUM))
                .render(scrollbar_area, buf, &mut scroll_state);
        } else {
            Text::from_iter(self.lines.iter().map(String::as_str)).render(text_area, buf);
        }
        Line::from("[OK]").centered().render(ok_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::SaveError;
    use pretty_assertions::assert_eq;

    #[test]
    fn chain_of_causes() {
        let e = SaveError::write("score", std::io::Error::other("disk full"));
        let warning = Warning::from(e);
        assert_eq!(
            warning.lines,
            [
                "failed to save score to disk",
                "",
                "Caused by:",
                "    0: failed to write file",
                "    1: disk full",
            ]
        );
        assert!(!warning.scrolling());
    }

    #[test]
    fn single_cause() {
        let warning = Warning::from(SaveError::no_path("options"));
        assert_eq!(
            warning.lines,
            [
                "failed to save options to disk",
                "",
                "Caused by:",
                "    failed to determine path to local data directory",
            ]
        );
    }

    #[test]
    fn dismiss() {
        let mut warning = Warning::from_messages(vec![String::from("oops")]);
        assert_eq!(warning.handle_command(Command::Down), None);
        assert_eq!(warning.scroll_offset, 0);
        assert_eq!(
            warning.handle_command(Command::Enter),
            Some(WarningOutcome::Dismissed)
        );
        assert_eq!(
            warning.handle_command(Command::Quit),
            Some(WarningOutcome::Quit)
        );
    }

    #[test]
    fn scroll_limits() {
        let msgs = (0..20).map(|i| format!("problem {i}")).collect::<Vec<_>>();
        let mut warning = Warning::from_messages(msgs);
        assert!(warning.scrolling());
        // 1 + 2 + 19 lines, 15 visible at once
        assert_eq!(warning.max_scroll, 7);
        assert_eq!(warning.handle_command(Command::Up), None);
        assert_eq!(warning.scroll_offset, 0);
        for _ in 0..10 {
            assert_eq!(warning.handle_command(Command::Down), None);
        }
        assert_eq!(warning.scroll_offset, 6);
    }

    #[test]
    fn render_no_cause() {
        let warning = Warning::from_messages(vec![String::from("Could not record score")]);
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        warning.render(area, &mut buffer);
        let expected = Buffer::with_lines([
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "              ┌──────────────────── WARNING ─────────────────────┐              ",
            "              │ Could not record score                           │              ",
            "              │                                                  │              ",
            "              │                       [OK]                       │              ",
            "              └──────────────────────────────────────────────────┘              ",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
        ]);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn render_wrapped_causes() {
        let warning = Warning::from_messages(vec![
            String::from("The snake could not be saved because the disk is entirely full of apples"),
            String::from("no space left on device"),
            String::from("write failed"),
        ]);
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        warning.render(area, &mut buffer);
        let expected = Buffer::with_lines([
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "              ┌──────────────────── WARNING ─────────────────────┐              ",
            "              │ The snake could not be saved because the disk is │              ",
            "              │ entirely full of apples                          │              ",
            "              │                                                  │              ",
            "              │ Caused by:                                       │              ",
            "              │     0: no space left on device                   │              ",
            "              │     1: write failed                              │              ",
            "              │                                                  │              ",
            "              │                       [OK]                       │              ",
            "              └──────────────────────────────────────────────────┘              ",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
        ]);
        assert_eq!(buffer, expected);
    }
}
