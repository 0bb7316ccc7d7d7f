use crate::consts;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::Widget,
};
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Logo;

impl Logo {
    const TEXT_WIDTH: u16 = 28;
    const DIAGRAM_GUTTER: u16 = 2;
    const SNAKE_BODY_LENGTH: u16 = 5;
    const APPLE_GUTTER: u16 = 2;
    const DIAGRAM_WIDTH: u16 = Self::SNAKE_BODY_LENGTH + 1 + Self::APPLE_GUTTER + 1;
    pub(super) const HEIGHT: u16 = 5;
    pub(super) const WIDTH: u16 = Self::TEXT_WIDTH + Self::DIAGRAM_GUTTER + Self::DIAGRAM_WIDTH;

    #[rustfmt::skip]
    const TEXT: [&'static str; Self::HEIGHT as usize] = [
         " ____              _        ",
         "/ ___| _ __   __ _| | _____ ",
        r"\___ \| '_ \ / _` | |/ / _ \",
         " ___) | | | | (_| |   <  __/",
        r"|____/|_| |_|\__,_|_|\_\___|",
    ];
}

impl Widget for Logo {
    /*
     *  ____              _
     * / ___| _ __   __ _| | _____
     * \___ \| '_ \ / _` | |/ / _ \
     *  ___) | | | | (_| |   <  __/
     * |____/|_| |_|\__,_|_|\_\___|  ⚬⚬⚬⚬⚬<  ●
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let [text_area, _, diagram_area] = Layout::horizontal([
            Self::TEXT_WIDTH,
            Self::DIAGRAM_GUTTER,
            Self::DIAGRAM_WIDTH,
        ])
        .flex(Flex::Start)
        .areas(area);
        Text::from_iter(Self::TEXT)
            .style(consts::SNAKE_STYLE)
            .render(text_area, buf);
        let diagram_row = Rect {
            y: diagram_area.y + Self::HEIGHT - 1,
            height: 1,
            ..diagram_area
        }
        .intersection(area);
        let [body_area, head_area, _, apple_area] = Layout::horizontal([
            Constraint::Length(Self::SNAKE_BODY_LENGTH),
            Constraint::Length(1),
            Constraint::Length(Self::APPLE_GUTTER),
            Constraint::Length(1),
        ])
        .flex(Flex::Start)
        .areas(diagram_row);
        for (cells, symbol, style) in [
            (body_area, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE),
            (head_area, consts::SNAKE_HEAD_EAST_SYMBOL, consts::SNAKE_STYLE),
            (apple_area, consts::APPLE_SYMBOL, consts::APPLE_STYLE),
        ] {
            for p in cells.positions() {
                if let Some(cell) = buf.cell_mut(p) {
                    cell.set_char(symbol);
                    cell.set_style(style);
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Instructions;

impl Instructions {
    pub(super) const HEIGHT: u16 = 3;
    pub(super) const WIDTH: u16 = 39;

    fn keys(keys: [&'static str; 4]) -> impl Iterator<Item = Span<'static>> {
        keys.into_iter().enumerate().flat_map(|(i, k)| {
            let sep = if i == 0 { "" } else { " " };
            [Span::raw(sep), Span::styled(k, consts::KEY_STYLE)]
        })
    }
}

impl Widget for Instructions {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut moves = Line::from("Move: ");
        for (i, group) in [["←", "↓", "↑", "→"], ["h", "j", "k", "l"], ["a", "s", "w", "d"]]
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                moves.push_span("  or  ");
            }
            for span in Self::keys(group) {
                moves.push_span(span);
            }
        }
        let text = Text::from_iter([
            moves,
            Line::from("Eat apples fast for a bigger bonus,"),
            Line::from("and don't bite your own tail!"),
        ]);
        debug_assert_eq!(text.height(), usize::from(Self::HEIGHT), "height mismatch");
        debug_assert_eq!(text.width(), usize::from(Self::WIDTH), "width mismatch");
        text.render(area, buf);
    }
}

/// A single-line text field for the player's name
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct TextInput {
    value: String,
}

impl TextInput {
    /// Display width of the field, including room for the cursor
    pub(super) const WIDTH: u16 = {
        #[allow(clippy::cast_possible_truncation)]
        let w = consts::MAX_PLAYER_NAME_LEN as u16;
        w + 1
    };

    pub(super) fn new(value: &str) -> TextInput {
        let mut input = TextInput {
            value: String::new(),
        };
        for ch in value.chars() {
            input.push(ch);
        }
        input
    }

    pub(super) fn value(&self) -> &str {
        &self.value
    }

    /// Append a character if it is printable and the result still fits in
    /// [`MAX_PLAYER_NAME_LEN`][consts::MAX_PLAYER_NAME_LEN] columns.  Returns
    /// `true` if the character was added.
    pub(super) fn push(&mut self, ch: char) -> bool {
        if ch.general_category_group() == GeneralCategoryGroup::Other {
            return false;
        }
        let mut candidate = self.value.clone();
        candidate.push(ch);
        if candidate.width() > consts::MAX_PLAYER_NAME_LEN {
            return false;
        }
        self.value = candidate;
        true
    }

    /// Remove the last grapheme cluster
    pub(super) fn pop(&mut self) {
        if let Some((i, _)) = self.value.grapheme_indices(true).next_back() {
            self.value.truncate(i);
        }
    }

    /// Handle a key press while the field has focus.  Returns `true` if the
    /// key was consumed.
    pub(super) fn handle_key(&mut self, ev: KeyEvent) -> bool {
        match (ev.modifiers, ev.code) {
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(ch)) => {
                self.push(ch);
                true
            }
            (_, KeyCode::Backspace) => {
                self.pop();
                true
            }
            _ => false,
        }
    }

    pub(super) fn render_with(&self, focused: bool, area: Rect, buf: &mut Buffer) {
        let style = if focused {
            consts::MENU_SELECTION_STYLE
        } else {
            Style::new()
        };
        let mut field = self.value.clone();
        if focused {
            field.push('_');
        }
        let padding = usize::from(Self::WIDTH).saturating_sub(field.width());
        field.extend(std::iter::repeat_n(' ', padding));
        Line::from_iter([
            Span::raw("Name: ["),
            Span::styled(field, style),
            Span::raw("]"),
        ])
        .centered()
        .render(area, buf);
    }
}
