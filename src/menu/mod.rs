mod widgets;
use self::widgets::{Instructions, Logo, TextInput};
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::game::Game;
use crate::options::{Adjustable, OptKey, OptValue, Options};
use crate::scoreboard::Scoreboard;
use crate::util::{get_display_area, EnumExt, Globals};
use crate::warning::{Warning, WarningOutcome};
use crossterm::event::{read, Event};
use enum_map::{Enum, EnumMap};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
    Frame,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MainMenu {
    selection: Selection,
    name: TextInput,
    options: OptionsMenu,
    globals: Globals,
    warning: Option<Warning>,
}

impl MainMenu {
    pub(crate) fn new(globals: Globals) -> Self {
        MainMenu {
            selection: Selection::default(),
            name: TextInput::new(&globals.player_name),
            options: OptionsMenu::new(globals.options),
            globals,
            warning: None,
        }
    }

    pub(crate) fn with_warning(mut self, warning: Option<Warning>) -> Self {
        self.warning = warning;
        self
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?))
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        let ev = event.as_key_press_event()?;
        if let Some(warning) = self.warning.as_mut() {
            match warning.handle_command(Command::from_key_event(ev)?)? {
                WarningOutcome::Dismissed => self.warning = None,
                WarningOutcome::Quit => return Some(Screen::Quit),
            }
            return None;
        }
        if self.selection == Selection::NameInput && self.name.handle_key(ev) {
            return None;
        }
        match (self.selection, Command::from_key_event(ev)?) {
            (_, Command::Quit) => return Some(Screen::Quit),
            (_, Command::Home) => self.select(Selection::NameInput, None),
            (_, Command::End) => self.select(Selection::QuitButton, None),
            (Selection::NameInput, Command::Up | Command::Prev) => {
                self.select(Selection::QuitButton, None);
            }
            (Selection::NameInput, Command::Down | Command::Next | Command::Enter) => {
                self.select(Selection::PlayButton, None);
            }
            (Selection::PlayButton, Command::Enter) | (_, Command::P) => return Some(self.play()),
            (Selection::PlayButton, Command::Up | Command::Prev) => {
                self.select(Selection::NameInput, None);
            }
            (Selection::PlayButton, Command::Down | Command::Next) => {
                self.select(Selection::Options, Some(true));
            }
            (Selection::Options, Command::Up | Command::Prev) => {
                if let Some(sel) = self.options.move_up() {
                    self.select(sel, None);
                }
            }
            (Selection::Options, Command::Down | Command::Next) => {
                if let Some(sel) = self.options.move_down() {
                    self.select(sel, None);
                }
            }
            (Selection::Options, Command::Left) => self.options.move_left(),
            (Selection::Options, Command::Right) => self.options.move_right(),
            (Selection::Options, Command::Space | Command::Enter) => self.options.toggle(),
            (Selection::ScoresButton, Command::Enter) | (_, Command::S) => {
                return Some(self.scores());
            }
            (Selection::ScoresButton, Command::Up | Command::Prev) => {
                self.select(Selection::Options, Some(false));
            }
            (Selection::ScoresButton, Command::Down | Command::Next) => {
                self.select(Selection::QuitButton, None);
            }
            (Selection::QuitButton, Command::Enter) | (_, Command::Q) => {
                return Some(Screen::Quit);
            }
            (Selection::QuitButton, Command::Up | Command::Prev) => {
                self.select(Selection::ScoresButton, None);
            }
            (Selection::QuitButton, Command::Down | Command::Next) => {
                self.select(Selection::NameInput, None);
            }
            _ => (),
        }
        None
    }

    /// Copy the menu's settings into the globals
    fn commit(&mut self) {
        let name = self.name.value().trim();
        self.globals.player_name = if name.is_empty() {
            String::from(consts::DEFAULT_PLAYER_NAME)
        } else {
            name.to_owned()
        };
        self.globals.options = self.options.to_options();
    }

    fn play(&mut self) -> Screen {
        self.commit();
        let warning = match self.globals.config.save_options(self.globals.options) {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(error = %e, "Failed to save options");
                Some(Warning::from(e))
            }
        };
        Screen::Game(Game::new(self.globals.clone()).with_warning(warning))
    }

    fn scores(&mut self) -> Screen {
        self.commit();
        Screen::Scores(Scoreboard::new(self.globals.clone()))
    }

    fn select(&mut self, selection: Selection, first_option: Option<bool>) {
        self.selection = selection;
        if selection == Selection::Options {
            self.options.selection = first_option.map(|first| {
                if first {
                    OptKey::min()
                } else {
                    OptKey::max()
                }
            });
        } else {
            self.options.selection = None;
        }
    }
}

/// Render a `[Label (k)]` button
fn button(label: &str, key: &'static str, selected: bool) -> Line<'static> {
    let style = if selected {
        consts::MENU_SELECTION_STYLE
    } else {
        Style::new()
    };
    Line::from_iter([
        Span::styled(format!("[{label} ("), style),
        Span::styled(key, consts::KEY_STYLE.patch(style)),
        Span::styled(")]", style),
    ])
    .centered()
}

impl Widget for &MainMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [logo_area, instructions_area, name_area, play_area, options_area, scores_area, quit_area] =
            Layout::vertical([
                Logo::HEIGHT,
                Instructions::HEIGHT,
                1,
                1,
                OptionsMenu::HEIGHT,
                1,
                1,
            ])
            .flex(Flex::Start)
            .spacing(1)
            .areas(display);

        let [logo_area] = Layout::horizontal([Logo::WIDTH])
            .flex(Flex::Center)
            .areas(logo_area);
        Logo.render(logo_area, buf);

        let [instructions_area] = Layout::horizontal([Instructions::WIDTH])
            .flex(Flex::Center)
            .areas(instructions_area);
        Instructions.render(instructions_area, buf);

        self.name
            .render_with(self.selection == Selection::NameInput, name_area, buf);

        button("Play", "p", self.selection == Selection::PlayButton).render(play_area, buf);

        let [options_area] = Layout::horizontal([OptionsMenu::WIDTH])
            .flex(Flex::Center)
            .areas(options_area);
        (&self.options).render(options_area, buf);

        button("Scores", "S", self.selection == Selection::ScoresButton).render(scores_area, buf);
        button("Quit", "q", self.selection == Selection::QuitButton).render(quit_area, buf);

        if let Some(ref warning) = self.warning {
            warning.render(display, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Selection {
    NameInput,
    #[default]
    PlayButton,
    Options,
    ScoresButton,
    QuitButton,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct OptionsMenu {
    /// The key of the selected option, if the selection is within this box
    selection: Option<OptKey>,
    settings: EnumMap<OptKey, OptValue>,
}

impl OptionsMenu {
    #[allow(clippy::cast_possible_truncation)]
    const HEIGHT: u16 = (OptKey::LENGTH as u16) + 2;
    const HORIZONTAL_PADDING: u16 = 1;
    const POINTER_WIDTH: u16 = 2;
    const LABEL_VALUE_GUTTER: u16 = 2;
    const WIDTH: u16 = 2
        + 2 * Self::HORIZONTAL_PADDING
        + Self::POINTER_WIDTH
        + OptKey::DISPLAY_WIDTH
        + Self::LABEL_VALUE_GUTTER
        + OptValue::DISPLAY_WIDTH;

    fn new(options: Options) -> Self {
        OptionsMenu {
            selection: None,
            settings: EnumMap::from_fn(|key| options.get(key)),
        }
    }

    fn to_options(&self) -> Options {
        let mut opts = Options::default();
        for (key, &value) in &self.settings {
            opts.set(key, value);
        }
        opts
    }

    fn move_up(&mut self) -> Option<Selection> {
        self.selection = self.selection?.prev();
        self.selection.is_none().then_some(Selection::PlayButton)
    }

    fn move_down(&mut self) -> Option<Selection> {
        self.selection = self.selection?.next();
        self.selection.is_none().then_some(Selection::ScoresButton)
    }

    fn move_left(&mut self) {
        if let Some(sel) = self.selection {
            self.settings[sel].decrease();
        }
    }

    fn move_right(&mut self) {
        if let Some(sel) = self.selection {
            self.settings[sel].increase();
        }
    }

    fn toggle(&mut self) {
        if let Some(sel) = self.selection {
            self.settings[sel].toggle();
        }
    }
}

impl Widget for &OptionsMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Options: ")
            .padding(Padding::horizontal(OptionsMenu::HORIZONTAL_PADDING));
        let menu_area = block.inner(area);
        block.render(area, buf);
        for ((key, value), row) in self.settings.iter().zip(menu_area.rows()) {
            let selected = Some(key) == self.selection;
            let style = if selected {
                consts::MENU_SELECTION_STYLE
            } else {
                Style::new()
            };
            let s = format!(
                "{pointer:pwidth$}{key:lwidth$}{space:gutter$}{value}",
                pointer = if selected { "»" } else { "" },
                pwidth = usize::from(OptionsMenu::POINTER_WIDTH),
                lwidth = usize::from(OptKey::DISPLAY_WIDTH),
                space = "",
                gutter = usize::from(OptionsMenu::LABEL_VALUE_GUTTER),
            );
            Span::styled(s, style).render(row, buf);
        }
    }
}
