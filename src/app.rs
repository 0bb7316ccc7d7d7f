use crate::game::Game;
use crate::menu::MainMenu;
use crate::scoreboard::Scoreboard;
use crate::util::Globals;
use crate::warning::Warning;
use ratatui::{backend::Backend, Terminal};
use std::io;

#[derive(Clone, Debug)]
pub(crate) struct App {
    screen: Screen,
}

impl App {
    /// Start at the main menu, showing `warning` over it if given
    pub(crate) fn new(globals: Globals, warning: Option<Warning>) -> App {
        let screen = Screen::Main(MainMenu::new(globals).with_warning(warning));
        App { screen }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        tracing::info!("Exiting");
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        match self.screen {
            Screen::Main(ref menu) => {
                terminal.draw(|frame| menu.draw(frame))?;
            }
            Screen::Game(ref game) => {
                terminal.draw(|frame| game.draw(frame))?;
            }
            Screen::Scores(ref board) => {
                terminal.draw(|frame| board.draw(frame))?;
            }
            Screen::Quit => (),
        }
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        let next = match self.screen {
            Screen::Main(ref mut menu) => menu.process_input()?,
            Screen::Game(ref mut game) => game.process_input()?,
            Screen::Scores(ref mut board) => board.process_input()?,
            Screen::Quit => None,
        };
        if let Some(screen) = next {
            tracing::debug!(screen = screen.name(), "Switching screens");
            self.screen = screen;
        }
        Ok(())
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}

/// The screen currently shown, and its state
#[derive(Clone, Debug)]
pub(crate) enum Screen {
    Main(MainMenu),
    Game(Game),
    Scores(Scoreboard),
    Quit,
}

impl Screen {
    fn name(&self) -> &'static str {
        match self {
            Screen::Main(_) => "main",
            Screen::Game(_) => "game",
            Screen::Scores(_) => "scores",
            Screen::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::backend::TestBackend;

    #[test]
    fn draw_each_screen() {
        let globals = Globals {
            config: Config::offline(),
            player_name: String::from("Player"),
            ..Globals::default()
        };
        for screen in [
            Screen::Main(MainMenu::new(globals.clone())),
            Screen::Game(Game::new(globals.clone())),
            Screen::Scores(Scoreboard::new(globals)),
        ] {
            let name = screen.name();
            let app = App { screen };
            let mut terminal =
                Terminal::new(TestBackend::new(80, 24)).expect("test terminal should open");
            app.draw(&mut terminal).expect("drawing should succeed");
            assert!(!app.quitting(), "{name}");
        }
    }
}
