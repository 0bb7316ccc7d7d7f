use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key press, translated into what it means to the interface
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Esc,
    Backspace,
    Home,
    End,
    Next,
    Prev,
    M,
    P,
    Q,
    R,
    S,
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Command::Quit),
            (KeyModifiers::NONE, KeyCode::Char('w' | 'k' | '8') | KeyCode::Up) => Some(Command::Up),
            (KeyModifiers::NONE, KeyCode::Char('s' | 'j' | '2') | KeyCode::Down) => {
                Some(Command::Down)
            }
            (KeyModifiers::NONE, KeyCode::Char('a' | 'h' | '4') | KeyCode::Left) => {
                Some(Command::Left)
            }
            (KeyModifiers::NONE, KeyCode::Char('d' | 'l' | '6') | KeyCode::Right) => {
                Some(Command::Right)
            }
            (_, KeyCode::Enter) => Some(Command::Enter),
            (KeyModifiers::NONE, KeyCode::Char(' ')) => Some(Command::Space),
            (_, KeyCode::Esc) => Some(Command::Esc),
            (_, KeyCode::Backspace) => Some(Command::Backspace),
            (_, KeyCode::Home) => Some(Command::Home),
            (_, KeyCode::End) => Some(Command::End),
            (_, KeyCode::Tab) => Some(Command::Next),
            (_, KeyCode::BackTab) => Some(Command::Prev),
            (KeyModifiers::NONE, KeyCode::Char('m')) => Some(Command::M),
            (KeyModifiers::NONE, KeyCode::Char('p')) => Some(Command::P),
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Command::Q),
            (KeyModifiers::NONE, KeyCode::Char('r')) => Some(Command::R),
            (KeyModifiers::SHIFT, KeyCode::Char('S')) => Some(Command::S),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(KeyCode::Up, KeyModifiers::NONE, Some(Command::Up))]
    #[case(KeyCode::Char('k'), KeyModifiers::NONE, Some(Command::Up))]
    #[case(KeyCode::Char('8'), KeyModifiers::NONE, Some(Command::Up))]
    #[case(KeyCode::Char('a'), KeyModifiers::NONE, Some(Command::Left))]
    #[case(KeyCode::Char('s'), KeyModifiers::NONE, Some(Command::Down))]
    #[case(KeyCode::Char('S'), KeyModifiers::SHIFT, Some(Command::S))]
    #[case(KeyCode::Char('c'), KeyModifiers::CONTROL, Some(Command::Quit))]
    #[case(KeyCode::Char('c'), KeyModifiers::NONE, None)]
    #[case(KeyCode::Esc, KeyModifiers::NONE, Some(Command::Esc))]
    #[case(KeyCode::BackTab, KeyModifiers::SHIFT, Some(Command::Prev))]
    #[case(KeyCode::Char('r'), KeyModifiers::NONE, Some(Command::R))]
    fn from_key_event(
        #[case] code: KeyCode,
        #[case] modifiers: KeyModifiers,
        #[case] cmd: Option<Command>,
    ) {
        assert_eq!(Command::from_key_event(KeyEvent::new(code, modifiers)), cmd);
    }
}
