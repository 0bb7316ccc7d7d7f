use crate::consts;
use crate::util::{data_file_path, EnumExt, LoadError, SaveError};
use enum_dispatch::enum_dispatch;
use enum_map::Enum;
use ratatui::layout::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Gameplay options chosen in the main menu
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Options {
    pub(crate) speed: Speed,
    pub(crate) board_size: BoardSize,
    pub(crate) walls: BoundaryPolicy,
}

impl Options {
    /// Return the default path at which the most recently used options are
    /// stored
    pub(crate) fn default_path() -> Option<PathBuf> {
        data_file_path("options.json")
    }

    /// Read options from a JSON file.  Returns `Ok(None)` if the file does
    /// not exist.
    pub(crate) fn load(path: &Path) -> Result<Option<Options>, LoadError> {
        let src = match fs_err::read(path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LoadError::read("options", e)),
        };
        serde_json::from_slice(&src)
            .map(Some)
            .map_err(|e| LoadError::deserialize("options", e))
    }

    /// Write the options to a JSON file, creating parent directories as
    /// needed
    pub(crate) fn save(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(|e| SaveError::mkdir("options", e))?;
        }
        let mut src =
            serde_json::to_string(self).map_err(|e| SaveError::serialize("options", e))?;
        src.push('\n');
        fs_err::write(path, &src).map_err(|e| SaveError::write("options", e))?;
        Ok(())
    }

    pub(crate) fn get(&self, key: OptKey) -> OptValue {
        match key {
            OptKey::Speed => self.speed.into(),
            OptKey::BoardSize => self.board_size.into(),
            OptKey::Walls => self.walls.into(),
        }
    }

    pub(crate) fn set(&mut self, key: OptKey, value: OptValue) {
        match key {
            OptKey::Speed => {
                self.speed = value
                    .try_into()
                    .expect("Options::set(Speed, value) called with non-Speed value");
            }
            OptKey::BoardSize => {
                self.board_size = value
                    .try_into()
                    .expect("Options::set(BoardSize, value) called with non-BoardSize value");
            }
            OptKey::Walls => {
                self.walls = value
                    .try_into()
                    .expect("Options::set(Walls, value) called with non-BoundaryPolicy value");
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum OptKey {
    Speed,
    BoardSize,
    Walls,
}

impl OptKey {
    pub(crate) const DISPLAY_WIDTH: u16 = 10;

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            OptKey::Speed => "Speed",
            OptKey::BoardSize => "Board Size",
            OptKey::Walls => "Walls",
        }
    }
}

impl fmt::Display for OptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An option value that can be stepped through with the arrow keys
#[enum_dispatch]
pub(crate) trait Adjustable {
    fn increase(&mut self);
    fn decrease(&mut self);
    fn toggle(&mut self);
    fn can_increase(&self) -> bool;
    fn can_decrease(&self) -> bool;
}

#[enum_dispatch(Adjustable)] // This also gives us From and TryInto
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OptValue {
    Speed,
    BoardSize,
    BoundaryPolicy,
}

impl OptValue {
    pub(crate) const DISPLAY_WIDTH: u16 = 10;
}

// This is needed for EnumMap to be convenient to construct.
impl Default for OptValue {
    fn default() -> OptValue {
        OptValue::Speed(Speed::default())
    }
}

impl fmt::Display for OptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, left, right) = match self {
            OptValue::Speed(v) => (v.to_string(), v.can_decrease(), v.can_increase()),
            OptValue::BoardSize(v) => (v.to_string(), v.can_decrease(), v.can_increase()),
            OptValue::BoundaryPolicy(v) => (v.to_string(), v.can_decrease(), v.can_increase()),
        };
        write!(
            f,
            "{left} {name:^6} {right}",
            left = if left { '◀' } else { '◁' },
            right = if right { '▶' } else { '▷' }
        )
    }
}

/// Steps an option through the variants of its enum in declaration order,
/// stopping at either end
trait Stepped: Enum + Copy + PartialEq {
    fn step_up(&mut self) {
        if let Some(next) = self.next() {
            *self = next;
        }
    }

    fn step_down(&mut self) {
        if let Some(prev) = self.prev() {
            *self = prev;
        }
    }
}

impl<T: Enum + Copy + PartialEq> Stepped for T {}

/// How fast the snake moves
#[derive(Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Speed {
    #[default]
    Slow,
    Medium,
    Fast,
}

impl Speed {
    /// Number of times per second that the snake moves
    pub(crate) fn moves_per_second(self) -> u32 {
        match self {
            Speed::Slow => 4,
            Speed::Medium => 6,
            Speed::Fast => 10,
        }
    }

    /// Number of frames between two moves of the snake
    pub(crate) fn tick_interval(self) -> u32 {
        consts::FRAME_RATE / self.moves_per_second()
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Speed::Slow => "Slow",
            Speed::Medium => "Medium",
            Speed::Fast => "Fast",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Adjustable for Speed {
    fn increase(&mut self) {
        self.step_up();
    }

    fn decrease(&mut self) {
        self.step_down();
    }

    fn toggle(&mut self) {}

    fn can_increase(&self) -> bool {
        *self != Self::max()
    }

    fn can_decrease(&self) -> bool {
        *self != Self::min()
    }
}

/// The dimensions of the board
#[derive(Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum BoardSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl BoardSize {
    pub(crate) fn as_size(self) -> Size {
        match self {
            BoardSize::Small => Size {
                width: 10,
                height: 6,
            },
            BoardSize::Medium => Size {
                width: 15,
                height: 9,
            },
            BoardSize::Large => Size {
                width: 20,
                height: 12,
            },
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            BoardSize::Small => "Small",
            BoardSize::Medium => "Medium",
            BoardSize::Large => "Large",
        }
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Adjustable for BoardSize {
    fn increase(&mut self) {
        self.step_up();
    }

    fn decrease(&mut self) {
        self.step_down();
    }

    fn toggle(&mut self) {}

    fn can_increase(&self) -> bool {
        *self != Self::max()
    }

    fn can_decrease(&self) -> bool {
        *self != Self::min()
    }
}

/// What happens when the snake's head reaches the edge of the board
#[derive(Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum BoundaryPolicy {
    /// Running into the edge ends the game
    Terminate,

    /// The snake reappears on the opposite edge
    #[default]
    Wrap,
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoundaryPolicy::Terminate => "Solid",
            BoundaryPolicy::Wrap => "Wrap",
        };
        f.pad(name)
    }
}

impl Adjustable for BoundaryPolicy {
    fn increase(&mut self) {
        self.step_up();
    }

    fn decrease(&mut self) {
        self.step_down();
    }

    fn toggle(&mut self) {
        *self = match self {
            BoundaryPolicy::Terminate => BoundaryPolicy::Wrap,
            BoundaryPolicy::Wrap => BoundaryPolicy::Terminate,
        };
    }

    fn can_increase(&self) -> bool {
        *self != Self::max()
    }

    fn can_decrease(&self) -> bool {
        *self != Self::min()
    }
}
