use crate::config::Config;
use crate::consts;
use crate::options::Options;
use enum_map::Enum;
use ratatui::layout::{Flex, Layout, Rect, Size};
use std::path::PathBuf;
use thiserror::Error;

/// State shared by all of the screens of the application
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Globals {
    pub(crate) config: Config,
    pub(crate) options: Options,
    pub(crate) player_name: String,
}

pub(crate) trait EnumExt: Enum + Sized {
    fn iter() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH - 1)
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize() + 1;
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }
}

impl<T: Enum> EnumExt for T {}

pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    center_rect(buffer_area, consts::DISPLAY_SIZE)
}

/// Return a rectangle of the given size centered within `area`, shrunk to
/// fit if necessary
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [rect] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(rect);
    rect
}

/// Return the path to a file with the given name in the program's local data
/// directory
pub(crate) fn data_file_path(filename: &str) -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("gridsnake").join(filename))
}

#[derive(Debug, Error)]
#[error("failed to save {what} to disk")]
pub(crate) struct SaveError {
    what: &'static str,
    source: SaveErrorSource,
}

impl SaveError {
    pub(crate) fn no_path(what: &'static str) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::NoPath,
        }
    }

    pub(crate) fn mkdir(what: &'static str, e: std::io::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Mkdir(e),
        }
    }

    pub(crate) fn serialize(what: &'static str, e: serde_json::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Serialize(e),
        }
    }

    pub(crate) fn write(what: &'static str, e: std::io::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Write(e),
        }
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize data")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write file")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("failed to read {what} from disk")]
pub(crate) struct LoadError {
    what: &'static str,
    source: LoadErrorSource,
}

impl LoadError {
    pub(crate) fn no_path(what: &'static str) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::NoPath,
        }
    }

    pub(crate) fn read(what: &'static str, e: std::io::Error) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::Read(e),
        }
    }

    pub(crate) fn deserialize(what: &'static str, e: serde_json::Error) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::Deserialize(e),
        }
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to read file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize data")]
    Deserialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Speed;
    use std::error::Error as _;

    #[test]
    fn center_rect_in_display() {
        assert_eq!(
            get_display_area(Rect::new(0, 0, 100, 30)),
            Rect::new(10, 3, 80, 24)
        );
        assert_eq!(
            center_rect(Rect::new(0, 0, 80, 24), Size::new(22, 8)),
            Rect::new(29, 8, 22, 8)
        );
    }

    #[test]
    fn enum_stepping() {
        assert_eq!(Speed::min(), Speed::Slow);
        assert_eq!(Speed::max(), Speed::Fast);
        assert_eq!(Speed::Slow.next(), Some(Speed::Medium));
        assert_eq!(Speed::Fast.next(), None);
        assert_eq!(Speed::Slow.prev(), None);
        assert_eq!(
            Speed::iter().collect::<Vec<_>>(),
            [Speed::Slow, Speed::Medium, Speed::Fast]
        );
    }

    #[test]
    fn error_chain() {
        let e = SaveError::no_path("scores");
        assert_eq!(e.to_string(), "failed to save scores to disk");
        assert_eq!(
            e.source().map(ToString::to_string).as_deref(),
            Some("failed to determine path to local data directory")
        );
    }
}
