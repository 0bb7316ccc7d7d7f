//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Number of frames drawn per second.  Input is handled on every frame; the
/// snake only moves on some of them, depending on the speed setting.
pub(crate) const FRAME_RATE: u32 = 60;

/// Time between two frames
pub(crate) const FRAME_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / FRAME_RATE as u64);

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Base number of points for eating an apple
pub(crate) const APPLE_POINTS: u32 = 10;

/// Extra points per (rounded) unit of time bonus when eating an apple
pub(crate) const TIME_BONUS_POINTS: u32 = 5;

/// Amount the time bonus drops by on each tick
pub(crate) const TIME_BONUS_DECAY: f64 = 0.06;

/// The time bonus cap is this times the square root of the number of cells
/// on the board.
pub(crate) const TIME_BONUS_CAP_SCALE: f64 = 0.4;

/// After eating an apple, the time bonus is set to the score times this
/// divided by the number of cells on the board.
pub(crate) const TIME_BONUS_GAIN: f64 = 0.9;

/// Maximum number of direction changes that can be waiting for a tick
pub(crate) const MAX_PENDING_TURNS: usize = 3;

/// Player name used when none is entered
pub(crate) const DEFAULT_PLAYER_NAME: &str = "Player";

/// Maximum number of characters in a player name
pub(crate) const MAX_PLAYER_NAME_LEN: usize = 16;

/// Number of entries shown on the high score screen
pub(crate) const LEADERBOARD_SIZE: usize = 10;

/// Glyph for the snake's head when it is moving north/up
pub(crate) const SNAKE_HEAD_NORTH_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving south/down
pub(crate) const SNAKE_HEAD_SOUTH_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving east/right
pub(crate) const SNAKE_HEAD_EAST_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving west/left
pub(crate) const SNAKE_HEAD_WEST_SYMBOL: char = '>';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for the apple
pub(crate) const APPLE_SYMBOL: char = '●';

/// Glyph for the snake's head when it's collided with a wall or itself
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for the apple
pub(crate) const APPLE_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);

/// Style for the "GAME WON" banner
pub(crate) const VICTORY_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);
