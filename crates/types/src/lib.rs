//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behaviour beyond conversions, making them
//! usable in any context (simulation, presentation layers, replay tooling).
//!
//! # Board Dimensions
//!
//! The grid size is chosen per session. Defaults follow the classic playfield:
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//! - Any size in `MIN_DIMENSION..=MAX_DIMENSION` is accepted on each axis.
//!
//! # Timing Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_TICK_INTERVAL_MS` | 300 | Gravity interval at level 1 |
//! | `DEFAULT_INTERVAL_STEP_MS` | 20 | Interval reduction per level |
//! | `DEFAULT_MIN_INTERVAL_MS` | 50 | Fastest gravity interval |
//! | `DEFAULT_LINES_PER_LEVEL` | 5 | Cleared rows per level step |
//!
//! # Examples
//!
//! ```
//! use tetris_2048_types::{Input, Rotation, ShapeKind, Tile};
//!
//! let kind = ShapeKind::from_str("t").unwrap();
//! assert_eq!(kind, ShapeKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//!
//! let tile = Tile::new(8).unwrap();
//! assert_eq!(tile.doubled().value(), 16);
//! assert!(Tile::new(6).is_none());
//!
//! assert_eq!(Input::from_str("hardDrop"), Some(Input::HardDrop));
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells
pub const DEFAULT_WIDTH: u16 = 10;

/// Default board height in cells
pub const DEFAULT_HEIGHT: u16 = 20;

/// Smallest accepted board dimension (fits an I piece in any rotation)
pub const MIN_DIMENSION: u16 = 4;

/// Largest accepted board dimension
pub const MAX_DIMENSION: u16 = 128;

/// Gravity interval at level 1 (milliseconds per row)
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 300;

/// Interval reduction applied per level gained
pub const DEFAULT_INTERVAL_STEP_MS: u32 = 20;

/// Gravity interval floor
pub const DEFAULT_MIN_INTERVAL_MS: u32 = 50;

/// Cleared rows needed to advance one level
pub const DEFAULT_LINES_PER_LEVEL: u32 = 5;

/// Row clear bonus multiplier (applied to the largest tile on the board)
pub const DEFAULT_ROW_CLEAR_BONUS_MULTIPLIER: u64 = 10;

/// Number of distinct shapes
pub const SHAPE_COUNT: usize = 7;

/// Number of cells in every piece
pub const PIECE_CELLS: usize = 4;

/// A numbered tile: always a power of two, at least 2.
///
/// Stored as its base-two exponent so the invariant holds by construction
/// and doubling can never produce a non-power value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Tile(u8);

impl Tile {
    /// Largest exponent representable as a `u64` value
    pub const MAX_EXPONENT: u8 = 63;

    /// The smallest tile (value 2)
    pub const TWO: Tile = Tile(1);

    /// Create a tile from its numeric value.
    ///
    /// Returns `None` unless `value` is a power of two and at least 2.
    pub fn new(value: u64) -> Option<Self> {
        if value < 2 || !value.is_power_of_two() {
            return None;
        }
        Some(Tile(value.trailing_zeros() as u8))
    }

    /// Create a tile from its exponent (`value = 2^exponent`)
    pub fn from_exponent(exponent: u8) -> Option<Self> {
        if exponent == 0 || exponent > Self::MAX_EXPONENT {
            return None;
        }
        Some(Tile(exponent))
    }

    pub fn exponent(self) -> u8 {
        self.0
    }

    pub fn value(self) -> u64 {
        1u64 << self.0
    }

    /// The tile produced by merging two copies of this one.
    ///
    /// Saturates at the largest representable tile.
    pub fn doubled(self) -> Self {
        Tile((self.0 + 1).min(Self::MAX_EXPONENT))
    }
}

impl TryFrom<u64> for Tile {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Tile::new(value).ok_or_else(|| format!("{value} is not a power of two >= 2"))
    }
}

impl From<Tile> for u64 {
    fn from(tile: Tile) -> Self {
        tile.value()
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A cell on the grid
///
/// - `None`: Empty cell
/// - `Some(Tile)`: Cell holding a settled tile
pub type Cell = Option<Tile>;

/// The seven piece shapes
///
/// - **I**: straight bar
/// - **O**: 2x2 square
/// - **T**: T-shaped
/// - **S**: S-shaped
/// - **Z**: Z-shaped (mirror of S)
/// - **J**: J-shaped
/// - **L**: L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    /// All shapes in a fixed order (the unshuffled bag)
    pub const ALL: [ShapeKind; SHAPE_COUNT] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_2048_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("i"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("O"), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "o" => Some(ShapeKind::O),
            "t" => Some(ShapeKind::T),
            "s" => Some(ShapeKind::S),
            "z" => Some(ShapeKind::Z),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "i",
            ShapeKind::O => "o",
            ShapeKind::T => "t",
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
        }
    }
}

/// Rotation states
///
/// - **North**: Spawn orientation (0° rotation)
/// - **East**: Rotated 90° clockwise
/// - **South**: Rotated 180°
/// - **West**: Rotated 90° counter-clockwise (270° clockwise)
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_2048_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation index 0-3 (North = 0, clockwise)
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Inputs accepted by the controller's `step`
///
/// `None` is a plain gravity tick. Everything else is a discrete player
/// event; the controller never applies gravity on top of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Input {
    /// Gravity tick, no player input
    #[default]
    None,
    /// Move piece one cell left
    Left,
    /// Move piece one cell right
    Right,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Move piece one cell down; locks when blocked
    SoftDrop,
    /// Drop piece to the lowest valid position and lock
    HardDrop,
    /// Swap the falling piece with the hold slot (once per piece)
    Hold,
}

impl Input {
    /// Parse input from string (case-insensitive, with short aliases)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_2048_types::Input;
    ///
    /// assert_eq!(Input::from_str("left"), Some(Input::Left));
    /// assert_eq!(Input::from_str("HD"), Some(Input::HardDrop));
    /// assert_eq!(Input::from_str("tick"), Some(Input::None));
    /// assert_eq!(Input::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "tick" | "." => Some(Input::None),
            "left" | "l" => Some(Input::Left),
            "right" | "r" => Some(Input::Right),
            "rotate" | "rot" | "cw" => Some(Input::Rotate),
            "rotateccw" | "ccw" => Some(Input::RotateCcw),
            "softdrop" | "down" | "sd" => Some(Input::SoftDrop),
            "harddrop" | "drop" | "hd" => Some(Input::HardDrop),
            "hold" | "h" => Some(Input::Hold),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Input::None => "none",
            Input::Left => "left",
            Input::Right => "right",
            Input::Rotate => "rotate",
            Input::RotateCcw => "rotateCcw",
            Input::SoftDrop => "softDrop",
            Input::HardDrop => "hardDrop",
            Input::Hold => "hold",
        }
    }
}

/// Controller state machine phases
///
/// `Spawning → Falling → Locking → Merging → Clearing → Spawning`, with
/// `GameOver` as the terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Spawning,
    Falling,
    Locking,
    Merging,
    Clearing,
    GameOver,
}

/// Coarse game status seen by presentation layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    GameOver,
}

impl From<GamePhase> for GameStatus {
    fn from(phase: GamePhase) -> Self {
        match phase {
            GamePhase::GameOver => GameStatus::GameOver,
            _ => GameStatus::Running,
        }
    }
}

/// Event recorded after a piece locks and the board settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LockEvent {
    /// Number of pair merges performed while settling
    pub merges: u32,
    /// Score awarded by merges
    pub merge_score: u64,
    /// Number of full rows removed
    pub rows_cleared: u32,
    /// Score awarded by the row clear bonus
    pub clear_bonus: u64,
    /// Largest tile on the board after settling
    pub max_tile: Option<Tile>,
}

impl LockEvent {
    pub fn score(&self) -> u64 {
        self.merge_score.saturating_add(self.clear_bonus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_accepts_only_powers_of_two_from_two() {
        assert_eq!(Tile::new(2), Some(Tile::TWO));
        assert_eq!(Tile::new(2048).map(Tile::exponent), Some(11));
        assert!(Tile::new(0).is_none());
        assert!(Tile::new(1).is_none());
        assert!(Tile::new(12).is_none());
        assert!(Tile::from_exponent(0).is_none());
        assert!(Tile::from_exponent(64).is_none());
    }

    #[test]
    fn tile_doubling_saturates() {
        let top = Tile::from_exponent(Tile::MAX_EXPONENT).unwrap();
        assert_eq!(top.doubled(), top);
        assert_eq!(Tile::TWO.doubled().value(), 4);
    }

    #[test]
    fn tile_serializes_as_its_value() {
        let tile = Tile::new(64).unwrap();
        let back: Tile = Tile::try_from(u64::from(tile)).unwrap();
        assert_eq!(back, tile);
        assert!(Tile::try_from(3).is_err());
    }

    #[test]
    fn rotation_cycles_and_indexes() {
        let mut r = Rotation::North;
        for expected in 0..4 {
            assert_eq!(r.index(), expected);
            r = r.rotate_cw();
        }
        assert_eq!(r, Rotation::North);
        assert_eq!(Rotation::North.rotate_ccw().rotate_cw(), Rotation::North);
    }

    #[test]
    fn input_strings_round_trip() {
        for input in [
            Input::None,
            Input::Left,
            Input::Right,
            Input::Rotate,
            Input::RotateCcw,
            Input::SoftDrop,
            Input::HardDrop,
            Input::Hold,
        ] {
            assert_eq!(Input::from_str(input.as_str()), Some(input));
        }
    }

    #[test]
    fn phase_maps_to_status() {
        assert_eq!(GameStatus::from(GamePhase::Falling), GameStatus::Running);
        assert_eq!(GameStatus::from(GamePhase::GameOver), GameStatus::GameOver);
    }
}
