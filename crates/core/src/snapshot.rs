//! Read-only view of a controller, handed to presentation layers.

use std::fmt;

use serde::Serialize;
use tetris_2048_types::{
    Cell, GamePhase, GameStatus, LockEvent, Rotation, ShapeKind, Tile, PIECE_CELLS,
};

use crate::pieces::Piece;

/// A tile at an absolute grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlacedTile {
    pub x: i32,
    pub y: i32,
    pub tile: Tile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: ShapeKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
    pub cells: [PlacedTile; PIECE_CELLS],
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            cells: value.cells().map(|(x, y, tile)| PlacedTile { x, y, tile }),
        }
    }
}

/// Next/hold preview: shape and tile values only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PreviewSnapshot {
    pub kind: ShapeKind,
    pub tiles: [Tile; PIECE_CELLS],
}

impl From<Piece> for PreviewSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            tiles: value.tiles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SnapshotView {
    pub width: u16,
    pub height: u16,
    /// Settled cells, row-major, top row first
    pub cells: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    /// Anchor row the active piece would land on
    pub ghost_y: Option<i32>,
    pub next: Option<PreviewSnapshot>,
    pub hold: Option<PreviewSnapshot>,
    pub can_hold: bool,
    pub phase: GamePhase,
    pub status: GameStatus,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    /// Recommended gravity interval for the current level
    pub tick_interval_ms: u32,
    pub pieces_spawned: u32,
    pub last_event: Option<LockEvent>,
}

impl SnapshotView {
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.cells[y as usize * self.width as usize + x as usize])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn max_tile(&self) -> Option<Tile> {
        self.cells.iter().flatten().copied().max()
    }
}

impl fmt::Display for SnapshotView {
    /// Plain text board: settled tiles as numbers, the falling piece in
    /// brackets, empty cells as dots.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = |x: i32, y: i32| {
            self.active
                .and_then(|a| a.cells.into_iter().find(|c| c.x == x && c.y == y))
        };

        for (y, row) in self.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                match (active(x as i32, y as i32), cell) {
                    (Some(placed), _) => write!(f, "[{:>4}]", placed.tile.value())?,
                    (None, Some(tile)) => write!(f, " {:>4} ", tile.value())?,
                    (None, None) => write!(f, "    . ")?,
                }
            }
            writeln!(f)?;
        }
        write!(
            f,
            "score {}  lines {}  level {}  {:?}",
            self.score, self.lines, self.level, self.status
        )
    }
}
