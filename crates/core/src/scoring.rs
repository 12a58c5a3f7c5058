//! Scoring module - merge and row clear points
//!
//! Score only ever grows: merges add the value of each tile they produce,
//! and each cleared row adds `multiplier x largest tile on the board`.

use tetris_2048_types::Tile;

/// Bonus for clearing `rows` rows while `max_tile` is the largest tile on
/// the board. Every row contributes independently.
pub fn row_clear_bonus(rows: usize, max_tile: Option<Tile>, multiplier: u64) -> u64 {
    let per_row = max_tile
        .map(Tile::value)
        .unwrap_or(0)
        .saturating_mul(multiplier);
    per_row.saturating_mul(rows as u64)
}

/// Running totals owned by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scoreboard {
    score: u64,
    lines: u32,
}

impl Scoreboard {
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Add points (saturating, never decreases)
    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn add_lines(&mut self, rows: u32) {
        self.lines = self.lines.saturating_add(rows);
    }
}
