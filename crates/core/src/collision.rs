//! Collision resolver - placement validity against the grid
//!
//! Pure functions over a `Grid` and a candidate `Piece`; nothing here mutates
//! state. Every check is O(cells in piece).

use crate::grid::Grid;
use crate::pieces::Piece;

/// Check whether `piece` translated by `offset` fits: every cell must be
/// inside the grid and on an empty cell.
pub fn is_valid(grid: &Grid, piece: &Piece, offset: (i32, i32)) -> bool {
    let (ox, oy) = offset;
    piece
        .shape()
        .iter()
        .all(|&(dx, dy)| grid.is_vacant(piece.x + dx + ox, piece.y + dy + oy))
}

/// Check a placement as-is
pub fn fits(grid: &Grid, piece: &Piece) -> bool {
    is_valid(grid, piece, (0, 0))
}

/// Check if the piece is resting on a tile or the floor
pub fn is_grounded(grid: &Grid, piece: &Piece) -> bool {
    !is_valid(grid, piece, (0, 1))
}

/// How many rows the piece can fall before it is grounded
pub fn drop_distance(grid: &Grid, piece: &Piece) -> i32 {
    let mut distance = 0;
    while is_valid(grid, piece, (0, distance + 1)) {
        distance += 1;
    }
    distance
}
