//! Pieces module - shapes, rotation tables and wall kicks
//!
//! Every shape is a tetromino laid out in an `n x n` bounding box. The four
//! rotation states are generated from the spawn (North) layout by rotating
//! the box clockwise, so slot `i` in any rotation is the same physical cell.
//! That keeps each cell's tile value attached to it while the piece turns.

use serde::{Deserialize, Serialize};
use tetris_2048_types::{Rotation, ShapeKind, Tile, PIECE_CELLS};

/// Offset of a single cell relative to the piece anchor (x right, y down)
pub type CellOffset = (i32, i32);

/// Shape of a piece - one offset per tile slot
pub type PieceShape = [CellOffset; PIECE_CELLS];

/// Spawn layouts and bounding box sizes
const fn north(kind: ShapeKind) -> (PieceShape, i32) {
    match kind {
        ShapeKind::I => ([(0, 1), (1, 1), (2, 1), (3, 1)], 4),
        ShapeKind::O => ([(0, 0), (1, 0), (0, 1), (1, 1)], 2),
        ShapeKind::T => ([(1, 0), (0, 1), (1, 1), (2, 1)], 3),
        ShapeKind::S => ([(1, 0), (2, 0), (0, 1), (1, 1)], 3),
        ShapeKind::Z => ([(0, 0), (1, 0), (1, 1), (2, 1)], 3),
        ShapeKind::J => ([(0, 0), (0, 1), (1, 1), (2, 1)], 3),
        ShapeKind::L => ([(2, 0), (0, 1), (1, 1), (2, 1)], 3),
    }
}

/// Rotate a layout clockwise inside its bounding box: (x, y) -> (n-1-y, x)
const fn rotate_cw(shape: PieceShape, n: i32) -> PieceShape {
    let mut out = shape;
    let mut i = 0;
    while i < PIECE_CELLS {
        let (x, y) = shape[i];
        out[i] = (n - 1 - y, x);
        i += 1;
    }
    out
}

const fn rotations(kind: ShapeKind) -> [PieceShape; 4] {
    let (n0, n) = north(kind);
    let e = rotate_cw(n0, n);
    let s = rotate_cw(e, n);
    let w = rotate_cw(s, n);
    [n0, e, s, w]
}

/// Rotation table indexed by `[ShapeKind as usize][Rotation::index()]`
pub static SHAPES: [[PieceShape; 4]; 7] = [
    rotations(ShapeKind::I),
    rotations(ShapeKind::O),
    rotations(ShapeKind::T),
    rotations(ShapeKind::S),
    rotations(ShapeKind::Z),
    rotations(ShapeKind::J),
    rotations(ShapeKind::L),
];

/// Get the cell offsets for a shape and rotation
pub fn get_shape(kind: ShapeKind, rotation: Rotation) -> PieceShape {
    SHAPES[kind as usize][rotation.index()]
}

/// Bounding box size of a shape
pub fn box_size(kind: ShapeKind) -> i32 {
    north(kind).1
}

/// Wall kick candidates, tried in order; the first entry is "no kick".
pub type KickTable = [[CellOffset; 5]; 8];

/// Get kick table for a shape
/// Indexed by [get_kick_index(from, clockwise)]
pub fn get_kick_table(kind: ShapeKind) -> &'static KickTable {
    match kind {
        ShapeKind::O => &O_KICKS,
        ShapeKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

/// O rotates in place
const O_KICKS: KickTable = [[(0, 0); 5]; 8];

/// JLSTZ kicks (SRS offsets with y flipped to point down)
const JLSTZ_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 0->3 (N->W)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->0 (E->N)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->2 (E->S)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 2->1 (S->E)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 2->3 (S->W)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 3->2 (W->S)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 3->0 (W->N)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

/// I kicks (SRS offsets with y flipped to point down)
const I_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 0->3 (N->W)
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // 1->0 (E->N)
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 1->2 (E->S)
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // 2->1 (S->E)
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    // 2->3 (S->W)
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 3->2 (W->S)
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 3->0 (W->N)
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
];

/// Get the kick index for a rotation transition
fn get_kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,
        (Rotation::North, false) => 1,
        (Rotation::East, false) => 2,
        (Rotation::East, true) => 3,
        (Rotation::South, false) => 4,
        (Rotation::South, true) => 5,
        (Rotation::West, false) => 6,
        (Rotation::West, true) => 7,
    }
}

/// Kick offsets for rotating `kind` away from `from`
pub fn kicks(kind: ShapeKind, from: Rotation, clockwise: bool) -> &'static [CellOffset; 5] {
    &get_kick_table(kind)[get_kick_index(from, clockwise)]
}

/// A falling piece: shape, rotation, anchor and one tile per slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: ShapeKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
    pub tiles: [Tile; PIECE_CELLS],
}

impl Piece {
    /// Create a piece in spawn rotation with its anchor at the origin
    pub fn new(kind: ShapeKind, tiles: [Tile; PIECE_CELLS]) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: 0,
            y: 0,
            tiles,
        }
    }

    /// Same piece in spawn rotation, horizontally centred with its top row
    /// on row 0 of a grid `width` wide.
    pub fn at_spawn(self, width: u16) -> Self {
        let shape = get_shape(self.kind, Rotation::North);
        let top = shape.iter().map(|&(_, dy)| dy).min().unwrap_or(0);
        Self {
            rotation: Rotation::North,
            x: (width as i32 - box_size(self.kind)) / 2,
            y: -top,
            ..self
        }
    }

    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute grid coordinates of every cell with its tile, slot order
    pub fn cells(&self) -> [(i32, i32, Tile); PIECE_CELLS] {
        let shape = self.shape();
        std::array::from_fn(|i| {
            let (dx, dy) = shape[i];
            (self.x + dx, self.y + dy, self.tiles[i])
        })
    }

    /// Candidate translated by (dx, dy)
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Candidate rotated one step without any kick applied
    pub fn rotated(&self, clockwise: bool) -> Self {
        let rotation = if clockwise {
            self.rotation.rotate_cw()
        } else {
            self.rotation.rotate_ccw()
        };
        Self { rotation, ..*self }
    }
}

/// Try to rotate a piece with wall kicks.
///
/// Returns the first kicked candidate accepted by `is_valid`, or `None` when
/// every kick is rejected (the caller keeps the original piece).
pub fn try_rotate(
    piece: &Piece,
    clockwise: bool,
    is_valid: impl Fn(&Piece) -> bool,
) -> Option<Piece> {
    let turned = piece.rotated(clockwise);
    kicks(piece.kind, piece.rotation, clockwise)
        .iter()
        .map(|&(dx, dy)| turned.shifted(dx, dy))
        .find(|candidate| is_valid(candidate))
}
