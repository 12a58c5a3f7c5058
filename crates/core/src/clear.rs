//! Row clearer - removes full rows after the merge fixpoint
//!
//! All full rows are detected and removed in one compaction pass, so rows
//! above several cleared rows drop by exactly the number of rows removed
//! beneath them.

use crate::grid::Grid;
use crate::scoring::row_clear_bonus;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClearReport {
    /// Removed row indices (pre-clear coordinates), bottom to top
    pub rows: Vec<usize>,
    pub bonus: u64,
}

impl ClearReport {
    pub fn count(&self) -> u32 {
        self.rows.len() as u32
    }
}

/// Clear every full row. The bonus uses the largest tile on the board
/// before anything is removed.
pub fn clear_rows(grid: &mut Grid, multiplier: u64) -> ClearReport {
    let max_tile = grid.max_tile();
    let rows = grid.clear_full_rows();
    let bonus = row_clear_bonus(rows.len(), max_tile, multiplier);
    if !rows.is_empty() {
        log::debug!("cleared rows {:?} for {} bonus", rows, bonus);
    }
    ClearReport { rows, bonus }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_2048_types::Tile;

    #[test]
    fn clears_multiple_rows_in_one_pass() {
        let mut grid = Grid::from_rows(&[
            &[0, 0, 0, 0],
            &[2, 0, 0, 0],
            &[2, 4, 8, 16],
            &[8, 0, 0, 0],
            &[32, 2, 4, 2],
        ])
        .unwrap();

        let report = clear_rows(&mut grid, 10);

        assert_eq!(report.rows, vec![4, 2]);
        assert_eq!(report.bonus, 2 * 32 * 10);
        let expected = Grid::from_rows(&[
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
            &[2, 0, 0, 0],
            &[8, 0, 0, 0],
        ])
        .unwrap();
        assert_eq!(grid, expected);
    }

    #[test]
    fn no_full_rows_is_a_no_op() {
        let mut grid = Grid::from_rows(&[&[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[2, 4, 0, 8]])
            .unwrap();
        let before = grid.clone();
        let report = clear_rows(&mut grid, 10);
        assert_eq!(report, ClearReport::default());
        assert_eq!(grid, before);
        assert_eq!(grid.max_tile(), Tile::new(8));
    }
}
