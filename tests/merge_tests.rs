//! Merge engine tests - pairing order, cascades and the fixpoint

use tetris_2048::core::merge::{has_equal_neighbours, merge_pass};
use tetris_2048::core::{settle, Grid, MergeReport};

fn grid(rows: &[&[u64]]) -> Grid {
    Grid::from_rows(rows).unwrap()
}

#[test]
fn test_row_of_four_pairs_left_to_right() {
    let mut board = grid(&[&[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[2, 2, 2, 2]]);

    let report = settle(&mut board);

    // Anchors keep their column, so the two 4s end up apart
    assert_eq!(board, grid(&[&[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[4, 0, 4, 0]]));
    assert_eq!(report, MergeReport { merges: 2, score: 8, passes: 1 });
}

#[test]
fn test_vertical_pair_lands_on_the_floor() {
    let mut board = grid(&[&[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 8, 0, 0], &[0, 8, 0, 0]]);

    let report = settle(&mut board);

    assert_eq!(board, grid(&[&[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 16, 0, 0]]));
    assert_eq!(report.score, 16);
}

#[test]
fn test_single_pass_only_touches_one_pair_per_cell() {
    let mut board = grid(&[&[0, 0, 0, 0], &[0, 0, 0, 0], &[4, 0, 0, 0], &[4, 4, 0, 0]]);

    let (merges, score) = merge_pass(&mut board);

    // (0,2) pairs downward; (1,3) has no unpaired partner left
    assert_eq!((merges, score), (1, 8));
    assert_eq!(board, grid(&[&[0, 0, 0, 0], &[0, 0, 0, 0], &[8, 0, 0, 0], &[0, 4, 0, 0]]));
}

#[test]
fn test_chain_reaction_runs_to_fixpoint() {
    let mut board = grid(&[
        &[0, 8, 16, 0],
        &[0, 16, 8, 0],
        &[0, 16, 2, 4],
        &[0, 2, 4, 2],
    ]);

    let report = settle(&mut board);

    assert_eq!(board, grid(&[&[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 64, 2, 4], &[0, 2, 4, 2]]));
    assert_eq!(report.merges, 4);
    assert_eq!(report.score, 32 + 16 + 32 + 64);
    assert!(!has_equal_neighbours(&board));
}

#[test]
fn test_settle_is_idempotent() {
    let mut board = grid(&[&[2, 0, 0, 0], &[2, 2, 0, 0], &[4, 8, 2, 0], &[2, 4, 8, 16]]);
    settle(&mut board);
    let settled = board.clone();

    assert_eq!(settle(&mut board), MergeReport::default());
    assert_eq!(board, settled);
}

#[test]
fn test_empty_grid_settles_to_nothing() {
    let mut board = Grid::new(8, 8).unwrap();
    assert_eq!(settle(&mut board), MergeReport::default());
    assert_eq!(board.occupied_count(), 0);
}
