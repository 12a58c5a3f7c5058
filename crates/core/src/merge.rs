//! Merge engine - 2048-style collapsing of equal neighbours
//!
//! Runs once per lock, to a fixpoint:
//!
//! 1. Compact every column (tiles fall to the floor).
//! 2. Find connected components of equal tiles (4-neighbourhood).
//! 3. In each component, walk cells in row-major order and pair every
//!    unpaired cell with its right neighbour, else its lower neighbour, when
//!    that neighbour belongs to the component and is still unpaired. A pair
//!    collapses into the earlier cell with doubled value; the later cell
//!    empties. Leftover cells keep their value.
//! 4. Compact columns again and repeat until a pass merges nothing.
//!
//! The first cell of any component always has a right or lower neighbour in
//! it, so a pass over a board with an equal adjacent pair merges at least
//! once, and every merge removes a tile. The loop is therefore bounded by
//! the number of cells.

use std::collections::VecDeque;

use tetris_2048_types::Tile;

use crate::grid::Grid;

/// Outcome of settling the grid after a lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeReport {
    /// Number of pair merges
    pub merges: u32,
    /// Sum of the doubled values produced
    pub score: u64,
    /// Scan passes that merged at least one pair
    pub passes: u32,
}

/// Settle the grid: gravity, then merge passes until no equal neighbours
/// remain.
pub fn settle(grid: &mut Grid) -> MergeReport {
    let mut report = MergeReport::default();
    grid.apply_gravity();

    let max_passes = grid.cells().len() + 1;
    for _ in 0..max_passes {
        let (merges, score) = merge_pass(grid);
        if merges == 0 {
            break;
        }
        report.merges += merges;
        report.score = report.score.saturating_add(score);
        report.passes += 1;
        grid.apply_gravity();
    }

    debug_assert!(!has_equal_neighbours(grid));
    report
}

/// One scan over the grid. Returns (merges, score gained).
pub fn merge_pass(grid: &mut Grid) -> (u32, u64) {
    let width = grid.width() as usize;
    let len = grid.cells().len();

    let mut visited = vec![false; len];
    let mut paired = vec![false; len];
    let mut component = Vec::new();
    let mut queue = VecDeque::new();
    let mut merges = 0u32;
    let mut score = 0u64;

    for start in 0..len {
        if visited[start] {
            continue;
        }
        let Some(tile) = grid.cells()[start] else {
            continue;
        };

        collect_component(grid, start, tile, &mut visited, &mut component, &mut queue);
        if component.len() < 2 {
            continue;
        }
        component.sort_unstable();

        for i in 0..component.len() {
            let idx = component[i];
            if paired[idx] {
                continue;
            }

            let right = (idx % width + 1 < width).then_some(idx + 1);
            let below = (idx + width < len).then_some(idx + width);
            let partner = [right, below].into_iter().flatten().find(|n| {
                !paired[*n] && component[i + 1..].binary_search(n).is_ok()
            });

            if let Some(partner) = partner {
                paired[idx] = true;
                paired[partner] = true;

                let merged = tile.doubled();
                grid.set_index(idx, Some(merged));
                grid.set_index(partner, None);

                merges += 1;
                score = score.saturating_add(merged.value());
                log::trace!(
                    "merged {} + {} -> {} at cell {}",
                    tile,
                    tile,
                    merged,
                    idx
                );
            }
        }
    }

    (merges, score)
}

/// Breadth-first flood fill of equal tiles starting at `start`
fn collect_component(
    grid: &Grid,
    start: usize,
    tile: Tile,
    visited: &mut [bool],
    component: &mut Vec<usize>,
    queue: &mut VecDeque<usize>,
) {
    let width = grid.width() as usize;
    let len = grid.cells().len();

    component.clear();
    queue.clear();
    visited[start] = true;
    queue.push_back(start);

    while let Some(idx) = queue.pop_front() {
        component.push(idx);
        let x = idx % width;
        let neighbours = [
            (x > 0).then(|| idx - 1),
            (x + 1 < width).then(|| idx + 1),
            idx.checked_sub(width),
            (idx + width < len).then(|| idx + width),
        ];
        for n in neighbours.into_iter().flatten() {
            if !visited[n] && grid.cells()[n] == Some(tile) {
                visited[n] = true;
                queue.push_back(n);
            }
        }
    }
}

/// True if any two 4-adjacent cells hold the same tile
pub fn has_equal_neighbours(grid: &Grid) -> bool {
    let width = grid.width() as usize;
    let cells = grid.cells();
    cells.iter().enumerate().any(|(idx, cell)| {
        let Some(tile) = cell else {
            return false;
        };
        let right = idx % width + 1 < width && cells[idx + 1] == Some(*tile);
        let below = idx + width < cells.len() && cells[idx + width] == Some(*tile);
        right || below
    })
}
