//! Region solver (flood fill)
//!
//! Partitions open cells into maximal 4-connected regions bounded by walls.
//! Uses an explicit stack so a region the size of the whole grid is fine.

use super::grid::{Cell, CellMask, Grid};

/// Collect the region reachable from `seed` without crossing a wall.
///
/// `visited` is shared across calls within one resolution pass so each open
/// cell is visited at most once. A seed that is a wall, out of bounds, or
/// already visited yields an empty region.
pub fn flood_region<F>(grid: &Grid, seed: Cell, is_wall: F, visited: &mut CellMask) -> Vec<Cell>
where
    F: Fn(Cell) -> bool,
{
    let mut region = Vec::new();
    let mut stack = vec![seed];

    while let Some(cell) = stack.pop() {
        if !grid.in_bounds(cell) || is_wall(cell) || visited.contains(cell) {
            continue;
        }
        visited.insert(cell);
        region.push(cell);

        for next in cell.neighbors() {
            if grid.in_bounds(next) && !visited.contains(next) {
                stack.push(next);
            }
        }
    }

    region
}

/// Split every unclaimed interior cell into disjoint connected regions
pub fn open_regions(claimed: &CellMask) -> Vec<Vec<Cell>> {
    let grid = *claimed.grid();
    let mut visited = CellMask::new(grid);
    let mut regions = Vec::new();

    for seed in grid.interior_cells() {
        if claimed.contains(seed) || visited.contains(seed) {
            continue;
        }
        let region = flood_region(&grid, seed, |c| claimed.contains(c), &mut visited);
        if !region.is_empty() {
            regions.push(region);
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small_grid() -> Grid {
        Grid::new(10.0, 100.0, 100.0)
    }

    #[test]
    fn test_open_board_is_one_region() {
        let claimed = CellMask::with_border(small_grid());
        let regions = open_regions(&claimed);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 8 * 8);
    }

    #[test]
    fn test_wall_splits_board() {
        let grid = small_grid();
        let mut claimed = CellMask::with_border(grid);
        // Vertical wall at col 4
        for row in 0..grid.rows {
            claimed.insert(Cell::new(4, row));
        }
        let mut sizes: Vec<usize> = open_regions(&claimed).iter().map(Vec::len).collect();
        sizes.sort();
        assert_eq!(sizes, vec![3 * 8, 4 * 8]);
    }

    #[test]
    fn test_diagonal_wall_blocks_flood() {
        let grid = small_grid();
        let mut claimed = CellMask::with_border(grid);
        // Staircase from (1,1) to (8,8): only diagonal contact between wall cells
        for i in 1..9 {
            claimed.insert(Cell::new(i, i));
        }
        assert_eq!(open_regions(&claimed).len(), 2);
    }

    #[test]
    fn test_seed_on_wall_is_empty() {
        let grid = small_grid();
        let claimed = CellMask::with_border(grid);
        let mut visited = CellMask::new(grid);
        let region = flood_region(&grid, Cell::new(0, 0), |c| claimed.contains(c), &mut visited);
        assert!(region.is_empty());
        let region = flood_region(&grid, Cell::new(-3, 2), |c| claimed.contains(c), &mut visited);
        assert!(region.is_empty());
    }

    #[test]
    fn test_visited_shared_across_calls() {
        let grid = small_grid();
        let claimed = CellMask::with_border(grid);
        let mut visited = CellMask::new(grid);
        let first = flood_region(&grid, Cell::new(2, 2), |c| claimed.contains(c), &mut visited);
        let second = flood_region(&grid, Cell::new(5, 5), |c| claimed.contains(c), &mut visited);
        assert_eq!(first.len(), 64);
        assert!(second.is_empty());
    }

    #[test]
    fn test_full_grid_region_without_recursion() {
        // 250 x 250 open interior would overflow a naive recursive fill
        let grid = Grid::new(1.0, 252.0, 252.0);
        let claimed = CellMask::with_border(grid);
        let regions = open_regions(&claimed);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 250 * 250);
    }

    proptest! {
        #[test]
        fn prop_regions_partition_open_cells(walls in proptest::collection::vec((1i32..11, 1i32..9), 0..40)) {
            let grid = Grid::new(10.0, 120.0, 100.0);
            let mut claimed = CellMask::with_border(grid);
            for (col, row) in walls {
                claimed.insert(Cell::new(col, row));
            }

            let regions = open_regions(&claimed);
            let mut seen = CellMask::new(grid);
            for region in &regions {
                for &cell in region {
                    prop_assert!(!claimed.contains(cell));
                    // No cell appears in two regions
                    prop_assert!(seen.insert(cell));
                }
            }
            // Regions plus claimed cover the whole grid
            prop_assert_eq!(seen.len() + claimed.len(), grid.total_cells());
        }
    }
}
