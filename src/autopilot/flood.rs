//! Reachable-space analysis.

use std::collections::{HashSet, VecDeque};

use crate::game::{Grid, ObstacleSet, Position};

/// Number of cells reachable from `start` without crossing an obstacle or
/// leaving the grid, `start` included.
///
/// `start` is counted even when it is itself in `obstacles`, so a candidate
/// head that was just added to the set still measures the space around it.
/// Returns 0 only when `start` lies outside the grid.
pub fn reachable_count(start: Position, obstacles: &ObstacleSet, grid: Grid) -> usize {
    if !grid.contains(start) {
        return 0;
    }

    let mut visited = HashSet::with_capacity(grid.cell_count());
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        for next in grid.neighbors(cell) {
            if !obstacles.contains(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited.len()
}

/// Count of `pos`'s in-bounds neighbours that are not obstacles
pub fn free_neighbors(pos: Position, obstacles: &ObstacleSet, grid: Grid) -> usize {
    grid.neighbors(pos)
        .filter(|next| !obstacles.contains(*next))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(cells: &[(i32, i32)]) -> ObstacleSet {
        cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    #[test]
    fn test_open_grid_reaches_everything() {
        let grid = Grid::new(6, 4);
        assert_eq!(reachable_count(Position::new(2, 2), &ObstacleSet::new(), grid), 24);
    }

    #[test]
    fn test_vertical_wall_splits_grid() {
        let grid = Grid::new(5, 3);
        let obstacles = wall(&[(2, 0), (2, 1), (2, 2)]);

        assert_eq!(reachable_count(Position::new(0, 1), &obstacles, grid), 6);
        assert_eq!(reachable_count(Position::new(4, 1), &obstacles, grid), 6);
    }

    #[test]
    fn test_enclosed_start_counts_itself_once() {
        let grid = Grid::new(3, 3);
        let obstacles = wall(&[(1, 0), (0, 1), (2, 1), (1, 2)]);
        assert_eq!(reachable_count(Position::new(1, 1), &obstacles, grid), 1);
    }

    #[test]
    fn test_start_inside_obstacles_is_still_counted() {
        let grid = Grid::new(3, 1);
        let obstacles = wall(&[(0, 0)]);
        assert_eq!(reachable_count(Position::new(0, 0), &obstacles, grid), 3);
    }

    #[test]
    fn test_out_of_bounds_start() {
        let grid = Grid::new(3, 3);
        assert_eq!(reachable_count(Position::new(-1, 0), &ObstacleSet::new(), grid), 0);
    }

    #[test]
    fn test_matches_component_size_on_every_start() {
        // Two short walls close off a 2x2 pocket in the corner
        let grid = Grid::new(4, 4);
        let obstacles = wall(&[(2, 0), (2, 1), (0, 2), (1, 2)]);

        for start in grid.cells().filter(|c| !obstacles.contains(*c)) {
            let expected = if start.x < 2 && start.y < 2 { 4 } else { 8 };
            assert_eq!(reachable_count(start, &obstacles, grid), expected, "{start:?}");
        }
    }

    #[test]
    fn test_free_neighbors() {
        let grid = Grid::new(3, 3);
        let obstacles = wall(&[(1, 0)]);
        assert_eq!(free_neighbors(Position::new(1, 1), &obstacles, grid), 3);
        assert_eq!(free_neighbors(Position::new(0, 0), &obstacles, grid), 1);
    }
}
