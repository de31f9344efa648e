//! Shortest obstacle-free routes: A* with a Manhattan heuristic.
//!
//! Open-set ties are broken by lower `f`, then lower `h` (prefer nodes closer
//! to the goal), then insertion order. The tie-break is fixed, so the same
//! input always yields the same route.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::route::Route;
use crate::game::{Grid, ObstacleSet, Position};

#[derive(Debug, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    h: u32,
    seq: u64,
    cell: Position,
}

// BinaryHeap is a max-heap, so every key is reversed
impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest route from `start` to `goal` avoiding `obstacles`, or `None` when
/// the goal cannot be reached.
///
/// `start` may be listed in `obstacles` (it is never re-entered anyway); no
/// other obstacle or out-of-bounds cell is ever expanded. The search stops
/// after `grid.cell_count()` expansions.
pub fn find_path(
    start: Position,
    goal: Position,
    obstacles: &ObstacleSet,
    grid: Grid,
) -> Option<Route> {
    if !grid.contains(start) {
        return None;
    }
    if start == goal {
        return Some(Route::new(vec![start]));
    }
    if !grid.is_free(goal, obstacles) {
        return None;
    }

    let mut g_score: HashMap<Position, u32> = HashMap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut closed: HashSet<Position> = HashSet::new();
    let mut open = BinaryHeap::new();
    let mut seq = 0u64;

    g_score.insert(start, 0);
    let h = start.manhattan(goal);
    open.push(OpenEntry { f: h, h, seq, cell: start });

    let budget = grid.cell_count();

    while let Some(OpenEntry { cell, .. }) = open.pop() {
        if cell == goal {
            return Some(reconstruct_path(&came_from, goal));
        }
        // Stale heap entry for an already expanded cell
        if !closed.insert(cell) {
            continue;
        }
        if closed.len() > budget {
            break;
        }

        let current_g = g_score[&cell];

        for neighbor in grid.neighbors(cell) {
            if obstacles.contains(neighbor) || closed.contains(&neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            if tentative_g < g_score.get(&neighbor).copied().unwrap_or(u32::MAX) {
                g_score.insert(neighbor, tentative_g);
                came_from.insert(neighbor, cell);
                seq += 1;
                let h = neighbor.manhattan(goal);
                open.push(OpenEntry {
                    f: tentative_g + h,
                    h,
                    seq,
                    cell: neighbor,
                });
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &HashMap<Position, Position>, goal: Position) -> Route {
    let mut cells = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        cells.push(prev);
        current = prev;
    }
    cells.reverse();
    Route::new(cells)
}
