//! SEEK / SURVIVE policy, recomputed from scratch every tick.

use serde::{Deserialize, Serialize};

use super::astar::find_path;
use super::flood::reachable_count;
use super::route::Route;
use crate::game::{Grid, ObstacleSet, Position};

/// What the autopilot is trying to do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Head for the goal
    #[default]
    Seek,
    /// The goal is cut off; stay alive in the largest open area
    Survive,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Seek => "SEEK",
            Mode::Survive => "SURVIVE",
        }
    }
}

/// Inputs and outcome of one mode decision
#[derive(Debug, Clone)]
pub struct ModeAssessment {
    pub mode: Mode,
    /// Cells reachable from the head
    pub accessible: usize,
    /// Cells not covered by an obstacle
    pub total_free: usize,
    pub has_path: bool,
    /// Route found while deciding, if A* had to run
    pub route: Option<Route>,
}

impl ModeAssessment {
    /// Some free region cannot be reached from the head
    pub fn is_fragmented(&self) -> bool {
        self.accessible < self.total_free
    }
}

/// Decide the mode for the head's current position.
///
/// SURVIVE only when the board is split *and* the goal is on the far side.
/// A connected board reaches every free cell, so A* only runs on a split
/// board; the route it finds there is returned for reuse.
pub fn assess(
    head: Position,
    goal: Position,
    obstacles: &ObstacleSet,
    grid: Grid,
) -> ModeAssessment {
    let accessible = reachable_count(head, obstacles, grid);
    let total_free = grid.cell_count().saturating_sub(obstacles.len());

    let (has_path, route) = if accessible < total_free {
        let route = find_path(head, goal, obstacles, grid);
        (route.is_some(), route)
    } else {
        (grid.is_free(goal, obstacles), None)
    };

    let mode = if accessible < total_free && !has_path {
        Mode::Survive
    } else {
        Mode::Seek
    };

    ModeAssessment {
        mode,
        accessible,
        total_free,
        has_path,
        route,
    }
}
