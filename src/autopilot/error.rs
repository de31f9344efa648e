use crate::game::Position;

/// Contract violations detected at the autopilot boundary.
///
/// These indicate a caller bug, not a game situation: a lost game is reported
/// through [`Decision::direction`](super::Decision) being `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutopilotError {
    #[error("grid must have at least one cell, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("head ({}, {}) is outside the {width}x{height} grid", .head.x, .head.y)]
    HeadOutOfBounds {
        head: Position,
        width: usize,
        height: usize,
    },
    #[error("goal ({}, {}) is outside the {width}x{height} grid", .goal.x, .goal.y)]
    GoalOutOfBounds {
        goal: Position,
        width: usize,
        height: usize,
    },
    #[error("head ({}, {}) is listed as its own obstacle", .head.x, .head.y)]
    HeadInObstacles { head: Position },
    #[error("invalid autopilot configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AutopilotError>;
