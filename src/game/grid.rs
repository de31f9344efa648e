//! Board bounds and the per-tick obstacle set derived from the snake body.

use std::collections::HashSet;

use super::action::Direction;
use super::state::{Position, Snake};

/// Fixed width x height lattice. Cells outside it are walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// In bounds and not blocked
    pub fn is_free(&self, pos: Position, obstacles: &ObstacleSet) -> bool {
        self.contains(pos) && !obstacles.contains(pos)
    }

    /// In-bounds 4-neighbours of `pos`, in [`Direction::ALL`] order
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |dir| pos.moved_in_direction(dir))
            .filter(move |next| self.contains(*next))
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Position::new(x as i32, y as i32))
        })
    }
}

/// Cells the head may not enter on the coming move.
///
/// Built fresh every tick from the body and never shared with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObstacleSet {
    cells: HashSet<Position>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the obstacles from a head-first body.
    ///
    /// The head is never an obstacle. The tail is left out once the body has
    /// reached `target_length`, since it moves away on the same tick.
    pub fn from_body(body: &[Position], target_length: usize) -> Self {
        if body.len() <= 1 {
            return Self::new();
        }

        let segments = &body[1..];
        let segments = if body.len() >= target_length {
            &segments[..segments.len() - 1]
        } else {
            segments
        };

        segments.iter().copied().collect()
    }

    pub fn from_snake(snake: &Snake) -> Self {
        Self::from_body(&snake.body, snake.target_length)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    pub fn insert(&mut self, pos: Position) -> bool {
        self.cells.insert(pos)
    }

    pub fn remove(&mut self, pos: Position) -> bool {
        self.cells.remove(&pos)
    }

    /// Copy of this set with one extra blocked cell
    pub fn with(&self, pos: Position) -> Self {
        let mut extended = self.clone();
        extended.insert(pos);
        extended
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<Position> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
