use crate::game::{Direction, Position};

/// An ordered chain of 4-adjacent cells from a start cell to a goal cell,
/// both inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    cells: Vec<Position>,
}

impl Route {
    /// Wrap a cell chain. Callers guarantee adjacency; debug builds check it.
    pub(crate) fn new(cells: Vec<Position>) -> Self {
        debug_assert!(!cells.is_empty());
        debug_assert!(cells.windows(2).all(|pair| pair[0].is_adjacent(pair[1])));
        Self { cells }
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn start(&self) -> Position {
        self.cells[0]
    }

    pub fn goal(&self) -> Position {
        self.cells[self.cells.len() - 1]
    }

    /// Number of cells, start and goal included
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves needed to walk the route
    pub fn steps(&self) -> usize {
        self.cells.len() - 1
    }

    /// Cell following the start, if the route is longer than one cell
    pub fn next_cell(&self) -> Option<Position> {
        self.cells.get(1).copied()
    }

    /// Move from the start cell onto the second cell
    pub fn first_direction(&self) -> Option<Direction> {
        self.next_cell()
            .and_then(|next| self.start().direction_to(next))
    }

    /// The moves that walk the route from start to goal
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.cells
            .windows(2)
            .filter_map(|pair| pair[0].direction_to(pair[1]))
    }

    /// Drop every cell before `head` so that the route starts there.
    ///
    /// Returns false, leaving the route untouched, when `head` is not on it.
    pub fn advance_to(&mut self, head: Position) -> bool {
        match self.cells.iter().position(|cell| *cell == head) {
            Some(index) => {
                self.cells.drain(..index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Route {
        Route::new(vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 1),
        ])
    }

    #[test]
    fn test_route_accessors() {
        let route = line();
        assert_eq!(route.len(), 3);
        assert_eq!(route.steps(), 2);
        assert_eq!(route.start(), Position::new(0, 0));
        assert_eq!(route.goal(), Position::new(1, 1));
        assert_eq!(route.first_direction(), Some(Direction::Right));
        assert_eq!(
            route.directions().collect::<Vec<_>>(),
            vec![Direction::Right, Direction::Down]
        );
    }

    #[test]
    fn test_advance_to() {
        let mut route = line();
        assert!(route.advance_to(Position::new(1, 0)));
        assert_eq!(route.start(), Position::new(1, 0));
        assert_eq!(route.next_cell(), Some(Position::new(1, 1)));

        assert!(!route.advance_to(Position::new(5, 5)));
        assert_eq!(route.len(), 2);
    }

    #[test]
    fn test_single_cell_route_has_no_move() {
        let route = Route::new(vec![Position::new(3, 3)]);
        assert_eq!(route.steps(), 0);
        assert_eq!(route.first_direction(), None);
    }
}
