//! Bounded reuse of a route across ticks.

use super::astar::find_path;
use super::route::Route;
use crate::game::{Direction, Grid, ObstacleSet, Position};

/// Where a cached step came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOrigin {
    /// Next cell of a route computed on an earlier tick
    Cached,
    /// Route computed this tick
    Fresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedStep {
    pub direction: Direction,
    pub origin: StepOrigin,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    route: Route,
    goal: Position,
    ticks_left: u32,
}

/// Holds at most one route plus the number of ticks it may still be reused.
///
/// A held route is trusted only while it still starts at (or passes through)
/// the head, its next cell is free under the current obstacles and the
/// counter is above zero. Anything else forces a fresh A* search.
#[derive(Debug, Clone)]
pub struct PathCache {
    entry: Option<CacheEntry>,
    ttl: u32,
}

impl PathCache {
    pub fn new(ttl: u32) -> Self {
        Self { entry: None, ttl }
    }

    /// Route currently held, starting at the last head it was used from
    pub fn route(&self) -> Option<&Route> {
        self.entry.as_ref().map(|entry| &entry.route)
    }

    /// Reuses left on the held route, 0 when empty
    pub fn ticks_left(&self) -> u32 {
        self.entry.as_ref().map_or(0, |entry| entry.ticks_left)
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Next move towards `goal`, reusing the held route when it is still valid.
    ///
    /// `fresh` is a route already computed this tick from `head` (for example
    /// by the mode decision); it is adopted instead of running A* again.
    /// Returns `None`, with the cache cleared, when no route exists.
    pub fn next_step(
        &mut self,
        head: Position,
        heading: Option<Direction>,
        goal: Position,
        obstacles: &ObstacleSet,
        grid: Grid,
        fresh: Option<Route>,
    ) -> Option<CachedStep> {
        if self.entry.as_ref().is_some_and(|entry| entry.goal != goal) {
            self.invalidate();
        }

        if let Some(direction) = self.reuse(head, heading, obstacles, grid) {
            return Some(CachedStep {
                direction,
                origin: StepOrigin::Cached,
            });
        }
        self.invalidate();

        let route = fresh
            .filter(|route| route.start() == head && route.goal() == goal)
            .or_else(|| find_path(head, goal, obstacles, grid))?;

        let route = if reverses(&route, heading) {
            // Plan again with the cell behind the head closed off
            let behind = heading.map(|dir| head.moved_in_direction(dir.opposite()))?;
            find_path(head, goal, &obstacles.with(behind), grid)?
        } else {
            route
        };

        let direction = route.first_direction()?;
        self.entry = Some(CacheEntry {
            route,
            goal,
            ticks_left: self.ttl,
        });

        Some(CachedStep {
            direction,
            origin: StepOrigin::Fresh,
        })
    }

    fn reuse(
        &mut self,
        head: Position,
        heading: Option<Direction>,
        obstacles: &ObstacleSet,
        grid: Grid,
    ) -> Option<Direction> {
        let entry = self.entry.as_mut()?;
        if entry.ticks_left == 0 || !entry.route.advance_to(head) {
            return None;
        }

        let next = entry.route.next_cell()?;
        if !grid.is_free(next, obstacles) || reverses(&entry.route, heading) {
            return None;
        }

        entry.ticks_left -= 1;
        entry.route.first_direction()
    }
}

fn reverses(route: &Route, heading: Option<Direction>) -> bool {
    match (route.first_direction(), heading) {
        (Some(step), Some(heading)) => step.is_opposite(heading),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(10, 10)
    }

    #[test]
    fn test_first_call_computes_route() {
        let mut cache = PathCache::new(3);
        let step = cache
            .next_step(
                Position::new(0, 0),
                None,
                Position::new(3, 0),
                &ObstacleSet::new(),
                grid(),
                None,
            )
            .unwrap();

        assert_eq!(step.origin, StepOrigin::Fresh);
        assert_eq!(step.direction, Direction::Right);
        assert_eq!(cache.ticks_left(), 3);
        assert_eq!(cache.route().unwrap().steps(), 3);
    }

    #[test]
    fn test_reuse_until_ttl_runs_out() {
        let mut cache = PathCache::new(2);
        let goal = Position::new(5, 0);
        let obstacles = ObstacleSet::new();
        let heading = Some(Direction::Right);

        let mut origins = Vec::new();
        for x in 0..4 {
            let step = cache
                .next_step(Position::new(x, 0), heading, goal, &obstacles, grid(), None)
                .unwrap();
            assert_eq!(step.direction, Direction::Right);
            origins.push(step.origin);
        }

        assert_eq!(
            origins,
            vec![
                StepOrigin::Fresh,
                StepOrigin::Cached,
                StepOrigin::Cached,
                StepOrigin::Fresh
            ]
        );
    }

    #[test]
    fn test_goal_change_drops_route() {
        let mut cache = PathCache::new(3);
        let obstacles = ObstacleSet::new();
        cache.next_step(Position::new(0, 0), None, Position::new(4, 0), &obstacles, grid(), None);

        let step = cache
            .next_step(
                Position::new(1, 0),
                Some(Direction::Right),
                Position::new(1, 5),
                &obstacles,
                grid(),
                None,
            )
            .unwrap();

        assert_eq!(step.origin, StepOrigin::Fresh);
        assert_eq!(step.direction, Direction::Down);
        assert_eq!(cache.route().unwrap().goal(), Position::new(1, 5));
    }

    #[test]
    fn test_head_off_route_forces_recompute() {
        let mut cache = PathCache::new(3);
        let obstacles = ObstacleSet::new();
        let goal = Position::new(4, 0);
        cache.next_step(Position::new(0, 0), None, goal, &obstacles, grid(), None);

        let step = cache
            .next_step(Position::new(0, 1), Some(Direction::Down), goal, &obstacles, grid(), None)
            .unwrap();
        assert_eq!(step.origin, StepOrigin::Fresh);
        assert_eq!(cache.route().unwrap().start(), Position::new(0, 1));
    }

    #[test]
    fn test_blocked_next_cell_is_never_returned() {
        let mut cache = PathCache::new(3);
        let goal = Position::new(4, 0);
        cache.next_step(Position::new(0, 0), None, goal, &ObstacleSet::new(), grid(), None);

        // Something now sits where the route goes next
        let obstacles: ObstacleSet = [Position::new(2, 0)].into_iter().collect();
        let step = cache
            .next_step(Position::new(1, 0), Some(Direction::Right), goal, &obstacles, grid(), None)
            .unwrap();

        assert_eq!(step.origin, StepOrigin::Fresh);
        assert_ne!(step.direction, Direction::Right);
        assert!(!cache.route().unwrap().cells().contains(&Position::new(2, 0)));
    }

    #[test]
    fn test_unreachable_goal_clears_cache() {
        let mut cache = PathCache::new(3);
        let goal = Position::new(9, 0);
        cache.next_step(Position::new(0, 0), None, goal, &ObstacleSet::new(), grid(), None);
        assert!(!cache.is_empty());

        let wall: ObstacleSet = (0..10).map(|y| Position::new(5, y)).collect();
        let step = cache.next_step(Position::new(1, 0), Some(Direction::Right), goal, &wall, grid(), None);

        assert!(step.is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fresh_route_is_adopted() {
        let mut cache = PathCache::new(3);
        let route = Route::new(vec![
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 1),
        ]);

        let step = cache
            .next_step(
                Position::new(0, 0),
                None,
                Position::new(1, 1),
                &ObstacleSet::new(),
                grid(),
                Some(route.clone()),
            )
            .unwrap();

        assert_eq!(step.direction, Direction::Down);
        assert_eq!(cache.route(), Some(&route));
    }

    #[test]
    fn test_never_reverses_onto_free_cell_behind() {
        // Single-cell snake heading right, goal directly behind it
        let mut cache = PathCache::new(3);
        let step = cache
            .next_step(
                Position::new(5, 5),
                Some(Direction::Right),
                Position::new(3, 5),
                &ObstacleSet::new(),
                grid(),
                None,
            )
            .unwrap();

        assert_ne!(step.direction, Direction::Left);
        assert_eq!(cache.route().unwrap().steps(), 4);
    }
}
