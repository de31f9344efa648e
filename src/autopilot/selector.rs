//! Heuristic move choice for ticks without a usable route.
//!
//! Every non-reversing move is scored by the open space it leaves behind.
//! SEEK adds a small pull towards the goal, SURVIVE a bonus for local
//! freedom. Candidates are shuffled per tick so equal scores do not always
//! favour the same side of the board.
//!
//! Space is measured with only the new head added to the obstacles. The cell
//! the head leaves stays open, so every legal move keeps at least one free
//! neighbour and the escape hatch always has a move to offer.

use rand::{seq::SliceRandom, Rng};

use super::config::AutopilotConfig;
use super::flood::{free_neighbors, reachable_count};
use super::mode::Mode;
use crate::game::{Direction, Grid, ObstacleSet, Position};

/// Evaluation of one legal candidate move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveScore {
    pub direction: Direction,
    /// Cells reachable from the new head once it blocks its own cell
    pub space: usize,
    pub free_neighbors: usize,
    pub goal_distance: u32,
    pub score: i64,
}

/// How a heuristic move was picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// Highest score
    Scored,
    /// Survival re-rank by free neighbours after space ran low
    EscapeHatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub direction: Direction,
    pub kind: SelectionKind,
}

/// Moves the head may try: all four, minus the reversal of `heading`
pub fn candidate_moves(heading: Option<Direction>) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|dir| heading.map_or(true, |heading| !heading.is_opposite(*dir)))
        .collect()
}

/// Score one move; `None` if it leaves the grid or hits an obstacle
pub fn score_move(
    head: Position,
    direction: Direction,
    obstacles: &ObstacleSet,
    grid: Grid,
    goal: Position,
    mode: Mode,
    config: &AutopilotConfig,
) -> Option<MoveScore> {
    let new_head = head.moved_in_direction(direction);
    if !grid.is_free(new_head, obstacles) {
        return None;
    }

    let occupied = obstacles.with(new_head);
    let space = reachable_count(new_head, &occupied, grid);
    let free_neighbors = free_neighbors(new_head, &occupied, grid);
    let goal_distance = new_head.manhattan(goal);

    let score = match mode {
        Mode::Survive => {
            space as i64 * config.space_weight + free_neighbors as i64 * config.neighbor_weight
        }
        Mode::Seek => space as i64 * config.space_weight - goal_distance as i64,
    };

    Some(MoveScore {
        direction,
        space,
        free_neighbors,
        goal_distance,
        score,
    })
}

/// Pick a move without a route. `None` means every candidate is lethal.
#[allow(clippy::too_many_arguments)]
pub fn select_move<R: Rng + ?Sized>(
    head: Position,
    heading: Option<Direction>,
    obstacles: &ObstacleSet,
    grid: Grid,
    goal: Position,
    mode: Mode,
    config: &AutopilotConfig,
    rng: &mut R,
) -> Option<Selection> {
    let mut moves = candidate_moves(heading);
    moves.shuffle(rng);

    let legal: Vec<MoveScore> = moves
        .iter()
        .filter_map(|dir| score_move(head, *dir, obstacles, grid, goal, mode, config))
        .collect();

    let mut best: Option<MoveScore> = None;
    for candidate in &legal {
        let better = match best {
            None => true,
            Some(current) => {
                candidate.score > current.score
                    || candidate.score == current.score
                        && match mode {
                            Mode::Survive => candidate.free_neighbors > current.free_neighbors,
                            Mode::Seek => candidate.goal_distance < current.goal_distance,
                        }
            }
        };
        if better {
            best = Some(*candidate);
        }
    }

    let best = best?;

    let escape_threshold = grid.cell_count() / config.escape_divisor;
    if mode == Mode::Survive && best.space < escape_threshold {
        // Too little room either way: just avoid dying next tick
        let escape = legal.iter().fold(best, |current, candidate| {
            if (candidate.free_neighbors, candidate.space) > (current.free_neighbors, current.space)
            {
                *candidate
            } else {
                current
            }
        });

        return Some(Selection {
            direction: escape.direction,
            kind: SelectionKind::EscapeHatch,
        });
    }

    Some(Selection {
        direction: best.direction,
        kind: SelectionKind::Scored,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn blocked(cells: &[(i32, i32)]) -> ObstacleSet {
        cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    fn pick(
        head: Position,
        heading: Option<Direction>,
        obstacles: &ObstacleSet,
        grid: Grid,
        goal: Position,
        mode: Mode,
        seed: u64,
    ) -> Option<Selection> {
        let mut rng = StdRng::seed_from_u64(seed);
        select_move(
            head,
            heading,
            obstacles,
            grid,
            goal,
            mode,
            &AutopilotConfig::default(),
            &mut rng,
        )
    }

    #[test]
    fn test_candidates_skip_reversal() {
        assert_eq!(candidate_moves(None).len(), 4);
        let moves = candidate_moves(Some(Direction::Up));
        assert_eq!(moves.len(), 3);
        assert!(!moves.contains(&Direction::Down));
    }

    #[test]
    fn test_illegal_moves_are_not_scored() {
        let grid = Grid::new(5, 5);
        let obstacles = blocked(&[(1, 0)]);
        let config = AutopilotConfig::default();
        let head = Position::new(0, 0);

        assert!(score_move(head, Direction::Up, &obstacles, grid, head, Mode::Seek, &config).is_none());
        assert!(score_move(head, Direction::Right, &obstacles, grid, head, Mode::Seek, &config).is_none());
        let down = score_move(head, Direction::Down, &obstacles, grid, head, Mode::Seek, &config).unwrap();
        // The cell being left is still open: 24 cells around the wall
        assert_eq!(down.space, 24);
        assert_eq!(down.free_neighbors, 3);
        assert_eq!(down.score, 24 * 1000 - 1);
    }

    #[test]
    fn test_seek_prefers_goal_on_open_board() {
        let grid = Grid::new(9, 9);
        for seed in 0..20 {
            let choice = pick(
                Position::new(4, 4),
                Some(Direction::Up),
                &ObstacleSet::new(),
                grid,
                Position::new(8, 4),
                Mode::Seek,
                seed,
            )
            .unwrap();
            assert_eq!(choice.direction, Direction::Right);
            assert_eq!(choice.kind, SelectionKind::Scored);
        }
    }

    #[test]
    fn test_space_covers_whole_region_behind_the_head() {
        // Stepping into a pocket still sees the region the head came from
        let grid = Grid::new(5, 5);
        let obstacles = blocked(&[(0, 1), (2, 1), (2, 0)]);
        let config = AutopilotConfig::default();
        let head = Position::new(1, 2);

        let up = score_move(head, Direction::Up, &obstacles, grid, head, Mode::Seek, &config).unwrap();
        let down = score_move(head, Direction::Down, &obstacles, grid, head, Mode::Seek, &config).unwrap();
        assert_eq!(up.space, 22);
        assert_eq!(down.space, 22);
    }

    #[test]
    fn test_survive_prefers_free_neighbors() {
        let grid = Grid::new(10, 10);
        for seed in 0..20 {
            let choice = pick(
                Position::new(0, 5),
                None,
                &ObstacleSet::new(),
                grid,
                Position::new(9, 9),
                Mode::Survive,
                seed,
            )
            .unwrap();
            assert_eq!(choice.direction, Direction::Right);
            assert_eq!(choice.kind, SelectionKind::Scored);
        }
    }

    #[test]
    fn test_never_reverses_when_alternatives_exist() {
        let grid = Grid::new(6, 6);
        for seed in 0..30 {
            let choice = pick(
                Position::new(3, 3),
                Some(Direction::Left),
                &ObstacleSet::new(),
                grid,
                Position::new(5, 3),
                Mode::Seek,
                seed,
            )
            .unwrap();
            assert_ne!(choice.direction, Direction::Right);
        }
    }

    #[test]
    fn test_escape_hatch_prefers_free_neighbors() {
        // 10x10 board, head in a cramped pocket: every option is below a tenth
        let grid = Grid::new(10, 10);
        let mut obstacles: ObstacleSet = grid.cells().collect();
        // Head at (1,1) with a T of free cells above and one cell below
        for cell in [(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)] {
            obstacles.remove(Position::new(cell.0, cell.1));
        }

        let choice = pick(
            Position::new(1, 1),
            None,
            &obstacles,
            grid,
            Position::new(9, 9),
            Mode::Survive,
            5,
        )
        .unwrap();

        // Up keeps three free neighbours, down only the cell it came from
        assert_eq!(choice.direction, Direction::Up);
        assert_eq!(choice.kind, SelectionKind::EscapeHatch);
    }

    #[test]
    fn test_escape_hatch_ignores_goal() {
        // Same pocket, goal right below: survival still takes the roomier cell
        let grid = Grid::new(10, 10);
        let mut obstacles: ObstacleSet = grid.cells().collect();
        for cell in [(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)] {
            obstacles.remove(Position::new(cell.0, cell.1));
        }

        for seed in 0..10 {
            let choice = pick(
                Position::new(1, 1),
                None,
                &obstacles,
                grid,
                Position::new(1, 2),
                Mode::Survive,
                seed,
            )
            .unwrap();
            assert_eq!(choice.direction, Direction::Up);
        }
    }

    #[test]
    fn test_no_legal_move() {
        let grid = Grid::new(3, 3);
        let ring = blocked(&[(1, 0), (0, 1), (2, 1), (1, 2)]);
        for mode in [Mode::Seek, Mode::Survive] {
            assert!(pick(Position::new(1, 1), None, &ring, grid, Position::new(0, 0), mode, 1).is_none());
        }
    }

    #[test]
    fn test_any_legal_move_is_always_offered() {
        use rand::Rng;

        let grid = Grid::new(5, 4);
        let config = AutopilotConfig::default();
        let mut board_rng = StdRng::seed_from_u64(0xfa11);

        for _ in 0..300 {
            let head = Position::new(board_rng.gen_range(0..5), board_rng.gen_range(0..4));
            let obstacles: ObstacleSet = grid
                .cells()
                .filter(|cell| *cell != head && board_rng.gen_bool(0.45))
                .collect();
            let heading = Direction::ALL[board_rng.gen_range(0..4)];
            let mode = if board_rng.gen_bool(0.5) { Mode::Seek } else { Mode::Survive };

            let legal: Vec<MoveScore> = candidate_moves(Some(heading))
                .into_iter()
                .filter_map(|dir| {
                    score_move(head, dir, &obstacles, grid, Position::new(0, 0), mode, &config)
                })
                .collect();
            let choice = pick(head, Some(heading), &obstacles, grid, Position::new(0, 0), mode, 3);

            assert_eq!(choice.is_some(), !legal.is_empty());
            // The vacated head cell keeps every legal move open on one side
            assert!(legal.iter().all(|score| score.free_neighbors >= 1));
            if let Some(choice) = choice {
                assert!(legal.iter().any(|score| score.direction == choice.direction));
            }
        }
    }

    #[test]
    fn test_only_reversal_left_counts_as_stuck() {
        let grid = Grid::new(3, 1);
        let choice = pick(
            Position::new(2, 0),
            Some(Direction::Right),
            &ObstacleSet::new(),
            grid,
            Position::new(0, 0),
            Mode::Seek,
            1,
        );
        assert!(choice.is_none());
    }
}
