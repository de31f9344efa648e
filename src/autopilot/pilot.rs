//! Per-tick decision pipeline.

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, trace, warn};

use super::cache::{PathCache, StepOrigin};
use super::config::AutopilotConfig;
use super::error::{AutopilotError, Result};
use super::mode::{assess, Mode};
use super::route::Route;
use super::selector::{select_move, SelectionKind};
use crate::game::{Direction, GameState, Grid, ObstacleSet, Position, Snake};

/// Everything the autopilot needs to know about one tick
#[derive(Debug, Clone)]
pub struct TickInput {
    pub head: Position,
    pub heading: Option<Direction>,
    pub goal: Position,
    pub grid: Grid,
    pub obstacles: ObstacleSet,
}

impl TickInput {
    /// Derive the tick from a snake, its target cell and the board
    pub fn from_snake(snake: &Snake, goal: Position, grid: Grid) -> Self {
        Self {
            head: snake.head(),
            heading: Some(snake.direction),
            goal,
            grid,
            obstacles: ObstacleSet::from_snake(snake),
        }
    }

    pub fn from_state(state: &GameState) -> Self {
        Self::from_snake(&state.snake, state.food, state.grid())
    }

    /// Reject inputs no game could produce
    pub fn validate(&self) -> Result<()> {
        let Grid { width, height } = self.grid;
        if self.grid.cell_count() == 0 {
            return Err(AutopilotError::EmptyGrid { width, height });
        }
        if !self.grid.contains(self.head) {
            return Err(AutopilotError::HeadOutOfBounds {
                head: self.head,
                width,
                height,
            });
        }
        if !self.grid.contains(self.goal) {
            return Err(AutopilotError::GoalOutOfBounds {
                goal: self.goal,
                width,
                height,
            });
        }
        if self.obstacles.contains(self.head) {
            return Err(AutopilotError::HeadInObstacles { head: self.head });
        }
        Ok(())
    }
}

/// Which part of the pipeline produced the move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionSource {
    /// Next cell of a route kept from an earlier tick
    CachedRoute,
    /// First step of a route computed this tick
    FreshRoute,
    /// Best-scoring move from the heuristic
    Heuristic,
    /// Survival re-rank by free neighbours
    EscapeHatch,
    /// No legal move exists
    Stuck,
}

impl DecisionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CachedRoute => "cached route",
            Self::FreshRoute => "fresh route",
            Self::Heuristic => "heuristic",
            Self::EscapeHatch => "escape hatch",
            Self::Stuck => "stuck",
        }
    }
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Move to make; `None` when every move is lethal
    pub direction: Option<Direction>,
    pub mode: Mode,
    pub source: DecisionSource,
    /// Cells reachable from the head this tick
    pub accessible: usize,
}

/// Drives the snake: one [`Decision`] per tick.
///
/// Apart from the path cache and the previous mode, nothing survives from
/// one tick to the next.
pub struct Autopilot {
    config: AutopilotConfig,
    cache: PathCache,
    last_mode: Option<Mode>,
    rng: StdRng,
}

impl Autopilot {
    pub fn new(config: AutopilotConfig) -> Result<Self> {
        config.validate().map_err(AutopilotError::InvalidConfig)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            cache: PathCache::new(config.path_ttl),
            config,
            last_mode: None,
            rng,
        })
    }

    /// Mode chosen on the last tick, if any
    pub fn mode(&self) -> Option<Mode> {
        self.last_mode
    }

    /// Route the cache is currently following
    pub fn planned_route(&self) -> Option<&Route> {
        self.cache.route()
    }

    /// Forget all cross-tick state, e.g. when a new game starts
    pub fn reset(&mut self) {
        self.cache.invalidate();
        self.last_mode = None;
    }

    /// Decide for the current state of a game
    pub fn decide_for(&mut self, state: &GameState) -> Result<Decision> {
        self.decide(&TickInput::from_state(state))
    }

    /// Pick the move for this tick
    pub fn decide(&mut self, input: &TickInput) -> Result<Decision> {
        input.validate()?;
        let TickInput {
            head,
            heading,
            goal,
            grid,
            ref obstacles,
        } = *input;

        let assessment = assess(head, goal, obstacles, grid);
        let mode = assessment.mode;

        if self.last_mode != Some(mode) {
            if let Some(previous) = self.last_mode {
                debug!(
                    from = previous.as_str(),
                    to = mode.as_str(),
                    accessible = assessment.accessible,
                    total_free = assessment.total_free,
                    "mode changed"
                );
            }
            self.cache.invalidate();
            self.last_mode = Some(mode);
        }

        let decision = |direction, source| Decision {
            direction,
            mode,
            source,
            accessible: assessment.accessible,
        };

        if mode == Mode::Seek {
            let step = self.cache.next_step(
                head,
                heading,
                goal,
                obstacles,
                grid,
                assessment.route.clone(),
            );
            if let Some(step) = step {
                let source = match step.origin {
                    StepOrigin::Cached => DecisionSource::CachedRoute,
                    StepOrigin::Fresh => DecisionSource::FreshRoute,
                };
                trace!(?head, ?goal, direction = ?step.direction, source = source.as_str(), "route step");
                return Ok(decision(Some(step.direction), source));
            }
        }

        let selection = select_move(
            head,
            heading,
            obstacles,
            grid,
            goal,
            mode,
            &self.config,
            &mut self.rng,
        );

        match selection {
            Some(selection) => {
                let source = match selection.kind {
                    SelectionKind::Scored => DecisionSource::Heuristic,
                    SelectionKind::EscapeHatch => DecisionSource::EscapeHatch,
                };
                trace!(?head, direction = ?selection.direction, source = source.as_str(), mode = mode.as_str(), "heuristic move");
                Ok(decision(Some(selection.direction), source))
            }
            None => {
                warn!(?head, accessible = assessment.accessible, "no legal move left");
                Ok(decision(None, DecisionSource::Stuck))
            }
        }
    }
}
