//! One self-playing game: engine, state and autopilot advanced tick by tick.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::autopilot::{Autopilot, AutopilotConfig, Decision, DecisionSource};
use crate::game::{Action, CollisionType, GameConfig, GameEngine, GameState};
use crate::metrics::GameMetrics;

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    Collision(CollisionType),
    /// Every cell is covered by the snake
    BoardFull,
    /// Too many ticks without eating
    Stalled,
}

impl GameEnd {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEnd::Collision(CollisionType::Wall) => "hit wall",
            GameEnd::Collision(CollisionType::SelfCollision) => "hit itself",
            GameEnd::BoardFull => "board full",
            GameEnd::Stalled => "stalled",
        }
    }
}

/// Summary of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub score: u32,
    pub steps: u32,
    pub length: usize,
    pub end: GameEnd,
}

/// Result of advancing one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub decision: Decision,
    pub ate_food: bool,
    /// Set on the tick the game ends
    pub finished: Option<GameOutcome>,
}

pub struct Session {
    engine: GameEngine,
    state: GameState,
    autopilot: Autopilot,
    metrics: GameMetrics,
    idle_steps: u32,
    max_idle_steps: u32,
}

impl Session {
    pub fn new(game_config: GameConfig, autopilot_config: AutopilotConfig) -> Result<Self> {
        let mut engine = match autopilot_config.seed {
            Some(seed) => GameEngine::with_seed(game_config, seed),
            None => GameEngine::new(game_config),
        };
        let autopilot = Autopilot::new(autopilot_config).context("Failed to create autopilot")?;
        let state = engine.reset();
        let max_idle_steps = default_idle_limit(&state);

        Ok(Self {
            engine,
            state,
            autopilot,
            metrics: GameMetrics::new(),
            idle_steps: 0,
            max_idle_steps,
        })
    }

    /// End a game after this many ticks without food
    pub fn with_idle_limit(mut self, max_idle_steps: u32) -> Self {
        self.max_idle_steps = max_idle_steps.max(1);
        self
    }

    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.metrics = GameMetrics::with_high_score(high_score);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn autopilot(&self) -> &Autopilot {
        &self.autopilot
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut GameMetrics {
        &mut self.metrics
    }

    pub fn is_over(&self) -> bool {
        !self.state.is_alive
    }

    /// Start a new game, keeping the high score
    pub fn restart(&mut self) {
        self.state = self.engine.reset();
        self.autopilot.reset();
        self.metrics.on_game_start();
        self.idle_steps = 0;
    }

    /// Let the autopilot pick a move and advance the game by it
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let decision = self
            .autopilot
            .decide_for(&self.state)
            .context("Autopilot rejected the game state")?;
        self.metrics.on_decision(&decision);

        let result = self.engine.step(&mut self.state, Action::from(decision.direction));

        if result.info.ate_food {
            self.idle_steps = 0;
            debug!(score = self.state.score, length = self.state.snake.target_length, "ate food");
        } else {
            self.idle_steps += 1;
        }

        let end = if let Some(collision) = result.info.collision_type {
            Some(GameEnd::Collision(collision))
        } else if result.info.board_full {
            Some(GameEnd::BoardFull)
        } else if self.idle_steps >= self.max_idle_steps {
            self.state.is_alive = false;
            Some(GameEnd::Stalled)
        } else {
            None
        };

        let finished = end.map(|end| {
            let outcome = GameOutcome {
                score: self.state.score,
                steps: self.state.steps,
                length: self.state.snake.len(),
                end,
            };
            self.metrics.on_game_over(outcome.score);
            info!(
                score = outcome.score,
                steps = outcome.steps,
                length = outcome.length,
                end = end.as_str(),
                survive_ratio = self.metrics.survive_ratio(),
                route_moves = self.metrics.route_moves(),
                heuristic_moves = self.metrics.decision_count(DecisionSource::Heuristic),
                escapes = self.metrics.decision_count(DecisionSource::EscapeHatch),
                "game over"
            );
            outcome
        });

        Ok(TickOutcome {
            decision,
            ate_food: result.info.ate_food,
            finished,
        })
    }

    /// Tick until the current game ends
    pub fn play_to_end(&mut self) -> Result<GameOutcome> {
        loop {
            if let Some(outcome) = self.tick()?.finished {
                return Ok(outcome);
            }
        }
    }
}

/// Generous enough for a full sweep of the board between meals
fn default_idle_limit(state: &GameState) -> u32 {
    (state.grid().cell_count() as u32).saturating_mul(4).max(100)
}
