use super::{
    action::{Action, Direction},
    config::GameConfig,
    grid::ObstacleSet,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::{rngs::StdRng, seq::IteratorRandom, SeedableRng};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// No free cell was left for new food; the game is won
    pub board_full: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Points gained this step
    pub points: u32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn finished(collision_type: Option<CollisionType>, board_full: bool) -> Self {
        Self {
            points: 0,
            terminated: true,
            info: StepInfo {
                ate_food: false,
                collision_type,
                board_full,
            },
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        // Keep the initial body on the board
        let length = self
            .config
            .initial_snake_length
            .clamp(1, center_x as usize + 1);

        let snake = Snake::new(Position::new(center_x, center_y), Direction::Right, length);

        // A fresh board always has room for food unless it is a single cell
        let food = self
            .spawn_food_avoid_snake(&snake)
            .unwrap_or(snake.head());

        GameState::new(snake, food, self.config.grid_width, self.config.grid_height)
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult::finished(None, false);
        }

        // Update direction based on action (prevent 180° turns)
        match action {
            Action::Move(new_direction) => {
                if !state.snake.direction.is_opposite(new_direction) {
                    state.snake.direction = new_direction;
                }
            }
            Action::Continue => {
                // Keep current direction
            }
        }

        // Calculate new head position
        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        // Check for collisions
        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.is_alive = false;
            state.steps += 1;
            return StepResult::finished(Some(collision_type), false);
        }

        let ate_food = new_head == state.food;
        state.snake.move_snake();
        state.steps += 1;

        if !ate_food {
            return StepResult {
                points: 0,
                terminated: false,
                info: StepInfo {
                    ate_food,
                    collision_type: None,
                    board_full: false,
                },
            };
        }

        // The body catches up with the new length on the following moves
        state.snake.grow();
        state.score += self.config.points_per_food;

        let board_full = match self.spawn_food_avoid_snake(&state.snake) {
            Some(food) => {
                state.food = food;
                false
            }
            None => {
                state.is_alive = false;
                true
            }
        };

        StepResult {
            points: self.config.points_per_food,
            terminated: board_full,
            info: StepInfo {
                ate_food,
                collision_type: None,
                board_full,
            },
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        // Check wall collision
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // Check self-collision against the cells still occupied after the move
        if ObstacleSet::from_snake(&state.snake).contains(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Spawn food at a random empty position, or `None` if the board is full
    fn spawn_food_avoid_snake(&mut self, snake: &Snake) -> Option<Position> {
        let grid = super::grid::Grid::new(self.config.grid_width, self.config.grid_height);
        grid.cells()
            .filter(|pos| !snake.body.contains(pos))
            .choose(&mut self.rng)
    }
}
