//! Autopilot for the snake
//!
//! Provides:
//! - Reachable-space counting (flood fill)
//! - Shortest routes (A* with a Manhattan heuristic)
//! - SEEK / SURVIVE mode selection
//! - Bounded route reuse across ticks
//! - Space-based move scoring when no route is usable

pub mod astar;
pub mod cache;
pub mod config;
pub mod error;
pub mod flood;
pub mod mode;
pub mod pilot;
pub mod route;
pub mod selector;

pub use astar::find_path;
pub use cache::{CachedStep, PathCache, StepOrigin};
pub use config::AutopilotConfig;
pub use error::AutopilotError;
pub use flood::{free_neighbors, reachable_count};
pub use mode::{assess, Mode, ModeAssessment};
pub use pilot::{Autopilot, Decision, DecisionSource, TickInput};
pub use route::Route;
pub use selector::{select_move, MoveScore, Selection, SelectionKind};
