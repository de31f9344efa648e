//! Auto Snake - Snake played by a path-planning autopilot
//!
//! This library provides:
//! - Core game logic (game module)
//! - The autopilot decision engine: flood fill, A*, route reuse and move scoring (autopilot module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Execution modes, interactive and headless (modes module)
//! - Metrics and best score persistence (metrics module)

pub mod autopilot;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
