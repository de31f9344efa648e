//! Autopilot tuning parameters

use serde::{Deserialize, Serialize};

/// Configuration for the autopilot's route reuse and move scoring
///
/// Default values reproduce the classic behaviour: a route is trusted for
/// three ticks, open space dominates every other scoring term, and the
/// survival escape hatch triggers once the best reachable region shrinks
/// below a tenth of the board.
///
/// # Example
///
/// ```rust
/// use auto_snake::autopilot::AutopilotConfig;
///
/// let config = AutopilotConfig {
///     path_ttl: 5,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// Number of ticks a cached route may be reused before it is recomputed
    ///
    /// Default: 3
    pub path_ttl: u32,

    /// Weight of reachable space in the move score
    ///
    /// Default: 1000
    pub space_weight: i64,

    /// Weight of free neighbouring cells in the survival move score
    ///
    /// Default: 200
    pub neighbor_weight: i64,

    /// The survival escape hatch fires when the best move's reachable space
    /// is below `cell_count / escape_divisor`
    ///
    /// Default: 10
    pub escape_divisor: usize,

    /// Seed for the per-tick move shuffle; `None` draws from entropy
    pub seed: Option<u64>,
}

impl AutopilotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same defaults with a fixed shuffle seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Check that all parameters are usable
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.path_ttl == 0 {
            return Err("path_ttl must be at least 1".to_string());
        }

        if self.space_weight <= 0 {
            return Err(format!(
                "space_weight must be positive, got {}",
                self.space_weight
            ));
        }

        if self.neighbor_weight < 0 {
            return Err(format!(
                "neighbor_weight must be non-negative, got {}",
                self.neighbor_weight
            ));
        }

        if self.escape_divisor == 0 {
            return Err("escape_divisor must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            path_ttl: 3,
            space_weight: 1000,
            neighbor_weight: 200,
            escape_divisor: 10,
            seed: None,
        }
    }
}
