//! Headless mode: play games back to back without a terminal UI
//!
//! Each finished game is logged through `tracing`, and the best score is
//! persisted when a store is attached.

use anyhow::Result;
use tracing::info;

use super::session::{GameOutcome, Session};
use crate::autopilot::AutopilotConfig;
use crate::game::GameConfig;
use crate::metrics::BestScoreStore;

/// Aggregate over a headless run
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSummary {
    pub games: usize,
    pub best_score: u32,
    pub mean_score: f64,
    pub mean_steps: f64,
    pub outcomes: Vec<GameOutcome>,
}

impl HeadlessSummary {
    fn from_outcomes(outcomes: Vec<GameOutcome>, best_score: u32) -> Self {
        let games = outcomes.len();
        let (mean_score, mean_steps) = if games == 0 {
            (0.0, 0.0)
        } else {
            let score: u64 = outcomes.iter().map(|o| o.score as u64).sum();
            let steps: u64 = outcomes.iter().map(|o| o.steps as u64).sum();
            (score as f64 / games as f64, steps as f64 / games as f64)
        };

        Self {
            games,
            best_score,
            mean_score,
            mean_steps,
            outcomes,
        }
    }
}

pub struct HeadlessMode {
    session: Session,
    store: Option<BestScoreStore>,
}

impl HeadlessMode {
    pub fn new(
        game_config: GameConfig,
        autopilot_config: AutopilotConfig,
        store: Option<BestScoreStore>,
    ) -> Result<Self> {
        let high_score = store.as_ref().map_or(0, BestScoreStore::best);
        let session = Session::new(game_config, autopilot_config)?.with_high_score(high_score);
        Ok(Self { session, store })
    }

    /// Play `games` games and summarise them
    pub fn run(&mut self, games: usize) -> Result<HeadlessSummary> {
        let mut outcomes = Vec::with_capacity(games);

        for game in 0..games {
            if game > 0 {
                self.session.restart();
            }

            let outcome = self.session.play_to_end()?;
            if let Some(store) = self.store.as_mut() {
                store.record(outcome.score)?;
            }

            info!(
                game = game + 1,
                of = games,
                score = outcome.score,
                best = self.session.metrics().high_score,
                "finished game"
            );
            outcomes.push(outcome);
        }

        let summary =
            HeadlessSummary::from_outcomes(outcomes, self.session.metrics().high_score);
        info!(
            games = summary.games,
            best = summary.best_score,
            mean_score = summary.mean_score,
            mean_steps = summary.mean_steps,
            "headless run complete"
        );
        Ok(summary)
    }
}
