use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::autopilot::{Decision, DecisionSource, Mode};

pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    /// Ticks spent in each mode during the current game
    pub seek_ticks: u32,
    pub survive_ticks: u32,
    /// How this game's moves were chosen
    pub decisions: HashMap<DecisionSource, u32>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            seek_ticks: 0,
            survive_ticks: 0,
            decisions: HashMap::new(),
        }
    }

    /// Start from a previously persisted best score
    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            high_score,
            ..Self::new()
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.seek_ticks = 0;
        self.survive_ticks = 0;
        self.decisions.clear();
    }

    pub fn on_decision(&mut self, decision: &Decision) {
        match decision.mode {
            Mode::Seek => self.seek_ticks += 1,
            Mode::Survive => self.survive_ticks += 1,
        }
        *self.decisions.entry(decision.source).or_insert(0) += 1;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    /// Moves this game chose through `source`
    pub fn decision_count(&self, source: DecisionSource) -> u32 {
        self.decisions.get(&source).copied().unwrap_or(0)
    }

    /// Moves this game taken from a planned route, cached or fresh
    pub fn route_moves(&self) -> u32 {
        self.decision_count(DecisionSource::CachedRoute)
            + self.decision_count(DecisionSource::FreshRoute)
    }

    /// Share of this game's ticks spent in SURVIVE, 0.0 before the first tick
    pub fn survive_ratio(&self) -> f32 {
        let total = self.seek_ticks + self.survive_ticks;
        if total == 0 {
            0.0
        } else {
            self.survive_ticks as f32 / total as f32
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
