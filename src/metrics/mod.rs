pub mod best_score;
pub mod game_metrics;

pub use best_score::BestScoreStore;
pub use game_metrics::GameMetrics;
