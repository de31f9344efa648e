use std::{fs::File, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auto_snake::autopilot::AutopilotConfig;
use auto_snake::game::GameConfig;
use auto_snake::metrics::BestScoreStore;
use auto_snake::modes::{AutopilotMode, HeadlessMode};

#[derive(Parser)]
#[command(name = "auto_snake")]
#[command(version, about = "Snake played by an A*/flood-fill autopilot")]
struct Cli {
    /// Watch the autopilot in the terminal, or run games without a UI
    #[arg(long, default_value = "autopilot")]
    mode: Mode,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Number of games to play in headless mode
    #[arg(long, default_value = "10")]
    games: usize,

    /// Seed for food placement and move shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with `game` and `autopilot` settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the best score is kept between runs
    #[arg(long, default_value = BestScoreStore::DEFAULT_FILE)]
    best_score_file: PathBuf,

    /// Write logs to this file (the terminal UI otherwise logs nothing)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Watch the autopilot play in the terminal
    Autopilot,
    /// Play games back to back and print a summary
    Headless,
}

/// Contents of the `--config` file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    game: GameConfig,
    autopilot: AutopilotConfig,
}

impl FileConfig {
    fn load(path: Option<&PathBuf>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }
}

fn init_logging(mode: Mode, log_file: Option<&PathBuf>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("auto_snake=info"));

    match (mode, log_file) {
        (_, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
                .init();
        }
        (Mode::Headless, None) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        // Log lines on stderr would tear the terminal UI
        (Mode::Autopilot, None) => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.mode, cli.log_file.as_ref())?;

    let FileConfig {
        mut game,
        mut autopilot,
    } = FileConfig::load(cli.config.as_ref())?;

    if let Some(width) = cli.width {
        game.grid_width = width;
    }
    if let Some(height) = cli.height {
        game.grid_height = height;
    }
    if cli.seed.is_some() {
        autopilot.seed = cli.seed;
    }

    anyhow::ensure!(
        game.grid_width > 0 && game.grid_height > 0,
        "grid must be at least 1x1, got {}x{}",
        game.grid_width,
        game.grid_height
    );

    let store = BestScoreStore::load(&cli.best_score_file)?;
    info!(
        width = game.grid_width,
        height = game.grid_height,
        best = store.best(),
        "starting"
    );

    match cli.mode {
        Mode::Autopilot => {
            let mut autopilot_mode = AutopilotMode::new(game, autopilot, Some(store))?;
            autopilot_mode.run().await?;
        }
        Mode::Headless => {
            let mut headless_mode = HeadlessMode::new(game, autopilot, Some(store))?;
            let summary = headless_mode.run(cli.games)?;

            println!("Games played: {}", summary.games);
            println!("Best score:   {}", summary.best_score);
            println!("Mean score:   {:.1}", summary.mean_score);
            println!("Mean steps:   {:.1}", summary.mean_steps);
        }
    }

    Ok(())
}
