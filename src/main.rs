use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};
use snake_dash::game::{Difficulty, GameConfig, GameEngine};
use snake_dash::modes::HumanMode;
use snake_dash::score::{HighScoreBoard, JsonFileStore};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snake_dash")]
#[command(version, about = "Grid snake with obstacles and hold-to-boost speed")]
struct Cli {
    /// Difficulty for the first game (1/2/3 change it between games)
    #[arg(long, value_enum, default_value = "medium")]
    difficulty: Level,

    /// Grid width, overrides the config file
    #[arg(long)]
    width: Option<usize>,

    /// Grid height, overrides the config file
    #[arg(long)]
    height: Option<usize>,

    /// JSON game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// File the high score is kept in
    #[arg(long, default_value = ".snake_dash_scores.json")]
    scores: PathBuf,

    /// Log file (the terminal is taken by the game)
    #[arg(long, default_value = "snake_dash.log")]
    log_file: PathBuf,

    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Seed for food and obstacle placement
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Easy,
    Medium,
    Hard,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        }
    }
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    config.validate()?;

    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(cli.log_level.into(), Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let config = build_config(&cli)?;
    info!(
        "starting snake_dash {} on a {}x{} grid",
        env!("CARGO_PKG_VERSION"),
        config.grid_width,
        config.grid_height
    );

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };
    let high_score = HighScoreBoard::load(Box::new(JsonFileStore::new(&cli.scores)));

    HumanMode::run(engine, cli.difficulty.into(), high_score).await
}
