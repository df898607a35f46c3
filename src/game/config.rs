use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Selectable difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Timing, growth and obstacle parameters for this level
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                normal_interval: Duration::from_millis(200),
                accelerated_interval: Duration::from_millis(120),
                growth_per_food: 1,
                obstacle_count: 3,
                min_distance: 5,
            },
            Difficulty::Medium => DifficultyProfile {
                normal_interval: Duration::from_millis(150),
                accelerated_interval: Duration::from_millis(80),
                growth_per_food: 1,
                obstacle_count: 5,
                min_distance: 4,
            },
            Difficulty::Hard => DifficultyProfile {
                normal_interval: Duration::from_millis(100),
                accelerated_interval: Duration::from_millis(50),
                growth_per_food: 2,
                obstacle_count: 8,
                min_distance: 3,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable parameter bundle picked once per game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyProfile {
    /// Tick interval while not boosting
    pub normal_interval: Duration,
    /// Tick interval while a direction key is held
    pub accelerated_interval: Duration,
    /// Net segments gained per food item (at least 1)
    pub growth_per_food: usize,
    /// Number of obstacles generated at game start
    pub obstacle_count: usize,
    /// Minimum Euclidean distance between an obstacle and the starting snake or food
    pub min_distance: u32,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Points awarded per food item
    pub food_reward: u32,
    /// Candidate cells sampled before a placement gives up
    pub placement_attempts: u32,
    /// How long a direction key must stay down before the boost engages
    #[serde(with = "millis")]
    pub hold_threshold: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            food_reward: 10,
            placement_attempts: 10_000,
            hold_threshold: Duration::from_millis(200),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to deserialize config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject grids that cannot hold the starting snake
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.initial_snake_length >= 1,
            "initial_snake_length must be at least 1"
        );
        anyhow::ensure!(
            self.grid_width / 2 + 1 >= self.initial_snake_length && self.grid_height >= 1,
            "a {}x{} grid cannot fit a snake of length {}",
            self.grid_width,
            self.grid_height,
            self.initial_snake_length
        );
        anyhow::ensure!(
            self.placement_attempts > 0,
            "placement_attempts must be positive"
        );
        Ok(())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
