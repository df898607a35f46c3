//! Storage for named integer scores.
//!
//! The file store keeps every key in one pretty-printed JSON object so other
//! values can live next to the high score without clobbering each other.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Key/value store for score records
pub trait ScoreStore {
    fn load(&self, key: &str) -> Result<Option<u32>>;
    fn save(&mut self, key: &str, value: u32) -> Result<()>;
}

/// Scores kept as a JSON object in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, u32>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read scores from {:?}", self.path))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to deserialize scores in {:?}", self.path))
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<u32>> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn save(&mut self, key: &str, value: u32) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let mut scores = self.read_all()?;
        scores.insert(key.to_string(), value);

        let json = serde_json::to_string_pretty(&scores).context("Failed to serialize scores")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write scores to {:?}", self.path))?;
        Ok(())
    }
}

/// In-process store; nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: BTreeMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<u32>> {
        Ok(self.scores.get(key).copied())
    }

    fn save(&mut self, key: &str, value: u32) -> Result<()> {
        self.scores.insert(key.to_string(), value);
        Ok(())
    }
}
