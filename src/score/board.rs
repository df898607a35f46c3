use log::{info, warn};

use super::store::ScoreStore;

/// Key the best score is stored under
pub const HIGH_SCORE_KEY: &str = "snake_high_score";

/// Best score seen across games, written through to a store on every record
pub struct HighScoreBoard {
    best: u32,
    store: Box<dyn ScoreStore>,
}

impl HighScoreBoard {
    /// Load the stored best score; an unreadable store starts from zero
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let best = match store.load(HIGH_SCORE_KEY) {
            Ok(best) => best.unwrap_or(0),
            Err(err) => {
                warn!("ignoring unreadable high score: {:#}", err);
                0
            }
        };

        Self { best, store }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record a score. Returns true if it set a new record.
    pub fn observe(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }

        self.best = score;
        info!("new high score {}", score);
        if let Err(err) = self.store.save(HIGH_SCORE_KEY, score) {
            warn!("failed to persist high score: {:#}", err);
        }
        true
    }
}
