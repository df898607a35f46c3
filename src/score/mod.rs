pub mod board;
pub mod store;

pub use board::{HIGH_SCORE_KEY, HighScoreBoard};
pub use store::{JsonFileStore, MemoryStore, ScoreStore};
