//! Core game logic module for Snake
//!
//! Everything here is free of terminal I/O. Time enters only as `Instant`
//! arguments, so the whole loop can be driven deterministically from tests.

pub mod action;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod game_loop;
pub mod placer;
pub mod speed;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use clock::{Clock, wait_for};
pub use config::{Difficulty, DifficultyProfile, GameConfig};
pub use engine::{GameEngine, StepResult};
pub use error::{GameError, PlacementTarget};
pub use game_loop::{Board, FrameSink, GameLoop, Snapshot};
pub use placer::{Constraint, RandomPlacer};
pub use speed::{HoldTimer, SpeedController, SpeedMode, SpeedState};
pub use state::{CollisionType, GameState, GameStatus, Position, Snake};
