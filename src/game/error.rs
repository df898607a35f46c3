use thiserror::Error;

use super::state::GameStatus;

/// What a placement was trying to put on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementTarget {
    Food,
    Obstacle,
}

/// Errors raised by the game engine and game loop
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// The request is not allowed in the current game status
    #[error("cannot {action} while the game is {status:?}")]
    InvalidTransition {
        action: &'static str,
        status: GameStatus,
    },

    /// No acceptable cell was found within the retry budget
    #[error("could not place {target:?} after {attempts} attempts")]
    PlacementExhausted {
        target: PlacementTarget,
        attempts: u32,
    },
}
