use std::collections::VecDeque;

use super::action::Direction;
use super::config::{Difficulty, DifficultyProfile};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Squared Euclidean distance, exact in integers
    pub fn distance_squared(&self, other: Position) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }
}

/// The snake in the game, head first
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Create a snake whose body trails behind `head`, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self { body }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(segments: impl IntoIterator<Item = Position>) -> Self {
        Self {
            body: segments.into_iter().collect(),
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    /// Check if position is covered by any segment
    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub(crate) fn push_head(&mut self, pos: Position) {
        self.body.push_front(pos);
    }

    pub(crate) fn drop_tail(&mut self) {
        self.body.pop_back();
    }

    /// Stack `extra` copies of the tail; they unfurl as the snake moves on
    pub(crate) fn grow_tail(&mut self, extra: usize) {
        let tail = self.tail();
        self.body.extend(std::iter::repeat(tail).take(extra));
    }

    /// Returns true if two segments share a cell, ignoring copies stacked on the tail
    pub fn overlaps_itself(&self) -> bool {
        let tail = self.tail();
        let stacked = self.body.iter().rev().take_while(|&&p| p == tail).count();
        let distinct = self.body.len() - stacked + 1;

        let mut seen = std::collections::HashSet::with_capacity(distinct);
        self.body
            .iter()
            .take(distinct)
            .any(|&segment| !seen.insert(segment))
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake hit an obstacle
    Obstacle,
}

/// Lifecycle of a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    NotStarted,
    Running,
    Paused,
    Over,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub obstacles: Vec<Position>,
    /// Direction applied on the last tick
    pub direction: Direction,
    /// Direction requested by input, applied on the next tick
    pub pending_direction: Direction,
    pub difficulty: Difficulty,
    pub profile: DifficultyProfile,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub status: GameStatus,
}

impl GameState {
    /// Create a running game state heading right
    pub fn new(
        snake: Snake,
        food: Position,
        obstacles: Vec<Position>,
        difficulty: Difficulty,
        grid_width: usize,
        grid_height: usize,
    ) -> Self {
        Self {
            snake,
            food,
            obstacles,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            difficulty,
            profile: difficulty.profile(),
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            status: GameStatus::Running,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// Queue a turn for the next tick; reversals of the current heading are dropped
    pub fn queue_direction(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Over
    }
}
