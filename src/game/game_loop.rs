//! Drives the simulation: owns the current game, the clock and the speed
//! controller, and hands a read-only snapshot to the frame sink after every
//! tick.
//!
//! Every mutation goes through `&mut self`, so a sink can only ever see the
//! state between ticks.

use log::{error, info, warn};
use tokio::time::Instant;

use super::{
    action::Direction,
    clock::Clock,
    config::Difficulty,
    engine::{GameEngine, StepResult},
    error::GameError,
    speed::{SpeedController, SpeedMode},
    state::{GameState, GameStatus, Position, Snake},
};
use crate::metrics::GameMetrics;
use crate::score::HighScoreBoard;

/// The grid part of a snapshot, present once a game has been started
#[derive(Debug, Clone, Copy)]
pub struct Board<'a> {
    pub snake: &'a Snake,
    pub food: Position,
    pub obstacles: &'a [Position],
    pub direction: Direction,
    pub grid_width: usize,
    pub grid_height: usize,
}

/// What a renderer gets to see
#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    pub status: GameStatus,
    pub difficulty: Difficulty,
    pub speed: SpeedMode,
    pub score: u32,
    pub high_score: u32,
    /// The current game has beaten the best score it started against
    pub new_record: bool,
    pub metrics: &'a GameMetrics,
    pub board: Option<Board<'a>>,
}

impl<'a> Snapshot<'a> {
    fn capture(
        state: Option<&'a GameState>,
        difficulty: Difficulty,
        speed: SpeedMode,
        high_score: u32,
        new_record: bool,
        metrics: &'a GameMetrics,
    ) -> Self {
        Self {
            status: status_of(state),
            difficulty,
            speed,
            score: state.map_or(0, |s| s.score),
            high_score,
            new_record,
            metrics,
            board: state.map(|s| Board {
                snake: &s.snake,
                food: s.food,
                obstacles: &s.obstacles,
                direction: s.direction,
                grid_width: s.grid_width,
                grid_height: s.grid_height,
            }),
        }
    }
}

/// Receives a snapshot once per tick and on redraw requests
pub trait FrameSink {
    fn present(&mut self, snapshot: &Snapshot<'_>);

    /// Called instead of `present` on the tick that ends the game
    fn game_over(&mut self, snapshot: &Snapshot<'_>) {
        self.present(snapshot);
    }
}

fn status_of(state: Option<&GameState>) -> GameStatus {
    state.map_or(GameStatus::NotStarted, |s| s.status)
}

pub struct GameLoop<S: FrameSink> {
    engine: GameEngine,
    difficulty: Difficulty,
    state: Option<GameState>,
    speed: SpeedController,
    clock: Clock,
    high_score: HighScoreBoard,
    new_record: bool,
    metrics: GameMetrics,
    sink: S,
}

impl<S: FrameSink> GameLoop<S> {
    pub fn new(
        engine: GameEngine,
        difficulty: Difficulty,
        high_score: HighScoreBoard,
        sink: S,
    ) -> Self {
        let speed = SpeedController::new(engine.config().hold_threshold);
        let clock = Clock::new(difficulty.profile().normal_interval);

        Self {
            engine,
            difficulty,
            state: None,
            speed,
            clock,
            high_score,
            new_record: false,
            metrics: GameMetrics::new(),
            sink,
        }
    }

    pub fn status(&self) -> GameStatus {
        status_of(self.state.as_ref())
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn speed_mode(&self) -> SpeedMode {
        self.speed.mode()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// When the clock wants the next tick
    pub fn tick_deadline(&self) -> Option<Instant> {
        self.clock.deadline()
    }

    /// When the pending hold timer expires
    pub fn hold_deadline(&self) -> Option<Instant> {
        self.speed.hold_deadline()
    }

    /// Change the level used by the next game; refused mid-game
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        let status = self.status();
        if matches!(status, GameStatus::Running | GameStatus::Paused) {
            warn!("refusing difficulty change to {} while {:?}", difficulty, status);
            return Err(GameError::InvalidTransition {
                action: "change difficulty",
                status,
            });
        }

        self.difficulty = difficulty;
        Ok(())
    }

    /// Replace the current game with a fresh one. On failure the old game is kept.
    pub fn new_game(&mut self, now: Instant) -> Result<(), GameError> {
        let state = self.engine.new_game(self.difficulty).inspect_err(|err| {
            error!("new game failed: {}", err);
        })?;

        if matches!(self.status(), GameStatus::Running | GameStatus::Paused) {
            info!("abandoning game at score {}", self.state.as_ref().map_or(0, |s| s.score));
            self.metrics.on_game_over(now);
        }

        let interval = state.profile.normal_interval;
        self.state = Some(state);
        self.new_record = false;
        self.speed.cancel();
        self.clock.start(interval, now);
        self.metrics.on_game_start(now);
        Ok(())
    }

    /// Start a game if none is in progress, otherwise toggle pause
    pub fn start_or_toggle_pause(&mut self, now: Instant) -> Result<(), GameError> {
        match self.status() {
            GameStatus::NotStarted | GameStatus::Over => self.new_game(now),
            _ => self.toggle_pause(now),
        }
    }

    pub fn press_direction(&mut self, direction: Direction, now: Instant) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if matches!(state.status, GameStatus::Running | GameStatus::Paused) {
            state.queue_direction(direction);
        }
        self.speed.press(now, state.status);
    }

    pub fn release_direction(&mut self, now: Instant) {
        let status = self.status();
        if let Some(mode) = self.speed.release(status) {
            self.apply_speed(mode, now);
        }
    }

    /// Let the hold timer engage the boost if it has expired
    pub fn poll_hold_timer(&mut self, now: Instant) {
        let status = self.status();
        if let Some(mode) = self.speed.poll(now, status) {
            self.apply_speed(mode, now);
        }
    }

    fn apply_speed(&mut self, mode: SpeedMode, now: Instant) {
        if let Some(state) = &self.state {
            self.clock.set_interval(mode.interval(&state.profile), now);
        }
    }

    pub fn pause(&mut self, now: Instant) -> Result<(), GameError> {
        let status = self.status();
        let Some(state) = self.state.as_mut().filter(|s| s.status == GameStatus::Running) else {
            return Err(GameError::InvalidTransition {
                action: "pause",
                status,
            });
        };

        state.status = GameStatus::Paused;
        self.clock.stop();
        self.speed.cancel();
        self.metrics.on_pause(now);
        info!("paused at score {}", state.score);
        Ok(())
    }

    pub fn resume(&mut self, now: Instant) -> Result<(), GameError> {
        let status = self.status();
        let Some(state) = self.state.as_mut().filter(|s| s.status == GameStatus::Paused) else {
            return Err(GameError::InvalidTransition {
                action: "resume",
                status,
            });
        };

        state.status = GameStatus::Running;
        let interval = self.speed.mode().interval(&state.profile);
        self.clock.start(interval, now);
        self.metrics.on_resume(now);
        info!("resumed");
        Ok(())
    }

    pub fn toggle_pause(&mut self, now: Instant) -> Result<(), GameError> {
        match self.status() {
            GameStatus::Paused => self.resume(now),
            _ => self.pause(now),
        }
    }

    /// Run one simulation step if the clock is due, then present the result
    pub fn tick(&mut self, now: Instant) -> Option<StepResult> {
        if !self.clock.fire(now) {
            return None;
        }
        let Some(state) = self.state.as_mut() else {
            self.clock.stop();
            return None;
        };

        let result = self.engine.step(state);
        let (score, steps) = (state.score, state.steps);

        if result.ate_food {
            self.metrics.on_food();
            self.new_record |= self.high_score.observe(score);
        }
        self.metrics.update(now);

        if result.terminated {
            self.clock.stop();
            self.speed.cancel();
            self.metrics.on_game_over(now);
            info!(
                "game over: score {} after {} steps ({:?}{})",
                score,
                steps,
                result.collision_type,
                if result.board_full { ", board full" } else { "" }
            );
            let (snapshot, sink) = self.split();
            sink.game_over(&snapshot);
        } else {
            let (snapshot, sink) = self.split();
            sink.present(&snapshot);
        }

        Some(result)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::capture(
            self.state.as_ref(),
            self.difficulty,
            self.speed.mode(),
            self.high_score.best(),
            self.new_record,
            &self.metrics,
        )
    }

    /// Present the current state outside of a tick (input feedback, clock display)
    pub fn redraw(&mut self, now: Instant) {
        self.metrics.update(now);
        let (snapshot, sink) = self.split();
        sink.present(&snapshot);
    }

    fn split(&mut self) -> (Snapshot<'_>, &mut S) {
        let snapshot = Snapshot::capture(
            self.state.as_ref(),
            self.difficulty,
            self.speed.mode(),
            self.high_score.best(),
            self.new_record,
            &self.metrics,
        );
        (snapshot, &mut self.sink)
    }
}
