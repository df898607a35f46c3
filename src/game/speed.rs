//! Hold-to-boost speed control.
//!
//! A tap on a direction key only turns the snake. Holding the key for longer
//! than the hold threshold switches the clock to the accelerated interval
//! until the key is released. Elapsed wall time decides, not tick count.

use log::debug;
use std::time::Duration;
use tokio::time::Instant;

use super::config::DifficultyProfile;
use super::state::GameStatus;

/// Cancelable deadline owned by the controller while a press is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldTimer {
    deadline: Instant,
}

impl HoldTimer {
    fn start(now: Instant, threshold: Duration) -> Self {
        Self {
            deadline: now + threshold,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    fn has_elapsed(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedState {
    Normal,
    PendingAccel(HoldTimer),
    Accelerated,
}

/// Which interval the clock should run at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedMode {
    #[default]
    Normal,
    Accelerated,
}

impl SpeedMode {
    pub fn interval(&self, profile: &DifficultyProfile) -> Duration {
        match self {
            SpeedMode::Normal => profile.normal_interval,
            SpeedMode::Accelerated => profile.accelerated_interval,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedMode::Normal => "Normal",
            SpeedMode::Accelerated => "Boost",
        }
    }
}

pub struct SpeedController {
    state: SpeedState,
    hold_threshold: Duration,
}

impl SpeedController {
    pub fn new(hold_threshold: Duration) -> Self {
        Self {
            state: SpeedState::Normal,
            hold_threshold,
        }
    }

    pub fn state(&self) -> SpeedState {
        self.state
    }

    pub fn mode(&self) -> SpeedMode {
        match self.state {
            SpeedState::Accelerated => SpeedMode::Accelerated,
            _ => SpeedMode::Normal,
        }
    }

    /// Deadline of the pending hold timer, if one is running
    pub fn hold_deadline(&self) -> Option<Instant> {
        match self.state {
            SpeedState::PendingAccel(timer) => Some(timer.deadline()),
            _ => None,
        }
    }

    /// A direction key went down
    pub fn press(&mut self, now: Instant, status: GameStatus) {
        if status != GameStatus::Running {
            return;
        }
        if self.state == SpeedState::Normal {
            self.state = SpeedState::PendingAccel(HoldTimer::start(now, self.hold_threshold));
        }
    }

    /// A direction key came up. Returns the new mode if the interval must change.
    pub fn release(&mut self, status: GameStatus) -> Option<SpeedMode> {
        if status != GameStatus::Running {
            return None;
        }
        let was = self.mode();
        self.state = SpeedState::Normal;
        (was == SpeedMode::Accelerated).then_some(SpeedMode::Normal)
    }

    /// Check the hold timer. Returns the new mode if the boost engaged.
    pub fn poll(&mut self, now: Instant, status: GameStatus) -> Option<SpeedMode> {
        if status != GameStatus::Running {
            return None;
        }
        match self.state {
            SpeedState::PendingAccel(timer) if timer.has_elapsed(now) => {
                debug!("boost engaged");
                self.state = SpeedState::Accelerated;
                Some(SpeedMode::Accelerated)
            }
            _ => None,
        }
    }

    /// Drop any pending timer and return to normal speed; safe to repeat
    pub fn cancel(&mut self) {
        self.state = SpeedState::Normal;
    }
}
