use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Periodic tick schedule kept as a plain deadline.
///
/// The deadline only moves when `fire` consumes a tick, so a `select!` branch
/// waiting on it can be dropped at any time without losing a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    period: Duration,
    deadline: Option<Instant>,
}

impl Clock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    /// Start ticking every `period`, first tick one period from now
    pub fn start(&mut self, period: Duration, now: Instant) {
        self.period = period;
        self.deadline = Some(now + period);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// Replace the running timer with one at the new period
    pub fn set_interval(&mut self, period: Duration, now: Instant) {
        self.period = period;
        if self.deadline.is_some() {
            self.deadline = Some(now + period);
        }
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume a due tick. Late ticks are not replayed in a burst.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                let next = deadline + self.period;
                self.deadline = Some(if next > now { next } else { now + self.period });
                true
            }
            _ => false,
        }
    }
}

/// Wait for an optional deadline; never completes for `None`
pub async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
