use std::time::Duration;
use tokio::time::Instant;

/// Per-session counters shown in the header
pub struct GameMetrics {
    started_at: Option<Instant>,
    paused_at: Option<Instant>,
    paused_total: Duration,
    pub elapsed_time: Duration,
    pub games_played: u32,
    pub food_eaten: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            started_at: None,
            paused_at: None,
            paused_total: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            games_played: 0,
            food_eaten: 0,
        }
    }

    /// Refresh the play time; frozen while paused or after game over
    pub fn update(&mut self, now: Instant) {
        if let (Some(start), None) = (self.started_at, self.paused_at) {
            self.elapsed_time = now
                .saturating_duration_since(start)
                .saturating_sub(self.paused_total);
        }
    }

    pub fn on_game_start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.paused_at = None;
        self.paused_total = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
        self.food_eaten = 0;
    }

    pub fn on_pause(&mut self, now: Instant) {
        self.update(now);
        if self.started_at.is_some() && self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn on_resume(&mut self, now: Instant) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += now.saturating_duration_since(paused_at);
        }
    }

    pub fn on_food(&mut self) {
        self.food_eaten += 1;
    }

    pub fn on_game_over(&mut self, now: Instant) {
        self.update(now);
        self.started_at = None;
        self.games_played += 1;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
