use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEvent,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, interval};

use crate::game::{Difficulty, GameEngine, GameLoop, wait_for};
use crate::input::{InputEvent, InputHandler};
use crate::render::TerminalSink;
use crate::score::HighScoreBoard;

/// How long a footer notice stays up
const NOTICE_DURATION: Duration = Duration::from_secs(2);

/// Text keys (WASD) only report releases when every key is sent as an escape code
const KEYBOARD_FLAGS: KeyboardEnhancementFlags =
    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        .union(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        .union(KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES);

pub struct HumanMode<B: Backend> {
    game: GameLoop<TerminalSink<B>>,
    input_handler: InputHandler,
    /// Terminal reports key releases; without them every press is a tap
    release_events: bool,
    notice_until: Option<Instant>,
    should_quit: bool,
}

impl<B: Backend> HumanMode<B> {
    pub fn new(
        engine: GameEngine,
        difficulty: Difficulty,
        high_score: HighScoreBoard,
        terminal: Terminal<B>,
        release_events: bool,
    ) -> Self {
        Self {
            game: GameLoop::new(engine, difficulty, high_score, TerminalSink::new(terminal)),
            input_handler: InputHandler::new(),
            release_events,
            notice_until: None,
            should_quit: false,
        }
    }

    fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(mouse) => {
                let pad = *self.game.sink().touch_pad();
                let input = self.input_handler.handle_mouse_event(mouse, &pad);
                self.handle_input(input, now);
            }
            Event::Resize(_, _) => self.game.redraw(now),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let input = self.input_handler.handle_key_event(key);
        self.handle_input(input, now);

        // Without release reports every key press is a tap
        match input {
            InputEvent::DirectionPressed(direction) if !self.release_events => {
                self.handle_input(InputEvent::DirectionReleased(direction), now);
            }
            _ => {}
        }
    }

    fn handle_input(&mut self, input: InputEvent, now: Instant) {
        match input {
            InputEvent::DirectionPressed(direction) => {
                self.game.press_direction(direction, now);
            }
            InputEvent::DirectionReleased(_) => {
                self.game.release_direction(now);
            }
            InputEvent::StartOrPause => {
                if let Err(err) = self.game.start_or_toggle_pause(now) {
                    self.show_notice(format!("Cannot start: {}", err), now);
                }
            }
            InputEvent::Restart => {
                if let Err(err) = self.game.new_game(now) {
                    self.show_notice(format!("Cannot restart: {}", err), now);
                }
            }
            InputEvent::SelectDifficulty(difficulty) => {
                let notice = match self.game.select_difficulty(difficulty) {
                    Ok(()) => format!("Level set to {}", difficulty),
                    Err(_) => format!(
                        "Level stays {} until this game ends",
                        self.game.difficulty()
                    ),
                };
                self.show_notice(notice, now);
            }
            InputEvent::Quit => {
                self.should_quit = true;
                return;
            }
            InputEvent::None => return,
        }

        self.game.redraw(now);
    }

    fn show_notice(&mut self, notice: String, now: Instant) {
        self.game.sink_mut().set_notice(Some(notice));
        self.notice_until = Some(now + NOTICE_DURATION);
    }

    fn expire_notice(&mut self, now: Instant) {
        if self.notice_until.is_some_and(|until| now >= until) {
            self.notice_until = None;
            self.game.sink_mut().set_notice(None);
        }
    }

    async fn run_game_loop(&mut self) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Keeps the play clock and notices current between ticks
        let mut render_timer = interval(Duration::from_millis(250));

        self.game.redraw(Instant::now());

        loop {
            let tick_at = self.game.tick_deadline();
            let hold_at = self.game.hold_deadline();

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event, Instant::now()),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick at the current speed
                _ = wait_for(tick_at) => {
                    self.game.tick(Instant::now());
                }

                // Direction key held long enough to boost
                _ = wait_for(hold_at) => {
                    let now = Instant::now();
                    self.game.poll_hold_timer(now);
                    self.game.redraw(now);
                }

                _ = render_timer.tick() => {
                    let now = Instant::now();
                    self.expire_notice(now);
                    self.game.redraw(now);
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }
}

impl HumanMode<CrosstermBackend<Stderr>> {
    /// Take over the terminal, play until quit, then restore it
    pub async fn run(
        engine: GameEngine,
        difficulty: Difficulty,
        high_score: HighScoreBoard,
    ) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;

        let release_events = matches!(supports_keyboard_enhancement(), Ok(true));
        if release_events {
            execute!(stderr, PushKeyboardEnhancementFlags(KEYBOARD_FLAGS))
                .context("Failed to enable key release events")?;
        } else {
            warn!("terminal does not report key releases, keyboard hold-to-boost disabled");
        }

        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let mut mode = Self::new(engine, difficulty, high_score, terminal, release_events);
        info!("starting interactive mode at {}", difficulty);

        // Run game loop with cleanup
        let result = mode.run_game_loop().await;

        mode.cleanup_terminal()?;

        result
    }

    fn cleanup_terminal(&mut self) -> Result<()> {
        let terminal = self.game.sink_mut().terminal_mut();
        if self.release_events {
            execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
                .context("Failed to restore keyboard mode")?;
        }
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, GameStatus, SpeedMode};
    use crate::score::MemoryStore;
    use crossterm::event::{
        KeyCode, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    };
    use ratatui::backend::TestBackend;

    fn mode(release_events: bool) -> HumanMode<TestBackend> {
        let engine = GameEngine::with_seed(GameConfig::default(), 21);
        let board = HighScoreBoard::load(Box::new(MemoryStore::new()));
        let terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        HumanMode::new(engine, Difficulty::Medium, board, terminal, release_events)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind_and_state(
            code,
            KeyModifiers::NONE,
            kind,
            KeyEventState::NONE,
        ))
    }

    fn click(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode(true);
        assert_eq!(mode.game.status(), GameStatus::NotStarted);
        assert!(!mode.should_quit);
    }

    #[test]
    fn test_space_starts_then_pauses() {
        let mut mode = mode(true);
        let t0 = Instant::now();

        mode.handle_input(InputEvent::StartOrPause, t0);
        assert_eq!(mode.game.status(), GameStatus::Running);

        mode.handle_input(InputEvent::StartOrPause, t0 + ms(10));
        assert_eq!(mode.game.status(), GameStatus::Paused);
    }

    #[test]
    fn test_difficulty_rejected_mid_game() {
        let mut mode = mode(true);
        let t0 = Instant::now();
        mode.handle_input(InputEvent::StartOrPause, t0);

        mode.handle_input(InputEvent::SelectDifficulty(Difficulty::Hard), t0);

        assert_eq!(mode.game.difficulty(), Difficulty::Medium);
        assert_eq!(
            mode.game.sink().notice(),
            Some("Level stays Medium until this game ends")
        );

        mode.expire_notice(t0 + NOTICE_DURATION);
        assert_eq!(mode.game.sink().notice(), None);
    }

    #[test]
    fn test_difficulty_accepted_before_start() {
        let mut mode = mode(true);
        mode.handle_input(InputEvent::SelectDifficulty(Difficulty::Easy), Instant::now());
        assert_eq!(mode.game.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn test_hold_boosts_with_release_events() {
        let mut mode = mode(true);
        let t0 = Instant::now();
        mode.handle_input(InputEvent::StartOrPause, t0);

        mode.handle_input(InputEvent::DirectionPressed(Direction::Up), t0);
        mode.game.poll_hold_timer(t0 + ms(200));
        assert_eq!(mode.game.speed_mode(), SpeedMode::Accelerated);

        mode.handle_input(InputEvent::DirectionReleased(Direction::Up), t0 + ms(400));
        assert_eq!(mode.game.speed_mode(), SpeedMode::Normal);
    }

    #[test]
    fn test_press_is_tap_without_release_events() {
        let mut mode = mode(false);
        let t0 = Instant::now();
        mode.handle_input(InputEvent::StartOrPause, t0);

        mode.handle_event(key(KeyCode::Down, KeyEventKind::Press), t0);
        mode.game.poll_hold_timer(t0 + ms(500));

        assert_eq!(mode.game.speed_mode(), SpeedMode::Normal);
        assert_eq!(
            mode.game.state().unwrap().pending_direction,
            Direction::Down
        );
    }

    #[test]
    fn test_restart_replaces_game() {
        let mut mode = mode(true);
        let t0 = Instant::now();
        mode.handle_input(InputEvent::StartOrPause, t0);
        mode.handle_input(InputEvent::StartOrPause, t0);
        assert_eq!(mode.game.status(), GameStatus::Paused);

        mode.handle_input(InputEvent::Restart, t0);
        assert_eq!(mode.game.status(), GameStatus::Running);
        assert_eq!(mode.game.state().unwrap().score, 0);
    }

    #[test]
    fn test_quit() {
        let mut mode = mode(true);
        mode.handle_input(InputEvent::Quit, Instant::now());
        assert!(mode.should_quit);
    }

    #[test]
    fn test_text_keys_report_releases() {
        assert!(KEYBOARD_FLAGS.contains(KeyboardEnhancementFlags::REPORT_EVENT_TYPES));
        assert!(
            KEYBOARD_FLAGS.contains(KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES)
        );
    }

    #[test]
    fn test_wasd_tap_does_not_boost() {
        let mut mode = mode(true);
        let t0 = Instant::now();
        mode.handle_input(InputEvent::StartOrPause, t0);

        mode.handle_event(key(KeyCode::Char('s'), KeyEventKind::Press), t0);
        mode.handle_event(key(KeyCode::Char('s'), KeyEventKind::Release), t0 + ms(50));
        mode.game.poll_hold_timer(t0 + ms(200));

        assert_eq!(mode.game.speed_mode(), SpeedMode::Normal);
        assert_eq!(
            mode.game.state().unwrap().pending_direction,
            Direction::Down
        );
    }

    #[test]
    fn test_pad_hold_boosts_until_release() {
        let mut mode = mode(false);
        let t0 = Instant::now();
        mode.handle_input(InputEvent::StartOrPause, t0);

        let up = mode.game.sink().touch_pad().button(Direction::Up);
        mode.handle_event(click(MouseEventKind::Down(MouseButton::Left), up.x, up.y), t0);
        assert_eq!(mode.game.state().unwrap().pending_direction, Direction::Up);

        mode.game.poll_hold_timer(t0 + ms(200));
        assert_eq!(mode.game.speed_mode(), SpeedMode::Accelerated);

        let release = click(MouseEventKind::Up(MouseButton::Left), up.x, up.y);
        mode.handle_event(release, t0 + ms(300));
        assert_eq!(mode.game.speed_mode(), SpeedMode::Normal);
    }
}
