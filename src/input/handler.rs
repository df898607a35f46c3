use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::touch::TouchPad;
use crate::game::{Difficulty, Direction};

/// Input as the game loop understands it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    DirectionPressed(Direction),
    DirectionReleased(Direction),
    /// Start a game if none is running, otherwise pause or resume
    StartOrPause,
    Restart,
    SelectDifficulty(Difficulty),
    Quit,
    None,
}

#[derive(Debug, Default)]
pub struct InputHandler {
    /// Pad button currently held down with the mouse
    held_button: Option<Direction>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self { held_button: None }
    }

    /// Map a mouse event over the on-screen pad. Releasing anywhere, or
    /// dragging off the held button, ends the hold.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent, pad: &TouchPad) -> InputEvent {
        let over = pad.hit(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => match over {
                Some(direction) => {
                    self.held_button = Some(direction);
                    InputEvent::DirectionPressed(direction)
                }
                None => InputEvent::None,
            },
            MouseEventKind::Up(MouseButton::Left) => self.release_button(),
            MouseEventKind::Drag(MouseButton::Left) if over != self.held_button => {
                self.release_button()
            }
            _ => InputEvent::None,
        }
    }

    fn release_button(&mut self) -> InputEvent {
        match self.held_button.take() {
            Some(direction) => InputEvent::DirectionReleased(direction),
            None => InputEvent::None,
        }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> InputEvent {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputEvent::Quit;
        }

        if let Some(direction) = Self::direction_for(key.code) {
            return match key.kind {
                KeyEventKind::Press => InputEvent::DirectionPressed(direction),
                KeyEventKind::Release => InputEvent::DirectionReleased(direction),
                // Auto-repeat while held is not a new press
                KeyEventKind::Repeat => InputEvent::None,
            };
        }

        if key.kind != KeyEventKind::Press {
            return InputEvent::None;
        }

        match key.code {
            KeyCode::Char(' ') => InputEvent::StartOrPause,
            KeyCode::Char('r') | KeyCode::Char('R') => InputEvent::Restart,
            KeyCode::Char('1') => InputEvent::SelectDifficulty(Difficulty::Easy),
            KeyCode::Char('2') => InputEvent::SelectDifficulty(Difficulty::Medium),
            KeyCode::Char('3') => InputEvent::SelectDifficulty(Difficulty::Hard),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputEvent::Quit,
            _ => InputEvent::None,
        }
    }

    fn direction_for(code: KeyCode) -> Option<Direction> {
        match code {
            // Arrow keys
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),

            // WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
            _ => None,
        }
    }
}
