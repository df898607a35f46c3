//! On-screen direction pad for mouse and touch terminals.
//!
//! The pad is a 9x3 cross of 3-cell buttons:
//!
//! ```text
//!    ▲▲▲
//! ◀◀◀   ▶▶▶
//!    ▼▼▼
//! ```

use ratatui::layout::Rect;

use crate::game::Direction;

pub const PAD_WIDTH: u16 = 9;
pub const PAD_HEIGHT: u16 = 3;
const BUTTON_WIDTH: u16 = 3;

/// Where each direction button was last drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchPad {
    area: Rect,
}

impl TouchPad {
    /// Lay the pad out in the bottom-right corner of `area`
    pub fn anchored(area: Rect) -> Self {
        let width = PAD_WIDTH.min(area.width);
        let height = PAD_HEIGHT.min(area.height);
        Self {
            area: Rect::new(
                area.x + area.width - width,
                area.y + area.height - height,
                width,
                height,
            ),
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// True once the pad has room for every button
    pub fn is_usable(&self) -> bool {
        self.area.width == PAD_WIDTH && self.area.height == PAD_HEIGHT
    }

    pub fn button(&self, direction: Direction) -> Rect {
        let Rect { x, y, .. } = self.area;
        let (col, row) = match direction {
            Direction::Up => (1, 0),
            Direction::Left => (0, 1),
            Direction::Right => (2, 1),
            Direction::Down => (1, 2),
        };
        Rect::new(x + col * BUTTON_WIDTH, y + row, BUTTON_WIDTH, 1)
    }

    /// The button under a terminal cell, if any
    pub fn hit(&self, column: u16, row: u16) -> Option<Direction> {
        if !self.is_usable() {
            return None;
        }

        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
        .into_iter()
        .find(|&direction| {
            let button = self.button(direction);
            (button.left()..button.right()).contains(&column)
                && (button.top()..button.bottom()).contains(&row)
        })
    }
}
