use log::error;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{self, Board, FrameSink, GameStatus, Position, Snapshot};
use crate::input::touch::{PAD_WIDTH, TouchPad};

const OBSTACLE_COLOR: Color = Color::Rgb(121, 85, 72);

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw a full frame and return where the direction pad ended up
    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot<'_>,
        notice: Option<&str>,
    ) -> TouchPad {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match (snapshot.status, snapshot.board) {
            (GameStatus::Over, _) => {
                frame.render_widget(self.render_game_over(snapshot), game_area);
            }
            (_, Some(board)) => {
                let paused = snapshot.status == GameStatus::Paused;
                frame.render_widget(self.render_grid(&board, paused), game_area);
            }
            (_, None) => {
                frame.render_widget(self.render_title(snapshot), game_area);
            }
        }

        let footer_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(PAD_WIDTH)])
            .split(chunks[2]);

        let footer = match notice {
            Some(text) => self.render_notice(text),
            None => self.render_controls(snapshot.status),
        };
        frame.render_widget(footer, footer_chunks[0]);

        let pad = TouchPad::anchored(footer_chunks[1]);
        if pad.is_usable() {
            frame.render_widget(self.render_pad(snapshot.status), pad.area());
        }
        pad
    }

    fn render_pad(&self, status: GameStatus) -> Paragraph<'_> {
        let color = match status {
            GameStatus::Running => Color::Cyan,
            _ => Color::DarkGray,
        };
        let button = Style::default().fg(Color::Black).bg(color);

        let text = vec![
            Line::from(vec![Span::raw("   "), Span::styled(" ▲ ", button)]),
            Line::from(vec![
                Span::styled(" ◀ ", button),
                Span::raw("   "),
                Span::styled(" ▶ ", button),
            ]),
            Line::from(vec![Span::raw("   "), Span::styled(" ▼ ", button)]),
        ];

        Paragraph::new(text)
    }

    fn render_grid(&self, board: &Board<'_>, paused: bool) -> Paragraph<'_> {
        let head = board.snake.head();
        let mut lines = Vec::with_capacity(board.grid_height);

        for y in 0..board.grid_height {
            let mut spans = Vec::with_capacity(board.grid_width);

            for x in 0..board.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        head_glyph(board.direction),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if board.snake.contains(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if board.obstacles.contains(&pos) {
                    Span::styled("▓▓", Style::default().fg(OBSTACLE_COLOR))
                } else if pos == board.food {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let (title, border) = if paused {
            (" Snake (paused) ", Color::Yellow)
        } else {
            (" Snake ", Color::White)
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot<'_>) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);
        let speed_style = match snapshot.speed {
            game::SpeedMode::Normal => Style::default().fg(Color::Green),
            game::SpeedMode::Accelerated => {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            }
        };

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                snapshot.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(snapshot.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Level: ", label),
            Span::styled(snapshot.difficulty.as_str(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(snapshot.speed.as_str(), speed_style),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(snapshot.metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_title(&self, snapshot: &Snapshot<'_>) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "SNAKE DASH",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Level: ", Style::default().fg(Color::Yellow)),
                Span::styled(snapshot.difficulty.as_str(), Style::default().fg(Color::White)),
                Span::styled("  (1/2/3 to change)", Style::default().fg(Color::Gray)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                key_span("Space"),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double),
        )
    }

    fn render_game_over(&self, snapshot: &Snapshot<'_>) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if snapshot.new_record {
            text.push(Line::from(vec![Span::styled(
                "New high score!",
                Style::default().fg(Color::Magenta),
            )]));
        }

        text.extend([
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                key_span("Space"),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ]);

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, status: GameStatus) -> Paragraph<'_> {
        let pause = match status {
            GameStatus::Running => " pause | ",
            GameStatus::Paused => " resume | ",
            _ => " start | ",
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" / pad: move, hold to boost | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(pause),
            Span::styled("R", Style::default().fg(Color::Cyan)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_notice<'a>(&self, notice: &'a str) -> Paragraph<'a> {
        Paragraph::new(Line::from(Span::styled(
            notice,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn head_glyph(direction: game::Direction) -> &'static str {
    match direction {
        game::Direction::Up => "▲ ",
        game::Direction::Down => "▼ ",
        game::Direction::Left => "◀ ",
        game::Direction::Right => "▶ ",
    }
}

fn key_span(key: &'static str) -> Span<'static> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )
}

/// Frame sink drawing every snapshot to a ratatui terminal
pub struct TerminalSink<B: Backend> {
    terminal: Terminal<B>,
    renderer: Renderer,
    notice: Option<String>,
    touch_pad: TouchPad,
}

impl<B: Backend> TerminalSink<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            renderer: Renderer::new(),
            notice: None,
            touch_pad: TouchPad::default(),
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Message shown in the footer until cleared
    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Pad layout from the last drawn frame
    pub fn touch_pad(&self) -> &TouchPad {
        &self.touch_pad
    }
}

impl<B: Backend> FrameSink for TerminalSink<B> {
    fn present(&mut self, snapshot: &Snapshot<'_>) {
        let Self {
            terminal,
            renderer,
            notice,
            touch_pad,
        } = self;

        let drawn = terminal.draw(|frame| {
            *touch_pad = renderer.render(frame, snapshot, notice.as_deref());
        });
        if let Err(err) = drawn {
            error!("failed to draw frame: {}", err);
        }
    }
}
