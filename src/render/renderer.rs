use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Direction, Phase, Position, Snapshot, TickRate};
use crate::metrics::GameMetrics;

/// What occupies one board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Head(Direction),
    Body,
    Food,
    Empty,
}

/// Snake beats food when both share a cell; food may land on the snake.
pub fn classify(snapshot: &Snapshot, pos: Position) -> Cell {
    if snapshot.head() == Some(pos) {
        Cell::Head(snapshot.snake_direction)
    } else if snapshot.snake.contains(&pos) {
        Cell::Body
    } else if snapshot.food == Some(pos) {
        Cell::Food
    } else {
        Cell::Empty
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
        tick_rate: TickRate,
    ) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics, tick_rate);
        frame.render_widget(stats, chunks[0]);

        // Two columns per cell plus the border
        let side = snapshot.board_size as u16;
        let game_area = centered(chunks[1], side * 2 + 2, side + 2);
        frame.render_widget(self.render_grid(snapshot), game_area);

        if let Some(overlay) = self.render_overlay(snapshot) {
            let overlay_area = centered(chunks[1], 34, 5);
            frame.render_widget(Clear, overlay_area);
            frame.render_widget(overlay, overlay_area);
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(snapshot.board_size);

        for y in 0..snapshot.board_size {
            let mut spans = Vec::with_capacity(snapshot.board_size);

            for x in 0..snapshot.board_size {
                let pos = Position::new(x as i32, y as i32);
                let checker = if (x + y) % 2 == 0 {
                    Color::Rgb(40, 40, 40)
                } else {
                    Color::Rgb(30, 30, 30)
                };
                let base = Style::default().bg(checker);

                let cell = match classify(snapshot, pos) {
                    Cell::Head(direction) => Span::styled(
                        head_glyph(direction),
                        base.fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Cell::Body => Span::styled("□ ", base.fg(Color::Green)),
                    Cell::Food => {
                        Span::styled("● ", base.fg(Color::Red).add_modifier(Modifier::BOLD))
                    }
                    Cell::Empty => Span::styled("  ", base),
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(
        &self,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
        tick_rate: TickRate,
    ) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Tick: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}ms", tick_rate.millis()),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_overlay(&self, snapshot: &Snapshot) -> Option<Paragraph<'_>> {
        let (title, prompt, color) = match snapshot.phase {
            Phase::Running => return None,
            Phase::Idle => ("SNAKE", "Press an arrow key to start", Color::Green),
            Phase::GameOver => ("GAME OVER", "Press an arrow key to restart", Color::Red),
        };

        let text = vec![
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(prompt, Style::default().fg(Color::Gray))),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(snapshot.score.to_string(), Style::default().fg(Color::White)),
            ]),
        ];

        Some(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("+/-", Style::default().fg(Color::Cyan)),
            Span::raw(" speed | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "▲ ",
        Direction::Down => "▼ ",
        Direction::Left => "◀ ",
        Direction::Right => "▶ ",
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
