use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::autopilot::{DecisionSource, Mode};
use crate::game::{GameState, Position};
use crate::metrics::GameMetrics;

/// Autopilot state shown on top of the board
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    pub mode: Option<Mode>,
    /// Route the autopilot is following, head first
    pub route: Vec<Position>,
    pub paused: bool,
    pub speed: &'static str,
    pub games_played: u32,
}

/// What a board cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Head,
    Body,
    Food,
    Route,
    Empty,
}

fn cell_kind(pos: Position, state: &GameState, route: &HashSet<Position>) -> CellKind {
    if pos == state.snake.head() {
        CellKind::Head
    } else if state.snake.body.contains(&pos) {
        CellKind::Body
    } else if pos == state.food {
        CellKind::Food
    } else if route.contains(&pos) {
        CellKind::Route
    } else {
        CellKind::Empty
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
        state: &GameState,
        metrics: &GameMetrics,
        overlay: &Overlay,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Render header with basic stats
        let stats = self.render_stats(chunks[0], state, metrics, overlay);
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

        // Render game grid or game over screen
        if state.is_alive {
            let grid = self.render_grid(game_area, state, overlay);
            frame.render_widget(grid, game_area);
        } else {
            let game_over = self.render_game_over(game_area, state, metrics);
            frame.render_widget(game_over, game_area);
        }

        // Render footer with controls
        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, _area: Rect, state: &GameState, overlay: &Overlay) -> Paragraph<'_> {
        let route: HashSet<Position> = overlay.route.iter().copied().collect();

        // The snake turns red while it is only trying to survive
        let (head_color, body_color) = match overlay.mode {
            Some(Mode::Survive) => (Color::LightRed, Color::Red),
            _ => (Color::Cyan, Color::Green),
        };

        let mut lines = Vec::new();

        for y in 0..state.grid_height {
            let mut spans = Vec::new();

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = match cell_kind(pos, state, &route) {
                    CellKind::Head => Span::styled(
                        "■ ",
                        Style::default()
                            .fg(head_color)
                            .add_modifier(Modifier::BOLD),
                    ),
                    CellKind::Body => Span::styled("□ ", Style::default().fg(body_color)),
                    CellKind::Food => Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    CellKind::Route => Span::styled("· ", Style::default().fg(Color::Blue)),
                    CellKind::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = if overlay.paused {
            " Snake (paused) "
        } else {
            " Snake "
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        _area: Rect,
        state: &GameState,
        metrics: &GameMetrics,
        overlay: &Overlay,
    ) -> Paragraph<'_> {
        let (mode_text, mode_color) = match overlay.mode {
            Some(Mode::Survive) => ("SURVIVE", Color::Red),
            Some(Mode::Seek) => ("SEEK", Color::Green),
            None => ("-", Color::Gray),
        };

        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.steps.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Mode: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                mode_text,
                Style::default().fg(mode_color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(overlay.speed, Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                overlay.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(
        &self,
        _area: Rect,
        state: &GameState,
        metrics: &GameMetrics,
    ) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(vec![
                Span::styled("Route moves: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.route_moves().to_string(),
                    Style::default().fg(Color::White),
                ),
                Span::raw("    "),
                Span::styled("Heuristic: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics
                        .decision_count(DecisionSource::Heuristic)
                        .to_string(),
                    Style::default().fg(Color::White),
                ),
                Span::raw("    "),
                Span::styled("Escapes: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics
                        .decision_count(DecisionSource::EscapeHatch)
                        .to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Next game starts shortly",
                Style::default().fg(Color::Gray),
            )]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, _area: Rect) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("1-4", Style::default().fg(Color::Cyan)),
            Span::raw(" speed | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
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
