use crate::game::{Board, Cell, GameState, Player};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::SeatKind;

/// Everything the game screen shows.
pub struct GameView<'a> {
    pub state: &'a GameState,
    pub selected_column: usize,
    pub message: Option<&'a str>,
    pub black: SeatKind,
    pub white: SeatKind,
    pub thinking: bool,
}

impl GameView<'_> {
    fn seat(&self, player: Player) -> SeatKind {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }
}

fn player_color(player: Player) -> Color {
    match player {
        Player::Black => Color::Red,
        Player::White => Color::Yellow,
    }
}

pub fn render(frame: &mut Frame, view: &GameView<'_>) {
    let board_height = view.state.rows() as u16 + 4;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                // Header
            Constraint::Min(board_height),        // Board
            Constraint::Length(3),                // Message
            Constraint::Length(4),                // Controls
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_board(frame, view.state, view.selected_column, chunks[1]);
    render_message(frame, view.message, chunks[2]);
    render_controls(frame, view, chunks[3]);
}

fn render_header(frame: &mut Frame, view: &GameView<'_>, area: Rect) {
    let state = view.state;
    let current = state.current_player();

    let status = if state.is_terminal() {
        "Game Over".to_string()
    } else if view.thinking {
        format!("{} ({}) is thinking...", current.name(), view.seat(current).label())
    } else {
        format!("Current Player: {} ({})", current.name(), view.seat(current).label())
    };
    let status = format!(
        "{status}  |  {}x{}, connect {}",
        state.cols(),
        state.rows(),
        state.win_length()
    );

    let header = Paragraph::new(status)
        .style(
            Style::default()
                .fg(player_color(current))
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect X"));

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, state: &GameState, selected_column: usize, area: Rect) {
    let board: &Board = state.board();
    let cols = board.cols();
    let highlight = state.winning_run();
    let is_winning = |row: usize, col: usize| {
        highlight
            .as_ref()
            .is_some_and(|run| run.cells.contains(&(row, col)))
    };

    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..cols {
        let label = format!(" {} ", col + 1);
        if col == selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    let rule = "═".repeat(cols * 3 + 1);
    lines.push(Line::from(format!("  ╔{rule}╗")));

    for row in 0..board.rows() {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..cols {
            let (symbol, mut style) = match board.get(row, col) {
                Cell::Empty => (" . ", Style::default().fg(Color::DarkGray)),
                Cell::Black => (" ● ", Style::default().fg(player_color(Player::Black))),
                Cell::White => (" ● ", Style::default().fg(player_color(Player::White))),
            };
            if is_winning(row, col) {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            row_spans.push(Span::styled(symbol, style));
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{rule}╝")));

    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..cols {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, view: &GameView<'_>, area: Rect) {
    let line1 = Line::from("←/→: Move  |  Enter: Drop  |  H: Scores  |  U: Undo  |  R: Restart  |  Q: Quit");
    let line2 = Line::from(vec![
        Span::styled(
            "1",
            Style::default()
                .fg(player_color(Player::Black))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(": Black is {}   ", view.black.label())),
        Span::styled(
            "2",
            Style::default()
                .fg(player_color(Player::White))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(": White is {}", view.white.label())),
    ]);

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(state: &GameState) -> String {
        let backend = TestBackend::new(60, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let view = GameView {
            state,
            selected_column: 0,
            message: Some("hello"),
            black: SeatKind::Manual,
            white: SeatKind::Minimax,
            thinking: false,
        };
        terminal.draw(|f| render(f, &view)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_any_board_size() {
        let state = GameState::from_history(&[0, 1, 4], 5, 3, 3).unwrap();
        let screen = draw(&state);
        assert!(screen.contains("5x3, connect 3"));
        assert!(screen.contains("hello"));
        assert!(screen.contains(" 5 "));
        assert!(!screen.contains(" 6 "));
    }

    #[test]
    fn test_header_reports_game_over() {
        let state = GameState::from_history(&[0, 1, 0, 1, 0], 4, 4, 3).unwrap();
        assert!(draw(&state).contains("Game Over"));
    }
}
