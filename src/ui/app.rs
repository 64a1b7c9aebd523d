use std::io;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, error, info};

use crate::ai::{
    Agent, DecisionHandle, ManualAgent, MctsAgent, MctsConfig, MinimaxAgent, MinimaxConfig,
    MoveScore,
};
use crate::config::AppConfig;
use crate::error::{AgentError, BoardError, MoveError};
use crate::game::{GameOutcome, GameState, Player};

/// What kind of agent occupies a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatKind {
    Manual,
    Minimax,
    Mcts,
}

impl SeatKind {
    pub fn label(self) -> &'static str {
        match self {
            SeatKind::Manual => "Manual",
            SeatKind::Minimax => "Minimax",
            SeatKind::Mcts => "MCTS",
        }
    }

    /// Next kind in the Manual, Minimax, MCTS cycle.
    fn toggled(self) -> Self {
        match self {
            SeatKind::Manual => SeatKind::Minimax,
            SeatKind::Minimax => SeatKind::Mcts,
            SeatKind::Mcts => SeatKind::Manual,
        }
    }
}

struct Seat {
    kind: SeatKind,
    /// `None` while the agent is lent to a worker thread.
    agent: Option<Box<dyn Agent>>,
}

type DecisionResult = (Box<dyn Agent>, Result<usize, AgentError>);

/// An automated decision running on a worker thread.
struct PendingMove {
    player: Player,
    handle: Option<DecisionHandle>,
    rx: Receiver<DecisionResult>,
    /// The board changed since the decision started; the answer is dropped.
    stale: bool,
}

pub struct App {
    game_state: GameState,
    search: MinimaxConfig,
    mcts: MctsConfig,
    seats: [Seat; 2],
    pending: Option<PendingMove>,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self, BoardError> {
        let board = &config.board;
        let game_state = GameState::new(board.cols, board.rows, board.win_length)?;
        let mut app = App {
            selected_column: game_state.cols() / 2,
            game_state,
            search: config.search.clone(),
            mcts: config.mcts.clone(),
            seats: [
                Seat {
                    kind: SeatKind::Manual,
                    agent: None,
                },
                Seat {
                    kind: SeatKind::Manual,
                    agent: None,
                },
            ],
            pending: None,
            should_quit: false,
            message: None,
        };
        app.set_seat(Player::Black, SeatKind::Manual);
        app.set_seat(Player::White, SeatKind::Minimax);
        Ok(app)
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.poll_pending();
            self.start_automated_move();

            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        self.cancel_pending();
        Ok(())
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn seat_kind(&self, player: Player) -> SeatKind {
        self.seats[player.index()].kind
    }

    pub fn is_thinking(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.stale)
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < self.game_state.cols() {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.message = None;
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.cancel_pending();
                self.game_state.reset_game();
                self.selected_column = self.game_state.cols() / 2;
                self.message = Some("New game started!".to_string());
                info!("game reset");
            }
            KeyCode::Char('u') => {
                self.undo();
            }
            KeyCode::Char('h') => {
                self.show_move_scores();
            }
            KeyCode::Char('1') => self.toggle_seat(Player::Black),
            KeyCode::Char('2') => self.toggle_seat(Player::White),
            _ => {}
        }
    }

    fn set_seat(&mut self, player: Player, kind: SeatKind) {
        let agent: Box<dyn Agent> = match kind {
            SeatKind::Manual => Box::new(ManualAgent::new()),
            SeatKind::Minimax => Box::new(MinimaxAgent::new(self.search.clone())),
            SeatKind::Mcts => Box::new(MctsAgent::new(self.mcts.clone())),
        };
        self.seats[player.index()] = Seat {
            kind,
            agent: Some(agent),
        };
    }

    fn toggle_seat(&mut self, player: Player) {
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.player == player && !p.stale)
        {
            self.cancel_pending();
        }
        let kind = self.seat_kind(player).toggled();
        self.set_seat(player, kind);
        self.message = Some(format!("{} is now {}", player.name(), kind.label()));
        info!(player = player.name(), seat = kind.label(), "seat changed");
    }

    /// True when human input must be ignored for the side to move.
    fn input_disabled(&self) -> bool {
        if self.is_thinking() {
            return true;
        }
        let seat = &self.seats[self.game_state.current_player().index()];
        seat.agent.as_ref().map_or(true, |agent| agent.disable_move())
    }

    /// Drop piece in selected column
    fn drop_piece(&mut self) {
        if self.game_state.is_terminal() {
            self.message = Some("Game over! Press 'r' to restart.".to_string());
            return;
        }
        if self.input_disabled() {
            self.message = Some("Waiting for the computer to move.".to_string());
            return;
        }

        let player = self.game_state.current_player();
        let column = match self.seats[player.index()].agent.as_mut() {
            Some(agent) => agent.on_move_ready(Some(self.selected_column), &self.game_state),
            None => return,
        };
        match column {
            Ok(column) => self.apply_move(column),
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    fn apply_move(&mut self, column: usize) {
        match self.game_state.insert(column) {
            Ok(_) => {
                if let Some(outcome) = self.game_state.outcome() {
                    self.message = Some(match outcome {
                        GameOutcome::Winner(player) => format!("{} wins!", player.name()),
                        GameOutcome::Draw => "It's a draw!".to_string(),
                    });
                    info!(?outcome, moves = self.game_state.history().len(), "game over");
                }
            }
            Err(MoveError::ColumnFull { .. }) => {
                self.message = Some("Column is full!".to_string());
            }
            Err(err) => {
                self.message = Some(err.to_string());
            }
        }
    }

    fn undo(&mut self) {
        self.cancel_pending();
        if self.game_state.undo_last_move().is_err() {
            self.message = Some("Nothing to undo.".to_string());
            return;
        }
        // Step back past the computer's reply so the human is to move again.
        let current = self.game_state.current_player();
        if self.seat_kind(current) != SeatKind::Manual
            && self.seat_kind(current.other()) == SeatKind::Manual
        {
            let _ = self.game_state.undo_last_move();
        }
        self.message = Some("Move undone.".to_string());
    }

    /// Run the configured minimax search on the current position and show
    /// every column's score for the side to move.
    fn show_move_scores(&mut self) {
        if self.game_state.is_terminal() {
            self.message = Some("Game over! Press 'r' to restart.".to_string());
            return;
        }
        let mut scorer = MinimaxAgent::new(self.search.clone());
        self.message = Some(match scorer.score_moves(&self.game_state) {
            Ok(scores) => format_scores(self.game_state.current_player(), &scores),
            Err(err) => err.to_string(),
        });
    }

    /// Hand the side to move to a worker thread if its seat is automated.
    fn start_automated_move(&mut self) {
        if self.pending.is_some() || self.game_state.is_terminal() {
            return;
        }
        let player = self.game_state.current_player();
        let seat = &mut self.seats[player.index()];
        if !seat.agent.as_ref().is_some_and(|agent| agent.is_automated()) {
            return;
        }
        let Some(mut agent) = seat.agent.take() else {
            return;
        };

        let handle = agent.decision_handle();
        let snapshot = self.game_state.copy();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = agent.on_move_ready(None, &snapshot);
            let _ = tx.send((agent, result));
        });
        debug!(player = player.name(), "automated move started");

        self.pending = Some(PendingMove {
            player,
            handle,
            rx,
            stale: false,
        });
    }

    /// Collect the worker's answer, if it has arrived.
    fn poll_pending(&mut self) {
        let Some(pending) = self.pending.as_ref() else {
            return;
        };
        let (agent, result) = match pending.rx.try_recv() {
            Ok(answer) => answer,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                let player = pending.player;
                self.pending = None;
                error!(player = player.name(), "automated move worker died");
                let kind = self.seat_kind(player);
                self.set_seat(player, kind);
                self.message = Some("Computer player failed; seat restarted.".to_string());
                return;
            }
        };

        let player = pending.player;
        let stale = pending.stale;
        self.pending = None;

        let seat = &mut self.seats[player.index()];
        if seat.agent.is_none() {
            seat.agent = Some(agent);
        }
        if stale {
            return;
        }

        match result {
            Ok(column) if self.game_state.current_player() == player => {
                self.apply_move(column);
            }
            Ok(_) | Err(AgentError::Cancelled) => {}
            Err(err) => {
                error!(player = player.name(), %err, "automated move failed");
                self.message = Some(err.to_string());
            }
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.as_mut() {
            if let Some(handle) = &pending.handle {
                handle.cancel();
            }
            pending.stale = true;
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let view = super::game_view::GameView {
            state: &self.game_state,
            selected_column: self.selected_column,
            message: self.message.as_deref(),
            black: self.seat_kind(Player::Black),
            white: self.seat_kind(Player::White),
            thinking: self.is_thinking(),
        };
        super::game_view::render(frame, &view);
    }
}

/// One line of per-column scores, signed so that larger is better for
/// `player`. Columns are numbered from 1 as on screen.
fn format_scores(player: Player, scores: &[MoveScore]) -> String {
    let sign = if player.is_maximizing() { 1 } else { -1 };
    let best = scores.iter().map(|m| m.score * sign).max();
    let best_columns: Vec<String> = scores
        .iter()
        .filter(|m| Some(m.score * sign) == best)
        .map(|m| (m.column + 1).to_string())
        .collect();
    let values: Vec<String> = scores
        .iter()
        .map(|m| format!("{}:{:+}", m.column + 1, m.score * sign))
        .collect();
    format!(
        "{} (best: {}) {}",
        player.name(),
        best_columns.join(", "),
        values.join(" ")
    )
}
