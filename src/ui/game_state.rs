//! Game state management for the Trax viewer

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::board::{Color, Move, Position, Winner, WinningReason};
use crate::book::Book;
use crate::config::RuleConfig;
use crate::engine::{BookSearcher, RandomSearcher, SearchReport, Searcher};
use crate::error::TraxResult;
use crate::rules::Line;

/// Game mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Player vs computer
    PvE { human_color: Color },
    /// Hot seat
    PvP,
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::PvE { human_color: Color::White }
    }
}

/// Computer opponent state
pub enum AiState {
    Idle,
    Thinking {
        receiver: Receiver<TraxResult<SearchReport>>,
        start_time: Instant,
    },
}

/// Main game state.
///
/// `history[i]` is the position before move `i`, so undo is a truncate.
pub struct GameState {
    pub mode: GameMode,
    pub rules: RuleConfig,
    pub history: Vec<Position>,
    pub moves: Vec<Move>,
    /// Cell picked on the board, in coordinates of the current position
    pub selected: Option<(i32, i32)>,
    /// Where the last move landed after the board grew
    pub last_cell: Option<(i32, i32)>,
    pub suggested_move: Option<Move>,
    pub last_report: Option<SearchReport>,
    pub ai_state: AiState,
    pub message: Option<String>,
    book: Book,
    ai_seed: u64,
    thinking_time: Duration,
}

impl GameState {
    pub fn new(mode: GameMode, rules: RuleConfig) -> Self {
        Self {
            mode,
            rules,
            history: vec![Position::with_rules(rules)],
            moves: Vec::new(),
            selected: None,
            last_cell: None,
            suggested_move: None,
            last_report: None,
            ai_state: AiState::Idle,
            message: None,
            book: Book::new(),
            ai_seed: 1,
            thinking_time: Duration::from_millis(500),
        }
    }

    #[must_use]
    pub fn with_book(mut self, book: Book) -> Self {
        self.book = book;
        self
    }

    /// Start over with the same mode, rules and book
    pub fn reset(&mut self) {
        let book = std::mem::take(&mut self.book);
        *self = Self::new(self.mode, self.rules).with_book(book);
    }

    /// Current position
    pub fn position(&self) -> &Position {
        // history always holds the starting position
        &self.history[self.history.len() - 1]
    }

    pub fn game_over(&self) -> Option<(Winner, WinningReason)> {
        let position = self.position();
        position.winner().map(|w| (w, position.winning_reason()))
    }

    pub fn is_human_turn(&self) -> bool {
        match self.mode {
            GameMode::PvE { human_color } => self.position().side_to_move() == human_color,
            GameMode::PvP => true,
        }
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.is_human_turn()
    }

    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { .. })
    }

    /// Legal moves on one cell
    pub fn options_at(&self, x: i32, y: i32) -> Vec<Move> {
        self.position()
            .generate_moves()
            .into_iter()
            .filter(|mv| (mv.x, mv.y) == (x, y))
            .collect()
    }

    /// Select a cell. A cell with a single legal tile is played at once.
    pub fn select_cell(&mut self, x: i32, y: i32) -> Result<(), String> {
        self.check_human_can_move()?;
        let options = self.options_at(x, y);
        match options.as_slice() {
            [] => Err("No tile can be played there".to_string()),
            [only] => self.play(*only),
            _ => {
                self.selected = Some((x, y));
                self.message = None;
                Ok(())
            }
        }
    }

    /// Play the tile with `glyph` on the selected cell
    pub fn play_selected(&mut self, glyph: char) -> Result<(), String> {
        let Some((x, y)) = self.selected else {
            return Err("Select a cell first".to_string());
        };
        let mv = self
            .options_at(x, y)
            .into_iter()
            .find(|mv| mv.piece.glyph() == glyph)
            .ok_or_else(|| format!("'{glyph}' does not fit there"))?;
        self.play(mv)
    }

    /// Play a move typed in notation
    pub fn play_notation(&mut self, notation: &str) -> Result<(), String> {
        self.check_human_can_move()?;
        let mv = Move::parse(notation.trim(), self.position()).map_err(|e| e.to_string())?;
        self.play(mv)
    }

    fn check_human_can_move(&self) -> Result<(), String> {
        if self.game_over().is_some() {
            return Err("Game is over".to_string());
        }
        if self.is_ai_thinking() {
            return Err("Computer is thinking".to_string());
        }
        if !self.is_human_turn() {
            return Err("Not your turn".to_string());
        }
        Ok(())
    }

    /// Apply a move for either side
    fn play(&mut self, mv: Move) -> Result<(), String> {
        let next = self.position().do_move(mv).map_err(|e| e.to_string())?;
        self.history.push(next);
        self.moves.push(mv);
        self.last_cell = Some((mv.x.max(0), mv.y.max(0)));
        self.selected = None;
        self.suggested_move = None;
        self.message = None;
        Ok(())
    }

    /// Traced lines of the current position
    pub fn lines(&self) -> Vec<Line> {
        self.position().enumerate_lines()
    }

    /// Notation of every move played so far
    pub fn move_list(&self) -> Vec<String> {
        self.moves.iter().map(Move::notation).collect()
    }

    fn searcher(&mut self) -> BookSearcher<RandomSearcher> {
        self.ai_seed = self.ai_seed.wrapping_add(1);
        BookSearcher::new(self.book.clone(), RandomSearcher::new(self.ai_seed))
    }

    /// Start the computer's search on a background thread
    pub fn start_ai_thinking(&mut self) {
        if !self.is_ai_turn() || self.is_ai_thinking() || self.game_over().is_some() {
            return;
        }

        let position = self.position().clone();
        let thinking_time = self.thinking_time;
        let mut searcher = self.searcher();
        let (tx, rx) = channel();

        thread::spawn(move || {
            let result = searcher.search_best_move(&position, thinking_time);
            let _ = tx.send(result);
        });

        self.ai_state = AiState::Thinking {
            receiver: rx,
            start_time: Instant::now(),
        };
    }

    /// Pick up the computer's move if it is ready
    pub fn check_ai_result(&mut self) {
        let result = match &self.ai_state {
            AiState::Thinking { receiver, .. } => match receiver.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    self.ai_state = AiState::Idle;
                    self.message = Some("Computer player stopped".to_string());
                    return;
                }
            },
            AiState::Idle => return,
        };

        self.ai_state = AiState::Idle;
        match result {
            Ok(report) => {
                self.last_report = Some(report);
                if let Err(msg) = self.play(report.best_move) {
                    self.message = Some(msg);
                }
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    pub fn ai_thinking_elapsed(&self) -> Option<Duration> {
        match &self.ai_state {
            AiState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            AiState::Idle => None,
        }
    }

    /// Ask the computer for a move without playing it
    pub fn request_suggestion(&mut self) {
        if self.game_over().is_some() || self.is_ai_thinking() {
            return;
        }
        let position = self.position().clone();
        let thinking_time = self.thinking_time;
        match self.searcher().search_best_move(&position, thinking_time) {
            Ok(report) => {
                self.suggested_move = Some(report.best_move);
                self.last_report = Some(report);
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    /// Take back the last move, or the last two against the computer
    pub fn undo(&mut self) {
        if self.moves.is_empty() || self.is_ai_thinking() {
            return;
        }
        let count = match self.mode {
            GameMode::PvE { .. } if self.moves.len() >= 2 => 2,
            _ => 1,
        };
        let keep = self.moves.len() - count;
        self.moves.truncate(keep);
        self.history.truncate(keep + 1);
        self.last_cell = self.moves.last().map(|mv| (mv.x.max(0), mv.y.max(0)));
        self.selected = None;
        self.suggested_move = None;
        self.message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_seat_play_and_undo() {
        let mut state = GameState::new(GameMode::PvP, RuleConfig::standard());
        state.play_notation("@0/").unwrap();
        assert_eq!(state.last_cell, Some((0, 0)));

        // Three tiles fit east of the first one
        state.select_cell(1, 0).unwrap();
        assert_eq!(state.selected, Some((1, 0)));
        state.play_selected('\\').unwrap();
        state.play_notation("A2\\").unwrap();
        assert_eq!(state.game_over(), Some((Winner::Red, WinningReason::Loop)));
        assert!(state.play_notation("@1+").is_err());
        assert_eq!(state.move_list(), ["@0/", "B1\\", "A2\\"]);

        state.undo();
        assert_eq!(state.moves.len(), 2);
        assert_eq!(state.game_over(), None);
        assert_eq!(state.position().ply(), 2);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut state = GameState::new(GameMode::PvP, RuleConfig::standard());
        assert!(state.play_notation("Q7").is_err());
        assert!(state.play_selected('/').is_err());
        assert!(state.select_cell(3, 3).is_err());
        assert!(state.moves.is_empty());
    }

    #[test]
    fn test_not_human_turn_in_pve() {
        let mut state = GameState::new(GameMode::PvE { human_color: Color::Red }, RuleConfig::standard());
        assert!(state.is_ai_turn());
        assert!(state.play_notation("@0/").is_err());

        state.request_suggestion();
        let hint = state.suggested_move.unwrap();
        assert!(state.position().is_legal(hint));
    }

    #[test]
    fn test_reset_keeps_mode() {
        let mut state = GameState::new(GameMode::PvP, RuleConfig::eight_by_eight());
        state.play_notation("@0+").unwrap();
        state.reset();
        assert!(state.moves.is_empty());
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.mode, GameMode::PvP);
        assert_eq!(state.rules, RuleConfig::eight_by_eight());
    }
}
