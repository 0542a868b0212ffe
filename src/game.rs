//! Game records
//!
//! A [`Game`] stores moves in the notation coordinates of the position each
//! was played on, so a record can only be read back by replaying it from
//! the empty board.

use std::time::Duration;

use crate::board::{Color, Move, Position, Winner, WinningReason};
use crate::config::RuleConfig;
use crate::engine::Searcher;
use crate::error::{TraxError, TraxResult};

/// Recorded or self-played game
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Game {
    pub moves: Vec<Move>,
    /// Empty when the game carries no comments, one entry per move otherwise
    pub comments: Vec<String>,
    /// `None` while the game is unfinished
    pub winner: Option<Winner>,
    pub winning_reason: WinningReason,
    /// Self-play statistics, `[white, red]`
    pub average_search_depths: [f64; 2],
    pub average_nps: [f64; 2],
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a game from notation, recording the result if it finishes
    pub fn from_notation<S: AsRef<str>>(notation: &[S]) -> TraxResult<Game> {
        let mut game = Game::new();
        let mut position = Position::new();
        for text in notation {
            let mv = Move::parse(text.as_ref(), &position)?;
            position = position.do_move(mv)?;
            game.moves.push(mv);
        }
        game.record_result(&position);
        Ok(game)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn num_moves(&self) -> usize {
        self.moves.len()
    }

    /// Color that played move `index`; white opens
    #[inline]
    pub fn mover(index: usize) -> Color {
        if index % 2 == 0 {
            Color::White
        } else {
            Color::Red
        }
    }

    /// Final position under standard rules
    pub fn replay(&self) -> TraxResult<Position> {
        self.replay_with_rules(RuleConfig::standard())
    }

    pub fn replay_with_rules(&self, rules: RuleConfig) -> TraxResult<Position> {
        self.moves
            .iter()
            .try_fold(Position::with_rules(rules), |position, &mv| position.do_move(mv))
    }

    /// Copy the outcome of a finished position into the record
    pub fn record_result(&mut self, position: &Position) {
        if position.finished() {
            self.winner = position.winner();
            self.winning_reason = position.winning_reason();
        }
    }

    /// Number of recorded moves the searcher reproduces.
    ///
    /// A different move that reaches the same position counts as a match.
    pub fn count_matching_moves(&self, searcher: &mut dyn Searcher, thinking_time: Duration) -> TraxResult<usize> {
        let mut matches = 0;
        let mut position = Position::new();
        for &actual in &self.moves {
            let report = searcher.search_best_move(&position, thinking_time)?;
            let best = position.do_move(report.best_move).map_err(|err| TraxError::Searcher {
                name: searcher.name(),
                reason: err.to_string(),
            })?;
            let next = position.do_move(actual)?;
            if best.hash() == next.hash() {
                matches += 1;
            }
            position = next;
        }
        Ok(matches)
    }

    /// Play an unfinished or resigned game out with `searcher` on both sides
    pub fn continue_by(&mut self, searcher: &mut dyn Searcher, thinking_time: Duration) -> TraxResult<()> {
        let mut position = self.replay()?;
        while !position.finished() {
            let report = searcher.search_best_move(&position, thinking_time)?;
            position = position.do_move(report.best_move).map_err(|err| TraxError::Searcher {
                name: searcher.name(),
                reason: err.to_string(),
            })?;
            self.moves.push(report.best_move);
            if !self.comments.is_empty() {
                self.comments.push(String::new());
            }
        }
        self.record_result(&position);
        Ok(())
    }

    /// Parse a commented game collection.
    ///
    /// Games are separated by lines starting with `#` and only games of
    /// kind `Trax` are kept. A move line looks like `  1 @0/   ; comment`:
    /// the move number ends at column 3 and the notation sits in columns
    /// 4 to 9. `Resign` and `Time` mean the side to move gave up, `win`
    /// means the side to move claimed the game.
    pub fn parse_commented(text: &str) -> TraxResult<Vec<Game>> {
        let mut games = Vec::new();
        let mut game = Game::new();
        let mut position = Position::new();
        let mut kind = String::new();

        for raw in text.lines() {
            let line = raw.trim_end_matches('\r');

            if line.starts_with('#') {
                if !game.moves.is_empty() && kind == "Trax" {
                    games.push(std::mem::take(&mut game));
                }
                game.clear();
                position = Position::new();
                kind.clear();
                continue;
            }

            if matches!(line, "8x8 Trax" | "8x8Trax" | "Loop Trax" | "Trax") {
                kind = line.to_string();
                continue;
            }

            let bytes = line.as_bytes();
            if bytes.len() < 7 {
                continue;
            }

            if bytes[0] == b' ' && bytes[2].is_ascii_digit() {
                let notation: String = column_slice(line, 4, 10)
                    .chars()
                    .filter(|c| !matches!(c, ' ' | ';' | ':'))
                    .collect();

                // The side to move resigned or ran out of time
                let to_move = Game::mover(game.num_moves());
                match notation.as_str() {
                    "Resign" | "Time" => {
                        game.winner = Some(Winner::from_color(to_move.opponent()));
                        game.winning_reason = WinningReason::Resign;
                        continue;
                    }
                    "win" => {
                        game.winner = Some(Winner::from_color(to_move));
                        game.winning_reason = WinningReason::Resign;
                        continue;
                    }
                    _ => {}
                }

                let mv = Move::parse(&notation, &position)?;
                position = position.do_move(mv)?;
                game.moves.push(mv);
                game.comments.push(String::new());
                game.record_result(&position);
            }

            // Comment on a move line, or a continuation of the previous one
            if let Some(at) = [10, 11].into_iter().find(|&at| bytes.get(at) == Some(&b';')) {
                if let Some(last) = game.comments.last_mut() {
                    last.push_str(line[at + 1..].trim());
                    last.push('\n');
                }
            }
        }

        if !game.moves.is_empty() && kind == "Trax" {
            games.push(game);
        }
        Ok(games)
    }
}

/// Byte columns `start..end` of `line`, narrowed to char boundaries
fn column_slice(line: &str, start: usize, end: usize) -> &str {
    let mut start = start.min(line.len());
    let mut end = end.min(line.len()).max(start);
    while !line.is_char_boundary(start) {
        start += 1;
    }
    while end > start && !line.is_char_boundary(end) {
        end -= 1;
    }
    line.get(start..end).unwrap_or_default()
}
