//! Opening book
//!
//! Built from recorded games: for every early position the book keeps the
//! replies that were played, with how often the player making each reply
//! went on to win or lose.
//!
//! # Example
//!
//! ```
//! use trax::{Book, Game, Move, Position};
//!
//! let game = Game::from_notation(&["@0/", "B1\\", "A2\\"]).unwrap();
//! let mut book = Book::new();
//! book.init(&[game], 3);
//!
//! let first = Move::parse("@0/", &Position::new()).unwrap();
//! let after_first = Position::new().do_move(first).unwrap();
//! let reply = book.select(&after_first).unwrap();
//! assert_eq!(reply.notation(), "B1\\");
//! ```

use std::collections::HashMap;

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::board::hash::PositionHash;
use crate::board::{Move, Position, Winner};
use crate::game::Game;

/// Seed used by [`Book::new`]
pub const DEFAULT_BOOK_SEED: u64 = 0x7472_6178_626f_6f6b;

/// Plies remembered by default
pub const DEFAULT_MAX_STEPS: usize = 3;

/// One recorded reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookEntry {
    pub mv: Move,
    pub played: u32,
    /// Games the player of this reply won
    pub won: u32,
    pub lost: u32,
}

impl BookEntry {
    #[inline]
    fn weight(&self) -> u32 {
        self.played + self.won
    }
}

/// Opening book keyed by position hash
#[derive(Debug, Clone)]
pub struct Book {
    entries: HashMap<PositionHash, Vec<BookEntry>>,
    max_steps: usize,
    /// Replies seen fewer times are ignored
    min_count: u32,
    rng: Xoshiro256PlusPlus,
}

impl Book {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_BOOK_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            entries: HashMap::new(),
            max_steps: DEFAULT_MAX_STEPS,
            min_count: 1,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn with_min_count(mut self, min_count: u32) -> Self {
        self.min_count = min_count;
        self
    }

    /// Rebuild the book from `games`, remembering moves `0..=max_steps`.
    ///
    /// Replay of a game stops at its first illegal move.
    pub fn init(&mut self, games: &[Game], max_steps: usize) {
        self.entries.clear();
        self.max_steps = max_steps;

        for (index, game) in games.iter().enumerate() {
            let mut position = Position::new();
            for (i, &mv) in game.moves.iter().enumerate().take(max_steps + 1) {
                let mover = Winner::from_color(Game::mover(i));
                let won = game.winner == Some(mover);
                let lost = matches!(game.winner, Some(w) if w != mover && w != Winner::Draw);

                let replies = self.entries.entry(position.hash()).or_default();
                match replies.iter_mut().find(|e| e.mv == mv) {
                    Some(entry) => {
                        entry.played += 1;
                        entry.won += won as u32;
                        entry.lost += lost as u32;
                    }
                    None => replies.push(BookEntry {
                        mv,
                        played: 1,
                        won: won as u32,
                        lost: lost as u32,
                    }),
                }

                position = match position.do_move(mv) {
                    Ok(next) => next,
                    Err(err) => {
                        warn!("book: game {index} stops at move {i}: {err}");
                        break;
                    }
                };
            }
        }

        debug!(
            "book: {} positions from {} games, max_steps {}",
            self.entries.len(),
            games.len(),
            max_steps
        );
    }

    /// Weighted choice among replies that did not lose more than they won.
    ///
    /// `None` past `max_steps`, for unknown positions, or when no reply
    /// qualifies.
    pub fn select(&mut self, position: &Position) -> Option<Move> {
        if position.ply() as usize > self.max_steps {
            return None;
        }

        let candidates: Vec<BookEntry> = self
            .candidates(position)
            .iter()
            .filter(|e| e.won >= e.lost && e.played >= self.min_count)
            // Guards against hash collisions
            .filter(|e| position.is_legal(e.mv))
            .copied()
            .collect();

        let total: u32 = candidates.iter().map(BookEntry::weight).sum();
        if total == 0 {
            return None;
        }

        let mut pick = self.rng.random_range(0..total);
        for entry in &candidates {
            if pick < entry.weight() {
                return Some(entry.mv);
            }
            pick -= entry.weight();
        }
        None
    }

    /// Raw replies recorded for a position
    pub fn candidates(&self, position: &Position) -> &[BookEntry] {
        self.entries
            .get(&position.hash())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[inline]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Number of positions in the book
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn loop_game() -> Game {
        Game::from_notation(&["@0/", "B1\\", "A2\\"]).unwrap()
    }

    #[test]
    fn test_winner_reply_is_selected() {
        let mut book = Book::new();
        book.init(&[loop_game()], 3);
        assert_eq!(book.len(), 3);

        let after_first = Position::new()
            .do_move(Move::new(-1, -1, Piece::RedSouthEast))
            .unwrap();
        let reply = book.select(&after_first).unwrap();
        assert_eq!(reply, Move::new(1, 0, Piece::RedSouthWest));

        let entries = book.candidates(&after_first);
        assert_eq!(entries.len(), 1);
        assert_eq!((entries[0].played, entries[0].won, entries[0].lost), (1, 1, 0));
    }

    #[test]
    fn test_loser_reply_is_skipped() {
        let mut book = Book::new();
        book.init(&[loop_game()], 3);
        // White opened and lost
        assert_eq!(book.select(&Position::new()), None);
        assert_eq!(book.candidates(&Position::new())[0].lost, 1);
    }

    #[test]
    fn test_max_steps_limits_depth() {
        let mut book = Book::new();
        book.init(&[loop_game()], 0);
        assert_eq!(book.len(), 1);

        let after_first = Position::new()
            .do_move(Move::new(0, 0, Piece::RedSouthEast))
            .unwrap();
        assert!(book.candidates(&after_first).is_empty());
        assert_eq!(book.select(&after_first), None);
    }

    #[test]
    fn test_counts_accumulate_and_weight() {
        let other = Game::from_notation(&["@0/", "B1+"]).unwrap();
        let mut book = Book::with_seed(3);
        book.init(&[loop_game(), loop_game(), other.clone()], 3);

        let after_first = Position::new()
            .do_move(Move::new(0, 0, Piece::RedSouthEast))
            .unwrap();
        let entries = book.candidates(&after_first);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].played, 2);
        assert_eq!(entries[1].played, 1);

        // Both replies qualify: the unfinished game has no loser
        for _ in 0..20 {
            let mv = book.select(&after_first).unwrap();
            assert!(after_first.is_legal(mv));
        }

        let mut strict = Book::new().with_min_count(2);
        strict.init(&[loop_game(), loop_game(), other], 3);
        for _ in 0..10 {
            assert_eq!(strict.select(&after_first), Some(Move::new(1, 0, Piece::RedSouthWest)));
        }
    }

    #[test]
    fn test_empty_book() {
        let mut book = Book::default();
        assert!(book.is_empty());
        assert_eq!(book.select(&Position::new()), None);
        assert_eq!(book.max_steps(), DEFAULT_MAX_STEPS);
    }
}
