//! Searchers and self-play
//!
//! Search itself lives outside this crate. The [`Searcher`] trait is the
//! seam it plugs into; the two searchers here are enough to drive
//! self-play, book testing and the viewer's computer opponent.
//!
//! # Example
//!
//! ```
//! use trax::engine::{self_play, RandomSearcher, SelfPlayConfig};
//! use trax::RuleConfig;
//!
//! let mut white = RandomSearcher::new(1);
//! let mut red = RandomSearcher::new(2);
//! let config = SelfPlayConfig::default().with_rules(RuleConfig::eight_by_eight());
//! let game = self_play(&mut white, &mut red, &config).unwrap();
//! assert!(game.num_moves() > 0);
//! ```

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::board::{Move, Position, Winner};
use crate::book::Book;
use crate::config::RuleConfig;
use crate::error::{TraxError, TraxResult};
use crate::game::Game;

/// Result of a move search with statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchReport {
    pub best_move: Move,
    /// Deepest fully searched depth, 0 for book or random moves
    pub completed_depth: u32,
    pub nodes_per_second: f64,
}

impl SearchReport {
    /// Report for a move that needed no search
    #[inline]
    pub fn instant(best_move: Move) -> Self {
        Self {
            best_move,
            completed_depth: 0,
            nodes_per_second: 0.0,
        }
    }
}

/// Move searcher.
///
/// Given a position, returns a move for the side to move. A searcher is
/// never asked to move in a finished position.
pub trait Searcher {
    /// Shown in logs and errors; should describe the configuration
    fn name(&self) -> String;

    fn search_best_move(&mut self, position: &Position, thinking_time: Duration) -> TraxResult<SearchReport>;
}

/// Plays a uniformly random legal move
#[derive(Debug, Clone)]
pub struct RandomSearcher {
    rng: Xoshiro256PlusPlus,
}

impl RandomSearcher {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }
}

impl Searcher for RandomSearcher {
    fn name(&self) -> String {
        "random".to_string()
    }

    fn search_best_move(&mut self, position: &Position, _thinking_time: Duration) -> TraxResult<SearchReport> {
        let start = Instant::now();
        let moves = position.generate_moves();
        if moves.is_empty() {
            return Err(TraxError::Searcher {
                name: self.name(),
                reason: "no legal move".into(),
            });
        }
        let best_move = moves[self.rng.random_range(0..moves.len())];

        let seconds = start.elapsed().as_secs_f64();
        let nodes_per_second = if seconds > 0.0 {
            moves.len() as f64 / seconds
        } else {
            0.0
        };
        Ok(SearchReport {
            best_move,
            completed_depth: 1,
            nodes_per_second,
        })
    }
}

/// Answers from the opening book, falls back to another searcher
#[derive(Debug, Clone)]
pub struct BookSearcher<S> {
    book: Book,
    fallback: S,
}

impl<S: Searcher> BookSearcher<S> {
    pub fn new(book: Book, fallback: S) -> Self {
        Self { book, fallback }
    }

    pub fn book(&self) -> &Book {
        &self.book
    }
}

impl<S: Searcher> Searcher for BookSearcher<S> {
    fn name(&self) -> String {
        format!("book+{}", self.fallback.name())
    }

    fn search_best_move(&mut self, position: &Position, thinking_time: Duration) -> TraxResult<SearchReport> {
        match self.book.select(position) {
            Some(mv) => {
                debug!("book move {mv} at ply {}", position.ply());
                Ok(SearchReport::instant(mv))
            }
            None => self.fallback.search_best_move(position, thinking_time),
        }
    }
}

/// Self-play settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfPlayConfig {
    pub rules: RuleConfig,
    /// Budget handed to the searcher for each move
    pub thinking_time: Duration,
    /// Fail the game when a searcher overruns its budget
    pub strict_timer: bool,
    /// Log every move at info level
    pub verbose: bool,
    /// Stop an unfinished game after this many moves
    pub max_moves: usize,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            rules: RuleConfig::standard(),
            thinking_time: Duration::from_millis(1000),
            strict_timer: true,
            verbose: false,
            max_moves: 400,
        }
    }
}

impl SelfPlayConfig {
    #[must_use]
    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_thinking_time(mut self, thinking_time: Duration) -> Self {
        self.thinking_time = thinking_time;
        self
    }
}

/// Play one game. White moves first.
///
/// A searcher that returns an illegal move, or overruns its budget with a
/// strict timer, ends the run with [`TraxError::Searcher`].
pub fn self_play(white: &mut dyn Searcher, red: &mut dyn Searcher, config: &SelfPlayConfig) -> TraxResult<Game> {
    let mut game = Game::new();
    let mut position = Position::with_rules(config.rules);
    let mut counts = [0u32; 2];

    while !position.finished() && game.num_moves() < config.max_moves {
        if position.generate_moves().is_empty() {
            debug!("no legal move at ply {}", position.ply());
            break;
        }
        let side = position.side_to_move();
        let searcher: &mut dyn Searcher = if position.red_to_move() {
            &mut *red
        } else {
            &mut *white
        };

        let start = Instant::now();
        let report = searcher.search_best_move(&position, config.thinking_time)?;
        let elapsed = start.elapsed();

        let next = position.do_move(report.best_move).map_err(|err| TraxError::Searcher {
            name: searcher.name(),
            reason: err.to_string(),
        })?;
        if config.strict_timer && elapsed > config.thinking_time {
            return Err(TraxError::Searcher {
                name: searcher.name(),
                reason: format!(
                    "violated time constraint ({}ms > {}ms)",
                    elapsed.as_millis(),
                    config.thinking_time.as_millis()
                ),
            });
        }

        let slot = side.index();
        game.average_search_depths[slot] += f64::from(report.completed_depth);
        game.average_nps[slot] += report.nodes_per_second;
        counts[slot] += 1;
        game.moves.push(report.best_move);

        if config.verbose {
            info!(
                "{} {}: {} ({}ms, depth {}, {:.0} nodes/s)",
                game.num_moves(),
                searcher.name(),
                report.best_move,
                elapsed.as_millis(),
                report.completed_depth,
                report.nodes_per_second
            );
            debug!("\n{next}");
        }
        position = next;
    }

    for slot in 0..2 {
        let n = f64::from(counts[slot].max(1));
        game.average_search_depths[slot] /= n;
        game.average_nps[slot] /= n;
    }
    game.record_result(&position);

    if config.verbose {
        let result = match game.winner {
            Some(Winner::Draw) => "Tie".to_string(),
            Some(winner) => format!("{winner} wins"),
            None => "Unfinished".to_string(),
        };
        info!("{result} in total {} steps", game.num_moves());
    }
    Ok(game)
}

/// Wins per color over a series of games
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelfPlayTally {
    pub white: u32,
    pub red: u32,
    /// Draws and unfinished games
    pub other: u32,
}

impl SelfPlayTally {
    fn record(&mut self, game: &Game) {
        match game.winner {
            Some(Winner::White) => self.white += 1,
            Some(Winner::Red) => self.red += 1,
            _ => self.other += 1,
        }
    }

    /// Share of decided games won by white, in percent
    pub fn white_percentage(&self) -> f64 {
        let decided = self.white + self.red;
        if decided == 0 {
            return 0.0;
        }
        f64::from(self.white) * 100.0 / f64::from(decided)
    }
}

/// Play `num_games` games between the same pair of searchers
pub fn self_play_many(
    white: &mut dyn Searcher,
    red: &mut dyn Searcher,
    config: &SelfPlayConfig,
    num_games: usize,
) -> TraxResult<(Vec<Game>, SelfPlayTally)> {
    info!("white: {} red: {}", white.name(), red.name());

    let mut games = Vec::with_capacity(num_games);
    let mut tally = SelfPlayTally::default();
    for i in 0..num_games {
        let game = self_play(white, red, config)?;
        tally.record(&game);
        games.push(game);

        if config.verbose || i + 1 == num_games {
            info!(
                "white({}): {} red({}): {} {:.1}%",
                white.name(),
                tally.white,
                red.name(),
                tally.red,
                tally.white_percentage()
            );
        }
    }
    Ok((games, tally))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    /// Always returns the same move
    struct FixedSearcher(Move);

    impl Searcher for FixedSearcher {
        fn name(&self) -> String {
            "fixed".into()
        }

        fn search_best_move(&mut self, _: &Position, _: Duration) -> TraxResult<SearchReport> {
            Ok(SearchReport::instant(self.0))
        }
    }

    /// Sleeps past its budget before moving
    struct SlowSearcher;

    impl Searcher for SlowSearcher {
        fn name(&self) -> String {
            "slow".into()
        }

        fn search_best_move(&mut self, position: &Position, thinking_time: Duration) -> TraxResult<SearchReport> {
            std::thread::sleep(thinking_time + Duration::from_millis(5));
            Ok(SearchReport::instant(position.generate_moves()[0]))
        }
    }

    fn quick() -> SelfPlayConfig {
        SelfPlayConfig::default()
            .with_rules(RuleConfig::eight_by_eight())
            .with_thinking_time(Duration::from_millis(200))
    }

    #[test]
    fn test_random_searcher_is_legal_and_seeded() {
        let p = Position::new();
        let mut a = RandomSearcher::new(9);
        let mut b = RandomSearcher::new(9);
        for _ in 0..5 {
            let ra = a.search_best_move(&p, Duration::ZERO).unwrap();
            let rb = b.search_best_move(&p, Duration::ZERO).unwrap();
            assert_eq!(ra.best_move, rb.best_move);
            assert!(p.is_legal(ra.best_move));
        }
    }

    #[test]
    fn test_self_play_finishes_8x8() {
        let mut white = RandomSearcher::new(1);
        let mut red = RandomSearcher::new(2);
        let game = self_play(&mut white, &mut red, &quick()).unwrap();
        assert!(game.winner.is_some());
        let end = game.replay_with_rules(RuleConfig::eight_by_eight()).unwrap();
        assert_eq!(end.winner(), game.winner);
        assert_eq!(game.average_search_depths, [1.0, 1.0]);
    }

    #[test]
    fn test_illegal_move_is_reported() {
        let mut white = FixedSearcher(Move::new(5, 5, Piece::RedEastWest));
        let mut red = RandomSearcher::new(0);
        let err = self_play(&mut white, &mut red, &quick()).unwrap_err();
        assert!(matches!(err, TraxError::Searcher { ref name, .. } if name == "fixed"));
    }

    #[test]
    fn test_strict_timer() {
        let config = quick().with_thinking_time(Duration::from_millis(1));
        let mut red = RandomSearcher::new(0);
        let err = self_play(&mut SlowSearcher, &mut red, &config).unwrap_err();
        assert!(matches!(err, TraxError::Searcher { ref name, .. } if name == "slow"));

        let relaxed = SelfPlayConfig {
            strict_timer: false,
            max_moves: 2,
            ..config
        };
        let game = self_play(&mut SlowSearcher, &mut red, &relaxed).unwrap();
        assert_eq!(game.num_moves(), 2);
        assert_eq!(game.winner, None);
    }

    #[test]
    fn test_book_searcher_prefers_book() {
        let game = Game::from_notation(&["@0/", "B1\\", "A2\\"]).unwrap();
        let mut book = Book::new();
        book.init(&[game], 3);
        let mut searcher = BookSearcher::new(book, RandomSearcher::new(4));
        assert_eq!(searcher.name(), "book+random");

        let p = Position::new()
            .do_move(Move::new(0, 0, Piece::RedSouthEast))
            .unwrap();
        let report = searcher.search_best_move(&p, Duration::ZERO).unwrap();
        assert_eq!(report.best_move, Move::new(1, 0, Piece::RedSouthWest));
        assert_eq!(report.completed_depth, 0);

        // Empty board: the book reply lost, so the fallback answers
        let report = searcher.search_best_move(&Position::new(), Duration::ZERO).unwrap();
        assert_eq!(report.completed_depth, 1);
    }

    #[test]
    fn test_self_play_many_tally() {
        let mut white = RandomSearcher::new(11);
        let mut red = RandomSearcher::new(12);
        let (games, tally) = self_play_many(&mut white, &mut red, &quick(), 3).unwrap();
        assert_eq!(games.len(), 3);
        assert_eq!(tally.white + tally.red + tally.other, 3);
        assert!((0.0..=100.0).contains(&tally.white_percentage()));
    }
}
