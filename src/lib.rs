//! Trax engine
//!
//! Rules engine for the tile-laying game Trax:
//! - Unbounded board (or 8x8 Trax), white moves first
//! - Forced play fills every cell whose neighbors admit a single tile
//! - A player wins with a loop of their color, or a line of their color
//!   joining opposite edges of a board at least 8 cells across
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Tiles, moves, notation and the [`Position`] value type
//! - [`rules`]: Lookup tables, forced play, win detection, line tracing
//! - [`book`]: Opening book built from recorded games
//! - [`game`]: Game records
//! - [`engine`]: Searcher interface and self-play
//! - [`ui`]: Board viewer
//!
//! # Quick Start
//!
//! ```
//! use trax::{Move, Position, Winner, WinningReason};
//!
//! let mut position = Position::new();
//! for notation in ["@0/", "B1\\", "A2\\"] {
//!     let mv = Move::parse(notation, &position).unwrap();
//!     position = position.do_move(mv).unwrap();
//! }
//!
//! // The last move forced a fourth tile and closed a red loop
//! assert_eq!(position.tile_count(), 4);
//! assert_eq!(position.winner(), Some(Winner::Red));
//! assert_eq!(position.winning_reason(), WinningReason::Loop);
//! ```
//!
//! Positions are immutable values: [`Position::do_move`] returns the next
//! position, so a search tree can keep every node it visits.

pub mod board;
pub mod book;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod rules;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Color, Direction, Move, Piece, PieceSet, Position, ScoredMove, Winner, WinningReason};
pub use book::{Book, BookEntry};
pub use config::{DoubleWinPolicy, FullBoardPolicy, RuleConfig};
pub use engine::{BookSearcher, RandomSearcher, SearchReport, Searcher, SelfPlayConfig};
pub use error::{TraxError, TraxResult};
pub use game::Game;
pub use rules::Line;
