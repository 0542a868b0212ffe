//! Game rules for Trax
//!
//! This module implements the rule machinery behind [`Position`]:
//! - Lookup tables over neighbor configurations
//! - Forced play
//! - Win conditions (loop, line, full board)
//! - Line tracing for search features
//!
//! [`Position`]: crate::board::Position

pub mod forced;
pub mod lines;
pub mod tables;
pub mod win;

// Re-exports for convenient access
pub use lines::{Endpoint, Line};
pub use tables::{encode_neighbor_key, init_tables, is_forced, possible_pieces, track_exit, NeighborKey};
pub use win::MIN_LOOP_SEGMENTS;
