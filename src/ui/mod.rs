//! GUI module for the Trax viewer
//!
//! Native board viewer built on egui/eframe: hot seat or against the
//! computer, moves by clicking or by notation.

mod app;
mod board_view;
mod game_state;
mod theme;

pub use app::TraxApp;
pub use game_state::{GameMode, GameState};
