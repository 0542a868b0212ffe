//! Trax GUI
//!
//! Play Trax against the computer or another player. An optional path to a
//! commented-games file seeds the opening book.

use log::{error, info};
use trax::book::{Book, DEFAULT_MAX_STEPS};
use trax::game::Game;
use trax::ui::TraxApp;

fn load_book(path: &str) -> Book {
    let mut book = Book::new();
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            error!("cannot read {path}: {err}");
            return book;
        }
    };
    match Game::parse_commented(&text) {
        Ok(games) => {
            book.init(&games, DEFAULT_MAX_STEPS);
            info!("loaded {} games from {path}", games.len());
        }
        Err(err) => error!("cannot parse {path}: {err}"),
    }
    book
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let book = std::env::args().nth(1).map(|path| load_book(&path)).unwrap_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Trax"),
        ..Default::default()
    };

    eframe::run_native(
        "Trax",
        options,
        Box::new(move |cc| Ok(Box::new(TraxApp::new(cc, book)))),
    )
}
