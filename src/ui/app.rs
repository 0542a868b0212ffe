//! Main application for the Trax viewer

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, ScrollArea, SidePanel, TopBottomPanel};

use super::board_view::BoardView;
use super::game_state::{GameMode, GameState};
use super::theme::*;
use crate::board::{Color, Winner};
use crate::book::Book;
use crate::config::RuleConfig;

/// Main Trax application
pub struct TraxApp {
    state: GameState,
    board_view: BoardView,
    notation_input: String,
    show_lines: bool,
}

impl TraxApp {
    /// Create the app; `book` answers the computer's opening moves
    pub fn new(_cc: &eframe::CreationContext<'_>, book: Book) -> Self {
        Self {
            state: GameState::new(GameMode::default(), RuleConfig::standard()).with_book(book),
            board_view: BoardView::default(),
            notation_input: String::new(),
            show_lines: true,
        }
    }

    fn new_game(&mut self, mode: GameMode, rules: RuleConfig) {
        self.state.mode = mode;
        self.state.rules = rules;
        self.state.reset();
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    let rules = self.state.rules;
                    if ui.button("New Game (vs computer, White)").clicked() {
                        self.new_game(GameMode::PvE { human_color: Color::White }, rules);
                        ui.close_menu();
                    }
                    if ui.button("New Game (vs computer, Red)").clicked() {
                        self.new_game(GameMode::PvE { human_color: Color::Red }, rules);
                        ui.close_menu();
                    }
                    if ui.button("New Game (hot seat)").clicked() {
                        self.new_game(GameMode::PvP, rules);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Undo").clicked() {
                        self.state.undo();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Rules", |ui| {
                    let mode = self.state.mode;
                    if ui.button("Trax").clicked() {
                        self.new_game(mode, RuleConfig::standard());
                        ui.close_menu();
                    }
                    if ui.button("8x8 Trax").clicked() {
                        self.new_game(mode, RuleConfig::eight_by_eight());
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_lines, "Line features (L)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let variant = if self.state.rules.board_limit.is_some() { "8x8 Trax" } else { "Trax" };
                    let mode_text = match self.state.mode {
                        GameMode::PvE { human_color } => format!("{variant} - You: {human_color:?}"),
                        GameMode::PvP => format!("{variant} - Hot seat"),
                    };
                    ui.label(mode_text);
                });
            });
        });
    }

    /// Render the side panel with game info
    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(260.0)
            .max_width(300.0)
            .frame(Frame::new().fill(egui::Color32::from_rgb(25, 27, 31)).inner_margin(8.0))
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.label(RichText::new("TRAX").size(22.0).strong().color(TEXT_PRIMARY));
                ui.add_space(10.0);

                self.render_turn_card(ui);
                ui.add_space(8.0);
                self.render_input_card(ui);
                ui.add_space(8.0);
                self.render_moves_card(ui);

                if self.show_lines {
                    ui.add_space(8.0);
                    self.render_lines_card(ui);
                }

                if let Some(msg) = self.state.message.clone() {
                    ui.add_space(8.0);
                    Frame::new()
                        .fill(egui::Color32::from_rgb(80, 60, 30))
                        .corner_radius(CornerRadius::same(8))
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
                        });
                }
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(egui::Color32::from_rgb(35, 38, 43))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_turn_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            let position = self.state.position();
            if let Some((winner, reason)) = self.state.game_over() {
                let text = match winner {
                    Winner::Draw => "DRAW".to_string(),
                    w => format!("{} WINS", w.to_string().to_uppercase()),
                };
                ui.label(RichText::new(text).size(18.0).strong().color(WIN_HIGHLIGHT));
                ui.label(RichText::new(format!("by {}", reason.as_str())).size(11.0).color(TEXT_SECONDARY));
                return;
            }

            let (name, accent) = match position.side_to_move() {
                Color::Red => ("RED", TRACK_RED),
                Color::White => ("WHITE", TRACK_WHITE),
            };
            ui.label(RichText::new(format!("{name} to move")).size(18.0).strong().color(accent));

            let status = if self.state.is_ai_thinking() {
                let secs = self.state.ai_thinking_elapsed().map_or(0.0, |d| d.as_secs_f32());
                (format!("Computer thinking... {secs:.1}s"), STATUS_BUSY)
            } else if self.state.is_human_turn() {
                ("Your turn".to_string(), STATUS_OK)
            } else {
                ("Waiting".to_string(), TEXT_MUTED)
            };
            ui.label(RichText::new(status.0).size(12.0).color(status.1));
            ui.label(
                RichText::new(format!("Board {}x{}, ply {}", position.max_x(), position.max_y(), position.ply()))
                    .size(10.0)
                    .color(TEXT_MUTED),
            );
        });
    }

    /// Glyph buttons for the selected cell and the notation box
    fn render_input_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("MOVE").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            if let Some((x, y)) = self.state.selected {
                let options = self.state.options_at(x, y);
                ui.horizontal(|ui| {
                    for mv in options {
                        let glyph = mv.piece.glyph();
                        if ui.button(RichText::new(mv.notation()).monospace()).clicked() {
                            self.report(|state| state.play_selected(glyph));
                        }
                    }
                });
            }

            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.notation_input)
                        .hint_text("e.g. @0/")
                        .desired_width(120.0),
                );
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Play").clicked() || submitted {
                    let text = std::mem::take(&mut self.notation_input);
                    self.report(|state| state.play_notation(&text));
                }
            });

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("Undo").clicked() {
                    self.state.undo();
                }
                if ui.button("Hint").clicked() {
                    self.state.request_suggestion();
                }
                if ui.button("New").clicked() {
                    self.state.reset();
                }
            });

            if let Some(mv) = self.state.suggested_move {
                ui.label(RichText::new(format!("Hint: {mv}")).size(12.0).color(WIN_HIGHLIGHT));
            }
            if let Some(report) = self.state.last_report {
                ui.label(
                    RichText::new(format!(
                        "Computer: {} (depth {}, {:.0} nodes/s)",
                        report.best_move, report.completed_depth, report.nodes_per_second
                    ))
                    .size(10.0)
                    .color(TEXT_SECONDARY),
                );
            }
        });
    }

    fn render_moves_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("MOVES").size(10.0).color(TEXT_MUTED));
            ScrollArea::vertical().id_salt("moves").max_height(160.0).show(ui, |ui| {
                for (i, notation) in self.state.move_list().iter().enumerate() {
                    ui.label(RichText::new(format!("{:>3} {notation}", i + 1)).monospace().color(TEXT_PRIMARY));
                }
            });
        });
    }

    /// Traced line features of the current position
    fn render_lines_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("LINES").size(10.0).color(TEXT_MUTED));
            ScrollArea::vertical().id_salt("lines").max_height(200.0).show(ui, |ui| {
                for line in self.state.lines() {
                    let accent = match line.color {
                        Color::Red => TRACK_RED,
                        Color::White => TRACK_WHITE,
                    };
                    let mut text = format!(
                        "ends {} edge {:?} manhattan {}",
                        line.endpoint_distance, line.edge_distances, line.manhattan_distance
                    );
                    if line.is_inner {
                        text.push_str(&format!(" loop {:?}", line.loop_distances));
                    }
                    if line.is_mate() {
                        text.push_str(" mate");
                    }
                    ui.label(RichText::new(text).size(10.0).monospace().color(accent));
                }
            });
        });
    }

    /// Run a state action and show its error, if any
    fn report(&mut self, action: impl FnOnce(&mut GameState) -> Result<(), String>) {
        if let Err(msg) = action(&mut self.state) {
            self.state.message = Some(msg);
        }
    }

    /// Render the main board
    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            if let Some((x, y)) = self.board_view.show(ui, &self.state) {
                self.report(|state| state.select_cell(x, y));
            }
        });
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (glyph, undo, new_game, hint, lines) = ctx.input(|i| {
            let glyph = i.events.iter().find_map(|event| match event {
                egui::Event::Text(text) => text.chars().find(|c| matches!(c, '/' | '\\' | '+')),
                _ => None,
            });
            (
                glyph,
                i.key_pressed(egui::Key::U),
                i.key_pressed(egui::Key::N),
                i.key_pressed(egui::Key::H),
                i.key_pressed(egui::Key::L),
            )
        });

        if let Some(glyph) = glyph {
            if self.state.selected.is_some() {
                self.report(|state| state.play_selected(glyph));
            }
        }
        if undo {
            self.state.undo();
        }
        if new_game {
            self.state.reset();
        }
        if hint {
            self.state.request_suggestion();
        }
        if lines {
            self.show_lines = !self.show_lines;
        }
    }
}

impl eframe::App for TraxApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);
        self.state.check_ai_result();

        if self.state.is_ai_turn() && !self.state.is_ai_thinking() && self.state.game_over().is_none() {
            self.state.start_ai_thinking();
        }

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        if self.state.is_ai_thinking() {
            ctx.request_repaint();
        }
    }
}
