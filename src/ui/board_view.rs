//! Board rendering for the Trax viewer

use std::f32::consts::FRAC_PI_2;

use egui::{Color32, CornerRadius, Painter, Pos2, Rect, Sense, Shape, Stroke, Vec2};

use super::game_state::GameState;
use super::theme::*;
use crate::board::moves::column_name;
use crate::board::{Color, Direction, Move, Piece};

/// Board view handles rendering and input for the game board
pub struct BoardView {
    /// Cached cell size for coordinate calculations
    cell_size: f32,
    /// Screen position of cell (-1, -1)
    origin: Pos2,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_size: 48.0,
            origin: Pos2::ZERO,
        }
    }
}

/// Unit vector of an edge direction in screen space
fn screen_dir(dir: Direction) -> Vec2 {
    Vec2::new(dir.dx() as f32, dir.dy() as f32)
}

fn track_color(color: Color) -> Color32 {
    match color {
        Color::Red => TRACK_RED,
        Color::White => TRACK_WHITE,
    }
}

impl BoardView {
    /// Render the board and return the clicked cell if any
    pub fn show(&mut self, ui: &mut egui::Ui, state: &GameState) -> Option<(i32, i32)> {
        let position = state.position();
        let columns = position.max_x() + 2;
        let rows = position.max_y() + 2;

        let available = ui.available_size();
        let fit_x = (available.x - 2.0 * BOARD_MARGIN) / columns as f32;
        let fit_y = (available.y - 2.0 * BOARD_MARGIN) / rows as f32;
        self.cell_size = fit_x.min(fit_y).clamp(MIN_CELL_SIZE, MAX_CELL_SIZE);

        let (response, painter) = ui.allocate_painter(available, Sense::click());
        painter.rect_filled(response.rect, CornerRadius::same(4), BOARD_BG);

        let board_size = Vec2::new(columns as f32, rows as f32) * self.cell_size;
        self.origin = response.rect.center() - board_size / 2.0;

        self.draw_coordinates(&painter, columns, rows);

        let frontier: Vec<Move> = if state.game_over().is_none() {
            position.generate_moves()
        } else {
            Vec::new()
        };
        for mv in &frontier {
            painter.rect_filled(self.cell_rect(mv.x, mv.y), CornerRadius::same(2), FRONTIER_CELL);
        }

        for y in -1..=position.max_y() {
            for x in -1..=position.max_x() {
                let piece = position.at(x, y);
                if !piece.is_empty() {
                    self.draw_tile(&painter, x, y, piece, 255);
                }
            }
        }

        if let Some((x, y)) = state.last_cell {
            painter.circle_filled(self.cell_center(x, y), LAST_MOVE_MARKER_RADIUS, LAST_MOVE_MARKER);
        }

        if let Some(mv) = state.suggested_move {
            self.draw_tile(&painter, mv.x, mv.y, mv.piece, 110);
        }

        // Endpoints of lines one move away from closing
        for line in state.lines().iter().filter(|l| l.is_mate()) {
            for (x, y) in line.endpoints {
                let center = self.cell_center(x, y);
                painter.circle_stroke(center, self.cell_size * 0.2, Stroke::new(2.0, track_color(line.color)));
            }
        }

        if let Some((x, y)) = state.selected {
            painter.rect_filled(self.cell_rect(x, y), CornerRadius::same(2), SELECTED_CELL);
        }

        let hovered = response.hover_pos().and_then(|p| self.screen_to_cell(p, columns, rows));
        if let Some((x, y)) = hovered {
            let playable = frontier.iter().any(|mv| (mv.x, mv.y) == (x, y));
            let color = if playable { hover_valid() } else { hover_invalid() };
            painter.rect_filled(self.cell_rect(x, y), CornerRadius::same(2), color);
        }

        if response.clicked() {
            hovered
        } else {
            None
        }
    }

    /// Draw one tile: background, then both tracks
    fn draw_tile(&self, painter: &Painter, x: i32, y: i32, piece: Piece, alpha: u8) {
        let rect = self.cell_rect(x, y).shrink(1.0);
        painter.rect_filled(rect, CornerRadius::same(2), TILE_BG.gamma_multiply(alpha as f32 / 255.0));

        let width = self.cell_size * TRACK_WIDTH_RATIO;
        for color in [Color::White, Color::Red] {
            let Some([d1, d2]) = piece.track_edges(color) else {
                continue;
            };
            let stroke = Stroke::new(width, track_color(color).gamma_multiply(alpha as f32 / 255.0));
            let center = rect.center();
            let half = self.cell_size / 2.0;

            if d1.opposite() == d2 {
                painter.line_segment([center + screen_dir(d1) * half, center + screen_dir(d2) * half], stroke);
                continue;
            }

            // Quarter circle around the corner shared by both edges
            let corner = center + (screen_dir(d1) + screen_dir(d2)) * half;
            let (u, v) = (-screen_dir(d2), -screen_dir(d1));
            let points: Vec<Pos2> = (0..=ARC_SEGMENTS)
                .map(|i| {
                    let t = FRAC_PI_2 * i as f32 / ARC_SEGMENTS as f32;
                    corner + (u * t.cos() + v * t.sin()) * half
                })
                .collect();
            painter.add(Shape::line(points, stroke));
        }
    }

    /// Column letters across the top, row numbers down the left
    fn draw_coordinates(&self, painter: &Painter, columns: i32, rows: i32) {
        let font = egui::FontId::proportional(12.0);
        for i in 0..columns {
            let x = i - 1;
            let pos = self.cell_center(x, -1) - Vec2::new(0.0, self.cell_size / 2.0 + 10.0);
            painter.text(pos, egui::Align2::CENTER_CENTER, column_name(x), font.clone(), GRID_LINE);
        }
        for j in 0..rows {
            let y = j - 1;
            let pos = self.cell_center(-1, y) - Vec2::new(self.cell_size / 2.0 + 12.0, 0.0);
            painter.text(pos, egui::Align2::CENTER_CENTER, format!("{}", y + 1), font.clone(), GRID_LINE);
        }
    }

    fn cell_rect(&self, x: i32, y: i32) -> Rect {
        let min = self.origin + Vec2::new((x + 1) as f32, (y + 1) as f32) * self.cell_size;
        Rect::from_min_size(min, Vec2::splat(self.cell_size))
    }

    fn cell_center(&self, x: i32, y: i32) -> Pos2 {
        self.cell_rect(x, y).center()
    }

    /// Convert screen coordinates to a cell of the visible window
    pub fn screen_to_cell(&self, screen_pos: Pos2, columns: i32, rows: i32) -> Option<(i32, i32)> {
        let relative = (screen_pos - self.origin) / self.cell_size;
        let (i, j) = (relative.x.floor() as i32, relative.y.floor() as i32);
        if (0..columns).contains(&i) && (0..rows).contains(&j) {
            Some((i - 1, j - 1))
        } else {
            None
        }
    }
}
