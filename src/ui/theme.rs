//! Theme constants for the Trax viewer

use egui::Color32;

// Board colors
pub const BOARD_BG: Color32 = Color32::from_rgb(46, 94, 62);
pub const GRID_LINE: Color32 = Color32::from_rgb(210, 220, 210);
pub const TILE_BG: Color32 = Color32::from_rgb(24, 24, 28);
pub const FRONTIER_CELL: Color32 = Color32::from_rgb(60, 112, 78);
pub const SELECTED_CELL: Color32 = Color32::from_rgba_premultiplied(60, 60, 0, 90);

// Tracks
pub const TRACK_RED: Color32 = Color32::from_rgb(214, 48, 49);
pub const TRACK_WHITE: Color32 = Color32::from_rgb(245, 245, 240);

// Markers
pub const LAST_MOVE_MARKER: Color32 = Color32::from_rgb(255, 200, 40);
pub const WIN_HIGHLIGHT: Color32 = Color32::from_rgb(50, 220, 50);

pub fn hover_valid() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 255, 255, 40)
}

pub fn hover_invalid() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 50, 50, 60)
}

// Panel text
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 165, 175);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 125, 135);

// Status colors
pub const STATUS_OK: Color32 = Color32::from_rgb(80, 200, 120);
pub const STATUS_BUSY: Color32 = Color32::from_rgb(255, 180, 50);

// Sizes
pub const BOARD_MARGIN: f32 = 36.0;
pub const MIN_CELL_SIZE: f32 = 12.0;
pub const MAX_CELL_SIZE: f32 = 72.0;
pub const TRACK_WIDTH_RATIO: f32 = 0.16;
pub const LAST_MOVE_MARKER_RADIUS: f32 = 4.0;
pub const ARC_SEGMENTS: usize = 12;
