//! Terminal detection
//!
//! Win conditions:
//! 1. Loop: a track of one color returns to the tile it started from
//! 2. Line: a track touches two opposite edges of an axis that spans at
//!    least `min_line_span` cells
//!
//! Only tracks through the tile just played and the tiles it forced can
//! have changed, so only those are traced.

use std::collections::HashSet;

use crate::board::{Color, Direction, Position, WinningReason};
use crate::config::{DoubleWinPolicy, FullBoardPolicy};
use crate::rules::tables;

/// Smallest winning loop, counted in half-tile track segments
pub const MIN_LOOP_SEGMENTS: usize = 8;

/// Where a walk along a track stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrackEnd {
    /// Reached the empty cell `(x, y)`
    Open { x: i32, y: i32, tiles: usize },
    /// Came back to the starting tile
    Closed { tiles: usize },
}

impl Position {
    /// Walk the `color` track leaving `(x, y)` through `dir`
    pub(crate) fn walk_track(&self, x: i32, y: i32, dir: Direction, mut visit: impl FnMut(i32, i32, Direction)) -> TrackEnd {
        let limit = self.cells.len() + 1;
        let (mut cx, mut cy) = dir.step(x, y);
        let mut entry = dir.opposite();
        let mut tiles = 1;

        while !self.at(cx, cy).is_empty() {
            if (cx, cy) == (x, y) {
                return TrackEnd::Closed { tiles };
            }
            if tiles > limit {
                break;
            }
            let (exit, _) = tables::track_exit(self.at(cx, cy), entry);
            visit(cx, cy, exit);
            tiles += 1;
            (cx, cy) = exit.step(cx, cy);
            entry = exit.opposite();
        }
        TrackEnd::Open { x: cx, y: cy, tiles }
    }

    /// Whether the `color` track through `(x, y)` wins, and how
    pub(crate) fn trace_victory(&self, x: i32, y: i32, color: Color) -> Option<WinningReason> {
        let piece = self.at(x, y);
        let edges = piece.track_edges(color)?;

        // Last column/row reached in each direction
        let bounds = [self.max_x - 1, 0, 0, self.max_y - 1];
        let on_edge = |cx: i32, cy: i32, dir: Direction| {
            let coord = if dir.index() & 1 == 0 { cx } else { cy };
            bounds[dir.index()] == coord
        };

        let mut hits = [false; 4];
        for dir in edges {
            hits[dir.index()] |= on_edge(x, y, dir);
            let end = self.walk_track(x, y, dir, |cx, cy, exit| {
                hits[exit.index()] |= on_edge(cx, cy, exit);
            });
            if let TrackEnd::Closed { tiles } = end {
                if 2 * tiles >= MIN_LOOP_SEGMENTS {
                    return Some(WinningReason::Loop);
                }
            }
        }

        let span = [self.max_x, self.max_y];
        for axis in 0..2 {
            if span[axis] >= self.rules.min_line_span && hits[axis] && hits[axis + 2] {
                return Some(WinningReason::Line);
            }
        }
        None
    }

    /// Record any new winner among tracks through the given tiles
    pub(crate) fn update_winners(&mut self, checkpoints: &[(i32, i32)]) {
        for &(x, y) in checkpoints {
            if !self.red_winner {
                if let Some(reason) = self.trace_victory(x, y, Color::Red) {
                    self.red_winner = true;
                    self.red_reason = reason;
                }
            }
            if !self.white_winner {
                if let Some(reason) = self.trace_victory(x, y, Color::White) {
                    self.white_winner = true;
                    self.white_reason = reason;
                }
            }
        }
    }

    /// Settle double wins and full boards after winners were recorded
    pub(crate) fn resolve_outcome(&mut self) {
        if self.red_winner && self.white_winner {
            if self.rules.double_win == DoubleWinPolicy::MoverWins {
                // red_to_move already names the side that did not move
                if self.red_to_move {
                    self.red_winner = false;
                } else {
                    self.white_winner = false;
                }
            }
            return;
        }

        if self.finished() || !self.is_full() {
            return;
        }
        let (red, white) = match self.rules.full_board {
            FullBoardPolicy::Draw => (true, true),
            FullBoardPolicy::LongestTrack => {
                let r = self.longest_track(Color::Red);
                let w = self.longest_track(Color::White);
                (r >= w, w >= r)
            }
        };
        if red {
            self.red_winner = true;
            self.red_reason = WinningReason::Full;
        }
        if white {
            self.white_winner = true;
            self.white_reason = WinningReason::Full;
        }
    }

    /// Bounded board with every cell filled
    pub fn is_full(&self) -> bool {
        match self.rules.board_limit {
            Some(limit) => {
                self.max_x >= limit
                    && self.max_y >= limit
                    && self.cells.iter().all(|p| !p.is_empty())
            }
            None => false,
        }
    }

    /// Length in tiles of the longest `color` track
    pub fn longest_track(&self, color: Color) -> usize {
        let mut seen: HashSet<(i32, i32)> = HashSet::new();
        let mut best = 0;

        for (x, y) in self.occupied_cells() {
            if seen.contains(&(x, y)) {
                continue;
            }
            seen.insert((x, y));
            let Some(edges) = self.at(x, y).track_edges(color) else {
                continue;
            };

            let mut length = 1;
            for dir in edges {
                let end = self.walk_track(x, y, dir, |cx, cy, _| {
                    seen.insert((cx, cy));
                });
                match end {
                    TrackEnd::Closed { tiles } => {
                        length = tiles;
                        break;
                    }
                    TrackEnd::Open { tiles, .. } => length += tiles - 1,
                }
            }
            best = best.max(length);
        }

        best
    }
}
