//! Forced play
//!
//! After a tile is placed, any empty neighbor inside the bounding box whose
//! surrounding edges admit exactly one tile and show two edges of one color
//! must be filled with that tile. Filling it can force further cells, so
//! the fill runs breadth-first until the queue drains.

use std::collections::VecDeque;

use crate::board::{Direction, Position};
use crate::rules::tables;

/// An empty cell no tile can fill; the move that led here is illegal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedConflict {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Fill every cell forced by the tile just placed at `(x, y)`.
    ///
    /// Returns the placed tile and each forced tile, the cells from which
    /// new loops and lines must be traced.
    pub(crate) fn fill_forced(&mut self, x: i32, y: i32) -> Result<Vec<(i32, i32)>, ForcedConflict> {
        let mut checkpoints = vec![(x, y)];
        let mut queue = VecDeque::new();
        self.queue_empty_neighbors(x, y, &mut queue);

        while let Some((cx, cy)) = queue.pop_front() {
            // Filled after it was queued
            if !self.at(cx, cy).is_empty() {
                continue;
            }

            let key = self.neighbor_key(cx, cy);
            let pieces = tables::possible_pieces(key);
            if pieces.is_empty() {
                return Err(ForcedConflict { x: cx, y: cy });
            }
            if !tables::is_forced(key) {
                continue;
            }
            let Some(piece) = pieces.single() else {
                continue;
            };

            self.set(cx, cy, piece);
            checkpoints.push((cx, cy));
            self.queue_empty_neighbors(cx, cy, &mut queue);
        }

        Ok(checkpoints)
    }

    /// Forced play never reaches outside the bounding box
    fn queue_empty_neighbors(&self, x: i32, y: i32, queue: &mut VecDeque<(i32, i32)>) {
        for dir in Direction::ALL {
            let (nx, ny) = dir.step(x, y);
            if self.in_bounds(nx, ny) && self.at(nx, ny).is_empty() {
                queue.push_back((nx, ny));
            }
        }
    }
}
