//! Line tracer
//!
//! Every open track ends in two empty cells on the border of the placed
//! region. The border is numbered by walking its empty cells clockwise, so
//! distances between endpoints can be read off the numbering. None of the
//! metrics carry rule meaning; they are features for search heuristics.

use std::collections::{BTreeSet, HashMap};

use crate::board::{Color, Direction, Position};
use crate::rules::win::TrackEnd;

/// Endpoint cell of a track
pub type Endpoint = (i32, i32);

/// Traced track of one color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub color: Color,
    /// Empty cells where the track leaves the placed region, in ascending
    /// order. Both are the start tile for a loop.
    pub endpoints: [Endpoint; 2],
    pub is_loop: bool,
    /// Per axis: how far the track is from spanning the board edge to edge
    pub edge_distances: [i32; 2],
    /// Border steps between the endpoints, the shorter way round
    pub endpoint_distance: i32,
    pub manhattan_distance: i32,
    /// Both border neighbors of the first endpoint belong to other lines
    /// of the same color
    pub is_inner: bool,
    /// Only set for inner lines
    pub loop_distances: [i32; 2],
    pub endpoint_indices: [i32; 2],
}

impl Line {
    fn closed(color: Color, x: i32, y: i32) -> Self {
        Line {
            color,
            endpoints: [(x, y); 2],
            is_loop: true,
            edge_distances: [0; 2],
            endpoint_distance: 0,
            manhattan_distance: 0,
            is_inner: false,
            loop_distances: [0; 2],
            endpoint_indices: [0; 2],
        }
    }

    fn open(color: Color, endpoints: [Endpoint; 2], position: &Position, border: &Border) -> Option<Self> {
        let index_a = *border.indices.get(&endpoints[0])?;
        let index_b = *border.indices.get(&endpoints[1])?;

        let span = position.rules.min_line_span;
        let dims = [position.max_x.max(span), position.max_y.max(span)];
        let [(ax, ay), (bx, by)] = endpoints;
        let mut edge_distances = [0; 2];
        for (axis, (a, b)) in [(ax, bx), (ay, by)].into_iter().enumerate() {
            let (lower, upper) = (a.min(b), a.max(b));
            edge_distances[axis] = dims[axis] - upper + lower + 1;
        }

        let (lower, upper) = (index_a.min(index_b), index_a.max(index_b));
        Some(Line {
            color,
            endpoints,
            is_loop: false,
            edge_distances,
            endpoint_distance: (upper - lower).min(lower + border.total - upper),
            manhattan_distance: (ax - bx).abs() + (ay - by).abs(),
            is_inner: false,
            loop_distances: [0; 2],
            endpoint_indices: [index_a, index_b],
        })
    }

    /// One move away from completing, or close to it
    #[inline]
    pub fn is_mate(&self) -> bool {
        self.endpoint_distance <= 2 || self.edge_distances[0] <= 1 || self.edge_distances[1] <= 1
    }
}

/// Clockwise numbering of the empty cells around the placed region
struct Border {
    indices: HashMap<Endpoint, i32>,
    total: i32,
}

impl Position {
    /// Descriptors for every open track reaching the outer border.
    ///
    /// Empty for finished positions. Tracks ending inside an enclosed hole
    /// are skipped.
    pub fn enumerate_lines(&self) -> Vec<Line> {
        let mut lines = Vec::new();
        if self.finished() || self.is_empty_board() {
            return lines;
        }
        let border = self.index_border();
        let mut traced = BTreeSet::new();

        for x in 0..self.max_x {
            for y in 0..self.max_y {
                if self.at(x, y).is_empty() || !self.touches_empty(x, y) {
                    continue;
                }
                for color in Color::ALL {
                    let Some(endpoints) = self.trace_endpoints(x, y, color) else {
                        continue;
                    };
                    if !traced.insert((endpoints, color)) {
                        continue;
                    }
                    if let Some(line) = Line::open(color, endpoints, self, &border) {
                        lines.push(line);
                    }
                }
            }
        }

        mark_inner_lines(&mut lines);
        lines
    }

    /// Descriptor for the `color` track through the tile at `(x, y)`.
    ///
    /// `None` for an empty cell or a track ending inside a hole.
    pub fn trace_line(&self, x: i32, y: i32, color: Color) -> Option<Line> {
        if self.at(x, y).is_empty() {
            return None;
        }
        match self.trace_endpoints(x, y, color) {
            Some(endpoints) => Line::open(color, endpoints, self, &self.index_border()),
            None => Some(Line::closed(color, x, y)),
        }
    }

    fn touches_empty(&self, x: i32, y: i32) -> bool {
        Direction::ALL.into_iter().any(|d| {
            let (nx, ny) = d.step(x, y);
            self.at(nx, ny).is_empty()
        })
    }

    /// Both ends of an open track in ascending order, `None` for a loop
    fn trace_endpoints(&self, x: i32, y: i32, color: Color) -> Option<[Endpoint; 2]> {
        let edges = self.at(x, y).track_edges(color)?;
        let mut ends = [(0, 0); 2];
        for (end, dir) in ends.iter_mut().zip(edges) {
            match self.walk_track(x, y, dir, |_, _, _| {}) {
                TrackEnd::Open { x, y, .. } => *end = (x, y),
                TrackEnd::Closed { .. } => return None,
            }
        }
        ends.sort();
        Some(ends)
    }

    /// Number the empty cells around the placed region, keeping the
    /// region on the right. A right turn costs an extra step.
    fn index_border(&self) -> Border {
        let mut indices = HashMap::new();
        let Some(top) = (0..self.max_y).find(|&y| !self.at(0, y).is_empty()) else {
            return Border { indices, total: 0 };
        };

        // West of the topmost tile in the first column, heading north
        let start = (-1, top);
        let (mut x, mut y) = start;
        let mut heading = Direction::North;
        let mut index = 0;
        let limit = 4 * (self.max_x + 2) * (self.max_y + 2);

        while index <= limit {
            indices.entry((x, y)).or_insert(index);
            index += 1;

            let right = heading.clockwise();
            for (turn, dir) in [right, heading, right.opposite(), heading.opposite()]
                .into_iter()
                .enumerate()
            {
                let (nx, ny) = dir.step(x, y);
                if self.at(nx, ny).is_empty() {
                    (x, y) = (nx, ny);
                    heading = dir;
                    if turn == 0 {
                        index += 1;
                    }
                    break;
                }
            }

            if (x, y) == start {
                break;
            }
        }

        Border { indices, total: index }
    }
}

/// Fill `is_inner` and `loop_distances` from the cyclic order of
/// same-colored endpoints along the border
fn mark_inner_lines(lines: &mut [Line]) {
    for color in Color::ALL {
        // (border index, line) sorted by index
        let mut ring: Vec<(i32, usize)> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.color == color)
            .flat_map(|(i, line)| line.endpoint_indices.map(|index| (index, i)))
            .collect();
        ring.sort_unstable();
        ring.dedup_by_key(|entry| entry.0);
        if ring.is_empty() {
            continue;
        }

        let n = ring.len();
        let find = |index: i32| ring.binary_search_by_key(&index, |e| e.0).ok();
        let next = |pos: usize| (pos + 1) % n;
        let prev = |pos: usize| (pos + n - 1) % n;

        for (i, line) in lines.iter_mut().enumerate() {
            if line.color != color {
                continue;
            }
            if let Some(pos) = find(line.endpoint_indices[0]) {
                line.is_inner = ring[prev(pos)].1 != i && ring[next(pos)].1 != i;
            }
        }

        let inner: Vec<bool> = lines.iter().map(|line| line.is_inner).collect();
        for line in lines.iter_mut().filter(|l| l.color == color && l.is_inner) {
            let (Some(mut a), Some(mut b)) = (
                find(line.endpoint_indices[0]),
                find(line.endpoint_indices[1]),
            ) else {
                continue;
            };

            // Clockwise from one endpoint, anticlockwise from the other,
            // then the other way round
            for slot in 0..2 {
                let mut distance = 0;
                let mut pos = a;
                for _ in 0..n {
                    let forward = next(pos);
                    if ring[pos].1 != ring[forward].1 {
                        distance += (ring[forward].0 - ring[pos].0).abs();
                    }
                    pos = forward;
                    if inner[ring[pos].1] {
                        break;
                    }
                }

                if pos != b {
                    pos = b;
                    for _ in 0..n {
                        let backward = prev(pos);
                        if ring[pos].1 != ring[backward].1 {
                            distance += (ring[pos].0 - ring[backward].0).abs();
                        }
                        pos = backward;
                        if inner[ring[pos].1] {
                            break;
                        }
                    }
                }

                line.loop_distances[slot] = distance;
                std::mem::swap(&mut a, &mut b);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Move, Piece};

    fn play(moves: &[&str]) -> Position {
        let mut p = Position::new();
        for notation in moves {
            let mv = Move::parse(notation, &p).unwrap();
            p = p.do_move(mv).unwrap();
        }
        p
    }

    #[test]
    fn test_single_tile_lines() {
        let p = play(&["@0+"]);
        let lines = p.enumerate_lines();
        assert_eq!(lines.len(), 2);

        let white = &lines[0];
        assert_eq!(white.color, Color::White);
        assert_eq!(white.endpoints, [(0, -1), (0, 1)]);
        assert_eq!(white.endpoint_indices, [3, 9]);
        assert_eq!(white.endpoint_distance, 6);
        assert_eq!(white.edge_distances, [9, 7]);

        let red = &lines[1];
        assert_eq!(red.color, Color::Red);
        assert_eq!(red.endpoints, [(-1, 0), (1, 0)]);
        assert_eq!(red.endpoint_indices, [0, 6]);
        assert_eq!(red.manhattan_distance, 2);
        assert_eq!(red.edge_distances, [7, 9]);
        assert!(!red.is_loop);
        assert!(!red.is_mate());
    }

    #[test]
    fn test_curve_is_mate() {
        let p = play(&["@0/", "B1\\"]);
        let lines = p.enumerate_lines();
        // One red curve shared by both tiles
        assert_eq!(lines.len(), 3);
        let red: Vec<_> = lines.iter().filter(|l| l.color == Color::Red).collect();
        assert_eq!(red.len(), 1);
        assert_eq!(red[0].endpoints, [(0, 1), (1, 1)]);
        assert_eq!(red[0].endpoint_distance, 1);
        assert_eq!(red[0].manhattan_distance, 1);
        assert!(red[0].is_mate());
        assert!(lines.iter().all(|l| !l.is_inner));
    }

    #[test]
    fn test_inner_line_loop_distances() {
        let row: Vec<_> = (0..3).map(|x| (x, 0, Piece::RedEastWest)).collect();
        let p = Position::from_placements(&row, false).unwrap();
        let lines = p.enumerate_lines();
        assert_eq!(lines.len(), 4);

        // White verticals at x = 0, 1, 2; only the middle one is flanked
        let middle = &lines[2];
        assert_eq!(middle.color, Color::White);
        assert_eq!(middle.endpoints, [(1, -1), (1, 1)]);
        assert_eq!(middle.endpoint_indices, [4, 12]);
        assert!(middle.is_inner);
        assert_eq!(middle.loop_distances, [2, 2]);
        assert_eq!(middle.endpoint_distance, 8);
        assert_eq!(middle.edge_distances, [9, 7]);

        assert!(!lines[0].is_inner);
        assert!(!lines[3].is_inner);
        assert_eq!(lines[0].loop_distances, [0, 0]);
    }

    #[test]
    fn test_trace_line() {
        let p = play(&["@0/", "B1\\"]);
        assert_eq!(p.trace_line(3, 3, Color::Red), None);

        let red = p.trace_line(1, 0, Color::Red).unwrap();
        assert_eq!(red.endpoints, [(0, 1), (1, 1)]);
        assert_eq!(red.endpoint_indices, [11, 10]);

        let done = play(&["@0/", "B1\\", "A2\\"]);
        assert!(done.enumerate_lines().is_empty());
        let looped = done.trace_line(0, 0, Color::Red).unwrap();
        assert!(looped.is_loop);
        assert_eq!(looped.endpoints, [(0, 0), (0, 0)]);
    }

    #[test]
    fn test_empty_board_has_no_lines() {
        assert!(Position::new().enumerate_lines().is_empty());
    }
}
