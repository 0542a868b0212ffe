//! Board position
//!
//! A position owns the tiles inside its bounding box `[0, max_x) x
//! [0, max_y)`, the side to move, the terminal status and the rolling hash.
//! Positions are values: [`Position::do_move`] returns a new position and
//! never touches the receiver, so a search tree can share any prefix.

use std::collections::VecDeque;

use super::hash::{self, PositionHash};
use super::{Color, Direction, Move, Piece, PieceSet, Winner, WinningReason};
use crate::config::RuleConfig;
use crate::error::{TraxError, TraxResult};
use crate::rules::tables::{self, NeighborKey};

/// Trax position
#[derive(Debug, Clone)]
pub struct Position {
    /// Row-major tiles, `max_x * max_y` cells
    pub(crate) cells: Vec<Piece>,
    pub(crate) max_x: i32,
    pub(crate) max_y: i32,
    pub(crate) red_to_move: bool,
    pub(crate) ply: u32,
    pub(crate) red_winner: bool,
    pub(crate) white_winner: bool,
    pub(crate) red_reason: WinningReason,
    pub(crate) white_reason: WinningReason,
    /// Sum of per-tile hash terms
    pub(crate) placement_hash: PositionHash,
    /// Some empty cell is forced and must be filled by the next move.
    /// Only hand-built positions can start in this state.
    pub(crate) pending_forced: bool,
    pub(crate) rules: RuleConfig,
}

impl Position {
    /// Empty standard board; white places first
    pub fn new() -> Self {
        Self::with_rules(RuleConfig::standard())
    }

    pub fn with_rules(rules: RuleConfig) -> Self {
        tables::init_tables();
        Self {
            cells: Vec::new(),
            max_x: 0,
            max_y: 0,
            red_to_move: false,
            ply: 0,
            red_winner: false,
            white_winner: false,
            red_reason: WinningReason::Unknown,
            white_reason: WinningReason::Unknown,
            placement_hash: 0,
            pending_forced: false,
            rules,
        }
    }

    /// Build a position from explicit tiles under standard rules
    pub fn from_placements(tiles: &[(i32, i32, Piece)], red_to_move: bool) -> TraxResult<Self> {
        Self::from_placements_with_rules(RuleConfig::standard(), tiles, red_to_move)
    }

    /// Build a position from explicit tiles.
    ///
    /// Coordinates are translated so the bounding box starts at the origin.
    /// Tiles must be connected and agree on every shared edge. The ply
    /// counter is set to the number of tiles, and winners are detected from
    /// every tile.
    pub fn from_placements_with_rules(
        rules: RuleConfig,
        tiles: &[(i32, i32, Piece)],
        red_to_move: bool,
    ) -> TraxResult<Self> {
        let mut position = Self::with_rules(rules);
        position.red_to_move = red_to_move;
        if tiles.is_empty() {
            return Ok(position);
        }

        if tiles.iter().any(|t| t.2.is_empty()) {
            return Err(TraxError::InvalidSetup("empty piece in placement list".into()));
        }
        let min_x = tiles.iter().map(|t| t.0).min().unwrap_or(0);
        let min_y = tiles.iter().map(|t| t.1).min().unwrap_or(0);
        let span_x = i64::from(tiles.iter().map(|t| t.0).max().unwrap_or(0)) - i64::from(min_x) + 1;
        let span_y = i64::from(tiles.iter().map(|t| t.1).max().unwrap_or(0)) - i64::from(min_y) + 1;
        // A connected group of n tiles spans at most n cells per axis
        let count = tiles.len() as i64;
        if span_x > count || span_y > count {
            return Err(TraxError::InvalidSetup("tiles are not connected".into()));
        }
        let (max_x, max_y) = (span_x as i32, span_y as i32);
        if let Some(limit) = rules.board_limit {
            if max_x > limit || max_y > limit {
                return Err(TraxError::InvalidSetup(format!(
                    "{max_x}x{max_y} board exceeds the {limit}x{limit} limit"
                )));
            }
        }

        position.max_x = max_x;
        position.max_y = max_y;
        position.cells = vec![Piece::Empty; (max_x * max_y) as usize];
        for &(x, y, piece) in tiles {
            let (x, y) = (x - min_x, y - min_y);
            if !position.at(x, y).is_empty() {
                return Err(TraxError::InvalidSetup(format!(
                    "two tiles at ({}, {})",
                    x + min_x,
                    y + min_y
                )));
            }
            position.set(x, y, piece);
        }
        position.ply = tiles.len() as u32;

        position.validate_setup()?;
        position.pending_forced = !position.forced_cells().is_empty();

        let occupied: Vec<(i32, i32)> = position.occupied_cells().collect();
        position.update_winners(&occupied);
        position.resolve_outcome();
        Ok(position)
    }

    fn validate_setup(&self) -> TraxResult<()> {
        for (x, y) in self.occupied_cells() {
            let piece = self.at(x, y);
            for dir in Direction::ALL {
                let (nx, ny) = dir.step(x, y);
                let neighbor = self.at(nx, ny);
                if !neighbor.is_empty() && piece.edge(dir) != neighbor.edge(dir.opposite()) {
                    return Err(TraxError::InvalidSetup(format!(
                        "edge mismatch between ({x}, {y}) and ({nx}, {ny})"
                    )));
                }
            }
        }

        for y in 0..self.max_y {
            for x in 0..self.max_x {
                if self.at(x, y).is_empty()
                    && self.neighbor_key(x, y) != 0
                    && self.fitting_pieces(x, y).is_empty()
                {
                    return Err(TraxError::InvalidSetup(format!(
                        "no tile can ever fill ({x}, {y})"
                    )));
                }
            }
        }

        // Tiles must form one connected group
        let Some(start) = self.occupied_cells().next() else {
            return Ok(());
        };
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([start]);
        seen[self.index(start.0, start.1)] = true;
        let mut reached = 1;
        while let Some((x, y)) = queue.pop_front() {
            for dir in Direction::ALL {
                let (nx, ny) = dir.step(x, y);
                if self.at(nx, ny).is_empty() || seen[self.index(nx, ny)] {
                    continue;
                }
                seen[self.index(nx, ny)] = true;
                reached += 1;
                queue.push_back((nx, ny));
            }
        }
        if reached != self.tile_count() {
            return Err(TraxError::InvalidSetup("tiles are not connected".into()));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors

    #[inline]
    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    #[inline]
    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    /// True when red places the next tile. White moves first.
    #[inline]
    pub fn red_to_move(&self) -> bool {
        self.red_to_move
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        if self.red_to_move {
            Color::Red
        } else {
            Color::White
        }
    }

    /// Number of moves played; forced tiles do not count
    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[inline]
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    #[inline]
    pub fn is_empty_board(&self) -> bool {
        self.max_x == 0 && self.max_y == 0
    }

    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|p| !p.is_empty()).count()
    }

    #[inline]
    pub(crate) fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.max_x && y < self.max_y
    }

    /// Inside the bounding box or the ring of cells around it
    #[inline]
    pub(crate) fn in_ring(&self, x: i32, y: i32) -> bool {
        x >= -1 && y >= -1 && x <= self.max_x && y <= self.max_y
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.in_bounds(x, y));
        (y * self.max_x + x) as usize
    }

    /// Tile at a cell; empty anywhere outside the bounding box
    #[inline]
    pub fn at(&self, x: i32, y: i32) -> Piece {
        if self.in_bounds(x, y) {
            self.cells[self.index(x, y)]
        } else {
            Piece::Empty
        }
    }

    /// Place a tile inside the bounding box and add its hash term
    #[inline]
    pub(crate) fn set(&mut self, x: i32, y: i32, piece: Piece) {
        let idx = self.index(x, y);
        debug_assert!(self.cells[idx].is_empty());
        self.cells[idx] = piece;
        self.placement_hash = self
            .placement_hash
            .wrapping_add(hash::placement_term(piece, x, y));
    }

    /// Coordinates of every placed tile, row by row
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.max_y)
            .flat_map(move |y| (0..self.max_x).map(move |x| (x, y)))
            .filter(move |&(x, y)| !self.at(x, y).is_empty())
    }

    /// Encoded neighbors of a cell
    #[inline]
    pub fn neighbor_key(&self, x: i32, y: i32) -> NeighborKey {
        tables::encode_neighbor_key(Direction::ALL.map(|d| {
            let (nx, ny) = d.step(x, y);
            self.at(nx, ny)
        }))
    }

    #[inline]
    pub(crate) fn fitting_pieces(&self, x: i32, y: i32) -> PieceSet {
        tables::possible_pieces(self.neighbor_key(x, y))
    }

    /// Tiles whose edges agree with every placed neighbor of `(x, y)`.
    ///
    /// An occupied cell yields the empty set and a cell with no neighbors
    /// yields all six tiles. Forced play is not considered.
    pub fn possible_pieces(&self, x: i32, y: i32) -> TraxResult<PieceSet> {
        if !self.in_ring(x, y) {
            return Err(TraxError::OutOfRange { x, y });
        }
        if !self.at(x, y).is_empty() {
            return Ok(PieceSet::new());
        }
        Ok(self.fitting_pieces(x, y))
    }

    /// Empty cell whose neighbors admit exactly one tile
    #[inline]
    pub fn is_forced_cell(&self, x: i32, y: i32) -> bool {
        self.at(x, y).is_empty() && tables::is_forced(self.neighbor_key(x, y))
    }

    /// Every forced cell on the board or its ring
    pub fn forced_cells(&self) -> Vec<(i32, i32)> {
        let mut cells = Vec::new();
        for y in -1..=self.max_y {
            for x in -1..=self.max_x {
                if self.is_forced_cell(x, y) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    /// True when a move at `(x, y)` would grow an axis past the board limit
    #[inline]
    fn exceeds_limit(&self, x: i32, y: i32) -> bool {
        ((x == -1 || x == self.max_x) && self.rules.blocks_extension(self.max_x))
            || ((y == -1 || y == self.max_y) && self.rules.blocks_extension(self.max_y))
    }

    // ------------------------------------------------------------------
    // Move generation

    /// One move per (frontier cell, fitting tile).
    ///
    /// Fast: forced chains are not played out, so a few of these may still
    /// be rejected by [`Position::do_move`]. When forced cells are pending,
    /// only they are offered.
    pub fn generate_candidate_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(32);

        if self.finished() {
            return moves;
        }

        if self.is_empty_board() {
            moves.push(Move::new(-1, -1, Piece::RedSouthEast));
            moves.push(Move::new(-1, -1, Piece::RedEastWest));
            return moves;
        }

        for y in -1..=self.max_y {
            for x in -1..=self.max_x {
                if !self.at(x, y).is_empty() || self.exceeds_limit(x, y) {
                    continue;
                }
                let key = self.neighbor_key(x, y);
                if key == 0 || (self.pending_forced && !tables::is_forced(key)) {
                    continue;
                }
                for piece in tables::possible_pieces(key) {
                    moves.push(Move::new(x, y, piece));
                }
            }
        }

        moves
    }

    /// Legal moves: candidates whose forced chains play out cleanly
    pub fn generate_moves(&self) -> Vec<Move> {
        self.generate_candidate_moves()
            .into_iter()
            .filter(|&mv| self.do_move(mv).is_ok())
            .collect()
    }

    /// Legal moves paired with the positions they lead to
    pub fn children(&self) -> Vec<(Move, Position)> {
        self.generate_candidate_moves()
            .into_iter()
            .filter_map(|mv| self.do_move(mv).ok().map(|next| (mv, next)))
            .collect()
    }

    #[inline]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.do_move(mv).is_ok()
    }

    // ------------------------------------------------------------------
    // Move application

    /// Play a move and every forced tile it triggers.
    ///
    /// Legality is checked directly on the target cell rather than by
    /// scanning the generated move list. The receiver is left untouched.
    pub fn do_move(&self, mv: Move) -> TraxResult<Position> {
        if self.finished() {
            return Err(TraxError::illegal(mv, "the game is already finished"));
        }
        if mv.piece.is_empty() {
            return Err(TraxError::illegal(mv, "no tile given"));
        }
        if self.is_empty_board() {
            return self.first_move(mv);
        }
        if !self.in_ring(mv.x, mv.y) {
            return Err(TraxError::OutOfRange { x: mv.x, y: mv.y });
        }
        if self.exceeds_limit(mv.x, mv.y) {
            return Err(TraxError::illegal(mv, "the board limit is reached"));
        }
        if !self.at(mv.x, mv.y).is_empty() {
            return Err(TraxError::illegal(mv, "cell is occupied"));
        }
        let key = self.neighbor_key(mv.x, mv.y);
        if key == 0 {
            return Err(TraxError::illegal(mv, "cell does not touch any tile"));
        }
        if !tables::possible_pieces(key).contains(mv.piece) {
            return Err(TraxError::illegal(mv, "tile edges do not match its neighbors"));
        }
        if self.pending_forced && !tables::is_forced(key) {
            return Err(TraxError::illegal(mv, "a forced cell must be filled first"));
        }

        let (mut next, x, y) = self.grown_for(mv.x, mv.y);
        next.red_to_move = !self.red_to_move;
        next.ply += 1;
        next.set(x, y, mv.piece);

        let checkpoints = next.fill_forced(x, y).map_err(|conflict| {
            TraxError::illegal(
                mv,
                format!("forced play leaves no tile for ({}, {})", conflict.x, conflict.y),
            )
        })?;
        next.update_winners(&checkpoints);
        next.resolve_outcome();
        if self.pending_forced {
            next.pending_forced = !next.forced_cells().is_empty();
        }
        Ok(next)
    }

    fn first_move(&self, mv: Move) -> TraxResult<Position> {
        if !(-1..=0).contains(&mv.x) || !(-1..=0).contains(&mv.y) {
            return Err(TraxError::illegal(mv, "first tile must touch the origin"));
        }
        if !matches!(mv.piece, Piece::RedSouthEast | Piece::RedEastWest) {
            return Err(TraxError::illegal(mv, "first tile must be '/' or '+'"));
        }
        let mut next = self.clone();
        next.cells = vec![Piece::Empty];
        next.max_x = 1;
        next.max_y = 1;
        next.red_to_move = !self.red_to_move;
        next.ply += 1;
        next.set(0, 0, mv.piece);
        Ok(next)
    }

    /// Copy of the position grown to contain `(x, y)`, plus the cell's
    /// coordinates after growth
    fn grown_for(&self, x: i32, y: i32) -> (Position, i32, i32) {
        let left = x < 0;
        let top = y < 0;
        let width = self.max_x + (left || x >= self.max_x) as i32;
        let height = self.max_y + (top || y >= self.max_y) as i32;
        let (ox, oy) = (left as i32, top as i32);

        if width == self.max_x && height == self.max_y {
            return (self.clone(), x, y);
        }

        let mut cells = vec![Piece::Empty; (width * height) as usize];
        for row in 0..self.max_y {
            let src = (row * self.max_x) as usize;
            let dst = ((row + oy) * width + ox) as usize;
            cells[dst..dst + self.max_x as usize]
                .copy_from_slice(&self.cells[src..src + self.max_x as usize]);
        }

        let next = Position {
            cells,
            max_x: width,
            max_y: height,
            red_to_move: self.red_to_move,
            ply: self.ply,
            red_winner: self.red_winner,
            white_winner: self.white_winner,
            red_reason: self.red_reason,
            white_reason: self.white_reason,
            placement_hash: hash::shift(self.placement_hash, left, top),
            pending_forced: self.pending_forced,
            rules: self.rules,
        };
        (next, x + ox, y + oy)
    }

    /// The side to move resigns
    #[must_use]
    pub fn resign(&self) -> Position {
        let mut next = self.clone();
        if next.finished() {
            return next;
        }
        match self.side_to_move() {
            Color::Red => {
                next.white_winner = true;
                next.white_reason = WinningReason::Resign;
            }
            Color::White => {
                next.red_winner = true;
                next.red_reason = WinningReason::Resign;
            }
        }
        next
    }

    // ------------------------------------------------------------------
    // Status

    /// Rolling hash of tiles, extents and side to move
    #[inline]
    pub fn hash(&self) -> PositionHash {
        hash::combine(self.red_to_move, self.max_x, self.max_y, self.placement_hash)
    }

    #[inline]
    pub fn finished(&self) -> bool {
        self.red_winner || self.white_winner
    }

    /// `None` until the game is over
    pub fn winner(&self) -> Option<Winner> {
        match (self.red_winner, self.white_winner) {
            (true, true) => Some(Winner::Draw),
            (true, false) => Some(Winner::Red),
            (false, true) => Some(Winner::White),
            (false, false) => None,
        }
    }

    pub fn winning_reason(&self) -> WinningReason {
        match self.winner() {
            None => WinningReason::Unknown,
            Some(Winner::White) => self.white_reason,
            Some(_) => self.red_reason,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_position() {
        let p = Position::new();
        assert!(p.is_empty_board());
        assert!(!p.red_to_move());
        assert!(!p.finished());
        assert_eq!(p.winner(), None);
        assert_eq!(p.winning_reason(), WinningReason::Unknown);
        assert_eq!(p.at(0, 0), Piece::Empty);
        assert_eq!(p.at(-5, 100), Piece::Empty);
    }

    #[test]
    fn test_first_move_options() {
        let p = Position::new();
        let moves = p.generate_moves();
        assert_eq!(
            moves,
            vec![
                Move::new(-1, -1, Piece::RedSouthEast),
                Move::new(-1, -1, Piece::RedEastWest)
            ]
        );
        assert!(p.do_move(Move::new(0, 0, Piece::RedNorthEast)).is_err());
        assert!(p.do_move(Move::new(1, 0, Piece::RedEastWest)).is_err());
    }

    #[test]
    fn test_do_move_grows_left_and_top() {
        let p = Position::new()
            .do_move(Move::new(0, 0, Piece::RedEastWest))
            .unwrap();
        let q = p.do_move(Move::new(-1, 0, Piece::RedEastWest)).unwrap();
        assert_eq!((q.max_x(), q.max_y()), (2, 1));
        assert_eq!(q.at(0, 0), Piece::RedEastWest);
        assert_eq!(q.at(1, 0), Piece::RedEastWest);
        assert_ne!(q.red_to_move(), p.red_to_move());
        assert_eq!(q.ply(), 2);
        // Receiver untouched
        assert_eq!((p.max_x(), p.max_y()), (1, 1));
    }

    #[test]
    fn test_do_move_rejections() {
        let p = Position::new()
            .do_move(Move::new(0, 0, Piece::RedEastWest))
            .unwrap();
        assert!(matches!(
            p.do_move(Move::new(3, 0, Piece::RedEastWest)),
            Err(TraxError::OutOfRange { x: 3, y: 0 })
        ));
        assert!(matches!(
            p.do_move(Move::new(0, 0, Piece::RedEastWest)),
            Err(TraxError::IllegalMove { .. })
        ));
        // Diagonal cell touches nothing
        assert!(p.do_move(Move::new(1, 1, Piece::RedEastWest)).is_err());
        // East neighbor of a red east edge must show red on its west edge
        assert!(p.do_move(Move::new(1, 0, Piece::RedNorthSouth)).is_err());
        assert!(p.do_move(Move::new(1, 0, Piece::Empty)).is_err());
    }

    #[test]
    fn test_possible_pieces_queries() {
        let p = Position::new();
        assert_eq!(p.possible_pieces(0, 0).unwrap(), PieceSet::all());
        assert!(matches!(
            p.possible_pieces(4, 4),
            Err(TraxError::OutOfRange { .. })
        ));

        let q = p.do_move(Move::new(0, 0, Piece::RedSouthEast)).unwrap();
        assert!(q.possible_pieces(0, 0).unwrap().is_empty());
        assert_eq!(q.possible_pieces(1, 0).unwrap().len(), 3);
    }

    #[test]
    fn test_resign() {
        let p = Position::new()
            .do_move(Move::new(0, 0, Piece::RedEastWest))
            .unwrap();
        // Red to move and resigns
        let r = p.resign();
        assert_eq!(r.winner(), Some(Winner::White));
        assert_eq!(r.winning_reason(), WinningReason::Resign);
        assert!(r.generate_moves().is_empty());
    }

    #[test]
    fn test_from_placements_rejects_bad_setups() {
        // Red east edge against white west edge
        let mismatch = [(0, 0, Piece::RedEastWest), (1, 0, Piece::RedNorthSouth)];
        assert!(matches!(
            Position::from_placements(&mismatch, false),
            Err(TraxError::InvalidSetup(_))
        ));

        let apart = [(0, 0, Piece::RedEastWest), (2, 0, Piece::RedEastWest)];
        assert!(Position::from_placements(&apart, false).is_err());

        let twice = [(0, 0, Piece::RedEastWest), (0, 0, Piece::RedEastWest)];
        assert!(Position::from_placements(&twice, false).is_err());
    }

    #[test]
    fn test_from_placements_rejects_distant_tiles() {
        let far = [(0, 0, Piece::RedEastWest), (70_000, 70_000, Piece::RedEastWest)];
        assert_eq!(
            Position::from_placements(&far, false).unwrap_err(),
            TraxError::InvalidSetup("tiles are not connected".into())
        );

        let extreme = [(i32::MIN, 0, Piece::RedEastWest), (i32::MAX, 0, Piece::RedEastWest)];
        assert!(matches!(
            Position::from_placements(&extreme, false),
            Err(TraxError::InvalidSetup(_))
        ));
    }

    #[test]
    fn test_from_placements_normalizes() {
        let p = Position::from_placements(
            &[(5, -3, Piece::RedEastWest), (6, -3, Piece::RedEastWest)],
            true,
        )
        .unwrap();
        assert_eq!((p.max_x(), p.max_y()), (2, 1));
        assert_eq!(p.at(0, 0), Piece::RedEastWest);
        assert!(p.red_to_move());
    }
}
