//! Board representation for Trax
//!
//! Cells hold one of six tiles. Each tile joins two of its edges with a red
//! track and the other two with a white track. Edges are listed
//! anticlockwise starting from the east edge, and the y axis grows
//! downwards, so north is `y - 1`.

pub mod dump;
pub mod hash;
pub mod moves;
pub mod piece_set;
pub mod position;

#[cfg(test)]
mod tests;

// Re-exports
pub use moves::{Move, ScoredMove};
pub use piece_set::PieceSet;
pub use position::Position;

/// Number of tile kinds including the empty cell
pub const NUM_PIECES: usize = 7;

/// Column offsets indexed by [`Direction`]
pub const DX: [i32; 4] = [1, 0, -1, 0];
/// Row offsets indexed by [`Direction`]
pub const DY: [i32; 4] = [0, -1, 0, 1];

/// Track colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Red,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Red];

    /// Get the other color
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Red,
            Color::Red => Color::White,
        }
    }

    /// Slot in per-color arrays: 0 for white, 1 for red
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Tile edges, anticlockwise from the east
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East = 0,
    North = 1,
    West = 2,
    South = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Direction {
        Self::ALL[index & 3]
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        Self::from_index(self.index() + 2)
    }

    /// Next direction clockwise
    #[inline]
    pub fn clockwise(self) -> Direction {
        Self::from_index(self.index() + 3)
    }

    #[inline]
    pub fn dx(self) -> i32 {
        DX[self.index()]
    }

    #[inline]
    pub fn dy(self) -> i32 {
        DY[self.index()]
    }

    /// Cell reached by stepping once from `(x, y)`
    #[inline]
    pub fn step(self, x: i32, y: i32) -> (i32, i32) {
        (x + self.dx(), y + self.dy())
    }
}

/// Tile kinds
///
/// Each name says which two edges the red track joins. Discriminants are the
/// codes used by neighbor keys, hashing and the 64x64 dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Piece {
    #[default]
    Empty = 0,
    /// Edges R W R W, glyph `+`
    RedEastWest = 1,
    /// Edges W R W R, glyph `+`
    RedNorthSouth = 2,
    /// Edges R W W R, glyph `/`
    RedSouthEast = 3,
    /// Edges R R W W, glyph `\`
    RedNorthEast = 4,
    /// Edges W R R W, glyph `/`
    RedNorthWest = 5,
    /// Edges W W R R, glyph `\`
    RedSouthWest = 6,
}

use Color::{Red as R, White as W};

/// Edge colors per piece code, anticlockwise from the east
const EDGE_COLORS: [[Color; 4]; NUM_PIECES - 1] = [
    [R, W, R, W],
    [W, R, W, R],
    [R, W, W, R],
    [R, R, W, W],
    [W, R, R, W],
    [W, W, R, R],
];

impl Piece {
    /// The six tiles, in code order
    pub const ALL: [Piece; NUM_PIECES - 1] = [
        Piece::RedEastWest,
        Piece::RedNorthSouth,
        Piece::RedSouthEast,
        Piece::RedNorthEast,
        Piece::RedNorthWest,
        Piece::RedSouthWest,
    ];

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn from_code(code: u8) -> Option<Piece> {
        match code {
            0 => Some(Piece::Empty),
            1..=6 => Some(Self::ALL[code as usize - 1]),
            _ => None,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Piece::Empty
    }

    /// Color of the given edge, `None` for the empty cell
    #[inline]
    pub fn edge(self, dir: Direction) -> Option<Color> {
        match self {
            Piece::Empty => None,
            _ => Some(EDGE_COLORS[self as usize - 1][dir.index()]),
        }
    }

    /// Edges carrying the given color's track
    pub fn track_edges(self, color: Color) -> Option<[Direction; 2]> {
        let mut found = Direction::ALL
            .into_iter()
            .filter(|&d| self.edge(d) == Some(color));
        Some([found.next()?, found.next()?])
    }

    /// Notation glyph; `.` for the empty cell
    pub fn glyph(self) -> char {
        match self {
            Piece::Empty => '.',
            Piece::RedEastWest | Piece::RedNorthSouth => '+',
            Piece::RedSouthEast | Piece::RedNorthWest => '/',
            Piece::RedNorthEast | Piece::RedSouthWest => '\\',
        }
    }
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WinningReason {
    #[default]
    Unknown,
    Loop,
    Line,
    /// Bounded board filled up
    Full,
    Resign,
}

impl WinningReason {
    pub fn as_str(self) -> &'static str {
        match self {
            WinningReason::Unknown => "UNKNOWN",
            WinningReason::Loop => "LOOP",
            WinningReason::Line => "LINE",
            WinningReason::Full => "FULL",
            WinningReason::Resign => "RESIGN",
        }
    }
}

/// Game outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winner {
    Red,
    White,
    Draw,
}

impl Winner {
    #[inline]
    pub fn from_color(color: Color) -> Winner {
        match color {
            Color::Red => Winner::Red,
            Color::White => Winner::White,
        }
    }

    /// +1 for red, -1 for white, 0 for a draw
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Winner::Red => 1,
            Winner::White => -1,
            Winner::Draw => 0,
        }
    }

    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            Winner::Red => Some(Color::Red),
            Winner::White => Some(Color::White),
            Winner::Draw => None,
        }
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Winner::Red => "red",
            Winner::White => "white",
            Winner::Draw => "draw",
        };
        f.write_str(name)
    }
}
