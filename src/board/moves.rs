//! Moves and Trax notation
//!
//! Notation is a column, a row and a glyph, read against the position the
//! move is played on. Columns use `@` for the column left of the board and
//! bijective base-26 letters (`A`, ..., `Z`, `AA`, ...) otherwise; rows are
//! one-based, so `0` is the row above the board. The glyph (`+`, `/`, `\`)
//! picks one of the two tiles it names; the colors follow from the
//! neighbors.
//!
//! # Example
//!
//! ```
//! use trax::board::{Move, Piece, Position};
//!
//! let position = Position::new();
//! let mv = Move::parse("@0/", &position).unwrap();
//! assert_eq!(mv, Move::new(-1, -1, Piece::RedSouthEast));
//! assert_eq!(mv.notation(), "@0/");
//! ```

use std::fmt;

use super::{Piece, Position};
use crate::error::{TraxError, TraxResult};

const ALPHABET: i32 = 26;

/// A tile placement in coordinates of the position it is played on.
/// `-1` and `max` address the empty ring around the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub x: i32,
    pub y: i32,
    pub piece: Piece,
}

impl Move {
    #[inline]
    pub fn new(x: i32, y: i32, piece: Piece) -> Self {
        Self { x, y, piece }
    }

    /// Parse notation relative to `previous`
    pub fn parse(notation: &str, previous: &Position) -> TraxResult<Move> {
        let (x, y, glyph) = split_notation(notation)?;

        if previous.is_empty_board() {
            if !(-1..=0).contains(&x) || !(-1..=0).contains(&y) {
                return Err(TraxError::parse(notation, "first tile must touch the origin"));
            }
            let piece = match glyph {
                Some('/') => Piece::RedSouthEast,
                Some('+') => Piece::RedEastWest,
                Some(_) => return Err(TraxError::parse(notation, "first tile must be '/' or '+'")),
                None => return Err(TraxError::parse(notation, "ambiguous first tile")),
            };
            return Ok(Move::new(x, y, piece));
        }

        if x < -1 || y < -1 || x > previous.max_x() || y > previous.max_y() {
            return Err(TraxError::parse(notation, "cell is outside the placeable frontier"));
        }
        if !previous.at(x, y).is_empty() {
            return Err(TraxError::parse(notation, "cell is already occupied"));
        }
        if previous.neighbor_key(x, y) == 0 {
            return Err(TraxError::parse(notation, "cell does not touch any tile"));
        }

        let candidates = previous.fitting_pieces(x, y);
        let matching = match glyph {
            Some(g) => candidates.with_glyph(g),
            None => candidates,
        };
        match (matching.single(), matching.len()) {
            (Some(piece), _) => Ok(Move::new(x, y, piece)),
            (None, 0) => Err(TraxError::parse(notation, "no tile fits this cell")),
            (None, _) => Err(TraxError::parse(notation, "ambiguous tile, add a glyph")),
        }
    }

    /// Canonical notation; always carries the glyph
    pub fn notation(&self) -> String {
        let mut out = column_name(self.x);
        out.push_str(&(self.y + 1).to_string());
        out.push(self.piece.glyph());
        out
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

/// Column label: `@` for -1, bijective base-26 otherwise
pub fn column_name(x: i32) -> String {
    if x < 0 {
        return "@".to_string();
    }
    let mut letters = Vec::new();
    let mut num = x + 1;
    while num > 0 {
        num -= 1;
        letters.push((b'A' + (num % ALPHABET) as u8) as char);
        num /= ALPHABET;
    }
    letters.iter().rev().collect()
}

/// Split notation into coordinates and an optional glyph
fn split_notation(notation: &str) -> TraxResult<(i32, i32, Option<char>)> {
    let bytes = notation.as_bytes();
    let mut i = 0;

    let x = if bytes.first() == Some(&b'@') {
        i += 1;
        -1
    } else {
        let mut value: i32 = 0;
        while i < bytes.len() && bytes[i].is_ascii_uppercase() {
            value = value
                .checked_mul(ALPHABET)
                .and_then(|v| v.checked_add((bytes[i] - b'A') as i32 + 1))
                .ok_or_else(|| TraxError::parse(notation, "column is too large"))?;
            i += 1;
        }
        if i == 0 {
            return Err(TraxError::parse(notation, "missing column"));
        }
        value - 1
    };

    let row_start = i;
    let mut row: i32 = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        row = row
            .checked_mul(10)
            .and_then(|v| v.checked_add((bytes[i] - b'0') as i32))
            .ok_or_else(|| TraxError::parse(notation, "row is too large"))?;
        i += 1;
    }
    if i == row_start {
        return Err(TraxError::parse(notation, "missing row"));
    }

    let glyph = match &notation[i..] {
        "" => None,
        "+" => Some('+'),
        "/" => Some('/'),
        "\\" => Some('\\'),
        _ => return Err(TraxError::parse(notation, "expected '+', '/' or '\\' after the row")),
    };

    Ok((x, row - 1, glyph))
}

/// Move with a search score, ordered by score and then by move
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScoredMove {
    pub score: i32,
    pub mv: Move,
}

impl ScoredMove {
    #[inline]
    pub fn new(score: i32, mv: Move) -> Self {
        Self { score, mv }
    }
}

impl From<ScoredMove> for Move {
    fn from(scored: ScoredMove) -> Move {
        scored.mv
    }
}

/// Sort helper used by move ordering: highest score first
pub fn sort_descending(moves: &mut [ScoredMove]) {
    moves.sort_unstable_by(|a, b| b.cmp(a));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        assert_eq!(column_name(-1), "@");
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn test_split_notation() {
        assert_eq!(split_notation("@0/").unwrap(), (-1, -1, Some('/')));
        assert_eq!(split_notation("B12\\").unwrap(), (1, 11, Some('\\')));
        assert_eq!(split_notation("AA3").unwrap(), (26, 2, None));
    }

    #[test]
    fn test_malformed_notation() {
        for bad in ["", "@", "A", "12+", "A1x", "A1++", "a1+", "@0/ "] {
            assert!(
                matches!(split_notation(bad), Err(TraxError::Parse { .. })),
                "{bad:?} should fail"
            );
        }
    }

    #[test]
    fn test_first_move_rules() {
        let empty = Position::new();
        assert_eq!(
            Move::parse("@0+", &empty).unwrap(),
            Move::new(-1, -1, Piece::RedEastWest)
        );
        assert_eq!(
            Move::parse("A1/", &empty).unwrap(),
            Move::new(0, 0, Piece::RedSouthEast)
        );
        assert!(Move::parse("@0\\", &empty).is_err());
        assert!(Move::parse("@0", &empty).is_err());
        assert!(Move::parse("C3+", &empty).is_err());
    }

    #[test]
    fn test_glyph_omitted_only_when_unique() {
        let p = Position::new()
            .do_move(Move::parse("@0/", &Position::new()).unwrap())
            .unwrap();
        // Right of a red east edge three tiles fit
        assert!(matches!(Move::parse("B1", &p), Err(TraxError::Parse { .. })));
        let mv = Move::parse("B1\\", &p).unwrap();
        assert_eq!(mv, Move::new(1, 0, Piece::RedSouthWest));
    }

    #[test]
    fn test_parse_rejects_bad_cells() {
        let p = Position::new()
            .do_move(Move::new(-1, -1, Piece::RedEastWest))
            .unwrap();
        // Occupied
        assert!(Move::parse("A1+", &p).is_err());
        // Diagonal corner touches nothing
        assert!(Move::parse("@0+", &p).is_err());
        // Beyond the ring
        assert!(Move::parse("C1+", &p).is_err());
    }

    #[test]
    fn test_scored_move_order() {
        let a = ScoredMove::new(10, Move::new(0, 0, Piece::RedEastWest));
        let b = ScoredMove::new(50, Move::new(-1, 0, Piece::RedEastWest));
        let c = ScoredMove::new(50, Move::new(1, 0, Piece::RedEastWest));
        assert!(a < b);
        assert!(b < c);

        let mut moves = vec![a, c, b];
        sort_descending(&mut moves);
        assert_eq!(moves, vec![c, b, a]);
        assert_eq!(Move::from(a), a.mv);
    }
}
