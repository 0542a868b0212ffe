//! Rolling position hash
//!
//! Every placed tile contributes `code * X^x * Y^y` (wrapping u64
//! arithmetic). Placing a tile adds one term, and growing the board on the
//! left or top shifts every coordinate by one, which is a single
//! multiplication of the running sum. Coordinates are always relative to
//! the bounding box, so the same shape reached by different move orders
//! hashes identically.
//!
//! # Example
//!
//! ```
//! use trax::board::{hash, Piece};
//!
//! // Tile at (0, 0), then the board grows one column to the left
//! let h = hash::placement_term(Piece::RedEastWest, 0, 0);
//! let shifted = hash::shift(h, true, false);
//! assert_eq!(shifted, hash::placement_term(Piece::RedEastWest, 1, 0));
//! ```

use super::Piece;

/// Position hash value
pub type PositionHash = u64;

/// Prime used to fold side-to-move and extents into the hash
pub const POSITION_HASH_PRIME: u64 = 100_000_007;

/// Per-column factor (2^64 - 59)
const X_FACTOR: u64 = 18_446_744_073_709_551_557;
/// Per-row factor (10^18 + 3)
const Y_FACTOR: u64 = 1_000_000_000_000_000_003;

/// Contribution of one placed tile
#[inline]
#[must_use]
pub fn placement_term(piece: Piece, x: i32, y: i32) -> PositionHash {
    debug_assert!(x >= 0 && y >= 0);
    (piece.code() as u64)
        .wrapping_mul(X_FACTOR.wrapping_pow(x as u32))
        .wrapping_mul(Y_FACTOR.wrapping_pow(y as u32))
}

/// Re-base the running sum after the board grew on the left and/or top
#[inline]
#[must_use]
pub fn shift(placement: PositionHash, left: bool, top: bool) -> PositionHash {
    let mut h = placement;
    if left {
        h = h.wrapping_mul(X_FACTOR);
    }
    if top {
        h = h.wrapping_mul(Y_FACTOR);
    }
    h
}

/// Fold side to move and extents into the placement sum
#[inline]
#[must_use]
pub fn combine(red_to_move: bool, max_x: i32, max_y: i32, placement: PositionHash) -> PositionHash {
    let mut h = red_to_move as u64;
    h = h.wrapping_mul(POSITION_HASH_PRIME).wrapping_add(max_x as u64);
    h = h.wrapping_mul(POSITION_HASH_PRIME).wrapping_add(max_y as u64);
    h.wrapping_mul(POSITION_HASH_PRIME).wrapping_add(placement)
}

/// Full recomputation over `(x, y, piece)` triples
#[must_use]
pub fn placement_hash<I>(tiles: I) -> PositionHash
where
    I: IntoIterator<Item = (i32, i32, Piece)>,
{
    tiles
        .into_iter()
        .filter(|(_, _, p)| !p.is_empty())
        .fold(0u64, |h, (x, y, p)| h.wrapping_add(placement_term(p, x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_term_is_zero() {
        assert_eq!(placement_term(Piece::Empty, 3, 4), 0);
    }

    #[test]
    fn test_shift_matches_recompute() {
        let tiles = [
            (0, 0, Piece::RedEastWest),
            (1, 0, Piece::RedSouthWest),
            (0, 1, Piece::RedNorthEast),
        ];
        let before = placement_hash(tiles);
        let moved = tiles.map(|(x, y, p)| (x + 1, y + 1, p));
        assert_eq!(shift(before, true, true), placement_hash(moved));
    }

    #[test]
    fn test_terms_depend_on_cell() {
        let a = placement_term(Piece::RedNorthSouth, 1, 2);
        let b = placement_term(Piece::RedNorthSouth, 2, 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_combine_separates_side_to_move() {
        assert_ne!(combine(true, 2, 2, 99), combine(false, 2, 2, 99));
        assert_ne!(combine(true, 2, 3, 99), combine(true, 3, 2, 99));
    }
}
