//! Fixed-width set of tile kinds

use super::{Piece, NUM_PIECES};

/// Set of pieces, one bit per piece code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PieceSet {
    bits: u8,
}

impl PieceSet {
    /// Create empty set
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// All six tiles
    pub const fn all() -> Self {
        Self { bits: 0b0111_1110 }
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    #[inline]
    pub fn insert(&mut self, piece: Piece) {
        self.bits |= 1 << piece.code();
    }

    #[inline]
    pub fn remove(&mut self, piece: Piece) {
        self.bits &= !(1 << piece.code());
    }

    #[inline]
    pub fn contains(self, piece: Piece) -> bool {
        (self.bits >> piece.code()) & 1 == 1
    }

    /// Count members (popcount)
    #[inline]
    pub fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// The only member, if there is exactly one
    #[inline]
    pub fn single(self) -> Option<Piece> {
        if self.len() == 1 {
            Piece::from_code(self.bits.trailing_zeros() as u8)
        } else {
            None
        }
    }

    /// Members sharing a notation glyph
    pub fn with_glyph(self, glyph: char) -> PieceSet {
        self.iter().filter(|p| p.glyph() == glyph).collect()
    }

    /// Iterate members in code order
    pub fn iter(self) -> PieceSetIter {
        PieceSetIter { bits: self.bits }
    }
}

impl FromIterator<Piece> for PieceSet {
    fn from_iter<I: IntoIterator<Item = Piece>>(iter: I) -> Self {
        let mut set = PieceSet::new();
        for piece in iter {
            set.insert(piece);
        }
        set
    }
}

impl IntoIterator for PieceSet {
    type Item = Piece;
    type IntoIter = PieceSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over members of a PieceSet
pub struct PieceSetIter {
    bits: u8,
}

impl Iterator for PieceSetIter {
    type Item = Piece;

    fn next(&mut self) -> Option<Self::Item> {
        while self.bits != 0 {
            let code = self.bits.trailing_zeros() as u8;
            // Clear the bit we just found
            self.bits &= self.bits - 1;
            if (code as usize) < NUM_PIECES {
                return Piece::from_code(code);
            }
        }
        None
    }
}
