//! Precomputed lookup tables over local tile configurations
//!
//! Built once on first use and shared read-only afterwards. Generation is a
//! pure function of the edge colors in [`Piece`], so repeated or concurrent
//! initialization always yields identical tables.

use crate::board::{Color, Direction, Piece, PieceSet, NUM_PIECES};
use once_cell::sync::Lazy;

/// Encoded codes of the four neighbors of a cell
pub type NeighborKey = u16;

/// Number of distinct neighbor keys (3 bits per neighbor)
pub const NEIGHBOR_KEY_COUNT: usize = 1 << 12;

/// Pack neighbor codes, east/north/west/south, into a table index
#[inline]
pub fn encode_neighbor_key(neighbors: [Piece; 4]) -> NeighborKey {
    let [east, north, west, south] = neighbors.map(|p| p.code() as NeighborKey);
    east + (north << 3) + (west << 6) + (south << 9)
}

/// Lookup tables
pub struct Tables {
    /// Tiles matching every placed neighbor, indexed by neighbor key
    pub possible_pieces: Box<[PieceSet; NEIGHBOR_KEY_COUNT]>,
    /// True where exactly one tile fits and two incoming edges share a color
    pub forced: Box<[bool; NEIGHBOR_KEY_COUNT]>,
    /// Exit edge and track color indexed by [piece code][entry edge]
    pub track_direction: [[(Direction, Color); 4]; NUM_PIECES],
}

impl Tables {
    /// Generate all tables
    pub fn generate() -> Self {
        let track_direction = generate_track_direction();
        let possible_pieces = generate_possible_pieces();
        let forced = generate_forced(&possible_pieces);
        log::debug!(
            "trax tables built: {} forced neighbor keys",
            forced.iter().filter(|&&f| f).count()
        );
        Self {
            possible_pieces,
            forced,
            track_direction,
        }
    }
}

/// Inverse of [`encode_neighbor_key`]; `None` for keys holding a code past
/// the last piece
fn decode_neighbor_key(key: usize) -> Option<[Piece; 4]> {
    let mut neighbors = [Piece::Empty; 4];
    for (i, slot) in neighbors.iter_mut().enumerate() {
        *slot = Piece::from_code(((key >> (3 * i)) & 7) as u8)?;
    }
    Some(neighbors)
}

fn generate_possible_pieces() -> Box<[PieceSet; NEIGHBOR_KEY_COUNT]> {
    let mut table = Box::new([PieceSet::new(); NEIGHBOR_KEY_COUNT]);

    for key in 0..NEIGHBOR_KEY_COUNT {
        let Some(neighbors) = decode_neighbor_key(key) else {
            continue;
        };
        table[key] = Piece::ALL
            .into_iter()
            .filter(|&candidate| {
                Direction::ALL.into_iter().all(|dir| {
                    let neighbor = neighbors[dir.index()];
                    neighbor.is_empty()
                        || candidate.edge(dir) == neighbor.edge(dir.opposite())
                })
            })
            .collect();
    }

    // An isolated cell constrains nothing
    assert_eq!(table[0], PieceSet::all(), "isolated cell must allow every tile");
    table
}

fn generate_forced(possible: &[PieceSet; NEIGHBOR_KEY_COUNT]) -> Box<[bool; NEIGHBOR_KEY_COUNT]> {
    let mut table = Box::new([false; NEIGHBOR_KEY_COUNT]);

    for key in 0..NEIGHBOR_KEY_COUNT {
        let Some(neighbors) = decode_neighbor_key(key) else {
            continue;
        };
        if possible[key].len() != 1 {
            continue;
        }

        let mut counts = [0u8; 2];
        for dir in Direction::ALL {
            if let Some(color) = neighbors[dir.index()].edge(dir.opposite()) {
                counts[color.index()] += 1;
            }
        }
        table[key] = counts.iter().any(|&c| c >= 2);
    }

    table
}

fn generate_track_direction() -> [[(Direction, Color); 4]; NUM_PIECES] {
    // Row 0 (empty) is never read; straight-through placeholders
    let mut table = [[(Direction::East, Color::White); 4]; NUM_PIECES];
    for dir in Direction::ALL {
        table[0][dir.index()] = (dir.opposite(), Color::White);
    }

    for piece in Piece::ALL {
        for color in Color::ALL {
            let Some([a, b]) = piece.track_edges(color) else {
                panic!("{piece:?} carries fewer than two {color:?} edges");
            };
            assert_eq!(
                Direction::ALL.iter().filter(|&&d| piece.edge(d) == Some(color)).count(),
                2,
                "{piece:?} must carry exactly two {color:?} edges"
            );
            table[piece.code() as usize][a.index()] = (b, color);
            table[piece.code() as usize][b.index()] = (a, color);
        }
    }

    table
}

pub static TABLES: Lazy<Tables> = Lazy::new(Tables::generate);

/// Build the tables now instead of on first use. Safe to call repeatedly.
pub fn init_tables() {
    Lazy::force(&TABLES);
}

/// Tiles that fit the given neighbors
#[inline]
pub fn possible_pieces(key: NeighborKey) -> PieceSet {
    TABLES.possible_pieces[key as usize]
}

/// Whether the given neighbors force a single tile
#[inline]
pub fn is_forced(key: NeighborKey) -> bool {
    TABLES.forced[key as usize]
}

/// Follow a track through `piece`: entering through `entry`, leave through
/// the returned edge. The color is the track's.
#[inline]
pub fn track_exit(piece: Piece, entry: Direction) -> (Direction, Color) {
    debug_assert!(!piece.is_empty());
    TABLES.track_direction[piece.code() as usize][entry.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(e: Piece, n: Piece, w: Piece, s: Piece) -> NeighborKey {
        encode_neighbor_key([e, n, w, s])
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(key(Piece::RedEastWest, Piece::Empty, Piece::Empty, Piece::Empty), 1);
        assert_eq!(key(Piece::Empty, Piece::RedEastWest, Piece::Empty, Piece::Empty), 1 << 3);
        assert_eq!(key(Piece::Empty, Piece::Empty, Piece::Empty, Piece::RedSouthWest), 6 << 9);
    }

    #[test]
    fn test_decode_inverts_encode() {
        let neighbors = [
            Piece::RedNorthWest,
            Piece::Empty,
            Piece::RedSouthWest,
            Piece::RedEastWest,
        ];
        let k = encode_neighbor_key(neighbors) as usize;
        assert_eq!(decode_neighbor_key(k), Some(neighbors));
        assert_eq!(decode_neighbor_key(7), None);
    }

    #[test]
    fn test_isolated_cell_allows_all() {
        init_tables();
        assert_eq!(possible_pieces(0), PieceSet::all());
        assert!(!is_forced(0));
    }

    #[test]
    fn test_single_neighbor_allows_three() {
        // West neighbor shows a red east edge
        let k = key(Piece::Empty, Piece::Empty, Piece::RedSouthEast, Piece::Empty);
        let set = possible_pieces(k);
        assert_eq!(set.len(), 3);
        for piece in set {
            assert_eq!(piece.edge(Direction::West), Some(Color::Red));
        }
        assert!(!is_forced(k));
    }

    #[test]
    fn test_two_red_edges_force() {
        // North shows red south edge, west shows red east edge
        let k = key(Piece::Empty, Piece::RedSouthWest, Piece::RedNorthEast, Piece::Empty);
        assert_eq!(possible_pieces(k).single(), Some(Piece::RedNorthWest));
        assert!(is_forced(k));
    }

    #[test]
    fn test_mixed_edges_not_forced() {
        // North shows white, west shows red: two tiles still fit
        let k = key(Piece::Empty, Piece::RedEastWest, Piece::RedEastWest, Piece::Empty);
        assert_eq!(possible_pieces(k).len(), 2);
        assert!(!is_forced(k));
    }

    #[test]
    fn test_three_same_color_edges_impossible() {
        // East, north and west neighbors all show red
        let k = key(
            Piece::RedEastWest,
            Piece::RedNorthSouth,
            Piece::RedEastWest,
            Piece::Empty,
        );
        assert!(possible_pieces(k).is_empty());
        assert!(!is_forced(k));
    }

    #[test]
    fn test_track_direction_pairs_same_color() {
        for piece in Piece::ALL {
            for dir in Direction::ALL {
                let (exit, color) = track_exit(piece, dir);
                assert_ne!(exit, dir);
                assert_eq!(piece.edge(dir), Some(color));
                assert_eq!(piece.edge(exit), Some(color));
                assert_eq!(track_exit(piece, exit).0, dir);
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = Tables::generate();
        let b = Tables::generate();
        assert_eq!(a.possible_pieces[..], b.possible_pieces[..]);
        assert_eq!(a.forced[..], b.forced[..]);
        assert_eq!(a.track_direction, b.track_direction);
    }
}
