//! Position invariants checked along deterministic playouts

use super::hash;
use super::*;
use crate::error::TraxError;

fn play(moves: &[&str]) -> Position {
    let mut p = Position::new();
    for notation in moves {
        let mv = Move::parse(notation, &p).unwrap();
        p = p.do_move(mv).unwrap();
    }
    p
}

/// Positions visited by always picking the `(ply * step + offset)`-th legal
/// move
fn playout(step: usize, offset: usize, max_plies: usize) -> Vec<Position> {
    let mut positions = vec![Position::new()];
    for ply in 0..max_plies {
        let current = positions.last().unwrap();
        let moves = current.generate_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[(ply * step + offset) % moves.len()];
        let next = current.do_move(mv).unwrap();
        positions.push(next);
    }
    positions
}

fn recomputed_hash(p: &Position) -> u64 {
    let placement = hash::placement_hash(p.occupied_cells().map(|(x, y)| (x, y, p.at(x, y))));
    hash::combine(p.red_to_move(), p.max_x(), p.max_y(), placement)
}

#[test]
fn test_incremental_hash_matches_recompute() {
    for (step, offset) in [(7, 0), (3, 1), (11, 5)] {
        for p in playout(step, offset, 40) {
            assert_eq!(p.hash(), recomputed_hash(&p));
        }
    }
}

#[test]
fn test_notation_round_trip_for_generated_moves() {
    for p in playout(5, 2, 25) {
        for mv in p.generate_moves() {
            let parsed = Move::parse(&mv.notation(), &p).unwrap();
            assert_eq!(parsed, mv, "{} on\n{}", mv, p);
        }
    }
}

#[test]
fn test_no_forced_cell_survives_a_move() {
    for p in playout(3, 0, 40) {
        assert!(p.forced_cells().is_empty(), "{p}");
    }
}

#[test]
fn test_generation_is_repeatable() {
    for p in playout(13, 3, 20) {
        assert_eq!(p.generate_moves(), p.generate_moves());
        let children: Vec<Move> = p.children().into_iter().map(|(mv, _)| mv).collect();
        assert_eq!(children, p.generate_moves());
        for mv in p.generate_candidate_moves() {
            assert_eq!(p.is_legal(mv), p.do_move(mv).is_ok());
        }
    }
}

#[test]
fn test_do_move_leaves_receiver_untouched() {
    let p = play(&["@0+", "@1+"]);
    let before = p.hash();
    let tiles = p.tile_count();
    for (_, child) in p.children() {
        assert_ne!(child.hash(), before);
        assert!(child.tile_count() > tiles);
        assert_eq!(child.ply(), p.ply() + 1);
    }
    assert_eq!(p.hash(), before);
    assert_eq!(p.tile_count(), tiles);
}

#[test]
fn test_transposition_shares_hash() {
    let a = play(&["@0+", "@1+", "B0+"]);
    let b = play(&["@0+", "A0+", "@2+"]);
    assert_eq!(a.hash(), b.hash());
    assert_eq!(a.dump(false), b.dump(false));
}

#[test]
fn test_finished_position_rejects_everything() {
    let p = play(&["@0/", "B1\\", "A2\\"]);
    assert!(p.finished());
    assert!(p.generate_candidate_moves().is_empty());
    assert!(p.generate_moves().is_empty());
    assert!(matches!(
        p.do_move(Move::new(-1, 0, Piece::RedEastWest)),
        Err(TraxError::IllegalMove { .. })
    ));
}

#[test]
fn test_isolated_cell_allows_every_tile() {
    let p = Position::new();
    assert_eq!(p.possible_pieces(0, 0).unwrap().len(), 6);
    assert!(!p.is_forced_cell(0, 0));
}

#[test]
fn test_pending_forced_setup_restricts_moves() {
    // Two red edges meet at (1, 1): only RedNorthWest fits there
    let tiles = [
        (0, 0, Piece::RedSouthEast),
        (1, 0, Piece::RedSouthWest),
        (0, 1, Piece::RedNorthEast),
    ];
    let p = Position::from_placements(&tiles, true).unwrap();
    assert_eq!(p.forced_cells(), vec![(1, 1)]);
    assert_eq!(p.generate_moves(), vec![Move::new(1, 1, Piece::RedNorthWest)]);
    assert!(p.do_move(Move::new(-1, 0, Piece::RedEastWest)).is_err());

    let q = p.do_move(Move::new(1, 1, Piece::RedNorthWest)).unwrap();
    assert_eq!(q.winning_reason(), WinningReason::Loop);
}

#[test]
fn test_eight_by_eight_never_grows_past_limit() {
    let mut p = Position::with_rules(crate::config::RuleConfig::eight_by_eight());
    for ply in 0..120 {
        let moves = p.generate_moves();
        if moves.is_empty() {
            break;
        }
        p = p.do_move(moves[(ply * 5) % moves.len()]).unwrap();
        assert!(p.max_x() <= 8 && p.max_y() <= 8);
    }
}
