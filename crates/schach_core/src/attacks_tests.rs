use super::*;
use crate::types::{coord_to_sq, sq};

#[test]
fn test_knight_attacks() {
    // Knight in the center reaches all 8 squares
    let center = sq(4, 4).unwrap();
    assert_eq!(knight_attacks(center).popcount(), 8);

    // Corner knight reaches 2 squares
    let corner = coord_to_sq("a1").unwrap();
    let attacks = knight_attacks(corner);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(coord_to_sq("b3").unwrap()));
    assert!(attacks.contains(coord_to_sq("c2").unwrap()));
}

#[test]
fn test_king_attacks() {
    assert_eq!(king_attacks(sq(4, 4).unwrap()).popcount(), 8);
    assert_eq!(king_attacks(0).popcount(), 3);
    assert_eq!(king_attacks(sq(0, 4).unwrap()).popcount(), 5);
}

#[test]
fn test_pawn_attacks() {
    // White pawn on e2 attacks d3 and f3
    let attacks = pawn_attacks(coord_to_sq("e2").unwrap(), Color::White);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(coord_to_sq("d3").unwrap()));
    assert!(attacks.contains(coord_to_sq("f3").unwrap()));

    // Black pawn on a8 attacks only b7
    let attacks = pawn_attacks(coord_to_sq("a8").unwrap(), Color::Black);
    assert_eq!(attacks.popcount(), 1);
    assert!(attacks.contains(coord_to_sq("b7").unwrap()));
}

#[test]
fn test_rook_attacks_stop_at_blocker() {
    let rook = sq(4, 4).unwrap();
    let blocker = sq(4, 6).unwrap();
    let attacks = rook_attacks(rook, Bitboard::from_square(blocker));
    assert!(attacks.contains(sq(4, 5).unwrap()));
    assert!(attacks.contains(blocker));
    assert!(!attacks.contains(sq(4, 7).unwrap()));
    // 4 north + 4 south + 4 west + 2 east
    assert_eq!(attacks.popcount(), 14);
}

#[test]
fn test_bishop_attacks_both_ray_orders() {
    let bishop = sq(4, 4).unwrap();
    let occupied = Bitboard::from_square(sq(2, 2).unwrap()) | Bitboard::from_square(sq(6, 6).unwrap());
    let attacks = bishop_attacks(bishop, occupied);
    assert!(attacks.contains(sq(2, 2).unwrap()));
    assert!(!attacks.contains(sq(1, 1).unwrap()));
    assert!(attacks.contains(sq(6, 6).unwrap()));
    assert!(!attacks.contains(sq(7, 7).unwrap()));
    assert!(attacks.contains(sq(0, 8).unwrap()));
    assert!(attacks.contains(sq(8, 0).unwrap()));
}

#[test]
fn test_compound_piece_attacks() {
    let center = sq(4, 4).unwrap();
    let empty = Bitboard::EMPTY;
    let angel = piece_attacks(PieceKind::Angel, Color::White, center, empty);
    assert_eq!(angel, queen_attacks(center, empty) | knight_attacks(center));
    let archbishop = piece_attacks(PieceKind::Archbishop, Color::Black, center, empty);
    assert_eq!(archbishop.popcount(), 16 + 8);
    let chancellor = piece_attacks(PieceKind::Chancellor, Color::Black, center, empty);
    assert_eq!(chancellor.popcount(), 16 + 8);
}

#[test]
fn test_pawn_front_span() {
    let e2 = coord_to_sq("e2").unwrap();
    let span = pawn_front_span(e2, Color::White);
    // ranks 3..9 on files d, e, f
    assert_eq!(span.popcount(), 7 * 3);
    assert!(span.contains(coord_to_sq("d9").unwrap()));
    assert!(!span.contains(coord_to_sq("e1").unwrap()));

    let a8 = coord_to_sq("a8").unwrap();
    assert_eq!(pawn_front_span(a8, Color::Black).popcount(), 7 * 2);
}
