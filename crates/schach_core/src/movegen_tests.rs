use super::*;

fn put(b: &mut Board, coord: &str, color: Color, kind: PieceKind) {
    b.set_piece(coord_to_sq(coord).unwrap(), Some(Piece::new(color, kind)));
}

fn has_move(moves: &[Move], from: &str, to: &str) -> bool {
    let from = coord_to_sq(from).unwrap();
    let to = coord_to_sq(to).unwrap();
    moves.iter().any(|m| m.from == from && m.to == to)
}

#[test]
fn test_startpos_moves() {
    let b = Board::startpos();
    // 9 pawns × 2 + 2 knights × 2 + archbishop 2 + chancellor 2
    assert_eq!(legal_moves(&b, Color::White).len(), 26);
    assert_eq!(legal_moves(&b, Color::Black).len(), 26);
}

#[test]
fn test_stalemate_has_no_moves() {
    let mut b = Board::empty();
    put(&mut b, "a9", Color::Black, PieceKind::King);
    put(&mut b, "b7", Color::White, PieceKind::Queen);
    put(&mut b, "c8", Color::White, PieceKind::King);
    assert!(legal_moves(&b, Color::Black).is_empty());
    assert!(!b.in_check(Color::Black));
}

#[test]
fn test_angel_leap_turns_stalemate_into_mate() {
    let mut b = Board::empty();
    put(&mut b, "a9", Color::Black, PieceKind::King);
    put(&mut b, "b7", Color::White, PieceKind::Angel);
    put(&mut b, "c8", Color::White, PieceKind::King);
    assert!(legal_moves(&b, Color::Black).is_empty());
    assert!(b.in_check(Color::Black));
}

#[test]
fn test_castling_both_sides() {
    let mut b = Board::empty();
    put(&mut b, "e1", Color::White, PieceKind::King);
    put(&mut b, "a1", Color::White, PieceKind::Rook);
    put(&mut b, "i1", Color::White, PieceKind::Rook);
    put(&mut b, "e9", Color::Black, PieceKind::King);

    let moves = legal_moves(&b, Color::White);
    let castles: Vec<_> = moves.iter().filter(|m| m.is_castle).collect();
    assert_eq!(castles.len(), 2);
    assert!(has_move(&moves, "e1", "g1"));
    assert!(has_move(&moves, "e1", "c1"));
}

#[test]
fn test_no_castling_through_attacked_square() {
    let mut b = Board::empty();
    put(&mut b, "e1", Color::White, PieceKind::King);
    put(&mut b, "i1", Color::White, PieceKind::Rook);
    put(&mut b, "e9", Color::Black, PieceKind::King);
    put(&mut b, "f9", Color::Black, PieceKind::Rook);

    let moves = legal_moves(&b, Color::White);
    assert!(!moves.iter().any(|m| m.is_castle));
}

#[test]
fn test_no_castling_after_rook_moved() {
    let mut b = Board::empty();
    put(&mut b, "e1", Color::White, PieceKind::King);
    b.set_piece(
        coord_to_sq("i1").unwrap(),
        Some(Piece::new(Color::White, PieceKind::Rook).moved()),
    );
    put(&mut b, "e9", Color::Black, PieceKind::King);
    assert!(!legal_moves(&b, Color::White).iter().any(|m| m.is_castle));
}

#[test]
fn test_promotion_generates_angel_only() {
    let mut b = Board::empty();
    put(&mut b, "a1", Color::White, PieceKind::King);
    put(&mut b, "i5", Color::Black, PieceKind::King);
    b.set_piece(
        coord_to_sq("e8").unwrap(),
        Some(Piece::new(Color::White, PieceKind::Pawn).moved()),
    );

    let moves = legal_moves(&b, Color::White);
    let promos: Vec<_> = moves.iter().filter(|m| m.promo.is_some()).collect();
    assert_eq!(promos.len(), 1);
    assert_eq!(promos[0].promo, Some(PieceKind::Angel));
}

#[test]
fn test_double_step_needs_unmoved_pawn_and_clear_path() {
    let mut b = Board::startpos();
    assert!(has_move(&legal_moves(&b, Color::White), "e2", "e4"));
    // Block e3
    put(&mut b, "e3", Color::Black, PieceKind::Knight);
    let moves = legal_moves(&b, Color::White);
    assert!(!has_move(&moves, "e2", "e4"));
    assert!(!has_move(&moves, "e2", "e3"));
    // but the pawns beside it can capture
    assert!(has_move(&moves, "d2", "e3"));
    assert!(has_move(&moves, "f2", "e3"));
}

#[test]
fn test_capture_moves_are_tactical() {
    let mut b = Board::startpos();
    put(&mut b, "e3", Color::Black, PieceKind::Knight);
    let mut out = Vec::new();
    capture_moves_into(&mut b, Color::White, &mut out);
    assert!(!out.is_empty());
    assert!(out.iter().all(|m| m.is_tactical()));
    assert!(out.iter().all(|m| m.captured.map(|p| p.kind) == Some(PieceKind::Knight)));
}

#[test]
fn test_pinned_piece_cannot_move() {
    let mut b = Board::empty();
    put(&mut b, "e1", Color::White, PieceKind::King);
    put(&mut b, "e3", Color::White, PieceKind::Knight);
    put(&mut b, "e9", Color::Black, PieceKind::Chancellor);
    put(&mut b, "a9", Color::Black, PieceKind::King);
    let moves = legal_moves(&b, Color::White);
    assert!(moves.iter().all(|m| m.from != coord_to_sq("e3").unwrap()));
}
