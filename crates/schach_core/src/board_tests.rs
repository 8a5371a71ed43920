use super::*;

fn piece(color: Color, kind: PieceKind) -> Option<Piece> {
    Some(Piece::new(color, kind))
}

#[test]
fn test_startpos_layout() {
    let b = Board::startpos();
    assert_eq!(b.occupied().popcount(), 36);
    assert_eq!(b.king_sq(Color::White), coord_to_sq("e1"));
    assert_eq!(b.king_sq(Color::Black), coord_to_sq("e9"));
    let a1 = b.piece_at(coord_to_sq("d1").unwrap()).unwrap();
    assert_eq!(a1.kind, PieceKind::Archbishop);
    let c9 = b.piece_at(coord_to_sq("f9").unwrap()).unwrap();
    assert_eq!(c9.kind, PieceKind::Chancellor);
    assert_eq!(c9.color, Color::Black);
    assert!(b.validate().is_ok());
}

#[test]
fn test_set_piece_hash_is_order_independent() {
    let mut a = Board::empty();
    a.set_piece(3, piece(Color::White, PieceKind::Knight));
    a.set_piece(50, piece(Color::Black, PieceKind::Angel));
    let mut b = Board::empty();
    b.set_piece(50, piece(Color::Black, PieceKind::Angel));
    b.set_piece(3, piece(Color::White, PieceKind::Knight));
    assert_eq!(a.hash(), b.hash());
    assert_ne!(a.key(Color::White), a.key(Color::Black));

    b.set_piece(3, None);
    b.set_piece(50, None);
    assert_eq!(b.hash(), 0);
    assert!(b.occupied().is_empty());
}

#[test]
fn test_make_unmake_capture_restores_board() {
    let mut b = Board::empty();
    let d4 = coord_to_sq("d4").unwrap();
    let g7 = coord_to_sq("g7").unwrap();
    b.set_piece(d4, piece(Color::White, PieceKind::Bishop));
    b.set_piece(g7, piece(Color::Black, PieceKind::Rook));
    let before = b.clone();

    let mv = Move::new(d4, g7);
    let undo = b.make_move(mv);
    assert_eq!(undo.captured.map(|p| p.kind), Some(PieceKind::Rook));
    let moved = b.piece_at(g7).unwrap();
    assert_eq!(moved.kind, PieceKind::Bishop);
    assert!(moved.has_moved);
    assert_eq!(b.piece_at(d4), None);

    b.unmake_move(mv, undo);
    assert_eq!(b, before);
    assert!(!b.piece_at(d4).unwrap().has_moved);
}

#[test]
fn test_promotion_defaults_to_angel_and_undoes_to_pawn() {
    let mut b = Board::empty();
    let e8 = coord_to_sq("e8").unwrap();
    let e9 = coord_to_sq("e9").unwrap();
    b.set_piece(e8, Some(Piece::new(Color::White, PieceKind::Pawn).moved()));
    let before = b.clone();

    let mv = Move::new(e8, e9);
    let undo = b.make_move(mv);
    assert_eq!(b.piece_at(e9).unwrap().kind, PieceKind::Angel);
    b.unmake_move(mv, undo);
    assert_eq!(b, before);

    let mut knight = Move::new(e8, e9);
    knight.promo = Some(PieceKind::Knight);
    let undo = b.make_move(knight);
    assert_eq!(b.piece_at(e9).unwrap().kind, PieceKind::Knight);
    b.unmake_move(knight, undo);
    assert_eq!(b, before);
}

#[test]
fn test_castling_moves_rook_and_restores() {
    let mut b = Board::empty();
    let e1 = coord_to_sq("e1").unwrap();
    let i1 = coord_to_sq("i1").unwrap();
    b.set_piece(e1, piece(Color::White, PieceKind::King));
    b.set_piece(i1, piece(Color::White, PieceKind::Rook));
    let before = b.clone();

    let mut mv = Move::new(e1, coord_to_sq("g1").unwrap());
    mv.is_castle = true;
    let undo = b.make_move(mv);
    let rook = b.piece_at(coord_to_sq("f1").unwrap()).unwrap();
    assert_eq!(rook.kind, PieceKind::Rook);
    assert!(rook.has_moved);
    assert_eq!(b.piece_at(i1), None);

    b.unmake_move(mv, undo);
    assert_eq!(b, before);
}

#[test]
fn test_make_move_from_empty_square_is_noop() {
    let mut b = Board::startpos();
    let before = b.clone();
    let mv = Move::new(40, 41);
    let undo = b.make_move(mv);
    assert_eq!(b, before);
    b.unmake_move(mv, undo);
    assert_eq!(b, before);
}

#[test]
fn test_in_check_by_compound_pieces() {
    let mut b = Board::empty();
    let king = sq(4, 4).unwrap();
    b.set_piece(king, piece(Color::White, PieceKind::King));
    // Chancellor a knight's leap away
    b.set_piece(sq(2, 5).unwrap(), piece(Color::Black, PieceKind::Chancellor));
    assert!(b.in_check(Color::White));

    let mut b2 = Board::empty();
    b2.set_piece(king, piece(Color::White, PieceKind::King));
    // Archbishop on a diagonal, blocked by a pawn
    b2.set_piece(sq(1, 1).unwrap(), piece(Color::Black, PieceKind::Archbishop));
    assert!(b2.in_check(Color::White));
    b2.set_piece(sq(2, 2).unwrap(), piece(Color::White, PieceKind::Pawn));
    assert!(!b2.in_check(Color::White));
}

#[test]
fn test_pawn_attack_direction() {
    let mut b = Board::empty();
    let target = sq(4, 4).unwrap();
    // Black pawn above the target attacks downward
    b.set_piece(sq(3, 3).unwrap(), piece(Color::Black, PieceKind::Pawn));
    assert!(b.is_square_attacked(target, Color::Black));
    assert!(!b.is_square_attacked(target, Color::White));

    let mut b2 = Board::empty();
    // Black pawn below the target does not
    b2.set_piece(sq(5, 3).unwrap(), piece(Color::Black, PieceKind::Pawn));
    assert!(!b2.is_square_attacked(target, Color::Black));
}

#[test]
fn test_missing_king_is_not_in_check() {
    let b = Board::empty();
    assert!(!b.in_check(Color::White));
    assert_eq!(
        b.validate(),
        Err(BoardError::KingCount {
            color: Color::White,
            count: 0
        })
    );
}

#[test]
fn test_color_flip() {
    let b = Board::startpos();
    assert_eq!(b.color_flip(), b);

    let mut c = Board::empty();
    c.set_piece(sq(6, 2).unwrap(), piece(Color::White, PieceKind::Knight));
    let flipped = c.color_flip();
    let pc = flipped.piece_at(sq(2, 2).unwrap()).unwrap();
    assert_eq!(pc.color, Color::Black);
    assert_eq!(pc.kind, PieceKind::Knight);
    assert_eq!(flipped.color_flip(), c);
}

#[test]
fn test_has_non_pawn_material() {
    let mut b = Board::empty();
    b.set_piece(0, piece(Color::White, PieceKind::King));
    b.set_piece(30, piece(Color::White, PieceKind::Pawn));
    assert!(!b.has_non_pawn_material(Color::White));
    b.set_piece(31, piece(Color::White, PieceKind::Archbishop));
    assert!(b.has_non_pawn_material(Color::White));
    assert!(!b.has_non_pawn_material(Color::Black));
}
