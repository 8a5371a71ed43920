//! Piece-square tables for the 9×9 board.
//!
//! Tables are written from White's point of view with row 0 (the promotion
//! side) first; Black reads them with the row mirrored. The variant pieces
//! borrow the table of their closest standard relative.

use schach_core::{Color, PieceKind, mirror_sq};

type Table = [i16; 81];

#[rustfmt::skip]
const PAWN_MG: Table = [
      0,   0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,  50,
     10,  10,  20,  30,  30,  30,  20,  10,  10,
      5,   5,  10,  25,  25,  25,  10,   5,   5,
      0,   0,   5,  20,  25,  20,   5,   0,   0,
      5,  -5, -10,   5,  10,   5, -10,  -5,   5,
      5,  10,  10, -10, -20, -10,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const PAWN_EG: Table = [
      0,   0,   0,   0,   0,   0,   0,   0,   0,
     80,  80,  80,  80,  80,  80,  80,  80,  80,
     50,  50,  50,  50,  50,  50,  50,  50,  50,
     30,  30,  30,  30,  30,  30,  30,  30,  30,
     20,  20,  20,  20,  20,  20,  20,  20,  20,
     10,  10,  10,  10,  10,  10,  10,  10,  10,
      5,   5,   5,   5,   5,   5,   5,   5,   5,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT: Table = [
    -50, -40, -30, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  25,  20,  15,   0, -30,
    -30,   5,  15,  20,  20,  20,  15,   5, -30,
    -30,   0,  10,  15,  15,  15,  10,   0, -30,
    -40, -20,   0,   5,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP: Table = [
    -20, -10, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  15,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   0,   5, -10,
    -10,   0,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK: Table = [
      0,   0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10,  10,  10,  10,  10,  10,   5,
     -5,   0,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,   0,  -5,
      0,   0,   0,   5,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN: Table = [
    -20, -10, -10,  -5,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   5,   0,  -5,
      0,   0,   5,   5,   5,   5,   5,   0,   0,
     -5,   0,   5,   5,   5,   5,   5,   0,  -5,
    -10,   0,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_MG: Table = [
    -30, -40, -40, -50, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,   0,  10,  30,  20,
];

#[rustfmt::skip]
const KING_EG: Table = [
    -50, -40, -30, -20, -20, -20, -30, -40, -50,
    -30, -20, -10,   0,   0,   0, -10, -20, -30,
    -30, -10,  10,  20,  20,  20,  10, -10, -30,
    -30,   0,  20,  30,  30,  30,  20,   0, -30,
    -30,   0,  20,  30,  40,  30,  20,   0, -30,
    -30,   0,  20,  30,  30,  30,  20,   0, -30,
    -30, -10,  10,  20,  20,  20,  10, -10, -30,
    -30, -20, -10,   0,   0,   0, -10, -20, -30,
    -50, -40, -30, -20, -20, -20, -30, -40, -50,
];

fn tables(kind: PieceKind) -> (&'static Table, &'static Table) {
    match kind {
        PieceKind::Pawn => (&PAWN_MG, &PAWN_EG),
        PieceKind::Knight | PieceKind::Archbishop => (&KNIGHT, &KNIGHT),
        PieceKind::Bishop => (&BISHOP, &BISHOP),
        PieceKind::Rook => (&ROOK, &ROOK),
        PieceKind::Queen | PieceKind::Chancellor | PieceKind::Angel => (&QUEEN, &QUEEN),
        PieceKind::King => (&KING_MG, &KING_EG),
    }
}

/// Midgame and endgame bonus for a piece of `kind` and `color` on `sq`.
#[inline]
pub fn pst(kind: PieceKind, color: Color, sq: u8) -> (i32, i32) {
    let idx = match color {
        Color::White => sq,
        Color::Black => mirror_sq(sq),
    } as usize;
    let (mg, eg) = tables(kind);
    (mg[idx] as i32, eg[idx] as i32)
}
