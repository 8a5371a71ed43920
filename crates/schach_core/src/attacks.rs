//! Pre-computed attack tables for move generation and attack detection.
//!
//! This module contains:
//! - Knight, king and pawn attack tables (constant)
//! - Ray tables for sliding pieces, resolved against an occupancy set
//! - Pawn front spans used for passed-pawn detection
//!
//! Compound pieces combine these: the archbishop is bishop + knight, the
//! chancellor rook + knight, the angel queen + knight.

use crate::bitboard::Bitboard;
use crate::types::{BOARD_SIZE, Color, PieceKind, SQUARE_COUNT};

const N: i8 = BOARD_SIZE as i8;

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Row/column steps of the eight ray directions.
/// Directions: 0=N, 1=NE, 2=E, 3=SE, 4=S, 5=SW, 6=W, 7=NW. North is toward row 0.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; SQUARE_COUNT] {
    let mut table = [Bitboard::EMPTY; SQUARE_COUNT];
    let mut sq = 0;
    while sq < SQUARE_COUNT {
        let row = (sq as i8) / N;
        let col = (sq as i8) % N;
        let mut bits = 0u128;
        let mut i = 0;
        while i < deltas.len() {
            let r = row + deltas[i].0;
            let c = col + deltas[i].1;
            if r >= 0 && r < N && c >= 0 && c < N {
                bits |= 1u128 << ((r * N + c) as u32);
            }
            i += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }
    table
}

/// Pre-computed knight attacks for each square.
pub static KNIGHT_ATTACKS: [Bitboard; SQUARE_COUNT] = leaper_table(&KNIGHT_DELTAS);

/// Pre-computed king attacks for each square.
pub static KING_ATTACKS: [Bitboard; SQUARE_COUNT] = leaper_table(&KING_DELTAS);

/// Pawn attacks for White (toward row 0).
pub static WHITE_PAWN_ATTACKS: [Bitboard; SQUARE_COUNT] = leaper_table(&[(-1, -1), (-1, 1)]);

/// Pawn attacks for Black (toward row 8).
pub static BLACK_PAWN_ATTACKS: [Bitboard; SQUARE_COUNT] = leaper_table(&[(1, -1), (1, 1)]);

/// Pre-computed ray attacks in each direction.
/// RAYS[direction][square] gives all squares in that direction from sq (not including sq).
pub static RAYS: [[Bitboard; SQUARE_COUNT]; 8] = {
    let mut rays = [[Bitboard::EMPTY; SQUARE_COUNT]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (dr, dc) = DIRECTIONS[dir];
        let mut sq = 0;
        while sq < SQUARE_COUNT {
            let mut r = (sq as i8) / N + dr;
            let mut c = (sq as i8) % N + dc;
            let mut bits = 0u128;
            while r >= 0 && r < N && c >= 0 && c < N {
                bits |= 1u128 << ((r * N + c) as u32);
                r += dr;
                c += dc;
            }
            rays[dir][sq] = Bitboard(bits);
            sq += 1;
        }
        dir += 1;
    }
    rays
};

/// Squares ahead of a pawn on its own and adjacent columns, per color.
/// A pawn is passed when no enemy pawn stands on this span.
pub static PAWN_FRONT_SPANS: [[Bitboard; SQUARE_COUNT]; 2] = {
    let mut spans = [[Bitboard::EMPTY; SQUARE_COUNT]; 2];
    let mut color = 0;
    while color < 2 {
        let step: i8 = if color == 0 { -1 } else { 1 };
        let mut sq = 0;
        while sq < SQUARE_COUNT {
            let col = (sq as i8) % N;
            let mut r = (sq as i8) / N + step;
            let mut bits = 0u128;
            while r >= 0 && r < N {
                let mut dc = -1;
                while dc <= 1 {
                    let c = col + dc;
                    if c >= 0 && c < N {
                        bits |= 1u128 << ((r * N + c) as u32);
                    }
                    dc += 1;
                }
                r += step;
            }
            spans[color][sq] = Bitboard(bits);
            sq += 1;
        }
        color += 1;
    }
    spans
};

/// Get pawn attacks for a given color and square.
#[inline(always)]
pub fn pawn_attacks(sq: u8, color: Color) -> Bitboard {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[sq as usize],
        Color::Black => BLACK_PAWN_ATTACKS[sq as usize],
    }
}

/// Get knight attacks for a given square.
#[inline(always)]
pub fn knight_attacks(sq: u8) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

/// Get king attacks for a given square.
#[inline(always)]
pub fn king_attacks(sq: u8) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

/// Front span of a pawn of `color` standing on `sq`.
#[inline(always)]
pub fn pawn_front_span(sq: u8, color: Color) -> Bitboard {
    PAWN_FRONT_SPANS[color.idx()][sq as usize]
}

/// The squares a ray reaches from `sq`, stopping at (and including) the first blocker.
#[inline]
fn ray_attacks(dir: usize, sq: u8, occupied: Bitboard) -> Bitboard {
    let ray = RAYS[dir][sq as usize];
    let blockers = ray & occupied;
    if blockers.is_empty() {
        return ray;
    }
    // Directions E, SE, S, SW walk toward higher indices; the rest toward lower.
    let blocker_sq = if matches!(dir, 2..=5) {
        blockers.0.trailing_zeros() as u8
    } else {
        127 - blockers.0.leading_zeros() as u8
    };
    ray & !RAYS[dir][blocker_sq as usize]
}

/// Calculate bishop attacks given a square and occupied squares.
#[inline]
pub fn bishop_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    ray_attacks(1, sq, occupied)
        | ray_attacks(3, sq, occupied)
        | ray_attacks(5, sq, occupied)
        | ray_attacks(7, sq, occupied)
}

/// Calculate rook attacks given a square and occupied squares.
#[inline]
pub fn rook_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    ray_attacks(0, sq, occupied)
        | ray_attacks(2, sq, occupied)
        | ray_attacks(4, sq, occupied)
        | ray_attacks(6, sq, occupied)
}

/// Calculate queen attacks (union of bishop and rook attacks).
#[inline]
pub fn queen_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Squares attacked by a piece of `kind` and `color` standing on `sq`.
///
/// Pawns return their capture squares only. Friendly-occupied squares are
/// included; callers mask them out when generating moves.
pub fn piece_attacks(kind: PieceKind, color: Color, sq: u8, occupied: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Pawn => pawn_attacks(sq, color),
        PieceKind::King => king_attacks(sq),
        _ => {
            let mut attacks = Bitboard::EMPTY;
            if kind.leaps_like_knight() {
                attacks |= knight_attacks(sq);
            }
            if kind.slides_diagonally() {
                attacks |= bishop_attacks(sq, occupied);
            }
            if kind.slides_orthogonally() {
                attacks |= rook_attacks(sq, occupied);
            }
            attacks
        }
    }
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
