use thiserror::Error;

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::types::*;
use crate::zobrist::ZOBRIST;

/// Back rank of the standard setup, column 0 to 8.
const BACK_RANK: [PieceKind; 9] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Archbishop,
    PieceKind::King,
    PieceKind::Chancellor,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Column the king starts on.
pub const KING_HOME_COL: i8 = 4;

/// Reasons a board is not fit to be searched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("{color:?} has {count} kings, expected exactly one")]
    KingCount { color: Color, count: usize },
    #[error("pawn on promotion row at {0}")]
    PawnOnLastRow(String),
}

/// 9×9 board with an incrementally maintained occupancy and Zobrist hash.
///
/// Side to move is not part of the board; search passes the color alongside.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; SQUARE_COUNT],
    occupancy: [Bitboard; 2],
    hash: u64,
}

/// Everything `unmake_move` needs to restore the board exactly.
#[derive(Clone, Copy, Debug)]
pub struct Undo {
    /// Piece that stood on the from-square, `has_moved` flag included
    pub moved: Option<Piece>,
    /// Piece that stood on the to-square
    pub captured: Option<Piece>,
    /// (rook_from, rook_to, rook) for castling
    pub rook_move: Option<(u8, u8, Piece)>,
    pub hash: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [None; SQUARE_COUNT],
            occupancy: [Bitboard::EMPTY; 2],
            hash: 0,
        }
    }

    /// Standard setup: `R N B A K C B N R` behind a row of nine pawns.
    pub fn startpos() -> Self {
        let mut b = Board::empty();
        for color in Color::ALL {
            let home = color.home_row() as i8;
            let pawns = color.pawn_row() as i8;
            for (col, &kind) in BACK_RANK.iter().enumerate() {
                if let Some(s) = sq(home, col as i8) {
                    b.set_piece(s, Some(Piece::new(color, kind)));
                }
                if let Some(s) = sq(pawns, col as i8) {
                    b.set_piece(s, Some(Piece::new(color, PieceKind::Pawn)));
                }
            }
        }
        b
    }

    #[inline(always)]
    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.squares[sq as usize]
    }

    /// Write a square, keeping occupancy and hash in sync.
    pub fn set_piece(&mut self, sq: u8, pc: Option<Piece>) {
        if let Some(old) = self.squares[sq as usize] {
            self.hash ^= ZOBRIST.piece_key(old, sq);
            self.occupancy[old.color.idx()].clear(sq);
        }
        if let Some(new) = pc {
            self.hash ^= ZOBRIST.piece_key(new, sq);
            self.occupancy[new.color.idx()].set(sq);
        }
        self.squares[sq as usize] = pc;
    }

    /// Squares occupied by `color`.
    #[inline(always)]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy[color.idx()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.occupancy[0] | self.occupancy[1]
    }

    /// Hash of the piece placement, without side to move.
    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Position key for `color` to move.
    #[inline(always)]
    pub fn key(&self, color: Color) -> u64 {
        match color {
            Color::White => self.hash,
            Color::Black => self.hash ^ ZOBRIST.side_to_move,
        }
    }

    /// Iterator over (square, piece) for every occupied square.
    pub fn pieces(&self) -> impl Iterator<Item = (u8, Piece)> + '_ {
        self.occupied()
            .filter_map(move |s| self.squares[s as usize].map(|pc| (s, pc)))
    }

    /// Squares holding pieces of the given color and kind.
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for s in self.occupancy(color) {
            if let Some(pc) = self.squares[s as usize]
                && pc.kind == kind
            {
                bb.set(s);
            }
        }
        bb
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        self.occupancy(c).find(|&s| {
            self.squares[s as usize].is_some_and(|pc| pc.kind == PieceKind::King)
        })
    }

    /// Whether `color` has anything besides pawns and the king.
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        self.occupancy(color).any(|s| {
            self.squares[s as usize]
                .is_some_and(|pc| !matches!(pc.kind, PieceKind::Pawn | PieceKind::King))
        })
    }

    /// A king that is missing is never in check.
    pub fn in_check(&self, c: Color) -> bool {
        match self.king_sq(c) {
            Some(ksq) => self.is_square_attacked(ksq, c.other()),
            None => false,
        }
    }

    /// Whether any piece of color `by` attacks `target`.
    ///
    /// Works outward from the target: a square is attacked by a leaper if the
    /// same leap from the target lands on it, and by a slider if the first
    /// piece on a line is a matching slider.
    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        let theirs = self.occupancy(by);
        let has = |s: u8, f: fn(PieceKind) -> bool| {
            self.squares[s as usize].is_some_and(|pc| pc.color == by && f(pc.kind))
        };

        // A pawn of `by` attacks target if target's pawn attack from the other side hits it
        for s in pawn_attacks(target, by.other()) & theirs {
            if has(s, |k| k == PieceKind::Pawn) {
                return true;
            }
        }
        for s in knight_attacks(target) & theirs {
            if has(s, PieceKind::leaps_like_knight) {
                return true;
            }
        }
        for s in king_attacks(target) & theirs {
            if has(s, |k| k == PieceKind::King) {
                return true;
            }
        }

        let occupied = self.occupied();
        for s in bishop_attacks(target, occupied) & theirs {
            if has(s, PieceKind::slides_diagonally) {
                return true;
            }
        }
        for s in rook_attacks(target, occupied) & theirs {
            if has(s, PieceKind::slides_orthogonally) {
                return true;
            }
        }

        false
    }

    /// Apply a move in place. Returns the token that undoes it.
    ///
    /// A king moving two columns castles; a pawn reaching its last row
    /// promotes to `mv.promo`, or to an angel when none is given.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let from = mv.from;
        let to = mv.to;
        let hash = self.hash;
        let captured = self.piece_at(to);
        let Some(moved) = self.piece_at(from) else {
            return Undo {
                moved: None,
                captured,
                rook_move: None,
                hash,
            };
        };

        let mut placed = moved.moved();
        if moved.kind == PieceKind::Pawn && row_of(to) as u8 == moved.color.promotion_row() {
            placed.kind = mv.promo.unwrap_or(PieceKind::Angel);
        }
        self.set_piece(from, None);
        self.set_piece(to, Some(placed));

        let mut rook_move = None;
        let dc = col_of(to) - col_of(from);
        if moved.kind == PieceKind::King && dc.abs() == 2 {
            let row = row_of(from);
            let (rook_col, rook_to_col) = if dc > 0 {
                (BOARD_SIZE as i8 - 1, col_of(to) - 1)
            } else {
                (0, col_of(to) + 1)
            };
            if let (Some(rf), Some(rt)) = (sq(row, rook_col), sq(row, rook_to_col))
                && let Some(rook) = self.piece_at(rf)
                && rook.kind == PieceKind::Rook
                && rook.color == moved.color
            {
                self.set_piece(rf, None);
                self.set_piece(rt, Some(rook.moved()));
                rook_move = Some((rf, rt, rook));
            }
        }

        Undo {
            moved: Some(moved),
            captured,
            rook_move,
            hash,
        }
    }

    /// Restore the board to its state before `make_move(mv)` returned `undo`.
    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        if undo.moved.is_none() {
            return;
        }
        if let Some((rf, rt, rook)) = undo.rook_move {
            self.set_piece(rt, None);
            self.set_piece(rf, Some(rook));
        }
        self.set_piece(mv.to, undo.captured);
        self.set_piece(mv.from, undo.moved);
        debug_assert_eq!(self.hash, undo.hash);
        self.hash = undo.hash;
    }

    /// Mirror rows and swap colors. White's view of the result equals Black's view of `self`.
    pub fn color_flip(&self) -> Board {
        let mut flipped = Board::empty();
        for (s, pc) in self.pieces() {
            let swapped = Piece {
                color: pc.color.other(),
                ..pc
            };
            flipped.set_piece(mirror_sq(s), Some(swapped));
        }
        flipped
    }

    /// Check the board is fit for search: one king per side, no unpromoted pawn on a last row.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let count = self.pieces_of(color, PieceKind::King).popcount() as usize;
            if count != 1 {
                return Err(BoardError::KingCount { color, count });
            }
            let last = self.pieces_of(color, PieceKind::Pawn)
                & Bitboard::row(color.promotion_row());
            if let Some(s) = last.lsb() {
                return Err(BoardError::PawnOnLastRow(sq_to_coord(s)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
