//! Zobrist hashing for 9×9 positions.
//!
//! The board keeps its hash up to date on every square write, so make/unmake
//! costs O(1) hash work per touched square. The hash is the XOR of:
//! - a key per (color, piece kind, square): 2 × 9 × 81 values
//! - a key per square for pieces that have not moved yet, which is what
//!   castling and the pawn double step depend on (81 values)
//! - a key for Black to move, applied by `Board::key`

use crate::types::{PieceKind, Piece, SQUARE_COUNT};

/// Pre-computed random values for Zobrist hashing.
/// Generated using a fixed seed for reproducibility.
pub struct ZobristKeys {
    /// Indexed by [color][piece_kind][square]
    pub pieces: [[[u64; SQUARE_COUNT]; PieceKind::COUNT]; 2],
    /// XORed in for a piece whose `has_moved` flag is still false
    pub unmoved: [u64; SQUARE_COUNT],
    /// XORed in when Black is to move
    pub side_to_move: u64,
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl ZobristKeys {
    /// Generate Zobrist keys using xorshift64 with a fixed seed.
    pub const fn new() -> Self {
        const fn xorshift64(mut state: u64) -> u64 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        }

        let mut state = 0x9E3779B97F4A7C15u64;

        let mut pieces = [[[0u64; SQUARE_COUNT]; PieceKind::COUNT]; 2];
        let mut color = 0;
        while color < 2 {
            let mut kind = 0;
            while kind < PieceKind::COUNT {
                let mut sq = 0;
                while sq < SQUARE_COUNT {
                    state = xorshift64(state);
                    pieces[color][kind][sq] = state;
                    sq += 1;
                }
                kind += 1;
            }
            color += 1;
        }

        let mut unmoved = [0u64; SQUARE_COUNT];
        let mut sq = 0;
        while sq < SQUARE_COUNT {
            state = xorshift64(state);
            unmoved[sq] = state;
            sq += 1;
        }

        state = xorshift64(state);
        let side_to_move = state;

        ZobristKeys {
            pieces,
            unmoved,
            side_to_move,
        }
    }

    /// Hash contribution of a piece standing on a square.
    #[inline(always)]
    pub fn piece_key(&self, piece: Piece, sq: u8) -> u64 {
        let key = self.pieces[piece.color.idx()][piece.kind.idx()][sq as usize];
        if piece.has_moved {
            key
        } else {
            key ^ self.unmoved[sq as usize]
        }
    }
}

/// Global static Zobrist keys, computed at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
