//! Bitboard representation for the 9×9 board.
//!
//! A bitboard is a 128-bit integer where each of the low 81 bits represents a
//! square. Bit `row * 9 + col`; bit 0 is a9 (Black's queenside corner), bit 80
//! is i1 (White's kingside corner). The upper 47 bits are always zero.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::types::{BOARD_SIZE, SQUARE_COUNT};

/// A set of squares on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u128);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const ALL: Bitboard = Bitboard((1u128 << SQUARE_COUNT) - 1);

    /// Create a bitboard with a single square set.
    #[inline(always)]
    pub const fn from_square(sq: u8) -> Self {
        Bitboard(1u128 << sq)
    }

    /// All squares on one row.
    pub const fn row(row: u8) -> Self {
        Bitboard(0x1FFu128 << (row as u32 * BOARD_SIZE as u32))
    }

    /// All squares on one column.
    pub const fn column(col: u8) -> Self {
        let mut bits = 0u128;
        let mut row = 0;
        while row < BOARD_SIZE {
            bits |= 1u128 << ((row * BOARD_SIZE + col) as u32);
            row += 1;
        }
        Bitboard(bits)
    }

    /// Check if the bitboard is empty.
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if a specific square is set.
    #[inline(always)]
    pub const fn contains(self, sq: u8) -> bool {
        (self.0 & (1u128 << sq)) != 0
    }

    /// Set a square in the bitboard.
    #[inline(always)]
    pub fn set(&mut self, sq: u8) {
        self.0 |= 1u128 << sq;
    }

    /// Clear a square in the bitboard.
    #[inline(always)]
    pub fn clear(&mut self, sq: u8) {
        self.0 &= !(1u128 << sq);
    }

    /// Count the number of set bits.
    #[inline(always)]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    /// Index of the least significant set square, or None if empty.
    #[inline(always)]
    pub const fn lsb(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }

    /// Get and remove the least significant bit. Returns the square index.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            let sq = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1;
            Some(sq)
        }
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

// Complement stays within the 81 board squares.
impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Bitboard(!self.0 & Self::ALL.0)
    }
}

/// Iterator over set squares in a bitboard.
impl Iterator for Bitboard {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.pop_lsb()
    }
}

#[cfg(test)]
#[path = "bitboard_tests.rs"]
mod bitboard_tests;
