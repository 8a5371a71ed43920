//! Transposition table.
//!
//! A fixed-size, direct-mapped cache keyed by Zobrist hash. Collisions and
//! overwrites are expected; the table is a lossy cache, never a source of truth.

use schach_core::Move;

/// How a stored score relates to the true value of the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// The score is exact (a PV node).
    Exact,
    /// The true score is at least this (fail high).
    Lower,
    /// The true score is at most this (fail low).
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub hash: u64,
    pub depth: i32,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
    /// Search generation that wrote the entry. Set by [`TranspositionTable::store`].
    pub generation: u8,
}

impl TTEntry {
    pub fn new(hash: u64, depth: i32, score: i32, bound: Bound, best_move: Option<Move>) -> Self {
        Self {
            hash,
            depth,
            score,
            bound,
            best_move,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    slots: Vec<Option<TTEntry>>,
    mask: usize,
    generation: u8,
}

impl TranspositionTable {
    /// Table with at least `capacity` slots, rounded up to a power of two.
    pub fn new(capacity: usize) -> Self {
        let size = capacity.max(1).next_power_of_two();
        Self {
            slots: vec![None; size],
            mask: size - 1,
            generation: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn generation(&self) -> u8 {
        self.generation
    }

    /// Mark every stored entry as belonging to an older search.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.generation = 0;
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        hash as usize & self.mask
    }

    /// Entry for `hash` searched at least `depth` deep.
    pub fn probe(&self, hash: u64, depth: i32) -> Option<TTEntry> {
        self.slots[self.index(hash)].filter(|e| e.hash == hash && e.depth >= depth)
    }

    /// Best move stored for `hash` at any depth. For move ordering only.
    pub fn best_move_hint(&self, hash: u64) -> Option<Move> {
        self.slots[self.index(hash)]
            .filter(|e| e.hash == hash)
            .and_then(|e| e.best_move)
    }

    /// Store `entry` unless the slot holds a deeper entry from the current generation.
    pub fn store(&mut self, mut entry: TTEntry) {
        entry.generation = self.generation;
        let idx = self.index(entry.hash);
        let replace = match &self.slots[idx] {
            None => true,
            Some(old) => entry.depth >= old.depth || old.generation != self.generation,
        };
        if replace {
            self.slots[idx] = Some(entry);
        }
    }

    /// Occupied slots, in permille of capacity.
    pub fn hashfull(&self) -> usize {
        let sample = self.slots.len().min(1000);
        let used = self.slots[..sample].iter().filter(|s| s.is_some()).count();
        used * 1000 / sample
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(1 << 16)
    }
}

#[cfg(test)]
#[path = "tt_tests.rs"]
mod tt_tests;
