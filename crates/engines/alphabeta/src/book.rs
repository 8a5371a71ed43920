//! Opening book.
//!
//! Maps a position key (`<diagram> <w|b>`) to weighted candidate moves. The
//! book is read-only once loaded and only consulted at the root.
//!
//! ```json
//! { "positions": { "<diagram> w": [ { "move": "e2e4", "weight": 40 } ] } }
//! ```

use std::collections::HashMap;
use std::path::Path;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use schach_core::{parse_move, parse_move_text, position_key, Board, Color, Move};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

const BUILTIN_BOOK: &str = include_str!("../data/opening_book.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMove {
    #[serde(rename = "move")]
    pub mv: String,
    pub weight: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningBook {
    positions: HashMap<String, Vec<BookMove>>,
}

/// How to choose among the book moves of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookChoice {
    /// Always the highest weight.
    Best,
    /// Random, proportional to weight.
    Weighted,
}

impl OpeningBook {
    /// Empty book; every query misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Common first moves and replies from the start position.
    pub fn builtin() -> Self {
        // The bundled data is covered by tests.
        Self::from_json(BUILTIN_BOOK).unwrap_or_default()
    }

    /// Parse a book, rejecting entries whose move text is malformed.
    pub fn from_json(text: &str) -> Result<Self> {
        let book: OpeningBook = serde_json::from_str(text)?;
        for (key, moves) in &book.positions {
            for entry in moves {
                if parse_move_text(&entry.mv).is_err() {
                    return Err(EngineError::BookMove {
                        key: key.clone(),
                        mv: entry.mv.clone(),
                    });
                }
            }
        }
        Ok(book)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over `(position key, moves)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[BookMove])> {
        self.positions
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn query(&self, board: &Board, color: Color) -> Option<&[BookMove]> {
        self.positions
            .get(&position_key(board, color))
            .map(Vec::as_slice)
            .filter(|moves| !moves.is_empty())
    }

    /// Pick a legal book move for this position, if any.
    ///
    /// Entries that are not legal here are skipped; when none remain the
    /// caller falls back to searching.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        board: &Board,
        color: Color,
        choice: BookChoice,
        rng: &mut R,
    ) -> Option<Move> {
        let candidates: Vec<(Move, u32)> = self
            .query(board, color)?
            .iter()
            .filter_map(|e| parse_move(board, color, &e.mv).ok().map(|mv| (mv, e.weight)))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        match choice {
            BookChoice::Best => candidates
                .iter()
                .max_by_key(|(_, weight)| *weight)
                .map(|&(mv, _)| mv),
            // All-zero weights fall back to the first entry.
            BookChoice::Weighted => match WeightedIndex::new(candidates.iter().map(|c| c.1)) {
                Ok(dist) => Some(candidates[dist.sample(rng)].0),
                Err(_) => Some(candidates[0].0),
            },
        }
    }
}

#[cfg(test)]
#[path = "book_tests.rs"]
mod book_tests;
