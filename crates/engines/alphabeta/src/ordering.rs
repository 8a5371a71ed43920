//! Move ordering: TT move, MVV-LVA captures, promotions, killers,
//! counter-moves and the history table.

use std::cmp::Reverse;

use schach_core::{Board, Color, Move, PieceKind, SQUARE_COUNT};

/// Deepest ply that keeps killer moves.
pub const MAX_PLY: usize = 64;

const TT_MOVE_SCORE: i32 = 3_000_000;
const CAPTURE_SCORE: i32 = 2_000_000;
const PROMOTION_SCORE: i32 = 1_900_000;
const KILLER_SCORES: [i32; 2] = [900_000, 800_000];
const COUNTER_MOVE_SCORE: i32 = 700_000;
const HISTORY_MAX: i32 = 100_000;

/// Victim and attacker values for MVV-LVA. The king is the dearest attacker.
const ORDER_VALUES: [i32; PieceKind::COUNT] = [100, 320, 330, 500, 900, 1500, 600, 700, 1000];

#[derive(Debug, Clone)]
pub struct MoveOrdering {
    killers: [[Option<Move>; 2]; MAX_PLY],
    /// Indexed `[color][from][to]`.
    history: Vec<i32>,
    /// Reply that refuted a move, indexed `[from][to]` of that move.
    counter_moves: Vec<Option<Move>>,
}

impl Default for MoveOrdering {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn history_index(color: Color, mv: Move) -> usize {
    (color.idx() * SQUARE_COUNT + mv.from as usize) * SQUARE_COUNT + mv.to as usize
}

#[inline]
fn counter_index(mv: Move) -> usize {
    mv.from as usize * SQUARE_COUNT + mv.to as usize
}

impl MoveOrdering {
    pub fn new() -> Self {
        Self {
            killers: [[None; 2]; MAX_PLY],
            history: vec![0; 2 * SQUARE_COUNT * SQUARE_COUNT],
            counter_moves: vec![None; SQUARE_COUNT * SQUARE_COUNT],
        }
    }

    pub fn clear(&mut self) {
        self.killers = [[None; 2]; MAX_PLY];
        self.history.fill(0);
        self.counter_moves.fill(None);
    }

    /// Forget killers and halve history between searches.
    pub fn age(&mut self) {
        self.killers = [[None; 2]; MAX_PLY];
        for h in &mut self.history {
            *h /= 2;
        }
    }

    pub fn killers(&self, ply: usize) -> [Option<Move>; 2] {
        self.killers.get(ply).copied().unwrap_or([None; 2])
    }

    pub fn history(&self, color: Color, mv: Move) -> i32 {
        self.history[history_index(color, mv)]
    }

    pub fn counter_move(&self, prev: Move) -> Option<Move> {
        self.counter_moves[counter_index(prev)]
    }

    pub fn score(
        &self,
        board: &Board,
        mv: Move,
        color: Color,
        ply: usize,
        tt_move: Option<Move>,
        prev: Option<Move>,
    ) -> i32 {
        if tt_move == Some(mv) {
            return TT_MOVE_SCORE;
        }
        if let Some(victim) = mv.captured {
            let attacker = board
                .piece_at(mv.from)
                .map_or(0, |pc| ORDER_VALUES[pc.kind.idx()]);
            return CAPTURE_SCORE + 10 * ORDER_VALUES[victim.kind.idx()] - attacker;
        }
        if mv.promo.is_some() {
            return PROMOTION_SCORE;
        }
        let killers = self.killers(ply);
        for (slot, killer) in killers.iter().enumerate() {
            if *killer == Some(mv) {
                return KILLER_SCORES[slot];
            }
        }
        if prev.is_some_and(|p| self.counter_move(p) == Some(mv)) {
            return COUNTER_MOVE_SCORE;
        }
        self.history(color, mv)
    }

    /// Sort `moves` best first.
    pub fn sort(
        &self,
        board: &Board,
        moves: &mut [Move],
        color: Color,
        ply: usize,
        tt_move: Option<Move>,
        prev: Option<Move>,
    ) {
        moves.sort_by_cached_key(|&mv| Reverse(self.score(board, mv, color, ply, tt_move, prev)));
    }

    /// Remember a quiet move that caused a beta cutoff.
    pub fn record_cutoff(
        &mut self,
        mv: Move,
        color: Color,
        ply: usize,
        depth: i32,
        prev: Option<Move>,
    ) {
        if let Some(slot) = self.killers.get_mut(ply) {
            if slot[0] != Some(mv) {
                slot[1] = slot[0];
                slot[0] = Some(mv);
            }
        }
        let h = &mut self.history[history_index(color, mv)];
        *h = (*h + depth * depth).min(HISTORY_MAX);
        if let Some(p) = prev {
            self.counter_moves[counter_index(p)] = Some(mv);
        }
    }
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod ordering_tests;
