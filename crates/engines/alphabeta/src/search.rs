//! Iterative-deepening principal variation search.
//!
//! Each iteration runs a negamax alpha-beta search inside an aspiration
//! window around the previous score. Nodes probe the transposition table,
//! try a null move, reduce late quiet moves, and finish in a quiescence
//! search over captures and promotions.

use std::collections::HashSet;

use schach_core::{
    capture_moves_into, legal_moves, legal_moves_into, Board, Color, Move, ProgressCallback,
    SearchLimits, SearchResult,
};
use tracing::debug;

use crate::config::PruningParams;
use crate::eval::{evaluate_with, EvalWeights};
use crate::ordering::{MoveOrdering, MAX_PLY};
use crate::tt::{Bound, TTEntry, TranspositionTable};

/// Score of being mated at the root. Mate in `n` plies scores `MATE - n`.
pub const MATE: i32 = 30_000;
/// Larger than any reachable score.
pub const INF: i32 = 32_000;
/// Scores beyond this are mate scores.
const MATE_BOUND: i32 = MATE - 2 * MAX_PLY as i32;
/// Aspiration windows wider than this fall back to the full window.
const ASPIRATION_LIMIT: i32 = 1000;

/// A root move and its score for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Convert a score to be stored at `ply` into one relative to that node.
fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_BOUND {
        score + ply as i32
    } else if score < -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_BOUND {
        score - ply as i32
    } else if score < -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

pub fn is_mate_score(score: i32) -> bool {
    score.abs() > MATE_BOUND
}

/// Follow TT best-move hints from `board`, checking each for legality.
///
/// Stops after `depth` moves, at a missing hint, or when a position repeats.
/// Works on a scratch copy.
pub fn extract_pv(tt: &TranspositionTable, board: &Board, color: Color, depth: usize) -> Vec<Move> {
    let mut scratch = board.clone();
    let mut side = color;
    let mut seen = HashSet::new();
    let mut pv = Vec::new();

    while pv.len() < depth {
        let key = scratch.key(side);
        if !seen.insert(key) {
            break;
        }
        let Some(hint) = tt.best_move_hint(key) else {
            break;
        };
        let Some(mv) = legal_moves(&scratch, side).into_iter().find(|m| *m == hint) else {
            break;
        };
        scratch.make_move(mv);
        pv.push(mv);
        side = side.other();
    }
    pv
}

/// State of one search request.
pub struct Searcher<'a> {
    tt: &'a mut TranspositionTable,
    ordering: &'a mut MoveOrdering,
    pruning: &'a PruningParams,
    limits: &'a SearchLimits,
    weights: EvalWeights,
    nodes: u64,
    /// Aspiration windows that failed and were searched again.
    researches: u32,
    stopped: bool,
}

impl<'a> Searcher<'a> {
    pub fn new(
        tt: &'a mut TranspositionTable,
        ordering: &'a mut MoveOrdering,
        pruning: &'a PruningParams,
        limits: &'a SearchLimits,
    ) -> Self {
        Self {
            tt,
            ordering,
            pruning,
            limits,
            weights: EvalWeights::default(),
            nodes: 0,
            researches: 0,
            stopped: false,
        }
    }

    /// Evaluate leaves with `weights` instead of the plain evaluation.
    pub fn with_weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn researches(&self) -> u32 {
        self.researches
    }

    fn evaluate(&self, board: &Board, color: Color) -> i32 {
        evaluate_with(board, color, &self.weights)
    }

    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Iterative deepening up to `max_depth`.
    ///
    /// A stopped iteration is discarded and the last completed one reported.
    /// Under a time limit no iteration starts once less time remains than
    /// the previous one took.
    pub fn iterate(
        &mut self,
        board: &Board,
        color: Color,
        max_depth: u8,
        window: i32,
        mut progress: Option<&mut ProgressCallback>,
    ) -> SearchResult {
        let mut root = board.clone();
        let mut result = SearchResult::default();

        let limits = self.limits;
        let tc = &limits.time_control;
        for depth in 1..=max_depth {
            let started = tc.elapsed();
            let window = if depth == 1 { 0 } else { window };
            let searched = self.aspiration(&mut root, color, depth as i32, result.score, window);
            let Some((best_move, score)) = searched else {
                result.stopped = true;
                break;
            };

            result.best_move = best_move;
            result.score = score;
            result.depth = depth;
            result.nodes = self.nodes;
            result.pv = self.principal_variation(&root, color, best_move, depth as usize);

            debug!(
                depth,
                score,
                nodes = self.nodes,
                pv = %format_pv(&result.pv),
                "iteration complete"
            );
            if let Some(callback) = progress.as_deref_mut() {
                callback(&result);
            }
            // Nothing to play, nothing deeper to find.
            if best_move.is_none() {
                break;
            }
            let spent = tc.elapsed().saturating_sub(started);
            if tc.remaining().is_some_and(|left| left < spent) {
                debug!(depth, "not enough time for another iteration");
                break;
            }
        }

        result.nodes = self.nodes;
        result
    }

    fn principal_variation(
        &self,
        root: &Board,
        color: Color,
        best_move: Option<Move>,
        depth: usize,
    ) -> Vec<Move> {
        let Some(mv) = best_move else {
            return Vec::new();
        };
        let mut child = root.clone();
        child.make_move(mv);
        let mut pv = vec![mv];
        pv.extend(extract_pv(self.tt, &child, color.other(), depth.saturating_sub(1)));
        pv
    }

    /// Search one depth inside a window around `guess`, widening on failure.
    /// `None` when the search was stopped.
    fn aspiration(
        &mut self,
        board: &mut Board,
        color: Color,
        depth: i32,
        guess: i32,
        window: i32,
    ) -> Option<(Option<Move>, i32)> {
        let (mut alpha, mut beta) = if window > 0 && !is_mate_score(guess) {
            (guess - window, guess + window)
        } else {
            (-INF, INF)
        };
        let mut delta = window;

        loop {
            let (best_move, score) = self.root(board, color, depth, alpha, beta);
            if self.stopped {
                return None;
            }
            if score <= alpha && alpha > -INF {
                self.researches += 1;
                delta *= 2;
                alpha = if delta > ASPIRATION_LIMIT { -INF } else { guess - delta };
            } else if score >= beta && beta < INF {
                self.researches += 1;
                delta *= 2;
                beta = if delta > ASPIRATION_LIMIT { INF } else { guess + delta };
            } else {
                return Some((best_move, score));
            }
        }
    }

    fn root(
        &mut self,
        board: &mut Board,
        color: Color,
        depth: i32,
        mut alpha: i32,
        beta: i32,
    ) -> (Option<Move>, i32) {
        self.nodes += 1;
        let mut moves = Vec::with_capacity(64);
        legal_moves_into(board, color, &mut moves);
        if moves.is_empty() {
            return (None, 0);
        }

        let hash = board.key(color);
        let tt_move = self.tt.best_move_hint(hash);
        self.ordering.sort(board, &mut moves, color, 0, tt_move, None);

        let alpha_orig = alpha;
        let mut best_score = -INF;
        let mut best_move = None;
        for (i, &mv) in moves.iter().enumerate() {
            let undo = board.make_move(mv);
            let score = if i == 0 {
                -self.negamax(board, color.other(), depth - 1, 1, -beta, -alpha, Some(mv))
            } else {
                let s = -self.negamax(board, color.other(), depth - 1, 1, -alpha - 1, -alpha, Some(mv));
                if s > alpha && s < beta {
                    -self.negamax(board, color.other(), depth - 1, 1, -beta, -alpha, Some(mv))
                } else {
                    s
                }
            };
            board.unmake_move(mv, undo);
            if self.stopped {
                break;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        if !self.stopped {
            let bound = classify(best_score, alpha_orig, beta);
            self.tt.store(TTEntry::new(hash, depth, best_score, bound, best_move));
        }
        (best_move, best_score)
    }

    /// Score every root move with a full window, best first.
    pub fn score_root_moves(&mut self, board: &Board, color: Color, depth: i32) -> Vec<ScoredMove> {
        let mut root = board.clone();
        let mut moves = Vec::with_capacity(64);
        legal_moves_into(&mut root, color, &mut moves);
        let tt_move = self.tt.best_move_hint(root.key(color));
        self.ordering.sort(&root, &mut moves, color, 0, tt_move, None);

        let mut scored = Vec::with_capacity(moves.len());
        for mv in moves {
            let undo = root.make_move(mv);
            let score = -self.negamax(&mut root, color.other(), depth - 1, 1, -INF, INF, Some(mv));
            root.unmake_move(mv, undo);
            if self.stopped {
                break;
            }
            scored.push(ScoredMove { mv, score });
        }
        scored.sort_by_key(|s| std::cmp::Reverse(s.score));
        scored
    }

    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        let over_budget = self.limits.max_nodes.is_some_and(|max| self.nodes >= max);
        let limits = self.limits;
        let tc = &limits.time_control;
        if over_budget || tc.is_stopped() || (tc.should_check_time(self.nodes) && tc.check_time()) {
            self.stopped = true;
        }
        self.stopped
    }

    #[allow(clippy::too_many_arguments)]
    fn negamax(
        &mut self,
        board: &mut Board,
        color: Color,
        mut depth: i32,
        ply: usize,
        mut alpha: i32,
        mut beta: i32,
        prev: Option<Move>,
    ) -> i32 {
        let in_check = board.in_check(color);
        if in_check {
            depth += 1;
        }
        if depth <= 0 {
            return self.quiescence(board, color, ply, alpha, beta);
        }

        self.nodes += 1;
        if self.should_stop() {
            return 0;
        }
        if ply >= MAX_PLY {
            return self.evaluate(board, color);
        }

        let pv_node = beta - alpha > 1;
        let hash = board.key(color);
        if let Some(entry) = self.tt.probe(hash, depth) {
            let score = score_from_tt(entry.score, ply);
            match entry.bound {
                Bound::Exact => return score,
                Bound::Lower => alpha = alpha.max(score),
                Bound::Upper => beta = beta.min(score),
            }
            if alpha >= beta {
                return score;
            }
        }
        let alpha_orig = alpha;

        // Null move: if passing still fails high, so will a real move.
        if self.pruning.null_move
            && !pv_node
            && !in_check
            && depth >= 3
            && prev.is_some()
            && board.has_non_pawn_material(color)
            && self.evaluate(board, color) >= beta
        {
            let mut r = self.pruning.null_move_reduction;
            if self.pruning.adaptive_null_move {
                r += depth / 6;
            }
            let score = -self.negamax(board, color.other(), depth - 1 - r, ply + 1, -beta, -beta + 1, None);
            if self.stopped {
                return 0;
            }
            if score >= beta {
                return beta;
            }
        }

        let mut moves = Vec::with_capacity(64);
        legal_moves_into(board, color, &mut moves);
        if moves.is_empty() {
            return if in_check { -MATE + ply as i32 } else { 0 };
        }
        let tt_move = self.tt.best_move_hint(hash);
        self.ordering.sort(board, &mut moves, color, ply, tt_move, prev);

        let mut best_score = -INF;
        let mut best_move = None;
        for (i, &mv) in moves.iter().enumerate() {
            let quiet = !mv.is_tactical();
            let undo = board.make_move(mv);
            let score = if i == 0 {
                -self.negamax(board, color.other(), depth - 1, ply + 1, -beta, -alpha, Some(mv))
            } else {
                let reduction = if self.pruning.late_move_reduction
                    && depth >= 3
                    && i >= self.pruning.lmr_move_threshold
                    && !in_check
                    && quiet
                    && !board.in_check(color.other())
                {
                    1
                } else {
                    0
                };
                let mut s = -self.negamax(
                    board,
                    color.other(),
                    depth - 1 - reduction,
                    ply + 1,
                    -alpha - 1,
                    -alpha,
                    Some(mv),
                );
                if reduction > 0 && s > alpha {
                    s = -self.negamax(board, color.other(), depth - 1, ply + 1, -alpha - 1, -alpha, Some(mv));
                }
                if s > alpha && s < beta {
                    s = -self.negamax(board, color.other(), depth - 1, ply + 1, -beta, -alpha, Some(mv));
                }
                s
            };
            board.unmake_move(mv, undo);
            if self.stopped {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                if quiet {
                    self.ordering.record_cutoff(mv, color, ply, depth, prev);
                }
                break;
            }
        }

        let bound = classify(best_score, alpha_orig, beta);
        self.tt.store(TTEntry::new(
            hash,
            depth,
            score_to_tt(best_score, ply),
            bound,
            best_move,
        ));
        best_score
    }

    /// Captures and promotions until the position is quiet. In check every
    /// evasion is searched and standing pat is not allowed.
    fn quiescence(&mut self, board: &mut Board, color: Color, ply: usize, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        if self.should_stop() {
            return 0;
        }
        if ply >= MAX_PLY {
            return self.evaluate(board, color);
        }

        let in_check = board.in_check(color);
        let mut best = -INF;
        let mut moves = Vec::with_capacity(32);
        if in_check {
            legal_moves_into(board, color, &mut moves);
            if moves.is_empty() {
                return -MATE + ply as i32;
            }
        } else {
            let stand_pat = self.evaluate(board, color);
            if stand_pat >= beta {
                return stand_pat;
            }
            alpha = alpha.max(stand_pat);
            best = stand_pat;
            capture_moves_into(board, color, &mut moves);
        }
        self.ordering.sort(board, &mut moves, color, ply, None, None);

        for mv in moves {
            let undo = board.make_move(mv);
            let score = -self.quiescence(board, color.other(), ply + 1, -beta, -alpha);
            board.unmake_move(mv, undo);
            if self.stopped {
                return 0;
            }
            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

fn classify(score: i32, alpha_orig: i32, beta: i32) -> Bound {
    if score <= alpha_orig {
        Bound::Upper
    } else if score >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    }
}

pub fn format_pv(pv: &[Move]) -> String {
    pv.iter().map(Move::to_string).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
