//! Alpha-beta engine for 9×9 variant chess.
//!
//! [`SearchEngine`] is one engine session. It owns the transposition table,
//! the move-ordering tables, the opening book and the node counter, and
//! answers move, evaluation and analysis requests. It also implements
//! [`schach_core::Engine`] so the execution bridge can drive it.

pub mod book;
pub mod config;
mod error;
pub mod eval;
pub mod ordering;
mod pst;
pub mod search;
pub mod tt;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use schach_core::{
    legal_moves, Board, Color, Difficulty, Engine, Move, ProgressCallback, SearchLimits,
    SearchResult,
};
use tracing::{debug, info};

pub use book::{BookChoice, BookMove, OpeningBook};
pub use config::{DifficultyParams, DifficultyTable, EngineConfig, PruningParams, Randomization};
pub use error::{EngineError, Result};
pub use eval::{evaluate, evaluate_with, EvalWeights, Personality};
pub use search::{ScoredMove, INF, MATE};
pub use tt::{Bound, TTEntry, TranspositionTable};

use ordering::MoveOrdering;
use search::Searcher;

/// Number of scored candidates reported by [`SearchEngine::analyze`].
pub const TOP_MOVES: usize = 3;

/// Result of [`SearchEngine::analyze`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Score from the mover's point of view; 0 when there is no legal move.
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
    pub pv: Vec<Move>,
    pub best_move: Option<Move>,
    /// Up to [`TOP_MOVES`] root moves, best first.
    pub top_moves: Vec<ScoredMove>,
}

pub struct SearchEngine {
    config: EngineConfig,
    tt: TranspositionTable,
    ordering: MoveOrdering,
    book: OpeningBook,
    /// Nodes visited since the last reset, across searches.
    nodes: u64,
    progress: Option<ProgressCallback>,
    rng: StdRng,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("config", &self.config)
            .field("tt_capacity", &self.tt.capacity())
            .field("book_positions", &self.book.len())
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    /// Engine with the default configuration and the built-in book.
    pub fn new() -> Self {
        Self::build(EngineConfig::default(), OpeningBook::builtin())
    }

    /// Engine for `config`, loading `config.book_path` when set.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let book = match &config.book_path {
            Some(path) => OpeningBook::load(path)?,
            None => OpeningBook::builtin(),
        };
        Ok(Self::build(config, book))
    }

    fn build(config: EngineConfig, book: OpeningBook) -> Self {
        Self {
            tt: TranspositionTable::new(config.tt_capacity),
            ordering: MoveOrdering::new(),
            book,
            nodes: 0,
            progress: None,
            rng: StdRng::from_entropy(),
            config,
        }
    }

    /// Fix the random source used for book and difficulty choices.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Static evaluation of `board` for `color` in the configured personality.
    pub fn evaluate(&self, board: &Board, color: Color) -> i32 {
        eval::evaluate_with(board, color, &self.weights())
    }

    fn weights(&self) -> EvalWeights {
        self.config.personality.weights()
    }

    /// Best move for `color` searched to `depth`, capped by the difficulty level.
    ///
    /// Fails on a negative or too large depth, or a board without exactly one
    /// king per side. With no legal move the result has no move and score 0.
    pub fn best_move(
        &mut self,
        board: &Board,
        color: Color,
        depth: i32,
        difficulty: Difficulty,
    ) -> Result<SearchResult> {
        let limits = SearchLimits::checked_depth(depth)?.with_difficulty(difficulty);
        board.validate()?;
        Ok(self.run(board, color, limits))
    }

    /// Full-strength search of `board` to `depth` with scored top moves.
    pub fn analyze(&mut self, board: &Board, color: Color, depth: i32) -> Result<Analysis> {
        let limits = SearchLimits::checked_depth(depth)?;
        board.validate()?;
        if limits.depth == 0 {
            return Ok(Analysis {
                score: self.evaluate(board, color),
                ..Analysis::default()
            });
        }

        limits.start();
        self.tt.new_generation();
        self.ordering.age();
        let pruning = self.config.difficulty.expert.pruning.clone();
        let weights = self.weights();
        let mut searcher = Searcher::new(&mut self.tt, &mut self.ordering, &pruning, &limits)
            .with_weights(weights);
        let result = searcher.iterate(
            board,
            color,
            limits.depth,
            self.config.aspiration_window,
            self.progress.as_mut(),
        );
        let mut top_moves = Vec::new();
        if result.best_move.is_some() && !result.stopped {
            top_moves = searcher.score_root_moves(board, color, result.depth as i32);
            top_moves.truncate(TOP_MOVES);
        }
        let nodes = searcher.nodes();
        self.nodes += nodes;

        Ok(Analysis {
            score: result.score,
            depth: result.depth,
            nodes,
            pv: result.pv,
            best_move: result.best_move,
            top_moves,
        })
    }

    /// Principal variation stored in the transposition table, at most `depth` moves.
    pub fn extract_pv(&self, board: &Board, color: Color, depth: usize) -> Vec<Move> {
        search::extract_pv(&self.tt, board, color, depth)
    }

    pub fn probe_tt(&self, hash: u64, depth: i32) -> Option<TTEntry> {
        self.tt.probe(hash, depth)
    }

    pub fn store_tt(&mut self, entry: TTEntry) {
        self.tt.store(entry);
    }

    /// Forget everything learned by earlier searches: the transposition table
    /// and the killer, history and counter-move tables.
    pub fn clear_tt(&mut self) {
        self.tt.clear();
        self.ordering.clear();
    }

    pub fn set_opening_book(&mut self, book: OpeningBook) {
        info!(positions = book.len(), "opening book replaced");
        self.book = book;
    }

    pub fn query_opening_book(&self, board: &Board, color: Color) -> Option<&[BookMove]> {
        self.book.query(board, color)
    }

    pub fn nodes_evaluated(&self) -> u64 {
        self.nodes
    }

    /// Transposition table fill in permille.
    pub fn hashfull(&self) -> usize {
        self.tt.hashfull()
    }

    /// Positions in the opening book and the moves listed for them.
    pub fn book_size(&self) -> (usize, usize) {
        let moves = self.book.entries().map(|(_, moves)| moves.len()).sum();
        (self.book.len(), moves)
    }

    pub fn reset_nodes_evaluated(&mut self) {
        self.nodes = 0;
    }

    pub fn set_progress_callback(&mut self, callback: Option<ProgressCallback>) {
        self.progress = callback;
    }

    fn run(&mut self, board: &Board, color: Color, mut limits: SearchLimits) -> SearchResult {
        // A rating picks its own depth; a difficulty level caps the request.
        let (params, depth) = match limits.elo {
            Some(elo) => {
                let params = DifficultyParams::for_elo(elo);
                let depth = params.max_depth;
                (params, depth)
            }
            None => {
                let params = self.config.difficulty.get(limits.difficulty).clone();
                let depth = limits.depth.min(params.max_depth);
                (params, depth)
            }
        };
        if depth == 0 {
            return SearchResult {
                score: self.evaluate(board, color),
                ..SearchResult::default()
            };
        }

        if self.config.use_book {
            let choice = if params.randomization.candidates > 1 {
                BookChoice::Weighted
            } else {
                BookChoice::Best
            };
            if let Some(mv) = self.book.pick(board, color, choice, &mut self.rng) {
                info!(%mv, "book move");
                return SearchResult {
                    best_move: Some(mv),
                    score: self.evaluate(board, color),
                    pv: vec![mv],
                    ..SearchResult::default()
                };
            }
        }

        if let Some(ms) = self.config.move_time_ms {
            limits = limits.or_move_time(Duration::from_millis(ms));
        }
        limits.start();
        self.tt.new_generation();
        self.ordering.age();

        let weights = self.weights();
        let mut searcher = Searcher::new(&mut self.tt, &mut self.ordering, &params.pruning, &limits)
            .with_weights(weights);
        let mut result = searcher.iterate(
            board,
            color,
            depth,
            self.config.aspiration_window,
            self.progress.as_mut(),
        );

        if params.randomization.candidates > 1 && result.best_move.is_some() && !result.stopped {
            let scored = searcher.score_root_moves(board, color, result.depth as i32);
            if let Some(pick) = choose_candidate(&scored, &params.randomization, &mut self.rng) {
                if result.best_move != Some(pick.mv) {
                    debug!(best = ?result.best_move, played = %pick.mv, "randomized move");
                    result.best_move = Some(pick.mv);
                    result.score = pick.score;
                    result.pv = vec![pick.mv];
                }
            }
        }

        // Stopped before the first iteration finished: any legal move beats none.
        if result.best_move.is_none() && result.stopped {
            result.best_move = legal_moves(board, color).first().copied();
            result.pv = result.best_move.into_iter().collect();
        }

        result.nodes = searcher.nodes();
        self.nodes += result.nodes;
        debug!(
            depth = result.depth,
            score = result.score,
            nodes = result.nodes,
            stopped = result.stopped,
            elapsed_ms = limits.time_control.elapsed().as_millis() as u64,
            "search finished"
        );
        result
    }
}

/// Best move with probability `best_move_probability`, otherwise a uniform
/// pick among the top `candidates`. Expects a validated `randomization`.
fn choose_candidate<R: Rng + ?Sized>(
    scored: &[ScoredMove],
    randomization: &Randomization,
    rng: &mut R,
) -> Option<ScoredMove> {
    let best = *scored.first()?;
    if rng.gen_bool(randomization.best_move_probability) {
        return Some(best);
    }
    let pool = &scored[..randomization.candidates.clamp(1, scored.len())];
    pool.choose(rng).copied()
}

impl Engine for SearchEngine {
    fn search(&mut self, board: &Board, color: Color, limits: SearchLimits) -> SearchResult {
        self.run(board, color, limits)
    }

    fn name(&self) -> &str {
        "AlphaBeta 9x9"
    }

    fn new_game(&mut self) {
        self.clear_tt();
        self.nodes = 0;
        info!("engine session reset");
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        match name.to_ascii_lowercase().as_str() {
            "hash" | "tt_capacity" => match value.parse::<usize>() {
                Ok(capacity) => {
                    self.config.tt_capacity = capacity;
                    self.tt = TranspositionTable::new(capacity);
                    true
                }
                Err(_) => false,
            },
            "ownbook" | "use_book" => match value.parse::<bool>() {
                Ok(on) => {
                    self.config.use_book = on;
                    true
                }
                Err(_) => false,
            },
            "aspiration_window" => match value.parse::<i32>() {
                Ok(window) => {
                    self.config.aspiration_window = window;
                    true
                }
                Err(_) => false,
            },
            "personality" => match value.parse::<Personality>() {
                Ok(personality) => {
                    self.config.personality = personality;
                    true
                }
                Err(_) => false,
            },
            "seed" => match value.parse::<u64>() {
                Ok(seed) => {
                    self.rng = StdRng::seed_from_u64(seed);
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }

    fn set_progress_callback(&mut self, callback: Option<ProgressCallback>) {
        SearchEngine::set_progress_callback(self, callback);
    }
}
