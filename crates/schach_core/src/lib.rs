pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod time_control;
pub mod types;
pub mod zobrist;

// Re-export board logic shared by every engine
pub use attacks::*;
pub use bitboard::*;
pub use board::*;
pub use movegen::*;
pub use notation::*;
pub use perft::perft;
pub use time_control::*;
pub use types::*;
pub use zobrist::ZOBRIST;

// =============================================================================
// Engine trait
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// The best move found (None if no legal moves, or at depth 0)
    pub best_move: Option<Move>,
    /// Evaluation score in centipawns from the mover's perspective
    pub score: i32,
    /// Search depth reached
    pub depth: u8,
    /// Number of nodes searched
    pub nodes: u64,
    /// Principal variation, starting with `best_move`
    pub pv: Vec<Move>,
    /// Whether search was stopped early by time, node budget or `stop()`
    pub stopped: bool,
}

/// Receives the partial result after every completed iteration.
pub type ProgressCallback = Box<dyn FnMut(&SearchResult) + Send>;

/// Trait implemented by search engines.
///
/// The execution bridge drives engines through this trait so that it does not
/// depend on a particular search implementation.
pub trait Engine: Send {
    /// Search the position for `color` within the given limits.
    fn search(&mut self, board: &Board, color: Color, limits: SearchLimits) -> SearchResult;

    /// Returns the engine's name
    fn name(&self) -> &str;

    /// Returns the engine's author
    fn author(&self) -> &str {
        "schach9"
    }

    /// Reset internal state for a new game (clear hash tables, history, etc.)
    fn new_game(&mut self) {}

    /// Optional: set a named option. Returns true if the option was recognized.
    fn set_option(&mut self, _name: &str, _value: &str) -> bool {
        false
    }

    /// Register or clear the per-iteration progress callback.
    fn set_progress_callback(&mut self, _callback: Option<ProgressCallback>) {}
}
