//! Engine configuration.
//!
//! Loaded from TOML. Every field is optional; a `[difficulty.<label>]` table
//! replaces that level's parameters as a whole, so it must list all of them.
//!
//! ```toml
//! tt_capacity = 262144
//! aspiration_window = 40
//! use_book = true
//! personality = "solid"
//!
//! [difficulty.easy]
//! max_depth = 2
//! pruning = { null_move = false, null_move_reduction = 2, adaptive_null_move = false, late_move_reduction = false, lmr_move_threshold = 4 }
//! randomization = { candidates = 3, best_move_probability = 0.7 }
//! ```

use std::path::{Path, PathBuf};

use schach_core::Difficulty;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::eval::Personality;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Transposition table slots, rounded up to a power of two.
    pub tt_capacity: usize,
    /// Half-width of the aspiration window in centipawns. Zero disables it.
    pub aspiration_window: i32,
    /// Default per-move time limit when a request carries none.
    pub move_time_ms: Option<u64>,
    pub use_book: bool,
    /// Opening book JSON replacing the built-in book.
    pub book_path: Option<PathBuf>,
    /// Evaluation style used by every search.
    pub personality: Personality,
    pub difficulty: DifficultyTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tt_capacity: 1 << 16,
            aspiration_window: 50,
            move_time_ms: None,
            use_book: true,
            book_path: None,
            personality: Personality::default(),
            difficulty: DifficultyTable::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject difficulty levels the search cannot play.
    pub fn validate(&self) -> Result<()> {
        for difficulty in Difficulty::ALL {
            self.difficulty
                .get(difficulty)
                .validate()
                .map_err(|reason| EngineError::Difficulty { difficulty, reason })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub beginner: DifficultyParams,
    pub easy: DifficultyParams,
    pub medium: DifficultyParams,
    pub hard: DifficultyParams,
    pub expert: DifficultyParams,
}

impl DifficultyTable {
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyParams {
        match difficulty {
            Difficulty::Beginner => &self.beginner,
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
            Difficulty::Expert => &self.expert,
        }
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            beginner: DifficultyParams {
                max_depth: 1,
                pruning: PruningParams::disabled(),
                randomization: Randomization {
                    candidates: 5,
                    best_move_probability: 0.0,
                },
            },
            easy: DifficultyParams {
                max_depth: 2,
                pruning: PruningParams::disabled(),
                randomization: Randomization {
                    candidates: 3,
                    best_move_probability: 0.7,
                },
            },
            medium: DifficultyParams {
                max_depth: 3,
                pruning: PruningParams {
                    null_move_reduction: 2,
                    ..PruningParams::enabled()
                },
                randomization: Randomization {
                    candidates: 2,
                    best_move_probability: 0.7,
                },
            },
            hard: DifficultyParams {
                max_depth: 4,
                pruning: PruningParams::enabled(),
                randomization: Randomization::best_only(),
            },
            expert: DifficultyParams {
                max_depth: 5,
                pruning: PruningParams {
                    adaptive_null_move: true,
                    ..PruningParams::enabled()
                },
                randomization: Randomization::best_only(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Ceiling on the requested search depth.
    pub max_depth: u8,
    pub pruning: PruningParams,
    pub randomization: Randomization,
}

impl DifficultyParams {
    /// Parameters approximating a player rated `elo`. The depth is the one
    /// searched, not a ceiling.
    pub fn for_elo(elo: u32) -> Self {
        let max_depth = match elo {
            0..=999 => 3,
            1000..=1399 => 4,
            1400..=1799 => 5,
            1800..=2199 => 6,
            _ => 8,
        };
        let pruning = match elo {
            0..=999 => PruningParams::disabled(),
            1000..=2199 => PruningParams::enabled(),
            _ => PruningParams {
                adaptive_null_move: true,
                ..PruningParams::enabled()
            },
        };
        // Weaker players sometimes miss the best move.
        let randomization = match elo {
            0..=999 => Randomization {
                candidates: 3,
                best_move_probability: 0.6,
            },
            1000..=1399 => Randomization {
                candidates: 2,
                best_move_probability: 0.85,
            },
            _ => Randomization::best_only(),
        };
        Self {
            max_depth,
            pruning,
            randomization,
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.pruning.null_move_reduction < 0 {
            return Err(format!(
                "null_move_reduction {} is negative",
                self.pruning.null_move_reduction
            ));
        }
        self.randomization.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PruningParams {
    pub null_move: bool,
    /// Base reduction R of the null-move search.
    pub null_move_reduction: i32,
    /// Add `depth / 6` to R.
    pub adaptive_null_move: bool,
    pub late_move_reduction: bool,
    /// Moves searched at full depth before LMR applies.
    pub lmr_move_threshold: usize,
}

impl PruningParams {
    pub fn enabled() -> Self {
        Self {
            null_move: true,
            null_move_reduction: 3,
            adaptive_null_move: false,
            late_move_reduction: true,
            lmr_move_threshold: 4,
        }
    }

    pub fn disabled() -> Self {
        Self {
            null_move: false,
            late_move_reduction: false,
            ..Self::enabled()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Randomization {
    /// How many of the best root moves may be played.
    pub candidates: usize,
    /// Chance of playing the best move when `candidates > 1`.
    pub best_move_probability: f64,
}

impl Randomization {
    pub fn best_only() -> Self {
        Self {
            candidates: 1,
            best_move_probability: 1.0,
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.candidates == 0 {
            return Err("candidates must be at least 1".into());
        }
        let p = self.best_move_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(format!("best_move_probability {p} is outside 0..=1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
