use schach_core::{BoardError, Difficulty, LimitsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid search depth: {0}")]
    InvalidDepth(#[from] LimitsError),

    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),

    #[error("invalid engine configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid {} difficulty: {reason}", difficulty.as_str())]
    Difficulty {
        difficulty: Difficulty,
        reason: String,
    },

    #[error("malformed opening book: {0}")]
    BookFormat(#[from] serde_json::Error),

    #[error("opening book position '{key}' lists unreadable move '{mv}'")]
    BookMove { key: String, mv: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
