//! JSON messages exchanged with the bridge, one object per line.
//!
//! ```json
//! {"kind":"SEARCH","id":7,"board":"<diagram>","color":"white","depth":4,"difficulty":"hard"}
//! {"kind":"SEARCH","id":8,"board":"<diagram>","color":"black","depth":4,"elo":1500,"move_time_ms":300}
//! {"kind":"SEARCH_RESULT","id":7,"payload":{"move":"e2e4","score":35,"nodes":4210}}
//! ```

use std::time::Duration;

use schach_core::{Board, Color, Difficulty, Move, SearchLimits, SearchResult};
use serde::{Deserialize, Serialize};

use crate::BridgeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    Search(SearchRequest),
    SearchResult { id: u64, payload: ResultPayload },
    Progress { id: u64, payload: ProgressPayload },
    SearchError { id: u64, error: String },
}

impl Message {
    pub fn from_json(line: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn to_json(&self) -> Result<String, BridgeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Message::Search(_) => "SEARCH",
            Message::SearchResult { .. } => "SEARCH_RESULT",
            Message::Progress { .. } => "PROGRESS",
            Message::SearchError { .. } => "SEARCH_ERROR",
        }
    }
}

/// A search request. The board is a diagram in the notation of `schach_core`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub id: u64,
    pub board: String,
    pub color: Color,
    pub depth: i32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_time_ms: Option<u64>,
    /// Playing strength as a rating. Replaces `difficulty` and `depth` for
    /// engines that support it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elo: Option<u32>,
}

impl SearchRequest {
    pub fn new(id: u64, board: &Board, color: Color, depth: i32, difficulty: Difficulty) -> Self {
        Self {
            id,
            board: board.to_diagram(),
            color,
            depth,
            difficulty,
            move_time_ms: None,
            elo: None,
        }
    }

    /// Parse and check the request: a readable diagram with one king per
    /// side and a depth in range.
    pub fn validate(&self) -> Result<(Board, SearchLimits), BridgeError> {
        let board = Board::from_diagram(&self.board)?;
        board.validate()?;
        let mut limits = SearchLimits::checked_depth(self.depth)?.with_difficulty(self.difficulty);
        if let Some(ms) = self.move_time_ms {
            limits = limits.or_move_time(Duration::from_millis(ms));
        }
        if let Some(elo) = self.elo {
            limits = limits.with_elo(elo);
        }
        Ok((board, limits))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPayload {
    /// Move text, `null` when the side to move has no legal move.
    #[serde(rename = "move")]
    pub mv: Option<String>,
    pub score: i32,
    pub nodes: u64,
    #[serde(default)]
    pub depth: u8,
    #[serde(default)]
    pub pv: Vec<String>,
}

impl From<&SearchResult> for ResultPayload {
    fn from(result: &SearchResult) -> Self {
        Self {
            mv: result.best_move.map(|m| m.to_string()),
            score: result.score,
            nodes: result.nodes,
            depth: result.depth,
            pv: move_texts(&result.pv),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressPayload {
    pub depth: u8,
    pub score: i32,
    pub nodes: u64,
    pub pv: Vec<String>,
}

impl From<&SearchResult> for ProgressPayload {
    fn from(result: &SearchResult) -> Self {
        Self {
            depth: result.depth,
            score: result.score,
            nodes: result.nodes,
            pv: move_texts(&result.pv),
        }
    }
}

fn move_texts(moves: &[Move]) -> Vec<String> {
    moves.iter().map(Move::to_string).collect()
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
