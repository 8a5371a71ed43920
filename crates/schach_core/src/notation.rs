//! Text forms for boards and moves.
//!
//! A diagram lists rows 0 to 8 (Black's back rank first) separated by `/`,
//! with digits for runs of empty squares and piece letters uppercase for White:
//! `rnbakcbnr/ppppppppp/9/9/9/9/9/PPPPPPPPP/RNBAKCBNR`. A position appends the
//! side to move: `<diagram> w`.

use thiserror::Error;

use crate::{board::Board, movegen::legal_moves, types::*};

/// Diagram of the standard setup.
pub const START_DIAGRAM: &str = "rnbakcbnr/ppppppppp/9/9/9/9/9/PPPPPPPPP/RNBAKCBNR";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("expected 9 rows, found {0}")]
    RowCount(usize),
    #[error("row {row} describes {cols} squares, expected 9")]
    RowWidth { row: usize, cols: usize },
    #[error("invalid piece letter '{0}'")]
    PieceLetter(char),
    #[error("invalid side to move '{0}'")]
    SideToMove(String),
    #[error("malformed move '{0}'")]
    MoveSyntax(String),
    #[error("illegal move '{0}'")]
    IllegalMove(String),
}

impl Board {
    /// Parse a diagram. `has_moved` is inferred: pawns off their starting row
    /// and kings or rooks off their starting squares count as moved.
    pub fn from_diagram(diagram: &str) -> Result<Board, NotationError> {
        let rows: Vec<&str> = diagram.trim().split('/').collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(NotationError::RowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (row, text) in rows.iter().enumerate() {
            let mut col = 0usize;
            for ch in text.chars() {
                if let Some(d) = ch.to_digit(10) {
                    col += d as usize;
                    continue;
                }
                let kind = PieceKind::from_char(ch).ok_or(NotationError::PieceLetter(ch))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let Some(s) = sq(row as i8, col as i8) else {
                    return Err(NotationError::RowWidth { row, cols: col + 1 });
                };
                let piece = Piece {
                    color,
                    kind,
                    has_moved: !on_starting_square(kind, color, s),
                };
                board.set_piece(s, Some(piece));
                col += 1;
            }
            if col != BOARD_SIZE as usize {
                return Err(NotationError::RowWidth { row, cols: col });
            }
        }
        Ok(board)
    }

    pub fn to_diagram(&self) -> String {
        let mut out = String::with_capacity(64);
        for row in 0..BOARD_SIZE as i8 {
            if row > 0 {
                out.push('/');
            }
            let mut empty = 0;
            for col in 0..BOARD_SIZE as i8 {
                match sq(row, col).and_then(|s| self.piece_at(s)) {
                    Some(pc) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(pc.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
        }
        out
    }

    /// Human-readable grid with coordinates, rank 9 at the top.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        for row in 0..BOARD_SIZE as i8 {
            out.push_str(&format!("{} ", BOARD_SIZE as i8 - row));
            for col in 0..BOARD_SIZE as i8 {
                let ch = sq(row, col)
                    .and_then(|s| self.piece_at(s))
                    .map_or('.', |pc| pc.to_char());
                out.push(' ');
                out.push(ch);
            }
            out.push('\n');
        }
        out.push_str("   a b c d e f g h i\n");
        out
    }
}

fn on_starting_square(kind: PieceKind, color: Color, s: u8) -> bool {
    let row = row_of(s) as u8;
    match kind {
        PieceKind::Pawn => row == color.pawn_row(),
        PieceKind::King => row == color.home_row() && col_of(s) == crate::board::KING_HOME_COL,
        PieceKind::Rook => {
            row == color.home_row() && (col_of(s) == 0 || col_of(s) == BOARD_SIZE as i8 - 1)
        }
        _ => true,
    }
}

/// Parse `startpos` or `<diagram> <w|b>`. The side defaults to White.
pub fn parse_position(text: &str) -> Result<(Board, Color), NotationError> {
    let mut parts = text.split_whitespace();
    let board = match parts.next() {
        Some("startpos") | None => Board::startpos(),
        Some(diagram) => Board::from_diagram(diagram)?,
    };
    let color = match parts.next() {
        None => Color::White,
        Some(side) => side
            .chars()
            .next()
            .filter(|_| side.len() == 1)
            .and_then(Color::from_char)
            .ok_or_else(|| NotationError::SideToMove(side.to_string()))?,
    };
    Ok((board, color))
}

/// Canonical key of a position: diagram plus side to move.
pub fn position_key(board: &Board, color: Color) -> String {
    format!("{} {}", board.to_diagram(), color.to_char())
}

/// Split `e2e3` / `e8e9e` into squares and promotion without checking legality.
pub fn parse_move_text(txt: &str) -> Result<(u8, u8, Option<PieceKind>), NotationError> {
    let bad = || NotationError::MoveSyntax(txt.to_string());
    if !txt.is_ascii() || !(4..=5).contains(&txt.len()) {
        return Err(bad());
    }
    let from = coord_to_sq(&txt[0..2]).ok_or_else(bad)?;
    let to = coord_to_sq(&txt[2..4]).ok_or_else(bad)?;
    let promo = match txt[4..].chars().next() {
        Some(c) => Some(PieceKind::from_char(c).ok_or_else(bad)?),
        None => None,
    };
    Ok((from, to, promo))
}

/// Parse move text and match it against the legal moves of `color`, so the
/// castle flag and captured piece are filled in.
pub fn parse_move(board: &Board, color: Color, txt: &str) -> Result<Move, NotationError> {
    let (from, to, promo) = parse_move_text(txt)?;
    let found = legal_moves(board, color)
        .into_iter()
        .find(|m| m.from == from && m.to == to);
    match (found, promo) {
        (Some(mv), None) => Ok(mv),
        // Any promotion piece other than pawn and king may be requested
        (Some(mut mv), Some(kind))
            if mv.promo.is_some() && !matches!(kind, PieceKind::Pawn | PieceKind::King) =>
        {
            mv.promo = Some(kind);
            Ok(mv)
        }
        _ => Err(NotationError::IllegalMove(txt.to_string())),
    }
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
