//! Static evaluation.
//!
//! Every term is summed as White minus Black and the total is negated for
//! Black, so `evaluate(b, White) == -evaluate(b, Black)` holds exactly and a
//! color-flipped board scores the same for the flipped side.
//!
//! A [`Personality`] reweights whole terms before they are combined, which
//! keeps that symmetry for every weight set.

use std::str::FromStr;

use schach_core::{
    Bitboard, Board, Color, PieceKind, col_of, king_attacks, pawn_attacks, pawn_front_span,
    piece_attacks, row_of,
};
use serde::{Deserialize, Serialize};

use crate::pst::pst;

/// Centipawn value per piece kind, indexed by `PieceKind::idx`.
pub const PIECE_VALUES: [i32; PieceKind::COUNT] = [100, 320, 330, 500, 900, 20_000, 600, 700, 1000];

/// Phase contribution of each kind; pawns and kings count nothing.
const PHASE_WEIGHTS: [i32; PieceKind::COUNT] = [0, 1, 1, 2, 4, 0, 3, 3, 4];

/// Phase of the start position. Larger totals are clamped.
pub const MAX_PHASE: i32 = 28;

/// Attack units per zone square hit, by attacker kind.
const KING_ATTACK_WEIGHTS: [i32; PieceKind::COUNT] = [10, 20, 20, 30, 50, 0, 40, 45, 60];

/// Scale applied to attack units by the number of distinct attackers, in sixteenths.
const ATTACKER_SCALE: [i32; 8] = [0, 8, 12, 14, 15, 16, 16, 16];

const MOBILITY_WEIGHT: i32 = 3;
const BISHOP_PAIR: i32 = 50;
const DOUBLED_PAWN: i32 = 15;
const ISOLATED_PAWN: i32 = 20;
const LINKED_PAWN: i32 = 10;
const MOP_UP_MARGIN: i32 = 200;

/// Playing style: which evaluation terms the engine cares about most.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Normal,
    /// Prefers active pieces over pawn structure and king cover.
    Aggressive,
    /// Prefers pawn structure and king safety over activity.
    Solid,
    /// Undervalues material and activity a little.
    Gentle,
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Personality::Normal,
        Personality::Aggressive,
        Personality::Solid,
        Personality::Gentle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Personality::Normal => "normal",
            Personality::Aggressive => "aggressive",
            Personality::Solid => "solid",
            Personality::Gentle => "gentle",
        }
    }

    pub fn weights(self) -> EvalWeights {
        let normal = EvalWeights::default();
        match self {
            Personality::Normal => normal,
            Personality::Aggressive => EvalWeights {
                attack: 140,
                pawn_structure: 70,
                king_safety: 80,
                ..normal
            },
            Personality::Solid => EvalWeights {
                attack: 70,
                pawn_structure: 130,
                king_safety: 140,
                ..normal
            },
            Personality::Gentle => EvalWeights {
                material: 90,
                attack: 80,
                ..normal
            },
        }
    }
}

impl FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Personality::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown personality '{s}'"))
    }
}

/// Per-term weights in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalWeights {
    /// Piece values.
    pub material: i32,
    /// Mobility of the pieces.
    pub attack: i32,
    /// Doubled, isolated, linked and passed pawns.
    pub pawn_structure: i32,
    /// Pressure on the king zone.
    pub king_safety: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            material: 100,
            attack: 100,
            pawn_structure: 100,
            king_safety: 100,
        }
    }
}

#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    PIECE_VALUES[kind.idx()]
}

/// Score of `board` in centipawns; positive favors `color`.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    evaluate_with(board, color, &EvalWeights::default())
}

/// [`evaluate`] with the terms reweighted by `weights`.
pub fn evaluate_with(board: &Board, color: Color, weights: &EvalWeights) -> i32 {
    let white = white_relative(board, weights);
    match color {
        Color::White => white,
        Color::Black => -white,
    }
}

/// `term` scaled by a percentage. Truncates toward zero, so `-term` scales to
/// exactly the negation.
#[inline]
fn weighted(term: i32, percent: i32) -> i32 {
    term * percent / 100
}

fn sign(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

fn white_relative(board: &Board, weights: &EvalWeights) -> i32 {
    let occupied = board.occupied();
    // Terms outside `mg`/`eg` are not phase-scaled.
    let mut flat = 0;
    let mut mg = 0;
    let mut eg = 0;
    let mut phase = 0;
    let mut material = [0i32; 2];
    let mut balance = 0;
    let mut mobility = 0;
    let mut danger = 0;

    for (s, pc) in board.pieces() {
        let sign = sign(pc.color);
        let value = piece_value(pc.kind);
        balance += sign * value;
        if pc.kind != PieceKind::King {
            material[pc.color.idx()] += value;
        }
        phase += PHASE_WEIGHTS[pc.kind.idx()];

        let (m, e) = pst(pc.kind, pc.color, s);
        mg += sign * m;
        eg += sign * e;

        if !matches!(pc.kind, PieceKind::Pawn | PieceKind::King) {
            let reach = piece_attacks(pc.kind, pc.color, s, occupied) & !board.occupancy(pc.color);
            mobility += sign * MOBILITY_WEIGHT * reach.popcount() as i32;
        }
    }

    let (mut pawns_mg, mut pawns_eg) = (0, 0);
    for color in Color::ALL {
        let sign = sign(color);
        let (pm, pe) = pawn_structure(board, color);
        pawns_mg += sign * pm;
        pawns_eg += sign * pe;
        if board.pieces_of(color, PieceKind::Bishop).popcount() >= 2 {
            flat += sign * BISHOP_PAIR;
        }
        danger += sign * king_danger(board, color);
    }

    flat += weighted(balance, weights.material) + weighted(mobility, weights.attack)
        - weighted(danger, weights.king_safety);
    mg += weighted(pawns_mg, weights.pawn_structure);
    eg += weighted(pawns_eg, weights.pawn_structure);

    let phase = phase.min(MAX_PHASE);
    eg += mop_up(board, material, phase);

    flat + (mg * phase + eg * (MAX_PHASE - phase)) / MAX_PHASE
}

/// Penalty for enemy pressure on the 3×3 zone around `color`'s king.
///
/// Each enemy piece other than the king that attacks or stands on a zone
/// square contributes its weight once per square it hits. The sum is scaled
/// by how many distinct pieces take part. Zero when the king is missing.
pub fn king_danger(board: &Board, color: Color) -> i32 {
    let Some(ksq) = board.king_sq(color) else {
        return 0;
    };
    let zone = king_attacks(ksq) | Bitboard::from_square(ksq);
    let enemy = color.other();
    let occupied = board.occupied();

    let mut units = 0;
    let mut attackers = 0usize;
    for s in board.occupancy(enemy) {
        let Some(pc) = board.piece_at(s) else {
            continue;
        };
        if pc.kind == PieceKind::King {
            continue;
        }
        let reach = piece_attacks(pc.kind, enemy, s, occupied) | Bitboard::from_square(s);
        let hits = (reach & zone).popcount() as i32;
        if hits > 0 {
            units += KING_ATTACK_WEIGHTS[pc.kind.idx()] * hits;
            attackers += 1;
        }
    }

    units * ATTACKER_SCALE[attackers.min(ATTACKER_SCALE.len() - 1)] / 16
}

/// Bonus for a passed pawn that has advanced `progress` rows.
pub fn passed_pawn_bonus(progress: i32, supported: bool) -> i32 {
    let base = progress * progress * 5;
    if supported { base * 13 / 10 } else { base }
}

/// Rows advanced from the owner's back rank.
fn pawn_progress(sq: u8, color: Color) -> i32 {
    let row = row_of(sq) as i32;
    match color {
        Color::White => 8 - row,
        Color::Black => row,
    }
}

/// Midgame and endgame pawn-structure score for one side.
fn pawn_structure(board: &Board, color: Color) -> (i32, i32) {
    let own = board.pieces_of(color, PieceKind::Pawn);
    let enemy = board.pieces_of(color.other(), PieceKind::Pawn);

    let mut files = [0i32; 9];
    for s in own {
        files[col_of(s) as usize] += 1;
    }

    let mut penalty = 0;
    for (col, &count) in files.iter().enumerate() {
        if count == 0 {
            continue;
        }
        if count > 1 {
            penalty += DOUBLED_PAWN * (count - 1);
        }
        let left = col.checked_sub(1).map_or(0, |c| files[c]);
        let right = files.get(col + 1).copied().unwrap_or(0);
        if left + right == 0 {
            penalty += ISOLATED_PAWN * count;
        }
    }

    let mut mg = -penalty;
    let mut eg = -penalty;
    for s in own {
        // A friendly pawn on either square diagonally behind.
        let supported = !(pawn_attacks(s, color.other()) & own).is_empty();
        if (pawn_front_span(s, color) & enemy).is_empty() {
            let bonus = passed_pawn_bonus(pawn_progress(s, color), supported);
            mg += bonus;
            eg += 2 * bonus;
        } else if supported {
            mg += LINKED_PAWN;
            eg += LINKED_PAWN;
        }
    }
    (mg, eg)
}

/// Endgame drive of the losing king toward the edge, White minus Black.
fn mop_up(board: &Board, material: [i32; 2], phase: i32) -> i32 {
    // Only once the endgame weight exceeds 0.4.
    if phase * 10 >= MAX_PHASE * 6 {
        return 0;
    }
    let lead = material[0] - material[1];
    let winner = if lead > MOP_UP_MARGIN {
        Color::White
    } else if lead < -MOP_UP_MARGIN {
        Color::Black
    } else {
        return 0;
    };
    let (Some(own), Some(theirs)) = (board.king_sq(winner), board.king_sq(winner.other())) else {
        return 0;
    };

    let center = (row_of(theirs) - 4).abs() + (col_of(theirs) - 4).abs();
    let distance = (row_of(own) - row_of(theirs)).abs() + (col_of(own) - col_of(theirs)).abs();
    sign(winner) * (center as i32 * 10 + (14 - distance as i32) * 4)
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
