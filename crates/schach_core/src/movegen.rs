use crate::{attacks::piece_attacks, board::Board, types::*};

/// Generate all legal moves for `color`, returning a freshly allocated vector.
/// Internally delegates to `legal_moves_into`, cloning the board only once.
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut tmp = board.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, color, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
pub fn legal_moves_into(board: &mut Board, color: Color, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves(board, color, out, false);
    retain_legal(board, color, out);
}

/// Legal captures and promotions only, for quiescence search.
pub fn capture_moves_into(board: &mut Board, color: Color, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves(board, color, out, true);
    retain_legal(board, color, out);
}

// Filter illegal moves in-place by playing them on the mutable board.
fn retain_legal(board: &mut Board, color: Color, out: &mut Vec<Move>) {
    out.retain(|&mv| {
        let undo = board.make_move(mv);
        let illegal = board.in_check(color);
        board.unmake_move(mv, undo);
        !illegal
    });
}

fn pseudo_moves(board: &Board, color: Color, out: &mut Vec<Move>, tactical_only: bool) {
    let own = board.occupancy(color);
    let enemy = board.occupancy(color.other());
    let occupied = own | enemy;

    for from in own {
        let Some(pc) = board.piece_at(from) else {
            continue;
        };
        match pc.kind {
            PieceKind::Pawn => gen_pawn(board, from, pc, out, tactical_only),
            kind => {
                let targets = piece_attacks(kind, color, from, occupied) & !own;
                let targets = if tactical_only { targets & enemy } else { targets };
                for to in targets {
                    out.push(with_capture(board, Move::new(from, to)));
                }
                if kind == PieceKind::King && !tactical_only {
                    gen_castle(board, from, pc, out);
                }
            }
        }
    }
}

fn with_capture(board: &Board, mut mv: Move) -> Move {
    mv.captured = board.piece_at(mv.to);
    mv
}

fn push_pawn_move(board: &Board, from: u8, to: u8, pc: Piece, out: &mut Vec<Move>) {
    let mut mv = with_capture(board, Move::new(from, to));
    // Search only considers the strongest promotion
    if row_of(to) as u8 == pc.color.promotion_row() {
        mv.promo = Some(PieceKind::Angel);
    }
    out.push(mv);
}

fn gen_pawn(board: &Board, from: u8, pc: Piece, out: &mut Vec<Move>, tactical_only: bool) {
    let c = col_of(from);
    let r = row_of(from);
    let dir = pc.color.forward();

    // forward 1, forward 2 for an unmoved pawn
    if let Some(to) = sq(r + dir, c)
        && board.piece_at(to).is_none()
    {
        let promotes = row_of(to) as u8 == pc.color.promotion_row();
        if !tactical_only || promotes {
            push_pawn_move(board, from, to, pc, out);
        }
        if !tactical_only
            && !pc.has_moved
            && r as u8 == pc.color.pawn_row()
            && let Some(to2) = sq(r + 2 * dir, c)
            && board.piece_at(to2).is_none()
        {
            out.push(Move::new(from, to2));
        }
    }

    // captures
    for dc in [-1, 1] {
        if let Some(to) = sq(r + dir, c + dc)
            && let Some(target) = board.piece_at(to)
            && target.color != pc.color
        {
            push_pawn_move(board, from, to, pc, out);
        }
    }
}

/// King two columns toward an unmoved rook on the corner of its row.
fn gen_castle(board: &Board, from: u8, king: Piece, out: &mut Vec<Move>) {
    if king.has_moved || board.in_check(king.color) {
        return;
    }
    let row = row_of(from);
    let kc = col_of(from);
    let enemy = king.color.other();

    for (rook_col, step) in [(BOARD_SIZE as i8 - 1, 1i8), (0, -1)] {
        let Some(rook_sq) = sq(row, rook_col) else {
            continue;
        };
        let rook_ok = board.piece_at(rook_sq).is_some_and(|r| {
            r.kind == PieceKind::Rook && r.color == king.color && !r.has_moved
        });
        if !rook_ok {
            continue;
        }
        let mut col = kc + step;
        let mut clear = true;
        while col != rook_col {
            if sq(row, col).is_none_or(|s| board.piece_at(s).is_some()) {
                clear = false;
                break;
            }
            col += step;
        }
        if !clear {
            continue;
        }
        // King may not cross an attacked square; the landing square is checked by the legality filter
        let (Some(cross), Some(to)) = (sq(row, kc + step), sq(row, kc + 2 * step)) else {
            continue;
        };
        if to == rook_sq || board.is_square_attacked(cross, enemy) {
            continue;
        }
        let mut mv = Move::new(from, to);
        mv.is_castle = true;
        out.push(mv);
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
