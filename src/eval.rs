//! The [`Evaluator`] contract and a minimal material+PST reference
//! implementation. Search treats evaluation as a black box; real strength
//! comes from swapping in a richer `Evaluator`, not from this one.

use crate::position::Position;
use crate::types::{Color, PieceType, Square, Value};

/// Produces a static score for a position from the side-to-move's point of
/// view: positive favors whoever is to move.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, position: &Position) -> Value;
}

#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     5,  10,  10, -20, -20,  10,  10,   5,
     5,  -5, -10,   0,   0, -10,  -5,   5,
     0,   0,   0,  20,  20,   0,   0,   0,
     5,   5,  10,  25,  25,  10,   5,   5,
    10,  10,  20,  30,  30,  20,  10,  10,
    50,  50,  50,  50,  50,  50,  50,  50,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
     0,   0,   0,   5,   5,   0,   0,   0,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
     5,  10,  10,  10,  10,  10,  10,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -10,   5,   5,   5,   5,   5,   0, -10,
      0,   0,   5,   5,   5,   5,   0,  -5,
     -5,   0,   5,   5,   5,   5,   0,  -5,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_PST: [i32; 64] = [
     20,  30,  10,   0,   0,  10,  30,  20,
     20,  20,   0,   0,   0,   0,  20,  20,
    -10, -20, -20, -20, -20, -20, -20, -10,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
];

fn pst(pt: PieceType, color: Color, sq: Square) -> i32 {
    let table = match pt {
        PieceType::Pawn => &PAWN_PST,
        PieceType::Knight => &KNIGHT_PST,
        PieceType::Bishop => &BISHOP_PST,
        PieceType::Rook => &ROOK_PST,
        PieceType::Queen => &QUEEN_PST,
        PieceType::King => &KING_PST,
    };
    // Tables are laid out from White's perspective (rank 0 = White's back
    // rank at the bottom of the array); mirror vertically for Black.
    let idx = match color {
        Color::White => sq.index(),
        Color::Black => sq.index() ^ 56,
    };
    table[idx]
}

/// Material + piece-square-table evaluator. Deliberately simple: it exists
/// so the crate is runnable and testable end to end, not to play strong
/// chess. See [`Evaluator`].
#[derive(Default)]
pub struct SimpleEvaluator;

const TEMPO_BONUS: i32 = 10;

impl Evaluator for SimpleEvaluator {
    fn evaluate(&self, position: &Position) -> Value {
        let mut score = 0i32;
        for &pt in &crate::types::PIECE_TYPES {
            for sq in position.pieces(Color::White, pt) {
                score += pt.value() + pst(pt, Color::White, sq);
            }
            for sq in position.pieces(Color::Black, pt) {
                score -= pt.value() + pst(pt, Color::Black, sq);
            }
        }
        score += TEMPO_BONUS;
        match position.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_balanced_apart_from_tempo() {
        let pos = Position::startpos();
        let eval = SimpleEvaluator.evaluate(&pos);
        assert_eq!(eval, TEMPO_BONUS);
    }

    #[test]
    fn extra_queen_favors_its_side() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let eval = SimpleEvaluator.evaluate(&pos);
        assert!(eval > PieceType::Queen.value());
    }
}
