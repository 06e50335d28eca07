//! Static Exchange Evaluation: the net material result of a capture
//! sequence on one square, used to filter "good captures" during
//! quiescence search and move ordering.

use crate::attacks;
use crate::bitboard::Bitboard;
use crate::moves::{Move, MoveType};
use crate::position::Position;
use crate::types::{Color, PieceType};

/// Evaluates the capture sequence on `m`'s target square from the
/// perspective of the side to move. Positive means the exchange favors the
/// mover.
#[must_use]
pub fn see(pos: &Position, m: Move) -> i32 {
    let to = m.to();
    let us = pos.side_to_move();

    if m.move_type() == MoveType::EnPassant {
        return PieceType::Pawn.value();
    }

    let mut gain = [0i32; 32];
    let mut depth = 0usize;

    let initial_victim_value = match pos.piece_at(to).piece_type() {
        Some(pt) => pt.value(),
        None => 0,
    };
    gain[0] = initial_victim_value;

    let mut occupied = pos.all_occupied();
    occupied.clear(m.from());
    let mut rotated_l90 = attacks::toggle_l90(pos.rotated_l90(), m.from(), false);
    let mut rotated_r45 = attacks::toggle_r45(pos.rotated_r45(), m.from(), false);
    let mut rotated_l45 = attacks::toggle_l45(pos.rotated_l45(), m.from(), false);

    let from_pt = match m.move_type() {
        MoveType::Promotion => m.promotion().expect("promotion move carries a target piece"),
        _ => pos
            .piece_at(m.from())
            .piece_type()
            .expect("see called with no piece on from-square"),
    };
    let mut moving_value = if m.move_type() == MoveType::Promotion {
        from_pt.value() - PieceType::Pawn.value()
    } else {
        from_pt.value()
    };

    let mut side = us.opposite();

    loop {
        depth += 1;
        gain[depth] = moving_value - gain[depth - 1];
        if (-gain[depth - 1]).max(gain[depth]) < 0 {
            break;
        }

        let attackers = attackers_to(pos, to, occupied, rotated_l90, rotated_r45, rotated_l45) & occupied;
        let side_attackers = attackers & color_mask(pos, side);
        if side_attackers.is_empty() {
            break;
        }
        let (attacker_sq, attacker_pt) = least_valuable_attacker(pos, side_attackers);
        occupied.clear(attacker_sq);
        rotated_l90 = attacks::toggle_l90(rotated_l90, attacker_sq, false);
        rotated_r45 = attacks::toggle_r45(rotated_r45, attacker_sq, false);
        rotated_l45 = attacks::toggle_l45(rotated_l45, attacker_sq, false);
        moving_value = attacker_pt.value();
        side = side.opposite();

        if depth >= gain.len() - 1 {
            break;
        }
    }

    depth -= 1;
    while depth > 0 {
        gain[depth - 1] = -((-gain[depth - 1]).max(gain[depth]));
        depth -= 1;
    }
    gain[0]
}

/// A cheap boolean filter used by quiescence search: is this capture worth
/// searching at all?
#[must_use]
pub fn is_good_capture(pos: &Position, m: Move) -> bool {
    if m.move_type() == MoveType::EnPassant {
        return true;
    }
    see(pos, m) >= 0
}

fn color_mask(pos: &Position, color: Color) -> Bitboard {
    pos.occupied_by(color)
}

/// Attackers of `sq` given the exchange's current (hypothetical) occupancy.
/// `occupied_l90`/`r45`/`l45` are the position's maintained rotated
/// occupancy with every square vacated so far in the exchange toggled off,
/// avoiding a full from-scratch rotation on each step of the swap-off.
fn attackers_to(
    pos: &Position,
    sq: crate::types::Square,
    occupied: Bitboard,
    occupied_l90: Bitboard,
    occupied_r45: Bitboard,
    occupied_l45: Bitboard,
) -> Bitboard {
    let mut attackers = Bitboard(0);
    attackers |= attacks::pawn_attacks(Color::Black, sq) & pos.pieces(Color::White, PieceType::Pawn);
    attackers |= attacks::pawn_attacks(Color::White, sq) & pos.pieces(Color::Black, PieceType::Pawn);
    attackers |= attacks::pseudo_attacks(PieceType::Knight, sq)
        & (pos.pieces(Color::White, PieceType::Knight) | pos.pieces(Color::Black, PieceType::Knight));
    attackers |= attacks::pseudo_attacks(PieceType::King, sq)
        & (pos.pieces(Color::White, PieceType::King) | pos.pieces(Color::Black, PieceType::King));
    let rook_attacks = attacks::moves_rank(sq, occupied) | attacks::moves_file_rotated(sq, occupied_l90);
    attackers |= rook_attacks
        & (pos.pieces(Color::White, PieceType::Rook)
            | pos.pieces(Color::Black, PieceType::Rook)
            | pos.pieces(Color::White, PieceType::Queen)
            | pos.pieces(Color::Black, PieceType::Queen));
    let bishop_attacks = attacks::moves_diag_up_rotated(sq, occupied_r45)
        | attacks::moves_diag_down_rotated(sq, occupied_l45);
    attackers |= bishop_attacks
        & (pos.pieces(Color::White, PieceType::Bishop)
            | pos.pieces(Color::Black, PieceType::Bishop)
            | pos.pieces(Color::White, PieceType::Queen)
            | pos.pieces(Color::Black, PieceType::Queen));
    attackers
}

fn least_valuable_attacker(
    pos: &Position,
    attackers: Bitboard,
) -> (crate::types::Square, PieceType) {
    for &pt in &[
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ] {
        let of_type = attackers & (pos.pieces(Color::White, pt) | pos.pieces(Color::Black, pt));
        if !of_type.is_empty() {
            return (of_type.lsb(), pt);
        }
    }
    unreachable!("attackers bitboard was non-empty but contained no known piece type")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;
    use crate::types::Square;

    #[test]
    fn free_pawn_capture_is_good() {
        let pos = Position::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let m = Move::new(Square::new(3, 4), Square::new(4, 3), MoveType::Normal);
        assert!(see(&pos, m) > 0);
    }

    #[test]
    fn undefended_queen_capture_is_good() {
        let pos = Position::from_fen("4k3/8/3p4/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let m = Move::new(Square::new(0, 3), Square::new(5, 3), MoveType::Normal);
        assert!(see(&pos, m) > 0);
    }

    #[test]
    fn capturing_defended_pawn_with_queen_loses_the_exchange() {
        let pos = Position::from_fen("3k4/8/2p5/3p4/8/8/8/3QK3 w - - 0 1").unwrap();
        let m = Move::new(Square::new(0, 3), Square::new(4, 3), MoveType::Normal);
        assert!(see(&pos, m) < 0);
    }
}
