//! Legal and pseudo-legal move generation: an eager batch generator plus a
//! staged, on-demand generator used by the search's move loop.

use crate::attacks;
use crate::bitboard::Bitboard;
use crate::moves::{Move, MoveList, MoveType};
use crate::position::Position;
use crate::types::{CastlingRights, Color, PieceType, Square, PROMOTION_PIECES};

/// Which subset of moves to produce.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GenMode {
    CapturesOnly,
    QuietsOnly,
    All,
}

impl GenMode {
    fn wants_captures(self) -> bool {
        matches!(self, GenMode::CapturesOnly | GenMode::All)
    }
    fn wants_quiets(self) -> bool {
        matches!(self, GenMode::QuietsOnly | GenMode::All)
    }
}

const CAPTURE_PROMOTION_BASE: i32 = 9000;
const QUIET_PROMOTION_BASE: i32 = 9000;
const UNDERPROMOTION_PENALTY: i32 = 2000;
const CASTLING_VALUE: i32 = 9500;
const QUIET_BASE: i32 = 10000;

/// Positional component of a move's ordering value: destination-square
/// piece-square improvement, cheaply approximated by center distance.
fn positional_value(pt: PieceType, to: Square) -> i32 {
    let centrality = 4 - attacks::center_distance(to) as i32;
    match pt {
        PieceType::Pawn => centrality * 2,
        PieceType::Knight | PieceType::Bishop => centrality * 3,
        _ => centrality,
    }
}

fn promotion_order_bonus(pt: PieceType) -> i32 {
    match pt {
        PieceType::Queen => CAPTURE_PROMOTION_BASE,
        _ => CAPTURE_PROMOTION_BASE + UNDERPROMOTION_PENALTY,
    }
}

/// Generates every pseudo-legal move for `pos` matching `mode`, each
/// carrying its ordering value in the move's sort-key field, stable-sorted
/// descending by that value.
#[must_use]
pub fn generate_pseudo_legal(pos: &Position, mode: GenMode) -> MoveList {
    let mut list = MoveList::new();
    let us = pos.side_to_move();

    generate_pawn_moves(pos, us, mode, &mut list);
    if mode.wants_quiets() {
        generate_castling(pos, us, &mut list);
    }
    for &pt in &[
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
    ] {
        generate_officer_moves(pos, us, pt, mode, &mut list);
    }
    generate_king_moves(pos, us, mode, &mut list);

    sort_by_value_desc(&mut list);
    list
}

/// Filters `generate_pseudo_legal` to only legal moves.
#[must_use]
pub fn generate_legal(pos: &mut Position, mode: GenMode) -> MoveList {
    let pseudo = generate_pseudo_legal(pos, mode);
    let mut legal = MoveList::new();
    for &m in pseudo.iter() {
        if pos.is_legal_move(m) {
            legal.push(m);
        }
    }
    legal
}

fn sort_by_value_desc(list: &mut MoveList) {
    let slice = list.as_mut_slice();
    slice.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
}

fn generate_pawn_moves(pos: &Position, us: Color, mode: GenMode, list: &mut MoveList) {
    let them = us.opposite();
    let pawns = pos.pieces(us, PieceType::Pawn);
    let promo_rank = match us {
        Color::White => 7u8,
        Color::Black => 0u8,
    };

    for from in pawns {
        if mode.wants_captures() {
            let targets = attacks::pawn_attacks(us, from) & pos.occupied_by(them);
            for to in targets {
                let victim = pos.piece_at(to).piece_type().expect("capture target has a piece");
                let is_promo = to.rank() == promo_rank;
                if is_promo {
                    for &promo in &PROMOTION_PIECES {
                        let mv = Move::new_promotion(from, to, promo);
                        let base = promotion_order_bonus(promo) + victim.value() - PieceType::Pawn.value();
                        list.push(mv.with_sort_key(base.clamp(i16::MIN as i32, i16::MAX as i32) as i16));
                    }
                } else {
                    let mv = Move::new(from, to, MoveType::Normal);
                    let val = victim.value() - PieceType::Pawn.value() - positional_value(PieceType::Pawn, to);
                    list.push(mv.with_sort_key(val.clamp(i16::MIN as i32, i16::MAX as i32) as i16));
                }
            }
            if pos.en_passant_square().is_valid()
                && attacks::pawn_attacks(us, from).contains(pos.en_passant_square())
            {
                let mv = Move::new(from, pos.en_passant_square(), MoveType::EnPassant);
                list.push(mv.with_sort_key(100i16));
            }
        }
        if mode.wants_quiets() {
            let single = single_push_target(us, from);
            if let Some(to) = single {
                if !pos.all_occupied().contains(to) {
                    let is_promo = to.rank() == promo_rank;
                    push_pawn_move_or_promotions(list, from, to, is_promo, false);
                    if !is_promo {
                        if let Some(double) = double_push_target(us, from) {
                            if !pos.all_occupied().contains(double) {
                                let mv = Move::new(from, double, MoveType::Normal);
                                let val = QUIET_BASE - positional_value(PieceType::Pawn, double);
                                list.push(mv.with_sort_key(val as i16));
                            }
                        }
                    }
                }
            }
        }
    }
}

fn single_push_target(color: Color, from: Square) -> Option<Square> {
    from.offset(color.pawn_direction(), 0)
}

fn double_push_target(color: Color, from: Square) -> Option<Square> {
    let start_rank = match color {
        Color::White => 1,
        Color::Black => 6,
    };
    if from.rank() != start_rank {
        return None;
    }
    from.offset(color.pawn_direction() * 2, 0)
}

/// Pushes a quiet pawn push, or its full promotion fan if `to` is on the
/// back rank.
fn push_pawn_move_or_promotions(list: &mut MoveList, from: Square, to: Square, is_promo: bool, _is_capture: bool) {
    if is_promo {
        for &promo in &PROMOTION_PIECES {
            let mv = Move::new_promotion(from, to, promo);
            let base = match promo {
                PieceType::Queen => QUIET_PROMOTION_BASE,
                _ => QUIET_PROMOTION_BASE + UNDERPROMOTION_PENALTY,
            };
            list.push(mv.with_sort_key(base.clamp(i16::MIN as i32, i16::MAX as i32) as i16));
        }
    } else {
        let mv = Move::new(from, to, MoveType::Normal);
        let val = QUIET_BASE - positional_value(PieceType::Pawn, to);
        list.push(mv.with_sort_key(val as i16));
    }
}

fn generate_castling(pos: &Position, us: Color, list: &mut MoveList) {
    let rights = pos.castling_rights();
    let rank = match us {
        Color::White => 0,
        Color::Black => 7,
    };
    let king_from = Square::new(rank, 4);
    if pos.piece_at(king_from) != crate::types::Piece::Some(us, PieceType::King) {
        return;
    }

    if rights.has(CastlingRights::kingside(us)) {
        let f1 = Square::new(rank, 5);
        let f2 = Square::new(rank, 6);
        let rook_sq = Square::new(rank, 7);
        if pos.piece_at(rook_sq) == crate::types::Piece::Some(us, PieceType::Rook)
            && !pos.all_occupied().contains(f1)
            && !pos.all_occupied().contains(f2)
        {
            let mv = Move::new(king_from, f2, MoveType::Castling);
            list.push(mv.with_sort_key(CASTLING_VALUE as i16));
        }
    }
    if rights.has(CastlingRights::queenside(us)) {
        let d1 = Square::new(rank, 3);
        let c1 = Square::new(rank, 2);
        let b1 = Square::new(rank, 1);
        let rook_sq = Square::new(rank, 0);
        if pos.piece_at(rook_sq) == crate::types::Piece::Some(us, PieceType::Rook)
            && !pos.all_occupied().contains(d1)
            && !pos.all_occupied().contains(c1)
            && !pos.all_occupied().contains(b1)
        {
            let mv = Move::new(king_from, c1, MoveType::Castling);
            list.push(mv.with_sort_key(CASTLING_VALUE as i16));
        }
    }
}

fn officer_attacks(pos: &Position, pt: PieceType, from: Square) -> Bitboard {
    match pt {
        PieceType::Knight => attacks::pseudo_attacks(PieceType::Knight, from),
        PieceType::Bishop => pos.bishop_attacks_here(from),
        PieceType::Rook => pos.rook_attacks_here(from),
        PieceType::Queen => pos.rook_attacks_here(from) | pos.bishop_attacks_here(from),
        _ => unreachable!(),
    }
}

fn generate_officer_moves(pos: &Position, us: Color, pt: PieceType, mode: GenMode, list: &mut MoveList) {
    let them = us.opposite();
    for from in pos.pieces(us, pt) {
        let targets = officer_attacks(pos, pt, from) & !pos.occupied_by(us);
        if mode.wants_captures() {
            for to in targets & pos.occupied_by(them) {
                let victim = pos.piece_at(to).piece_type().expect("capture target has a piece");
                let mv = Move::new(from, to, MoveType::Normal);
                let val = victim.value() - pt.value() - positional_value(pt, to);
                list.push(mv.with_sort_key(val.clamp(i16::MIN as i32, i16::MAX as i32) as i16));
            }
        }
        if mode.wants_quiets() {
            for to in targets & !pos.all_occupied() {
                let mv = Move::new(from, to, MoveType::Normal);
                let val = QUIET_BASE - positional_value(pt, to);
                list.push(mv.with_sort_key(val as i16));
            }
        }
    }
}

fn generate_king_moves(pos: &Position, us: Color, mode: GenMode, list: &mut MoveList) {
    let them = us.opposite();
    let from = pos.king_square(us);
    let targets = attacks::pseudo_attacks(PieceType::King, from) & !pos.occupied_by(us);
    if mode.wants_captures() {
        for to in targets & pos.occupied_by(them) {
            let victim = pos.piece_at(to).piece_type().expect("capture target has a piece");
            let mv = Move::new(from, to, MoveType::Normal);
            let val = victim.value() - PieceType::King.value() - positional_value(PieceType::King, to);
            list.push(mv.with_sort_key(val.clamp(i16::MIN as i32, i16::MAX as i32) as i16));
        }
    }
    if mode.wants_quiets() {
        for to in targets & !pos.all_occupied() {
            let mv = Move::new(from, to, MoveType::Normal);
            let val = QUIET_BASE - positional_value(PieceType::King, to);
            list.push(mv.with_sort_key(val as i16));
        }
    }
}

/// True as soon as the side to move has any legal move, checked in
/// king/pawn/knight/bishop/rook/queen order to terminate quickly on typical
/// mate-vs-stalemate discrimination.
#[must_use]
pub fn has_legal_move(pos: &mut Position) -> bool {
    let us = pos.side_to_move();
    let from = pos.king_square(us);
    for to in attacks::pseudo_attacks(PieceType::King, from) & !pos.occupied_by(us) {
        let mv = Move::new(from, to, MoveType::Normal);
        if pos.is_legal_move(mv) {
            return true;
        }
    }
    for mv in generate_pseudo_legal(pos, GenMode::All).iter() {
        if mv.from() == from {
            continue; // king moves already checked above
        }
        if pos.is_legal_move(*mv) {
            return true;
        }
    }
    false
}

const MAX_KILLERS: usize = 2;

/// Per-ply staged move generation state: PV move, killer slots, and a
/// resume cursor keyed by the position's zobrist hash so a stale instance
/// (from a different node reusing the same ply slot) resets automatically.
pub struct StagedGenerator {
    zobrist_key: u64,
    pv_move: Move,
    killers: [Move; MAX_KILLERS],
    stage: Stage,
    gen_mode: GenMode,
    captures: MoveList,
    quiets: MoveList,
    cursor: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Stage {
    Pv,
    Captures,
    Quiets,
    End,
}

impl StagedGenerator {
    #[must_use]
    pub fn new() -> Self {
        StagedGenerator {
            zobrist_key: 0,
            pv_move: Move::NONE,
            killers: [Move::NONE; MAX_KILLERS],
            stage: Stage::End,
            gen_mode: GenMode::All,
            captures: MoveList::new(),
            quiets: MoveList::new(),
            cursor: 0,
        }
    }

    pub fn set_pv(&mut self, m: Move) {
        self.pv_move = m;
    }

    /// Records a quiet refutation move, most-recent-first, deduplicated.
    pub fn store_killer(&mut self, m: Move) {
        if self.killers[0] == m {
            return;
        }
        self.killers[1] = self.killers[0];
        self.killers[0] = m;
    }

    fn reset_for(&mut self, pos: &Position, mode: GenMode) {
        self.zobrist_key = pos.hash();
        self.gen_mode = mode;
        self.stage = Stage::Pv;
        self.captures = MoveList::new();
        self.quiets = MoveList::new();
        self.cursor = 0;
    }

    /// Generates and orders the captures category. Called only once the
    /// captures stage is actually entered, not ahead of time.
    fn enter_captures(&mut self, pos: &Position) {
        self.captures = generate_pseudo_legal(pos, GenMode::CapturesOnly);
        self.cursor = 0;
    }

    /// Generates and orders the quiets category, promoting killer moves to
    /// the front. Called only once the quiets stage is actually entered.
    fn enter_quiets(&mut self, pos: &Position) {
        self.quiets = generate_pseudo_legal(pos, GenMode::QuietsOnly);
        promote_killers_to_front(&mut self.quiets, &self.killers);
        self.cursor = 0;
    }

    /// Returns the next pseudo-legal move in staged order, or `None` when
    /// exhausted. Each category is generated and ordered only when its
    /// stage is entered, so a beta cutoff during captures never pays for
    /// generating quiets.
    pub fn next(&mut self, pos: &Position, mode: GenMode) -> Option<Move> {
        if self.zobrist_key != pos.hash() || self.stage == Stage::End {
            self.reset_for(pos, mode);
        }

        loop {
            match self.stage {
                Stage::Pv => {
                    self.stage = Stage::Captures;
                    self.enter_captures(pos);
                    if !self.pv_move.is_none() {
                        return Some(self.pv_move);
                    }
                }
                Stage::Captures => {
                    while self.cursor < self.captures.len() {
                        let mv = self.captures.get(self.cursor).unwrap();
                        self.cursor += 1;
                        if mv == self.pv_move {
                            continue;
                        }
                        return Some(mv);
                    }
                    if self.gen_mode.wants_quiets() {
                        self.stage = Stage::Quiets;
                        self.enter_quiets(pos);
                    } else {
                        self.stage = Stage::End;
                    }
                }
                Stage::Quiets => {
                    while self.cursor < self.quiets.len() {
                        let mv = self.quiets.get(self.cursor).unwrap();
                        self.cursor += 1;
                        if mv == self.pv_move {
                            continue;
                        }
                        return Some(mv);
                    }
                    self.stage = Stage::End;
                }
                Stage::End => return None,
            }
        }
    }
}

impl Default for StagedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn promote_killers_to_front(list: &mut MoveList, killers: &[Move; MAX_KILLERS]) {
    let slice = list.as_mut_slice();
    let mut insert_at = 0;
    for &killer in killers {
        if killer.is_none() {
            continue;
        }
        if let Some(pos) = slice[insert_at..].iter().position(|&m| m == killer) {
            slice[insert_at..=insert_at + pos].rotate_right(1);
            insert_at += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::fen::STARTPOS_FEN;

    #[test]
    fn startpos_has_twenty_legal_moves() {
        let mut pos = Position::from_fen(STARTPOS_FEN).unwrap();
        let moves = generate_legal(&mut pos, GenMode::All);
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn captures_only_mode_excludes_quiet_moves() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
                .unwrap();
        let moves = generate_legal(&mut pos, GenMode::CapturesOnly);
        assert!(moves.len() >= 1);
        for mv in moves.iter() {
            assert!(mv.is_en_passant() || pos.piece_at(mv.to()) != crate::types::Piece::None);
        }
    }

    #[test]
    fn staged_generator_resets_on_position_change() {
        let mut pos = Position::from_fen(STARTPOS_FEN).unwrap();
        let mut gen = StagedGenerator::new();
        let first = gen.next(&pos, GenMode::All);
        assert!(first.is_some());
        let m = Move::new(Square::new(1, 4), Square::new(3, 4), MoveType::Normal);
        pos.do_move(m);
        let after_move = gen.next(&pos, GenMode::All);
        assert!(after_move.is_some());
    }

    #[test]
    fn has_legal_move_detects_stalemate_absence() {
        let mut pos = Position::from_fen(STARTPOS_FEN).unwrap();
        assert!(has_legal_move(&mut pos));
    }

    #[test]
    fn has_legal_move_false_on_stalemate() {
        let mut pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!has_legal_move(&mut pos));
    }
}
