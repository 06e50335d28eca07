//! `do_move` / `undo_move` and the null-move variants used by null-move
//! pruning. Each state change XORs the outgoing and incoming Zobrist
//! component so the hash always matches the board exactly.

use super::{Position, UndoInfo, MAX_HISTORY};
use crate::moves::{Move, MoveType};
use crate::types::{CastlingRights, Color, Piece, PieceType, Square};
use crate::zobrist;

impl Position {
    /// Applies `m`, assumed pseudo-legal. Legality (not leaving one's own
    /// king in check) is the caller's responsibility; see
    /// [`Position::is_legal_move`].
    pub fn do_move(&mut self, m: Move) {
        debug_assert!(self.history.len() < MAX_HISTORY);

        let us = self.side_to_move;
        let them = us.opposite();
        let from = m.from();
        let to = m.to();

        let moving = self.piece_at(from);
        let (_, moving_pt) = match moving {
            Piece::Some(c, pt) => (c, pt),
            Piece::None => panic!("do_move: no piece on from-square {from:?}"),
        };

        let undo = UndoInfo {
            mv: m,
            captured: Piece::None,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
            had_check: self.check_cache,
        };

        if self.en_passant.is_valid() {
            self.hash ^= zobrist::en_passant_key(self.en_passant.file());
        }
        self.en_passant = Square::NONE;

        let mut captured = Piece::None;
        let mut reset_halfmove = moving_pt == PieceType::Pawn;

        match m.move_type() {
            MoveType::Normal => {
                if let Piece::Some(cc, cpt) = self.piece_at(to) {
                    debug_assert_eq!(cc, them);
                    captured = self.piece_at(to);
                    self.remove_piece(them, cpt, to);
                    reset_halfmove = true;
                }
                self.move_piece(us, moving_pt, from, to);

                if moving_pt == PieceType::Pawn && to.index().abs_diff(from.index()) == 16 {
                    let ep_sq = Square::new((from.rank() + to.rank()) / 2, from.file());
                    self.en_passant = ep_sq;
                    self.hash ^= zobrist::en_passant_key(ep_sq.file());
                }
                self.update_castling_rights_on_move(us, moving_pt, from, to);
            }
            MoveType::Promotion => {
                if let Piece::Some(cc, cpt) = self.piece_at(to) {
                    debug_assert_eq!(cc, them);
                    captured = self.piece_at(to);
                    self.remove_piece(them, cpt, to);
                }
                self.remove_piece(us, PieceType::Pawn, from);
                let promo = m.promotion().expect("promotion move carries a target piece");
                self.place_piece(us, promo, to);
                reset_halfmove = true;
                self.update_castling_rights_on_move(us, moving_pt, from, to);
            }
            MoveType::EnPassant => {
                let captured_sq = Square::new(from.rank(), to.file());
                captured = self.piece_at(captured_sq);
                self.remove_piece(them, PieceType::Pawn, captured_sq);
                self.move_piece(us, PieceType::Pawn, from, to);
                reset_halfmove = true;
            }
            MoveType::Castling => {
                self.move_piece(us, PieceType::King, from, to);
                let (rook_from, rook_to) = castling_rook_squares(us, to);
                self.move_piece(us, PieceType::Rook, rook_from, rook_to);
                self.hash ^= zobrist::castling_rights_key(self.castling_rights);
                let mask = !CastlingRights::for_color(us);
                self.castling_rights = CastlingRights(self.castling_rights.0 & mask);
                self.hash ^= zobrist::castling_rights_key(self.castling_rights);
            }
        }

        if reset_halfmove {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.hash ^= zobrist::side_key();
        self.side_to_move = them;
        if them == Color::White {
            self.fullmove_number += 1;
        }

        self.check_cache = None;
        let mut undo = undo;
        undo.captured = captured;
        self.history.push(undo);
    }

    pub fn undo_move(&mut self) {
        let undo = self.history.pop().expect("undo_move called with empty history");
        let m = undo.mv;
        let them = self.side_to_move;
        let us = them.opposite();
        let from = m.from();
        let to = m.to();

        match m.move_type() {
            MoveType::Normal => {
                let (_, pt) = match self.piece_at(to) {
                    Piece::Some(c, pt) => (c, pt),
                    Piece::None => unreachable!("moved piece must be on the target square"),
                };
                self.move_piece(us, pt, to, from);
                if let Piece::Some(cc, cpt) = undo.captured {
                    self.place_piece(cc, cpt, to);
                }
            }
            MoveType::Promotion => {
                let promo = m.promotion().expect("promotion move carries a target piece");
                self.remove_piece(us, promo, to);
                self.place_piece(us, PieceType::Pawn, from);
                if let Piece::Some(cc, cpt) = undo.captured {
                    self.place_piece(cc, cpt, to);
                }
            }
            MoveType::EnPassant => {
                self.move_piece(us, PieceType::Pawn, to, from);
                let captured_sq = Square::new(from.rank(), to.file());
                if let Piece::Some(cc, cpt) = undo.captured {
                    self.place_piece(cc, cpt, captured_sq);
                }
            }
            MoveType::Castling => {
                self.move_piece(us, PieceType::King, to, from);
                let (rook_from, rook_to) = castling_rook_squares(us, to);
                self.move_piece(us, PieceType::Rook, rook_to, rook_from);
            }
        }

        self.castling_rights = undo.castling_rights;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
        self.check_cache = undo.had_check;
        self.side_to_move = us;
        if them == Color::White {
            self.fullmove_number -= 1;
        }
    }

    /// Toggles side to move and clears en passant, without moving a piece.
    /// Used by null-move pruning; never affects repetition/material state.
    pub fn do_null_move(&mut self) {
        let undo = UndoInfo {
            mv: Move::NONE,
            captured: Piece::None,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
            had_check: self.check_cache,
        };
        if self.en_passant.is_valid() {
            self.hash ^= zobrist::en_passant_key(self.en_passant.file());
        }
        self.en_passant = Square::NONE;
        self.hash ^= zobrist::side_key();
        self.side_to_move = self.side_to_move.opposite();
        self.check_cache = None;
        self.history.push(undo);
    }

    pub fn undo_null_move(&mut self) {
        let undo = self.history.pop().expect("undo_null_move called with empty history");
        self.en_passant = undo.en_passant;
        self.hash = undo.hash;
        self.check_cache = undo.had_check;
        self.side_to_move = self.side_to_move.opposite();
    }

    fn update_castling_rights_on_move(
        &mut self,
        us: Color,
        moving_pt: PieceType,
        from: Square,
        to: Square,
    ) {
        let mut lost = 0u8;
        if moving_pt == PieceType::King {
            lost |= CastlingRights::for_color(us);
        }
        if moving_pt == PieceType::Rook {
            lost |= rook_right_lost(us, from);
        }
        // A rook captured on its home square loses the corresponding right
        // for the side whose rook it was, regardless of who captured it.
        lost |= rook_right_lost(Color::White, to);
        lost |= rook_right_lost(Color::Black, to);

        if lost != 0 {
            self.hash ^= zobrist::castling_rights_key(self.castling_rights);
            self.castling_rights = CastlingRights(self.castling_rights.0 & !lost);
            self.hash ^= zobrist::castling_rights_key(self.castling_rights);
        }
    }
}

fn rook_right_lost(color: Color, sq: Square) -> u8 {
    let home_rank = match color {
        Color::White => 0,
        Color::Black => 7,
    };
    if sq.rank() != home_rank {
        return 0;
    }
    match sq.file() {
        0 => CastlingRights::queenside(color),
        7 => CastlingRights::kingside(color),
        _ => 0,
    }
}

/// The rook's (from, to) squares for a castling move landing the king on `to`.
fn castling_rook_squares(color: Color, king_to: Square) -> (Square, Square) {
    let rank = match color {
        Color::White => 0,
        Color::Black => 7,
    };
    if king_to.file() == 6 {
        (Square::new(rank, 7), Square::new(rank, 5))
    } else {
        debug_assert_eq!(king_to.file(), 2);
        (Square::new(rank, 0), Square::new(rank, 3))
    }
}
