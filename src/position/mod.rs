//! [`Position`]: bitboard chess position with incremental make/unmake.
//!
//! The board is mirrored three ways for cheap queries: per-color-per-type
//! bitboards (`pieces`), a flat `board[64]` piece array, and aggregate
//! occupancy bitboards plus their four rotations (used by [`crate::attacks`]
//! for sliding-piece lookups). `do_move`/`undo_move` keep all of these and
//! the Zobrist hash in lock-step; see `make_unmake.rs`.

mod fen;
mod make_unmake;
mod queries;

pub use fen::{SHORTENED_STARTPOS, STARTPOS_FEN};

use crate::bitboard::Bitboard;
use crate::error::FenError;
use crate::moves::Move;
use crate::types::{CastlingRights, Color, Piece, PieceType, Square};
use crate::zobrist;

pub(crate) const MAX_HISTORY: usize = 256;

/// One saved ply of state, enough to invert `do_move` exactly.
#[derive(Clone, Copy, Debug)]
pub(crate) struct UndoInfo {
    mv: Move,
    captured: Piece,
    castling_rights: CastlingRights,
    en_passant: Square,
    halfmove_clock: u16,
    hash: u64,
    had_check: Option<bool>,
}

/// A chess position: piece placement, side to move, and game state needed
/// to make, unmake, and evaluate legality of moves.
#[derive(Clone)]
pub struct Position {
    pieces: [[Bitboard; 6]; 2],
    board: [Piece; 64],
    occupied: [Bitboard; 2],
    all_occupied: Bitboard,
    rotated_r90: Bitboard,
    rotated_l90: Bitboard,
    rotated_r45: Bitboard,
    rotated_l45: Bitboard,

    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant: Square,
    halfmove_clock: u16,
    fullmove_number: u32,

    hash: u64,
    material: [i32; 2],

    history: Vec<UndoInfo>,
    check_cache: Option<bool>,
}

impl Position {
    #[must_use]
    pub fn empty() -> Self {
        Position {
            pieces: [[Bitboard(0); 6]; 2],
            board: [Piece::None; 64],
            occupied: [Bitboard(0); 2],
            all_occupied: Bitboard(0),
            rotated_r90: Bitboard(0),
            rotated_l90: Bitboard(0),
            rotated_r45: Bitboard(0),
            rotated_l45: Bitboard(0),
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant: Square::NONE,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            material: [0, 0],
            history: Vec::with_capacity(MAX_HISTORY),
            check_cache: None,
        }
    }

    #[must_use]
    pub fn startpos() -> Self {
        Self::from_fen(STARTPOS_FEN).expect("startpos FEN is well-formed")
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        fen::parse(fen)
    }

    #[must_use]
    pub fn to_fen(&self) -> String {
        fen::format(self)
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[must_use]
    pub fn en_passant_square(&self) -> Square {
        self.en_passant
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn ply_played(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.board[sq.index()]
    }

    #[must_use]
    pub fn pieces(&self, color: Color, pt: PieceType) -> Bitboard {
        self.pieces[color.index()][pt.index()]
    }

    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[must_use]
    pub fn all_occupied(&self) -> Bitboard {
        self.all_occupied
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        let bb = self.pieces[color.index()][PieceType::King.index()];
        debug_assert!(!bb.is_empty(), "every position has exactly one king per side");
        bb.lsb()
    }

    #[must_use]
    pub fn material(&self, color: Color) -> i32 {
        self.material[color.index()]
    }

    fn place_piece(&mut self, color: Color, pt: PieceType, sq: Square) {
        debug_assert!(self.board[sq.index()].is_none());
        self.pieces[color.index()][pt.index()].set(sq);
        self.occupied[color.index()].set(sq);
        self.all_occupied.set(sq);
        self.board[sq.index()] = Piece::Some(color, pt);
        self.hash ^= zobrist::piece_key(color, pt, sq);
        self.material[color.index()] += pt.value();
        self.sync_rotations_set(sq);
    }

    fn remove_piece(&mut self, color: Color, pt: PieceType, sq: Square) {
        debug_assert_eq!(self.board[sq.index()], Piece::Some(color, pt));
        self.pieces[color.index()][pt.index()].clear(sq);
        self.occupied[color.index()].clear(sq);
        self.all_occupied.clear(sq);
        self.board[sq.index()] = Piece::None;
        self.hash ^= zobrist::piece_key(color, pt, sq);
        self.material[color.index()] -= pt.value();
        self.sync_rotations_clear(sq);
    }

    fn move_piece(&mut self, color: Color, pt: PieceType, from: Square, to: Square) {
        self.remove_piece(color, pt, from);
        self.place_piece(color, pt, to);
    }

    /// Rebuilds the four rotated-occupancy bitboards from scratch. Used only
    /// at construction; incremental updates use `sync_rotations_{set,clear}`.
    fn rebuild_rotations(&mut self) {
        self.rotated_r90 = crate::attacks::rotate_r90(self.all_occupied);
        self.rotated_l90 = crate::attacks::rotate_l90(self.all_occupied);
        self.rotated_r45 = crate::attacks::rotate_r45(self.all_occupied);
        self.rotated_l45 = crate::attacks::rotate_l45(self.all_occupied);
    }

    fn sync_rotations_set(&mut self, _sq: Square) {
        // Rotated boards are cheap enough (64-iteration rebuild) and far less
        // error-prone than incrementally toggling four extra bit positions
        // per move; recomputed lazily whenever occupancy changes.
        self.rebuild_rotations();
    }

    fn sync_rotations_clear(&mut self, _sq: Square) {
        self.rebuild_rotations();
    }

    #[must_use]
    pub(crate) fn rotated_r90(&self) -> Bitboard {
        self.rotated_r90
    }
    #[must_use]
    pub(crate) fn rotated_l90(&self) -> Bitboard {
        self.rotated_l90
    }
    #[must_use]
    pub(crate) fn rotated_r45(&self) -> Bitboard {
        self.rotated_r45
    }
    #[must_use]
    pub(crate) fn rotated_l45(&self) -> Bitboard {
        self.rotated_l45
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}
