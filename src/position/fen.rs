//! FEN parsing and formatting.
//!
//! Parsing is best-effort past the first four fields: a shortened FEN
//! (missing halfmove clock / fullmove number, or even side-to-move onward)
//! still parses, falling back to the standard defaults.

use super::Position;
use crate::error::FenError;
use crate::types::{CastlingRights, Color, PieceType, Square};

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
pub const SHORTENED_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

pub(crate) fn parse(fen: &str) -> Result<Position, FenError> {
    let mut pos = Position::empty();
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.is_empty() {
        return Err(FenError::TooFewParts { found: 0 });
    }

    for (rank_idx, rank_str) in parts[0].split('/').enumerate() {
        if rank_idx >= 8 {
            return Err(FenError::InvalidRank { rank: rank_idx });
        }
        let rank = 7 - rank_idx as u8;
        let mut file = 0u8;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
            } else {
                let color = if c.is_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let pt = PieceType::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file >= 8 {
                    return Err(FenError::TooManyFiles {
                        rank: rank_idx,
                        files: file as usize + 1,
                    });
                }
                pos.place_piece(color, pt, Square::new(rank, file));
                file += 1;
            }
        }
    }

    pos.side_to_move = match parts.get(1).copied().unwrap_or("w") {
        "w" => Color::White,
        "b" => Color::Black,
        other => {
            return Err(FenError::InvalidSideToMove {
                found: other.to_string(),
            })
        }
    };
    if pos.side_to_move == Color::Black {
        pos.hash ^= crate::zobrist::side_key();
    }

    let castling_str = parts.get(2).copied().unwrap_or("-");
    let mut rights = 0u8;
    if castling_str != "-" {
        for c in castling_str.chars() {
            match c {
                'K' => rights |= CastlingRights::WHITE_OO,
                'Q' => rights |= CastlingRights::WHITE_OOO,
                'k' => rights |= CastlingRights::BLACK_OO,
                'q' => rights |= CastlingRights::BLACK_OOO,
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }
    }
    pos.castling_rights = CastlingRights(rights);
    pos.hash ^= crate::zobrist::castling_rights_key(pos.castling_rights);

    let ep_str = parts.get(3).copied().unwrap_or("-");
    pos.en_passant = if ep_str == "-" {
        Square::NONE
    } else {
        Square::from_algebraic(ep_str).map_err(|_| FenError::InvalidEnPassant {
            found: ep_str.to_string(),
        })?
    };
    if pos.en_passant.is_valid() {
        pos.hash ^= crate::zobrist::en_passant_key(pos.en_passant.file());
    }

    pos.halfmove_clock = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
    pos.fullmove_number = parts.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);

    pos.rebuild_rotations();
    Ok(pos)
}

pub(crate) fn format(pos: &Position) -> String {
    let mut ranks = Vec::with_capacity(8);
    for rank in (0..8u8).rev() {
        let mut row = String::new();
        let mut empty = 0u8;
        for file in 0..8u8 {
            let sq = Square::new(rank, file);
            match pos.piece_at(sq) {
                crate::types::Piece::None => empty += 1,
                crate::types::Piece::Some(color, pt) => {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(pt.to_char(color));
                }
            }
        }
        if empty > 0 {
            row.push_str(&empty.to_string());
        }
        ranks.push(row);
    }

    let side = if pos.side_to_move == Color::White {
        "w"
    } else {
        "b"
    };

    let mut castling = String::new();
    let r = pos.castling_rights;
    if r.has(CastlingRights::WHITE_OO) {
        castling.push('K');
    }
    if r.has(CastlingRights::WHITE_OOO) {
        castling.push('Q');
    }
    if r.has(CastlingRights::BLACK_OO) {
        castling.push('k');
    }
    if r.has(CastlingRights::BLACK_OOO) {
        castling.push('q');
    }
    if castling.is_empty() {
        castling.push('-');
    }

    let ep = if pos.en_passant.is_valid() {
        pos.en_passant.to_algebraic()
    } else {
        "-".to_string()
    };

    format!(
        "{} {} {} {} {} {}",
        ranks.join("/"),
        side,
        castling,
        ep,
        pos.halfmove_clock,
        pos.fullmove_number
    )
}
