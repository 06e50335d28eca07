//! Error types for the engine core.
//!
//! Every fallible boundary (FEN parsing, UCI move-text parsing, algebraic
//! square parsing) gets its own small error enum with a manual `Display`
//! impl. Internal invariant violations are not represented here: they are
//! `debug_assert!`s, per the error-handling design (see SPEC_FULL.md §7).

use std::fmt;

/// Error parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few whitespace-separated fields (needs at least 1: placement).
    TooFewParts { found: usize },
    /// Invalid piece character in the placement field.
    InvalidPiece { char: char },
    /// Invalid castling character.
    InvalidCastling { char: char },
    /// Side-to-move field is neither `w` nor `b`.
    InvalidSideToMove { found: String },
    /// En-passant target square could not be parsed.
    InvalidEnPassant { found: String },
    /// More than 8 ranks in the placement field.
    InvalidRank { rank: usize },
    /// More than 8 files accounted for in a rank.
    TooManyFiles { rank: usize, files: usize },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 1 field, found {found}")
            }
            FenError::InvalidPiece { char } => write!(f, "invalid piece character '{char}' in FEN"),
            FenError::InvalidCastling { char } => {
                write!(f, "invalid castling character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "invalid en passant square '{found}'")
            }
            FenError::InvalidRank { rank } => write!(f, "too many ranks in FEN (rank index {rank})"),
            FenError::TooManyFiles { rank, files } => {
                write!(f, "too many files ({files}) in rank {rank}")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error parsing a UCI long-algebraic move (`e2e4`, `e7e8q`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move text is not 4 or 5 characters long.
    InvalidLength { len: usize },
    /// A from/to square failed to parse.
    InvalidSquare { notation: String },
    /// Promotion suffix is not one of `qrbn`.
    InvalidPromotion { char: char },
    /// Well-formed notation, but not legal in the position it was checked against.
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "move text must be 4 or 5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "invalid square in move '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "invalid promotion piece '{char}'")
            }
            MoveParseError::IllegalMove { notation } => write!(f, "illegal move '{notation}'"),
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error parsing a single algebraic square (`e4`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::InvalidNotation { notation } => {
                write!(f, "invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}
