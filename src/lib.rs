//! Chess engine core: bitboard position representation, move generation,
//! search, and transposition table. UCI/XBoard I/O is a boundary concern and
//! lives outside this crate.

pub mod attacks;
pub mod bitboard;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod moves;
pub mod options;
pub mod perft;
pub mod position;
pub mod search;
pub mod see;
pub mod tt;
pub mod types;
pub mod zobrist;

/// Forces the lazily-built static tables in dependency order: attack
/// tables before zobrist keys, since perft/tests may hash a position before
/// ever calling into search.
pub fn init() {
    attacks::init();
    zobrist::init();
}
