//! The staged, on-demand generator must surface exactly the same legal
//! moves as the eager batch generator, just in a different order.

use std::collections::HashSet;

use chess_core::movegen::{generate_legal, GenMode, StagedGenerator};
use chess_core::position::STARTPOS_FEN;
use chess_core::position::Position;

fn staged_legal_moves(pos: &mut Position, mode: GenMode) -> HashSet<(u8, u8, Option<u8>)> {
    let mut gen = StagedGenerator::new();
    let mut seen = HashSet::new();
    while let Some(mv) = gen.next(pos, mode) {
        if pos.is_legal_move(mv) {
            seen.insert((mv.from().0, mv.to().0, mv.promotion().map(|p| p as u8)));
        }
    }
    seen
}

fn batch_legal_moves(pos: &mut Position, mode: GenMode) -> HashSet<(u8, u8, Option<u8>)> {
    generate_legal(pos, mode)
        .iter()
        .map(|m| (m.from().0, m.to().0, m.promotion().map(|p| p as u8)))
        .collect()
}

#[test]
fn staged_generation_matches_batch_generation_at_startpos() {
    let mut pos = Position::from_fen(STARTPOS_FEN).unwrap();
    let staged = staged_legal_moves(&mut pos, GenMode::All);
    let batch = batch_legal_moves(&mut pos, GenMode::All);
    assert_eq!(staged, batch);
}

#[test]
fn staged_generation_matches_batch_generation_in_a_tactical_position() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut pos = Position::from_fen(fen).unwrap();
    let staged = staged_legal_moves(&mut pos, GenMode::All);
    let batch = batch_legal_moves(&mut pos, GenMode::All);
    assert_eq!(staged, batch);
}

#[test]
fn staged_captures_only_matches_batch_captures_only() {
    let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2";
    let mut pos = Position::from_fen(fen).unwrap();
    let staged = staged_legal_moves(&mut pos, GenMode::CapturesOnly);
    let batch = batch_legal_moves(&mut pos, GenMode::CapturesOnly);
    assert_eq!(staged, batch);
}
