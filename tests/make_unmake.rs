//! `do_move`/`undo_move` must be exact inverses: after undoing, the FEN,
//! hash, and material must match the position before the move, for any
//! sequence of legal moves reachable from the start position.

use proptest::prelude::*;

use chess_core::movegen::{generate_legal, GenMode};
use chess_core::position::STARTPOS_FEN;
use chess_core::position::Position;
use chess_core::types::Color;

fn play_random_game(indices: &[u8]) -> Vec<(String, u64)> {
    let mut pos = Position::from_fen(STARTPOS_FEN).unwrap();
    let mut snapshots = vec![(pos.to_fen(), pos.hash())];

    for &index in indices {
        let legal = generate_legal(&mut pos, GenMode::All);
        if legal.is_empty() {
            break;
        }
        let mv = legal.get(index as usize % legal.len()).unwrap();
        pos.do_move(mv);
        snapshots.push((pos.to_fen(), pos.hash()));
    }
    snapshots
}

proptest! {
    #[test]
    fn do_move_undo_move_round_trips_through_a_random_game(indices in prop::collection::vec(any::<u8>(), 0..40)) {
        let snapshots = play_random_game(&indices);

        let mut pos = Position::from_fen(STARTPOS_FEN).unwrap();
        let mut played = 0usize;
        for &index in &indices {
            if played + 1 >= snapshots.len() {
                break;
            }
            let legal = generate_legal(&mut pos, GenMode::All);
            if legal.is_empty() {
                break;
            }
            let mv = legal.get(index as usize % legal.len()).unwrap();
            pos.do_move(mv);
            played += 1;

            let before_undo = (pos.to_fen(), pos.hash());
            pos.undo_move();
            prop_assert_eq!(pos.to_fen(), snapshots[played - 1].0.clone());
            prop_assert_eq!(pos.hash(), snapshots[played - 1].1);
            pos.do_move(mv);
            prop_assert_eq!((pos.to_fen(), pos.hash()), before_undo);
        }
    }
}

#[test]
fn material_is_symmetric_between_colors_at_startpos() {
    let pos = Position::from_fen(STARTPOS_FEN).unwrap();
    assert_eq!(pos.material(Color::White), pos.material(Color::Black));
}

#[test]
fn undo_after_capture_restores_the_captured_piece() {
    let mut pos =
        Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1").unwrap();
    let before = pos.to_fen();
    let mv = pos.parse_uci_move("d7d5").unwrap();
    pos.do_move(mv);

    let capture = pos.parse_uci_move("e4d5").unwrap();
    pos.do_move(capture);
    assert_eq!(pos.piece_at(capture.to()).piece_type(), Some(chess_core::types::PieceType::Pawn));
    pos.undo_move();
    pos.undo_move();
    assert_eq!(pos.to_fen(), before);
}
