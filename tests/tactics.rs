//! Short tactical positions the search must get right: back-rank and
//! queen mates, hanging-piece avoidance, and free-material capture.

use std::sync::{Arc, Mutex};

use chess_core::position::Position;
use chess_core::search::{BestMove, Search, SearchLimits};

fn best_move_at_depth(fen: &str, depth: i32) -> BestMove {
    chess_core::init();
    let pos = Position::from_fen(fen).unwrap();
    let mut search = Search::new(4);
    let result = Arc::new(Mutex::new(None));
    let result_sink = Arc::clone(&result);

    search.start(
        pos,
        SearchLimits { depth: Some(depth), ..SearchLimits::default() },
        None,
        Some(Box::new(move |best: BestMove| {
            *result_sink.lock().unwrap() = Some(best);
        })),
    );
    search.wait_while_searching();
    result.lock().unwrap().take().unwrap_or_default()
}

#[test]
fn finds_mate_in_one_back_rank() {
    let best = best_move_at_depth("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", 4);
    assert_eq!(best.best.map(|m| m.to_uci()), Some("e1e8".to_string()));
}

#[test]
fn finds_mate_in_one_queen_capture() {
    let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4";
    let best = best_move_at_depth(fen, 4);
    assert_eq!(best.best.map(|m| m.to_uci()), Some("h5f7".to_string()));
}

#[test]
fn avoids_hanging_the_queen() {
    let fen = "r1bqkbnr/pppppppp/2n5/8/4P3/5Q2/PPPP1PPP/RNB1KBNR w KQkq - 0 3";
    let best = best_move_at_depth(fen, 4);
    assert_ne!(best.best.map(|m| m.to_uci()), Some("f3c6".to_string()));
}

#[test]
fn captures_material_instead_of_developing_quietly() {
    let fen = "rnbqk1nr/pppp1ppp/2b5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 4";
    let pos = Position::from_fen(fen).unwrap();
    let best = best_move_at_depth(fen, 4);
    let mv = best.best.expect("a legal move exists");
    assert_ne!(pos.piece_at(mv.to()), chess_core::types::Piece::None, "should capture material: {}", mv.to_uci());
}

#[test]
fn only_legal_move_is_played() {
    let best = best_move_at_depth("7k/8/8/8/8/8/8/K6r w - - 0 1", 4);
    assert_eq!(best.best.map(|m| m.to_uci()), Some("a1a2".to_string()));
}

#[test]
fn no_move_from_a_checkmated_position() {
    let fen = "rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1";
    let best = best_move_at_depth(fen, 4);
    assert!(best.best.is_none());
}
