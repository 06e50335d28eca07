//! End-to-end search scenarios against literal positions: mate-in-N,
//! already-mated, and draw-by-repetition avoidance.

use std::sync::{Arc, Mutex};

use chess_core::position::Position;
use chess_core::search::{BestMove, Search, SearchLimits, SearchProgress};
use chess_core::types::{Value, VALUE_CHECKMATE};

fn run_search(position: Position, limits: SearchLimits) -> (BestMove, Option<SearchProgress>) {
    chess_core::init();
    let mut search = Search::new(4);
    let last_progress = Arc::new(Mutex::new(None));
    let last_progress_sink = Arc::clone(&last_progress);
    let result = Arc::new(Mutex::new(None));
    let result_sink = Arc::clone(&result);

    search.start(
        position,
        limits,
        Some(Box::new(move |p: SearchProgress| {
            *last_progress_sink.lock().unwrap() = Some(p);
        })),
        Some(Box::new(move |best: BestMove| {
            *result_sink.lock().unwrap() = Some(best);
        })),
    );
    search.wait_while_searching();

    let best = result.lock().unwrap().take().unwrap_or_default();
    let progress = last_progress.lock().unwrap().take();
    (best, progress)
}

fn depth_limits(depth: i32) -> SearchLimits {
    SearchLimits {
        depth: Some(depth),
        ..SearchLimits::default()
    }
}

fn apply_moves(pos: &mut Position, moves: &[&str]) {
    for &text in moves {
        let m = pos.parse_uci_move(text).unwrap_or_else(|e| panic!("{text}: {e}"));
        pos.do_move(m);
    }
}

#[test]
fn s1_mate_in_one() {
    let pos = Position::from_fen("8/8/8/8/8/6K1/R7/6k1 w - - 0 8").unwrap();
    let mut limits = depth_limits(4);
    limits.mate = Some(1);
    let (best, progress) = run_search(pos, limits);
    assert_eq!(best.best.map(|m| m.to_uci()), Some("a2a1".to_string()));
    let progress = progress.expect("at least one iteration completed");
    assert_eq!(progress.score_string(), "mate 1");
}

#[test]
fn s2_mate_in_two() {
    let pos = Position::from_fen("8/8/8/8/8/5K2/R7/7k w - - 0 7").unwrap();
    let mut limits = depth_limits(4);
    limits.mate = Some(2);
    let (_, progress) = run_search(pos, limits);
    let progress = progress.expect("at least one iteration completed");
    assert_eq!(progress.score_string(), "mate 2");
}

#[test]
fn s3_already_mated_returns_checkmate_value() {
    let pos = Position::from_fen("8/8/8/8/8/6K1/8/R5k1 b - - 0 8").unwrap();
    let (_, progress) = run_search(pos, depth_limits(1));
    let progress = progress.expect("depth-1 search always reports an iteration");
    assert_eq!(progress.score, -VALUE_CHECKMATE);
}

#[test]
fn s4_forced_repetition_is_scored_as_a_draw() {
    let mut pos =
        Position::from_fen("8/p3Q1bk/1p4p1/5q2/P1N2p2/1P5p/2b4P/6K1 w - -").unwrap();
    apply_moves(
        &mut pos,
        &["e7h4", "h7g8", "h4d8", "g8h7", "d8h4", "h7g8", "h4d8", "g8h7"],
    );
    let (best, progress) = run_search(pos, depth_limits(4));
    assert_eq!(best.best.map(|m| m.to_uci()), Some("d8h4".to_string()));
    assert_eq!(progress.unwrap().score, 0);
}

#[test]
fn s5_winning_side_avoids_the_repetition() {
    let mut pos =
        Position::from_fen("8/p3Q1bk/1p4p1/5q2/P1N2p2/1P5p/2b4P/6K1 w - -").unwrap();
    apply_moves(
        &mut pos,
        &["e7h4", "h7g8", "h4d8", "g8h7", "d8h4", "h7g8", "h4d8"],
    );
    let (best, progress) = run_search(pos, depth_limits(4));
    assert_ne!(best.best.map(|m| m.to_uci()), Some("g8h7".to_string()));
    assert_ne!(progress.unwrap().score, 0);
}

#[test]
fn s6_see_loses_the_exchange() {
    chess_core::init();
    let pos = Position::from_fen("1k1r3q/1ppn3p/p4b2/4p3/8/P2N2P1/1PP1R1BP/2K1Q3 w - -").unwrap();
    let mv = pos.clone().parse_uci_move("d3e5").unwrap();
    let value: Value = chess_core::see::see(&pos, mv);
    assert_eq!(value, -220);
}
