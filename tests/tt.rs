//! Transposition table behavior exercised through its public API, at the
//! granularity a search driver actually uses it.

use chess_core::moves::{Move, MoveType};
use chess_core::tt::{BoundType, TranspositionTable};
use chess_core::types::Square;

fn sample_move() -> Move {
    Move::new(Square::new(1, 4), Square::new(3, 4), MoveType::Normal)
}

#[test]
fn deeper_search_replaces_a_shallower_entry_at_the_same_key() {
    let mut tt = TranspositionTable::new(1);
    let mv = sample_move();
    tt.put(123, 2, mv, 50, BoundType::Exact, false, 0, true);
    tt.put(123, 8, mv, 75, BoundType::Exact, false, 0, true);

    let probe = tt.probe(123, 8, -1000, 1000, false, 0);
    assert!(probe.hit);
    assert_eq!(probe.value, 75);
}

#[test]
fn resize_drops_all_entries() {
    let mut tt = TranspositionTable::new(1);
    tt.put(99, 4, sample_move(), 10, BoundType::Exact, false, 0, true);
    tt.resize(2);
    let probe = tt.probe(99, 4, -1000, 1000, false, 0);
    assert!(!probe.hit);
}

#[test]
fn clear_empties_the_table_and_resets_hashfull() {
    let mut tt = TranspositionTable::new(1);
    for key in 0..100u64 {
        tt.put(key, 1, Move::NONE, 0, BoundType::Exact, false, 0, true);
    }
    assert!(tt.hashfull_permille() > 0);
    tt.clear();
    assert_eq!(tt.hashfull_permille(), 0);
}

#[test]
fn lower_bound_entry_only_cuts_off_when_value_beats_beta() {
    let mut tt = TranspositionTable::new(1);
    tt.put(7, 6, sample_move(), 300, BoundType::LowerBound, false, 0, true);

    let below_beta = tt.probe(7, 6, -1000, 500, false, 0);
    assert!(!below_beta.hit);

    let beaten_beta = tt.probe(7, 6, -1000, 200, false, 0);
    assert!(beaten_beta.hit);
}
