//! Node-count validation against known perft figures, beyond the shallow
//! depths already covered by unit tests in `src/perft.rs`.

use chess_core::perft::perft_nodes;
use chess_core::position::STARTPOS_FEN;
use chess_core::position::Position;

const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

#[test]
fn startpos_perft_depth_4_is_197281() {
    let mut pos = Position::from_fen(STARTPOS_FEN).unwrap();
    assert_eq!(perft_nodes(&mut pos, 4), 197_281);
}

#[test]
fn startpos_perft_depth_5_is_4865609() {
    let mut pos = Position::from_fen(STARTPOS_FEN).unwrap();
    assert_eq!(perft_nodes(&mut pos, 5), 4_865_609);
}

#[test]
#[ignore = "depth 6 perft (119,060,324 nodes) is too slow for a routine run"]
fn startpos_perft_depth_6_is_119060324() {
    let mut pos = Position::from_fen(STARTPOS_FEN).unwrap();
    assert_eq!(perft_nodes(&mut pos, 6), 119_060_324);
}

#[test]
fn kiwipete_perft_depth_2_is_2039() {
    let mut pos = Position::from_fen(KIWIPETE_FEN).unwrap();
    assert_eq!(perft_nodes(&mut pos, 2), 2_039);
}

#[test]
fn kiwipete_perft_depth_3_is_97862() {
    let mut pos = Position::from_fen(KIWIPETE_FEN).unwrap();
    assert_eq!(perft_nodes(&mut pos, 3), 97_862);
}

#[test]
#[ignore = "depth 4 kiwipete perft is slow for a routine run"]
fn kiwipete_perft_depth_4_is_4085603() {
    let mut pos = Position::from_fen(KIWIPETE_FEN).unwrap();
    assert_eq!(perft_nodes(&mut pos, 4), 4_085_603);
}
