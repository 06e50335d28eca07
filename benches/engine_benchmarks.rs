//! Benchmarks for chess engine performance.

use std::sync::{Arc, Mutex};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_core::eval::{Evaluator, SimpleEvaluator};
use chess_core::movegen::{self, GenMode};
use chess_core::perft::perft_nodes;
use chess_core::position::Position;
use chess_core::search::{BestMove, Search, SearchLimits};

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut startpos = Position::from_fen(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    )
    .unwrap();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| perft_nodes(&mut startpos, black_box(depth)))
        });
    }

    let mut kiwipete = Position::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| perft_nodes(&mut kiwipete, black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let mut startpos = Position::from_fen(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    )
    .unwrap();
    group.bench_function("startpos", |b| {
        b.iter(|| black_box(movegen::generate_legal(&mut startpos, GenMode::All)))
    });

    let mut middlegame = Position::from_fen(
        "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    )
    .unwrap();
    group.bench_function("middlegame", |b| {
        b.iter(|| black_box(movegen::generate_legal(&mut middlegame, GenMode::All)))
    });

    let mut kiwipete = Position::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    group.bench_function("kiwipete", |b| {
        b.iter(|| black_box(movegen::generate_legal(&mut kiwipete, GenMode::All)))
    });

    group.finish();
}

fn search_to_depth(fen: &str, depth: i32) -> BestMove {
    let pos = Position::from_fen(fen).unwrap();
    let mut search = Search::new(16);
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

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in [3, 4, 5] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                search_to_depth(
                    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                    depth,
                )
            })
        });
    }

    for depth in [3, 4] {
        group.bench_with_input(BenchmarkId::new("tactical", depth), &depth, |b, &depth| {
            b.iter(|| {
                search_to_depth(
                    "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4",
                    depth,
                )
            })
        });
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");

    let positions = [
        ("startpos", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        ("middlegame", "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"),
        ("endgame", "8/5k2/8/8/8/8/5K2/4R3 w - - 0 1"),
    ];

    let evaluator = SimpleEvaluator;
    for (name, fen) in positions {
        let pos = Position::from_fen(fen).unwrap();
        group.bench_with_input(BenchmarkId::new("position", name), &pos, |b, pos| {
            b.iter(|| black_box(evaluator.evaluate(pos)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_search, bench_eval);
criterion_main!(benches);
