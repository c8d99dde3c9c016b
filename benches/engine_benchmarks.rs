//! Benchmarks for move generation, exchange evaluation and search.

use std::sync::atomic::AtomicBool;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tactica::board::{search, Board, GenMode, MoveList, SearchConfig, SearchState};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_perft(c: &mut Criterion) {
    tactica::init();
    let mut group = c.benchmark_group("perft");

    let mut board = Board::new();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| board.perft(black_box(depth)))
        });
    }

    let mut kiwipete = Board::from_fen(KIWIPETE);
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| kiwipete.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    tactica::init();
    let mut group = c.benchmark_group("movegen");

    let mut kiwipete = Board::from_fen(KIWIPETE);
    group.bench_function("legal", |b| b.iter(|| black_box(kiwipete.legal_moves())));

    for (name, mode) in [("all", GenMode::All), ("noisy", GenMode::Noisy), ("quiet", GenMode::Quiet)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut list = MoveList::new();
                kiwipete.generate_pseudo(black_box(mode), &mut list);
                black_box(list.len())
            })
        });
    }

    let mut noisy = MoveList::new();
    kiwipete.generate_pseudo(GenMode::Noisy, &mut noisy);
    group.bench_function("see_captures", |b| {
        b.iter(|| noisy.iter().map(|&mv| kiwipete.see(black_box(mv))).sum::<i32>())
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    tactica::init();
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in [4, 6] {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut board = Board::from_fen(KIWIPETE);
                let mut state = SearchState::new(16);
                let stop = AtomicBool::new(false);
                search(&mut board, &mut state, SearchConfig::depth(depth), &stop)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_search);
criterion_main!(benches);
