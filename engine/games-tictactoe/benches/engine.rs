use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use engine_core::Game;
use games_tictactoe::{Mark, Move, TicTacToe};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn bench_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_legal_moves");
    group.bench_function("empty_board", |b| {
        let state = TicTacToe::new();
        b.iter(|| black_box(state.legal_moves()));
    });
    group.bench_function("midgame", |b| {
        let state = TicTacToe::parse("X.O.X.O..", Mark::X).unwrap();
        b.iter(|| black_box(state.legal_moves()));
    });
    group.finish();
}

fn bench_apply_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_apply_move");
    group.bench_function("apply_center", |b| {
        let state = TicTacToe::new();
        let center = Move::new(4).unwrap();
        b.iter(|| black_box(state.apply_move(center).unwrap()));
    });
    group.finish();
}

fn bench_random_playout(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_playout");
    group.bench_function("empty_board_to_terminal", |b| {
        b.iter_batched(
            || ChaCha20Rng::seed_from_u64(7),
            |mut rng| {
                let mut state = TicTacToe::new();
                while !state.is_terminal() {
                    let moves = state.legal_moves();
                    let m = *moves.choose(&mut rng).unwrap();
                    state = state.apply_move(m).unwrap();
                }
                black_box(state.outcome())
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_legal_moves, bench_apply_move, bench_random_playout);
criterion_main!(benches);
