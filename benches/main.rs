use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use sweeper_solver::board::{Board, BoardState};
use sweeper_solver::highlight::{HighlightTrail, NoHighlight};
use sweeper_solver::solver::learned_policy::{features, LinearModel, TrainingSet};
use sweeper_solver::solver::{HeuristicSweep, Solver};

fn expert_board(seed: u64) -> Board {
    let mut board = Board::new(16, 30, 99).unwrap();
    board.generate_with_seed(15, 8, seed);
    board
}

fn boards(c: &mut Criterion) {
    let mut group = c.benchmark_group("boards");

    group.bench_function("generating expert", |b| {
        let mut board = Board::new(16, 30, 99).unwrap();
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            board.generate_with_seed(15, 8, black_box(seed));
        })
    });

    group.bench_function("flood fill on empty board", |b| {
        b.iter_batched(
            || {
                let mut board = Board::new(64, 64, 0).unwrap();
                board.generate_with_seed(0, 0, 0);
                board
            },
            |mut board| board.reveal(black_box(32), black_box(32)),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("reveal safe origin", |b| {
        b.iter_batched(
            || expert_board(7),
            |mut board| board.reveal(black_box(15), black_box(8)),
            BatchSize::SmallInput,
        )
    });
}

fn solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("solvers");

    group.bench_function("heuristic sweep round", |b| {
        b.iter_batched(
            || (expert_board(11), HeuristicSweep::with_seed(11)),
            |(mut board, mut solver)| {
                while board.state() == BoardState::Ongoing && solver.step(&mut board, &NoHighlight) {}
                board.state()
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("heuristic sweep round with trail", |b| {
        let trail = HighlightTrail::default();
        b.iter_batched(
            || (expert_board(11), HeuristicSweep::with_seed(11)),
            |(mut board, mut solver)| {
                while board.state() == BoardState::Ongoing && solver.step(&mut board, &trail) {}
                board.state()
            },
            BatchSize::SmallInput,
        )
    });
}

fn learning(c: &mut Criterion) {
    let mut group = c.benchmark_group("learning");

    let mut board = expert_board(3);
    board.reveal(15, 8);
    let positions: Vec<(usize, usize)> = board.positions().collect();
    let mut set = TrainingSet::new();
    for (index, &(x, y)) in positions.iter().cycle().take(5000).enumerate() {
        set.push(&features::featurize(&board, x, y), (index % 2) as f64)
            .unwrap();
    }

    group.bench_function("featurizing", |b| {
        b.iter(|| features::featurize(&board, black_box(10), black_box(10)))
    });

    group.sample_size(20);
    group.bench_function("fitting 5000 samples", |b| {
        b.iter(|| LinearModel::fit(black_box(&set), 1e-4))
    });
}

criterion_group!(benches, boards, solvers, learning);
criterion_main!(benches);
