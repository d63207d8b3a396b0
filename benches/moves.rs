use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;
use tile2048::{
    Board, Direction, EngineConfig, GridEngine, MemoryStore, SpawnRng,
    game::moves::{move_changes_board, resolve_move},
};

struct StdSpawn(StdRng);

impl SpawnRng for StdSpawn {
    fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 { 0 } else { self.0.gen_range(0..max) }
    }
}

fn corpus() -> Vec<Board> {
    // Boards of increasing density from one seeded game
    let mut engine = GridEngine::with_seed(42);
    let mut boards = vec![Board::new(), engine.board().clone()];
    let seq = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    for i in 0..40 {
        if engine.apply_move(seq[i % seq.len()]).is_err() { break; }
        boards.push(engine.board().clone());
    }
    boards
}

fn bench_resolve(c: &mut Criterion) {
    for dir in Direction::ALL {
        c.bench_function(&format!("resolve/{}", dir.name()), |bch| {
            let boards = corpus();
            bch.iter_batched(
                || boards.clone(),
                |mut boards| {
                    let mut acc = 0u32;
                    for bd in boards.iter_mut() { acc ^= resolve_move(bd, dir, 1).score_delta; }
                    black_box(acc)
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_queries(c: &mut Criterion) {
    c.bench_function("board/move_changes_board", |bch| {
        let boards = corpus();
        bch.iter(|| {
            let mut acc = 0usize;
            for bd in &boards {
                for dir in Direction::ALL { acc += move_changes_board(bd, dir) as usize; }
            }
            black_box(acc)
        })
    });
    c.bench_function("board/moves_available", |bch| {
        let boards = corpus();
        bch.iter(|| {
            let mut acc = 0usize;
            for bd in &boards { acc += bd.moves_available() as usize; }
            black_box(acc)
        })
    });
}

fn bench_engine(c: &mut Criterion) {
    c.bench_function("engine/apply_move_x100", |bch| {
        bch.iter_batched(
            || {
                GridEngine::new(
                    EngineConfig::default(),
                    StdSpawn(StdRng::seed_from_u64(7)),
                    MemoryStore::new(),
                ).unwrap()
            },
            |mut engine| {
                for i in 0..100u8 {
                    if engine.apply_move(Direction::from_index(i % 4).unwrap()).is_err() { break; }
                }
                black_box(engine.score())
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("engine/state_hash", |bch| {
        let engine = GridEngine::with_seed(99);
        bch.iter(|| black_box(engine.state_hash()))
    });
}

criterion_group!(benches, bench_resolve, bench_queries, bench_engine);
criterion_main!(benches);
