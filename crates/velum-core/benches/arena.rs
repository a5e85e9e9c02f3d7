use criterion::{Criterion, black_box, criterion_group, criterion_main};
use velum_core::alloc::Arena;

fn bench_insert_remove(c: &mut Criterion) {
    c.bench_function("arena_insert_remove", |b| {
        b.iter(|| {
            let mut arena = Arena::new();
            let slots: Vec<_> = (0..1000u32).map(|i| arena.insert(i)).collect();
            for slot in slots {
                black_box(arena.remove(slot));
            }
        })
    });
}

fn bench_lookup(c: &mut Criterion) {
    let mut arena = Arena::new();
    let slots: Vec<_> = (0..1000u32).map(|i| arena.insert(i)).collect();
    c.bench_function("arena_lookup", |b| {
        b.iter(|| {
            for slot in &slots {
                black_box(arena.get(*slot));
            }
        })
    });
}

criterion_group!(benches, bench_insert_remove, bench_lookup);
criterion_main!(benches);
