//! Scalability benchmarks for the bubble arena
//!
//! Measures each tick phase at several population sizes to check how far the
//! all-pairs collision pass stays inside a 60 fps frame budget.
//!
//! Run with: cargo bench --bench scalability

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use bubble_arena::config::SimConfig;
use bubble_arena::sim::clock::SystemClock;
use bubble_arena::sim::{Arena, FrameDriver, NullRenderer};

/// Create a seeded arena with the specified number of bodies
fn create_arena(count: usize) -> Arena {
    let config = SimConfig {
        capacity: count,
        // Keep the density close to the default 100 bodies in 640x480
        width: 640.0 * (count as f32 / 100.0).sqrt().max(1.0),
        height: 480.0 * (count as f32 / 100.0).sqrt().max(1.0),
        seed: Some(0x5eed),
        ..Default::default()
    };
    match Arena::new(config) {
        Ok(arena) => arena,
        Err(e) => panic!("benchmark arena rejected: {}", e),
    }
}

/// Benchmark the motion phase at various population sizes
fn bench_motion(c: &mut Criterion) {
    let mut group = c.benchmark_group("motion");
    group.sample_size(50);

    for count in [100, 250, 500, 1000] {
        let mut arena = create_arena(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("parallel", count), &count, |b, _| {
            b.iter(|| arena.integrate())
        });
    }
    group.finish();
}

/// Benchmark all-pairs collision resolution at various population sizes
fn bench_collision(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision");
    group.sample_size(50);

    for count in [100, 250, 500, 1000] {
        let mut arena = create_arena(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("all_pairs", count), &count, |b, _| {
            b.iter(|| {
                arena.recycle_pending();
                black_box(arena.resolve_collisions())
            })
        });
    }
    group.finish();
}

/// Benchmark a full driver tick (all phases plus snapshot)
fn bench_full_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_tick");
    group.sample_size(30);

    for count in [100, 500, 1000] {
        let mut driver = FrameDriver::with_arena(create_arena(count), SystemClock::new());

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("complete", count), &count, |b, _| {
            b.iter(|| black_box(driver.tick(&mut NullRenderer)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_motion, bench_collision, bench_full_tick);

criterion_main!(benches);
