//! End-to-end runs of the frame driver against a manual clock

use std::sync::Arc;
use std::time::Duration;

use bubble_arena::config::SimConfig;
use bubble_arena::sim::body::{Body, CircleView, Rgba};
use bubble_arena::sim::clock::ManualClock;
use bubble_arena::sim::driver::StopReason;
use bubble_arena::sim::{stop_signal, Arena, DriverState, FrameDriver, NullRenderer};
use bubble_arena::util::vec2::Vec2;

const FRAME: Duration = Duration::from_millis(16);

fn body(x: f32, y: f32, vx: f32, vy: f32) -> Body {
    Body::new(Vec2::new(x, y), Vec2::new(vx, vy), 10, Rgba::opaque(200, 100, 50))
}

#[test]
fn stationary_population_never_changes() {
    let bodies: Vec<Body> = (0..50)
        .map(|i| body(30.0 + 60.0 * (i % 10) as f32, 30.0 + 60.0 * (i / 10) as f32, 0.0, 0.0))
        .collect();
    let config = SimConfig {
        reset_interval_ms: None,
        run_duration_ms: Some(16 * 300),
        seed: Some(5),
        worker_threads: 2,
        ..Default::default()
    };
    let clock = Arc::new(ManualClock::new());
    let arena = Arena::with_bodies(config, bodies.clone()).unwrap();
    let mut driver = FrameDriver::with_arena(arena, clock.clone());

    let mut sizes = Vec::new();
    let pacing = clock.clone();
    let report = driver.run(&mut |frame: &[CircleView]| {
        sizes.push(frame.len());
        pacing.advance(FRAME);
    });

    assert_eq!(report.frames, 300);
    assert!(sizes.iter().all(|&n| n == 50));
    assert_eq!(driver.arena().bodies(), bodies.as_slice());
    assert_eq!(report.metrics.collisions, 0);
    assert_eq!(report.metrics.growth_events, 0);
    assert_eq!(report.metrics.live_bodies, 50);
}

#[test]
fn head_on_pair_swaps_on_first_tick() {
    let config = SimConfig {
        reset_interval_ms: None,
        seed: Some(1),
        worker_threads: 1,
        ..Default::default()
    };
    // After the motion phase the centres sit at (102,100) and (106,100)
    let arena = Arena::with_bodies(config, vec![body(100.0, 100.0, 2.0, 0.0), body(108.0, 100.0, -2.0, 0.0)]).unwrap();
    let mut driver = FrameDriver::with_arena(arena, ManualClock::new());

    assert_eq!(driver.tick(&mut NullRenderer), DriverState::Running);

    let [a, b] = driver.arena().bodies() else {
        panic!("expected two bodies");
    };
    assert_eq!(a.velocity, Vec2::new(-2.0, 0.0));
    assert_eq!(b.velocity, Vec2::new(2.0, 0.0));
    assert_eq!(a.collision_count, 1);
    assert_eq!(b.collision_count, 1);
}

#[test]
fn long_random_run_keeps_invariants() {
    let config = SimConfig {
        capacity: 100,
        seed: Some(0xb0b),
        worker_threads: 4,
        reset_interval_ms: Some(500),
        ..Default::default()
    };
    let clock = Arc::new(ManualClock::new());
    let mut driver = FrameDriver::new(config.clone(), clock.clone()).unwrap();

    for _ in 0..2_000 {
        let pacing = clock.clone();
        driver.tick(&mut |_: &[CircleView]| pacing.advance(FRAME));

        let arena = driver.arena();
        assert_eq!(arena.capacity(), 100);
        assert_eq!(arena.live_count() + arena.pending_recycles(), 100);
        for b in arena.bodies() {
            assert!(b.radius >= config.min_radius && b.radius <= config.max_radius);
            assert!(b.velocity.x.is_finite() && b.velocity.y.is_finite());
        }
    }

    let metrics = driver.arena().metrics().snapshot();
    assert_eq!(metrics.ticks, 2_000);
    assert!(metrics.velocity_resets >= 60);
    assert!(metrics.recycles <= metrics.growth_events);
}

#[test]
fn absorbed_body_returns_next_tick() {
    let config = SimConfig {
        reset_interval_ms: None,
        seed: Some(3),
        worker_threads: 1,
        ..Default::default()
    };
    let mut arena = Arena::with_bodies(config, vec![body(200.0, 200.0, 1.0, 0.0), body(212.0, 200.0, -1.0, 0.0)]).unwrap();
    arena.bodies_mut()[1].collision_count = 9;
    let mut driver = FrameDriver::with_arena(arena, ManualClock::new());

    let mut drawn = Vec::new();
    driver.tick(&mut |frame: &[CircleView]| drawn.push(frame.to_vec()));
    // Body 0 is not eligible, so body 1 grows and absorbs it
    assert_eq!(drawn[0].len(), 1);
    assert_eq!(drawn[0][0].radius, 12);
    assert!(!driver.arena().bodies()[0].alive);

    driver.tick(&mut |frame: &[CircleView]| drawn.push(frame.to_vec()));
    assert_eq!(drawn[1].len(), 2);
    assert_eq!(driver.arena().bodies()[0].radius, 10);
    assert!(driver.arena().bodies()[0].alive);
}

#[test]
fn stop_request_from_another_thread() {
    let (handle, signal) = stop_signal();
    let config = SimConfig {
        capacity: 30,
        seed: Some(11),
        worker_threads: 2,
        ..Default::default()
    };
    let mut driver = FrameDriver::new(config, ManualClock::new())
        .unwrap()
        .with_stop_signal(signal);

    let mut frames = 0u32;
    let mut handle = Some(handle);
    let report = driver.run(&mut |_: &[CircleView]| {
        frames += 1;
        if frames == 25 {
            if let Some(handle) = handle.take() {
                std::thread::spawn(move || handle.stop()).join().unwrap();
            }
        }
    });

    assert_eq!(report.frames, 25);
    assert_eq!(driver.stop_reason(), Some(StopReason::Signal));
    assert_eq!(driver.tick(&mut NullRenderer), DriverState::Stopped);
}
