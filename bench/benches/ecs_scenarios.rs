//! ECS scenario benchmarks using Criterion.
//!
//! These benchmarks measure whole frames of realistic workloads:
//! - Particle system (high entity count, constant churn)
//! - Game world (mixed component sets, combat deaths)
//!
//! With the `memory_profiling` feature, the frame-time group also reports heap allocations made
//! after setup, which should be zero.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sparse_bench::{
    frame_timer::{Phase, measure_frame_loop},
    memory::measure_steady_state,
    scenarios::{
        GameWorldConfig, GameWorldScenario, ParticleConfig, ParticleScenario, Scenario,
    },
};

#[cfg(feature = "memory_profiling")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

// =============================================================================
// Particle System Benchmarks
// =============================================================================

fn bench_particles(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario/particles");

    for count in [10_000, 50_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("frame", count), &count, |b, &n| {
            let mut scenario = ParticleScenario::with_config(ParticleConfig {
                particle_count: n,
                ..Default::default()
            });
            scenario.setup();

            b.iter(|| scenario.update());
        });

        // Update systems only, no flush or respawn
        group.bench_with_input(BenchmarkId::new("movement", count), &count, |b, &n| {
            let mut scenario = ParticleScenario::with_config(ParticleConfig {
                particle_count: n,
                ..Default::default()
            });
            scenario.setup();

            b.iter(|| scenario.system_movement());
        });
    }

    group.finish();
}

// =============================================================================
// Game World Benchmarks
// =============================================================================

fn bench_game_world(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario/game_world");

    for npcs in [1_000, 5_000, 20_000] {
        let config = GameWorldConfig {
            npc_count: npcs,
            static_count: npcs / 2,
            ..Default::default()
        };
        group.throughput(Throughput::Elements((npcs + npcs / 2) as u64));

        group.bench_with_input(BenchmarkId::new("frame", npcs), &config, |b, config| {
            let mut scenario = GameWorldScenario::with_config(config.clone());
            scenario.setup();

            b.iter(|| scenario.update());
        });
    }

    group.finish();
}

// =============================================================================
// Frame Time Benchmarks (longer running, statistical)
// =============================================================================

fn bench_frame_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_times");
    group.sample_size(10); // Each sample runs many frames

    group.bench_function("particles_600_frames", |b| {
        b.iter_custom(|iters| {
            let mut total = std::time::Duration::ZERO;

            for _ in 0..iters {
                let mut scenario = ParticleScenario::with_config(ParticleConfig {
                    particle_count: 50_000,
                    ..Default::default()
                });
                scenario.setup();

                let stats = measure_frame_loop(600, |_, phase| scenario.run_phase(phase));
                total += stats.frames.total_duration;
            }

            total
        });
    });

    group.finish();

    // One-off report of where frame time goes, and of allocations after setup
    let mut scenario = GameWorldScenario::new();
    scenario.setup();
    let stats = measure_frame_loop(600, |_, phase| scenario.run_phase(phase));
    println!("{} ({} entities)\n{stats}", scenario.name(), scenario.entity_count());
    println!(
        "flush p99: {:.3}ms",
        stats.phase(Phase::Flush).p99().as_secs_f64() * 1000.0
    );

    let (setup, frames) = measure_steady_state(
        || {
            let mut scenario = ParticleScenario::with_config(ParticleConfig {
                particle_count: 10_000,
                ..Default::default()
            });
            scenario.setup();
            scenario
        },
        |scenario| scenario.update(),
        600,
    );
    println!("particles setup: {setup}");
    println!("particles 600 frames: {frames}");
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_particles, bench_game_world, bench_frame_times);

criterion_main!(benches);
