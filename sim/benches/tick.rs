//! Benchmarks for one simulation tick on the built-in maps.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use swarm_sim::{ManualClock, ScenarioConfig, SimClock, SimConfig, SimRng, SimWorld};

fn seeded_world(map: &str, friendlies: u32, hostiles: u32) -> (SimWorld, ManualClock) {
    let clock = ManualClock::new(0);
    let mut sim = SimWorld::with_parts(SimConfig::default(), SimRng::seeded(7), SimClock::new(clock.clone()));
    let scenario = ScenarioConfig {
        map: map.to_string(),
        friendly_count: friendlies,
        hostile_count: hostiles,
        ..Default::default()
    };
    sim.initialize(&scenario).expect("built-in map");
    (sim, clock)
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for &(friendlies, hostiles) in &[(12u32, 15u32), (40, 60), (100, 150)] {
        group.bench_with_input(
            BenchmarkId::new("city", format!("{}v{}", friendlies, hostiles)),
            &(friendlies, hostiles),
            |b, &(f, h)| {
                let (mut sim, clock) = seeded_world("city", f, h);
                b.iter(|| {
                    clock.advance(16);
                    sim.tick(black_box(true), black_box(true));
                });
            },
        );
    }

    group.bench_function("city/comms-down", |b| {
        let (mut sim, clock) = seeded_world("city", 40, 60);
        b.iter(|| {
            clock.advance(16);
            sim.tick(black_box(false), black_box(false));
        });
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let (mut sim, _clock) = seeded_world("harbor", 40, 60);
    sim.tick(true, true);
    c.bench_function("snapshot_json", |b| b.iter(|| black_box(sim.snapshot_json())));
}

criterion_group!(benches, bench_tick, bench_snapshot);
criterion_main!(benches);
