use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sandglass_core::{Geometry, PhysicsConfig, SandSimulation};

const FRAME_DT: f32 = 1.0 / 60.0;

fn loaded_simulation(duration_ms: f64, elapsed_ms: f64) -> SandSimulation {
    let mut sim = SandSimulation::with_seed(PhysicsConfig::default(), 0x5eed);
    sim.set_geometry(Geometry::from_bounds(480.0, 720.0).expect("geometry"));
    sim.initialize(duration_ms);

    let mut t = 0.0;
    while t < elapsed_ms {
        t += FRAME_DT as f64 * 1000.0;
        sim.update(FRAME_DT, t);
    }
    sim
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for (label, duration_ms) in [("200_grains", 60_000.0), ("400_grains", 300_000.0)] {
        let mut sim = loaded_simulation(duration_ms, duration_ms * 0.5);
        let elapsed = sim.elapsed_ms();
        group.bench_function(label, |b| {
            b.iter(|| sim.update(black_box(FRAME_DT), black_box(elapsed)))
        });
    }

    group.finish();
}

fn bench_geometry(c: &mut Criterion) {
    c.bench_function("geometry_from_bounds", |b| {
        b.iter(|| Geometry::from_bounds(black_box(480.0), black_box(720.0)))
    });
}

criterion_group!(benches, bench_update, bench_geometry);
criterion_main!(benches);
