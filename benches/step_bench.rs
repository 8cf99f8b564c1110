use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use life_sandbox::core::config::SimulationConfig;
use life_sandbox::core::types::Vec2;
use life_sandbox::simulation::{Material, Simulation, SpawnMode};
use life_sandbox::world::terrain::WorldShape;
use std::time::Duration;

/// Grid positions spread over the default 1280x720 surface
fn grid(n: usize, offset: f32) -> impl Iterator<Item = Vec2> {
    (0..n).map(move |i| {
        let col = (i % 16) as f32;
        let row = (i / 16) as f32;
        Vec2::new(60.0 + col * 72.0 + offset, 60.0 + (row * 53.0 + offset) % 600.0)
    })
}

fn populated(settlers: usize, shape: WorldShape) -> Simulation {
    let config = SimulationConfig {
        seed: 0xBEEF,
        world_shape: shape,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(config).expect("bench config should validate");

    for at in grid(settlers, 0.0) {
        sim.spawn(SpawnMode::Settler, at);
    }
    for at in grid(settlers / 5, 31.0) {
        sim.spawn(SpawnMode::Hostile, at);
    }
    for at in grid(settlers / 2, 17.0) {
        sim.spawn(SpawnMode::Resource(Material::Iron), at);
    }
    for (i, at) in grid(8, 45.0).enumerate() {
        let mode = match i % 4 {
            0 => SpawnMode::Defender,
            1 => SpawnMode::Guardian,
            2 => SpawnMode::Wanderer,
            _ => SpawnMode::ApexBeast,
        };
        sim.spawn(mode, at);
    }
    sim.clock.resume();
    sim
}

fn bench_simulation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(5));

    for &settlers in &[50_usize, 200, 500] {
        for shape in [WorldShape::Complete, WorldShape::Four] {
            group.bench_function(format!("settlers{}_{}_30frames", settlers, shape.name()), |b| {
                b.iter_batched(
                    || populated(settlers, shape),
                    |mut sim| {
                        for _ in 0..30 {
                            sim.advance_frame(1.0 / 60.0);
                        }
                        sim
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_simulation_step);
criterion_main!(benches);
