//! Benchmarks for per-frame integration and cloud generation.
//!
//! Run with: `cargo bench -p lumen-core`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lumen_core::{galaxy_cloud, FieldParams, GalaxyConfig, ParticleFieldSimulator, SimulationConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");

    for name in FieldParams::NAMES {
        let Some(field) = FieldParams::from_name(name) else { continue };
        let mut config = SimulationConfig::with_field(field);
        config.world.particles = 100_000;
        let mut sim = match ParticleFieldSimulator::from_config(&config) {
            Ok(sim) => sim,
            Err(e) => panic!("bench config rejected: {e}"),
        };
        group.bench_with_input(BenchmarkId::from_parameter(name), &config.world.frame_dt, |b, dt| {
            b.iter(|| black_box(sim.advance(*dt)))
        });
    }

    group.finish();
}

fn bench_galaxy(c: &mut Criterion) {
    let config = GalaxyConfig::default();
    c.bench_function("galaxy_cloud_100k", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            black_box(galaxy_cloud(&config, &mut rng))
        })
    });
}

criterion_group!(benches, bench_advance, bench_galaxy);
criterion_main!(benches);
