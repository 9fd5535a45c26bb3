use lumen_core::{FieldFn, FieldParams, ParticleFieldSimulator, SimulationConfig, SimulatorBuilder, Vec3};

fn constant_field(d: Vec3) -> FieldFn<impl Fn(Vec3) -> Vec3> {
    FieldFn(move |_p: Vec3| d)
}

fn assert_all_finite(values: &[f32]) {
    for (i, v) in values.iter().enumerate() {
        assert!(v.is_finite(), "value {} is not finite: {}", i, v);
    }
}

#[test]
fn constant_field_moves_x_by_exactly_the_step() {
    let mut sim = SimulatorBuilder::new()
        .with_particle_count(4)
        .with_field(constant_field(Vec3::new(1.0, 0.0, 0.0)))
        .with_integration_scale(0.1)
        .with_escape_radius_sq(1e6)
        .with_seed(7)
        .build()
        .unwrap();

    let before = sim.positions().to_vec();
    let reseeded = sim.advance(1.0 / 60.0);
    let after = sim.positions();

    assert_eq!(reseeded, 0);
    for i in 0..4 {
        assert_eq!(after[i * 3], before[i * 3] + 0.1f32);
        assert_eq!(after[i * 3 + 1], before[i * 3 + 1]);
        assert_eq!(after[i * 3 + 2], before[i * 3 + 2]);
    }
}

#[test]
fn guaranteed_divergence_reseeds_into_the_cube() {
    let half_width = 0.5;
    let mut sim = SimulatorBuilder::new()
        .with_particle_count(64)
        .with_field(constant_field(Vec3::new(1000.0, 0.0, 0.0)))
        .with_integration_scale(0.1)
        .with_escape_radius_sq(1.0)
        .with_seed_half_width(half_width)
        .build()
        .unwrap();

    let reseeded = sim.advance(0.016);
    assert_eq!(reseeded, 64);
    for i in 0..sim.particle_count() {
        let p = sim.position(i);
        assert!(p.abs().max_element() <= half_width, "particle {} escaped the seed cube: {:?}", i, p);
    }
}

#[test]
fn divergence_with_default_seed_cube_still_builds_and_reseeds() {
    let mut sim = SimulatorBuilder::new()
        .with_particle_count(4)
        .with_field(constant_field(Vec3::new(1000.0, 0.0, 0.0)))
        .with_integration_scale(0.1)
        .with_escape_radius_sq(1.0)
        .build()
        .unwrap();

    let half_width = sim.seed_half_width();
    assert_eq!(half_width, 5.0);
    assert_eq!(sim.advance(0.016), 4);
    assert_all_finite(sim.positions());
    for i in 0..sim.particle_count() {
        let p = sim.position(i);
        assert!(p.abs().max_element() <= half_width, "particle {} escaped the seed cube: {:?}", i, p);
    }
}

#[test]
fn stats_report_speed_and_bounds() {
    let mut sim = SimulatorBuilder::new()
        .with_particle_count(100)
        .with_field(constant_field(Vec3::new(3.0, 4.0, 0.0)))
        .with_integration_scale(0.01)
        .with_escape_radius_sq(1e6)
        .build()
        .unwrap();

    sim.advance(0.5);
    sim.update_stats();
    let stats = &sim.stats;

    assert_eq!(stats.particle_count, 100);
    assert_eq!(stats.frame, 1);
    assert_eq!(stats.elapsed, 0.5);
    assert_eq!(stats.reseeded_last_frame, 0);
    assert!((stats.mean_speed - 5.0).abs() < 1e-5, "mean speed {}", stats.mean_speed);
    assert!((stats.max_speed - 5.0).abs() < 1e-6, "max speed {}", stats.max_speed);

    let mut radius_sum = 0.0;
    for i in 0..sim.particle_count() {
        let p = sim.position(i).to_array();
        radius_sum += sim.position(i).length();
        for k in 0..3 {
            assert!(stats.bounds_min[k] <= p[k] && p[k] <= stats.bounds_max[k], "particle {} outside bounds", i);
        }
    }
    assert!((stats.mean_radius - radius_sum / 100.0).abs() < 1e-4);
}

#[test]
fn total_reseeds_accumulate_until_reset() {
    let mut sim = SimulatorBuilder::new()
        .with_particle_count(16)
        .with_field(constant_field(Vec3::new(1000.0, 0.0, 0.0)))
        .with_integration_scale(0.1)
        .with_escape_radius_sq(1.0)
        .with_seed_half_width(0.5)
        .build()
        .unwrap();

    sim.advance(0.016);
    sim.advance(0.016);
    sim.update_stats();
    assert_eq!(sim.stats.reseeded_last_frame, 16);
    assert_eq!(sim.stats.total_reseeds, 32);

    sim.reset();
    assert_eq!(sim.stats, lumen_core::ParticleStats::default());
    sim.update_stats();
    assert_eq!(sim.stats.total_reseeds, 0);
    assert_eq!(sim.stats.reseeded_last_frame, 0);
    assert_eq!(sim.stats.frame, 0);
}

#[test]
fn non_finite_steps_are_recovered_in_the_same_frame() {
    let mut sim = SimulatorBuilder::new()
        .with_particle_count(32)
        .with_field(constant_field(Vec3::new(f32::NAN, f32::INFINITY, 0.0)))
        .with_integration_scale(0.01)
        .build()
        .unwrap();

    for _ in 0..5 {
        assert_eq!(sim.advance(0.016), 32);
        assert_all_finite(sim.positions());
        assert_all_finite(sim.colors());
    }
}

#[test]
fn buffers_keep_their_size_under_repeated_advance() {
    let config = SimulationConfig {
        world: lumen_core::WorldConfig {
            particles: 500,
            frames: 100,
            frame_dt: 1.0 / 60.0,
            seed: 3,
        },
        ..SimulationConfig::default()
    };
    let mut sim = ParticleFieldSimulator::from_config(&config).unwrap();
    for _ in 0..200 {
        sim.advance(config.world.frame_dt);
        assert_eq!(sim.positions().len(), 3 * 500);
        assert_eq!(sim.colors().len(), 3 * 500);
    }
}

#[test]
fn every_attractor_stays_finite() {
    for name in FieldParams::NAMES {
        let mut config = SimulationConfig::with_field(FieldParams::from_name(name).unwrap());
        config.world.particles = 300;
        // Push the step well past the stock value to provoke divergence
        config.integration.speed_multiplier = 5.0;
        let mut sim = ParticleFieldSimulator::from_config(&config).unwrap();
        for _ in 0..300 {
            sim.advance(0.016);
        }
        assert_all_finite(sim.positions());
        assert_all_finite(sim.colors());
        let limit = config.integration.escape_radius_sq;
        for i in 0..sim.particle_count() {
            assert!(sim.position(i).length_squared() <= limit, "{} particle {} outside escape radius", name, i);
        }
    }
}

#[test]
fn identical_seeds_produce_identical_trajectories() {
    let mut config = SimulationConfig::default();
    config.world.particles = 1000;
    let mut a = ParticleFieldSimulator::from_config(&config).unwrap();
    let mut b = ParticleFieldSimulator::from_config(&config).unwrap();

    let deltas = [0.016, 0.020, 0.0, 0.033, 0.016];
    for _ in 0..20 {
        for dt in deltas {
            a.advance(dt);
            b.advance(dt);
            assert_eq!(a.positions(), b.positions());
            assert_eq!(a.colors(), b.colors());
        }
    }
}

#[test]
fn different_seeds_start_apart() {
    let mut config = SimulationConfig::default();
    config.world.particles = 16;
    let a = ParticleFieldSimulator::from_config(&config).unwrap();
    config.world.seed += 1;
    let b = ParticleFieldSimulator::from_config(&config).unwrap();
    assert_ne!(a.positions(), b.positions());
}

#[test]
fn initial_positions_fill_the_seed_cube() {
    let sim = SimulatorBuilder::new()
        .with_particle_count(2000)
        .with_field(FieldParams::lorenz())
        .with_seed_half_width(5.0)
        .build()
        .unwrap();

    let mut max = 0.0f32;
    for i in 0..sim.particle_count() {
        let m = sim.position(i).abs().max_element();
        assert!(m <= 5.0);
        max = max.max(m);
    }
    // 2000 uniform samples essentially always reach the outer shell
    assert!(max > 4.0);
}

#[test]
fn gap_radius_reseeds_particles_that_fall_inside() {
    // Field pulls every particle to the origin in one step
    let mut sim = SimulatorBuilder::new()
        .with_particle_count(50)
        .with_field(FieldFn(|p: Vec3| -p))
        .with_integration_scale(1.0)
        .with_gap_radius(0.5)
        .with_seed_half_width(5.0)
        .build()
        .unwrap();

    assert_eq!(sim.advance(0.016), 50);

    let mut without_gap = SimulatorBuilder::new()
        .with_particle_count(50)
        .with_field(FieldFn(|p: Vec3| -p))
        .with_integration_scale(1.0)
        .build()
        .unwrap();
    assert_eq!(without_gap.advance(0.016), 0);
    assert!(without_gap.positions().iter().all(|v| *v == 0.0));
}

#[test]
fn reset_restarts_clock_and_keeps_allocation() {
    let mut config = SimulationConfig::default();
    config.world.particles = 100;
    let mut sim = ParticleFieldSimulator::from_config(&config).unwrap();
    for _ in 0..10 {
        sim.advance(0.1);
    }
    assert_eq!(sim.frame(), 10);
    assert!((sim.elapsed() - 1.0).abs() < 1e-5);

    sim.reset();
    assert_eq!(sim.frame(), 0);
    assert_eq!(sim.elapsed(), 0.0);
    assert_eq!(sim.positions().len(), 300);
    for i in 0..sim.particle_count() {
        assert!(sim.position(i).abs().max_element() <= config.seeding.half_width);
    }
}

#[test]
fn bad_delta_time_does_not_corrupt_the_clock() {
    let mut config = SimulationConfig::default();
    config.world.particles = 8;
    let mut sim = ParticleFieldSimulator::from_config(&config).unwrap();
    sim.advance(f32::NAN);
    sim.advance(-1.0);
    sim.advance(0.5);
    assert_eq!(sim.frame(), 3);
    assert_eq!(sim.elapsed(), 0.5);
}
