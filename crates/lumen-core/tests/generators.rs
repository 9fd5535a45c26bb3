use lumen_core::{
    fibonacci_globe, fill_vertices, flower, forest, galaxy_cloud, galaxy_swirl, FlowerConfig, ForestConfig, ForestPart,
    GalaxyConfig, GlobeConfig, ParticleCloud, MAX_ROOT_DEPTH, MAX_TRUNK_DEPTH, SwirlParams, Vec3, VertexStaging, SimulatorBuilder, FieldParams,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn assert_aligned_and_finite(cloud: &ParticleCloud) {
    assert_eq!(cloud.positions.len(), cloud.colors.len());
    assert_eq!(cloud.positions.len() % 3, 0);
    assert!(cloud.positions.iter().all(|v| v.is_finite()));
    assert!(cloud.colors.iter().all(|v| v.is_finite()));
}

#[test]
fn swirl_is_pure_and_fixes_the_origin() {
    let params = SwirlParams::default();
    let p = Vec3::new(0.3, -0.2, 0.7);
    assert_eq!(galaxy_swirl(p, &params), galaxy_swirl(p, &params));
    assert_eq!(galaxy_swirl(Vec3::ZERO, &params), Vec3::ZERO);
}

#[test]
fn swirl_radial_exponent_sets_output_radius() {
    let params = SwirlParams {
        swirl_strength: 0.0,
        radial_exponent: 1.0,
    };
    // On the x axis every atan2 term is zero and the swirl radius is x squared
    let out = galaxy_swirl(Vec3::new(0.5, 0.0, 0.0), &params);
    assert!((out - Vec3::new(0.25, 0.0, 0.25 / std::f32::consts::FRAC_PI_2)).length() < 1e-6);
}

#[test]
fn galaxy_without_gap_fills_the_lattice() {
    let config = GalaxyConfig {
        particle_count: 1000,
        star_count: 200,
        ..GalaxyConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let galaxy = galaxy_cloud(&config, &mut rng);

    assert_eq!(config.resolution(), 10);
    assert_eq!(galaxy.arms.len(), 1000);
    assert_eq!(galaxy.stars.len(), 200);
    assert_aligned_and_finite(&galaxy.arms);
    assert_aligned_and_finite(&galaxy.stars);
    assert!(galaxy.arms.colors.iter().all(|c| (0.0..=1.0).contains(c)));
}

#[test]
fn galaxy_gap_removes_the_center() {
    let config = GalaxyConfig {
        particle_count: 1000,
        star_count: 0,
        gap_factor: 0.5,
        ..GalaxyConfig::default()
    };
    // resolution 10, midpoint 4.5, threshold 2.5: indices 3..=6 on every axis are skipped
    assert!(config.in_gap(Vec3::new(4.0, 5.0, 6.0)));
    assert!(!config.in_gap(Vec3::new(4.0, 5.0, 7.0)));

    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let galaxy = galaxy_cloud(&config, &mut rng);
    assert_eq!(galaxy.arms.len(), 1000 - 4 * 4 * 4);
}

#[test]
fn tiny_galaxy_uses_minimum_resolution() {
    let config = GalaxyConfig {
        particle_count: 1,
        star_count: 0,
        ..GalaxyConfig::default()
    };
    assert_eq!(config.resolution(), 2);
}

#[test]
fn small_forest_has_every_part() {
    let config = ForestConfig {
        tree_count: 3,
        trunk_depth: 3,
        root_depth: 2,
        grass_count: 100,
        ..ForestConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let forest = forest(&config, &mut rng);

    assert_aligned_and_finite(&forest.cloud);
    assert_eq!(forest.parts.len(), forest.cloud.len());
    assert_eq!(forest.count(ForestPart::Grass), 100);
    // Each trunk segment emits 7 points and there are at least 1 + 2 + 4 segments per tree
    assert!(forest.count(ForestPart::Trunk) >= 3 * 7 * 7);
    // Roots: 5 spokes, depth 2 gives 1 + 2 segments of 6 points per spoke
    assert_eq!(forest.count(ForestPart::Root), 3 * 5 * 3 * 6);
}

#[test]
fn oversized_recursion_depths_are_capped() {
    let config = ForestConfig {
        trunk_depth: 25,
        root_depth: 1000,
        ..ForestConfig::default()
    };
    let capped = config.clamped();
    assert_eq!(capped.trunk_depth, MAX_TRUNK_DEPTH);
    assert_eq!(capped.root_depth, MAX_ROOT_DEPTH);
    assert_eq!(ForestConfig::default().clamped(), ForestConfig::default());

    let roots_only = ForestConfig {
        tree_count: 1,
        trunk_depth: 0,
        root_depth: 1000,
        grass_count: 0,
        ..ForestConfig::default()
    };
    let forest = forest(&roots_only, &mut ChaCha8Rng::seed_from_u64(2));
    let segments_per_spoke = (1usize << MAX_ROOT_DEPTH) - 1;
    assert_eq!(forest.count(ForestPart::Root), 5 * segments_per_spoke * 6);
}

#[test]
fn forest_grass_lies_on_the_ground_patch() {
    let config = ForestConfig {
        tree_count: 0,
        grass_count: 500,
        ..ForestConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let forest = forest(&config, &mut rng);
    for i in 0..forest.cloud.len() {
        let p = forest.cloud.position(i);
        assert_eq!(p.y, -0.2);
        assert!(p.x.abs() <= config.forest_size && p.z.abs() <= config.forest_size);
    }
}

#[test]
fn forest_is_reproducible_from_a_seed() {
    let config = ForestConfig {
        tree_count: 2,
        trunk_depth: 4,
        grass_count: 10,
        ..ForestConfig::default()
    };
    let a = forest(&config, &mut ChaCha8Rng::seed_from_u64(5));
    let b = forest(&config, &mut ChaCha8Rng::seed_from_u64(5));
    assert_eq!(a.cloud, b.cloud);
}

#[test]
fn globe_points_lie_on_the_sphere() {
    let config = GlobeConfig {
        count: 2000,
        ..GlobeConfig::default()
    };
    let globe = fibonacci_globe(&config);
    assert_eq!(globe.len(), 2000);
    assert_aligned_and_finite(&globe);
    for i in 0..globe.len() {
        assert!((globe.position(i).length() - config.radius).abs() < 1e-3);
    }
}

#[test]
fn flower_stays_in_its_envelope() {
    let config = FlowerConfig {
        count: 5000,
        ..FlowerConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let cloud = flower(&config, &mut rng);
    assert_eq!(cloud.len(), 5000);
    assert_aligned_and_finite(&cloud);
    for i in 0..cloud.len() {
        let p = cloud.position(i);
        assert!(Vec3::new(p.x, 0.0, p.z).length() <= 15.0 + 1e-3);
        assert!(p.y.abs() <= config.thickness / 2.0);
    }
}

#[test]
fn vertex_export_scales_positions_and_keeps_colors() {
    let mut cloud = ParticleCloud::default();
    cloud.push(Vec3::new(1.0, -2.0, 4.0), [0.1, 0.2, 0.3]);
    cloud.push(Vec3::new(0.5, 0.0, 0.0), [1.0, 1.0, 1.0]);

    let mut out = Vec::new();
    fill_vertices(&cloud.positions, &cloud.colors, 0.5, &mut out);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].position, [0.5, -1.0, 2.0]);
    assert_eq!(out[0].color, [0.1, 0.2, 0.3]);
    assert_eq!(out[1].position, [0.25, 0.0, 0.0]);
}

#[test]
fn staging_only_refills_dirty_simulators() {
    let mut sim = SimulatorBuilder::new()
        .with_particle_count(10)
        .with_field(FieldParams::thomas())
        .build()
        .unwrap();
    let mut staging = VertexStaging::new();

    assert!(staging.stage_simulator(&mut sim, 4.0));
    assert_eq!(staging.vertices().len(), 10);
    assert_eq!(staging.as_bytes().len(), 10 * 24);
    assert!(!staging.stage_simulator(&mut sim, 4.0));

    sim.advance(0.016);
    assert!(staging.stage_simulator(&mut sim, 4.0));
    assert_eq!(staging.vertices()[3].position[0], sim.positions()[9] * 4.0);
}
