use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{clamp_rgb, jitter, ParticleCloud};

/// Coefficients of the galaxy swirl transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwirlParams {
    pub swirl_strength: f32,  // How much the angle grows with radius
    pub radial_exponent: f32, // <1 expands near the center, >1 compresses
}

impl Default for SwirlParams {
    fn default() -> Self {
        Self {
            swirl_strength: 2.0,
            radial_exponent: 2.0,
        }
    }
}

/// Radius measure used by the swirl: the norm of the squared components
pub fn swirl_radius(p: Vec3) -> f32 {
    (p * p).length()
}

/// Twist a lattice point into a spiral arm.
///
/// Pure: the same point and parameters always map to the same output.
pub fn galaxy_swirl(p: Vec3, params: &SwirlParams) -> Vec3 {
    let radius = swirl_radius(p);
    let theta = p.y.atan2(p.x) + p.z.atan2(p.x) + p.y.atan2(p.z);
    let theta_prime = theta + radius * params.swirl_strength;
    let r_prime = radius.powf(params.radial_exponent);

    Vec3::new(
        r_prime * theta_prime.cos(),
        r_prime * theta_prime.sin(),
        p.z + r_prime * theta_prime.cos() / FRAC_PI_2,
    )
}

/// Galaxy lattice configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    pub particle_count: u32, // Desired lattice size, rounded to a cube
    pub star_count: u32,
    pub gap_factor: f32,         // Fraction of the lattice left empty at the center
    pub spacing_multiplier: f32,
    pub jitter: f32,
    pub star_jitter: f32,
    pub swirl: SwirlParams,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            particle_count: 100_000,
            star_count: 5000,
            gap_factor: 0.0,
            spacing_multiplier: 2.0,
            jitter: 0.05,
            star_jitter: 0.02,
            swirl: SwirlParams::default(),
        }
    }
}

impl GalaxyConfig {
    /// Lattice points per axis
    pub fn resolution(&self) -> u32 {
        ((self.particle_count as f32).cbrt().round() as u32).max(2)
    }

    fn spacing(&self) -> f32 {
        (2.0 / self.resolution() as f32) * self.spacing_multiplier
    }

    fn midpoint(&self) -> f32 {
        (self.resolution() as f32 - 1.0) / 2.0
    }

    fn gap_threshold(&self) -> f32 {
        self.resolution() as f32 * self.gap_factor / 2.0
    }

    /// True when a lattice coordinate falls in the central gap on all three axes
    pub fn in_gap(&self, lattice: Vec3) -> bool {
        let mid = self.midpoint();
        let gap = self.gap_threshold();
        (lattice - Vec3::splat(mid)).abs().max_element() < gap
    }
}

/// Main arms plus the sparse star population
#[derive(Debug, Clone, Default)]
pub struct GalaxyCloud {
    pub arms: ParticleCloud,
    pub stars: ParticleCloud,
}

/// Banded blue/purple/white coloring keyed on the swirl radius
fn arm_color<R: Rng>(rng: &mut R, radius: f32) -> [f32; 3] {
    let t = ((radius * 5.0).sin() + 1.0) / 2.0;
    clamp_rgb([
        0.4 + 0.3 * t + jitter(rng, 0.1),
        0.5 + 0.2 * (1.0 - t) + jitter(rng, 0.1),
        0.7 + 0.3 * (0.5 + 0.5 * (1.0 - t)) + jitter(rng, 0.1),
    ])
}

fn star_color<R: Rng>(rng: &mut R) -> [f32; 3] {
    let t: f32 = rng.gen();
    [1.0 - 0.2 * t, 1.0 - 0.1 * t, 0.8 - 0.3 * t]
}

pub fn galaxy_cloud<R: Rng>(config: &GalaxyConfig, rng: &mut R) -> GalaxyCloud {
    let resol = config.resolution();
    let spacing = config.spacing();
    let mid = Vec3::splat(config.midpoint());

    let mut arms = ParticleCloud::with_capacity((resol * resol * resol) as usize);
    for z in 0..resol {
        for y in 0..resol {
            for x in 0..resol {
                let lattice = Vec3::new(x as f32, y as f32, z as f32);
                if config.in_gap(lattice) {
                    continue;
                }
                let mut p = (lattice - mid) * spacing;
                p += Vec3::new(
                    jitter(rng, config.jitter),
                    jitter(rng, config.jitter),
                    jitter(rng, config.jitter),
                );
                let color = arm_color(rng, swirl_radius(p));
                arms.push(galaxy_swirl(p, &config.swirl), color);
            }
        }
    }

    let mut stars = ParticleCloud::with_capacity(config.star_count as usize);
    for _ in 0..config.star_count {
        let lattice = Vec3::new(
            rng.gen::<f32>() * resol as f32,
            rng.gen::<f32>() * resol as f32,
            rng.gen::<f32>() * resol as f32,
        );
        if config.in_gap(lattice) {
            continue;
        }
        let mut p = (lattice - mid) * spacing;
        p += Vec3::new(
            jitter(rng, config.star_jitter),
            jitter(rng, config.star_jitter),
            jitter(rng, config.star_jitter),
        );
        stars.push(galaxy_swirl(p, &config.swirl), star_color(rng));
    }

    log::debug!("Galaxy: {} arm particles, {} stars (resolution {})", arms.len(), stars.len(), resol);
    GalaxyCloud { arms, stars }
}
