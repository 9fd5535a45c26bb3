use glam::Vec3;
use lumen_params::{ColorFeature, FieldParams, SimulationConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::color::ColorRamp;
use super::fields::VectorField;
use crate::error::SimulationError;

/// Population statistics for metrics collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleStats {
    pub particle_count: u32,
    pub reseeded_last_frame: u32,
    pub total_reseeds: u64,
    pub mean_speed: f32,
    pub max_speed: f32,
    pub mean_radius: f32,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
    pub frame: u64,
    pub elapsed: f32,
}

/// Which buffers changed since the renderer last uploaded them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    pub positions: bool,
    pub colors: bool,
}

impl DirtyFlags {
    pub fn any(&self) -> bool {
        self.positions || self.colors
    }
}

/// Uniform point inside the cube `[-half_width, half_width]^3`
pub fn seed_point<R: Rng>(rng: &mut R, half_width: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-half_width..=half_width),
        rng.gen_range(-half_width..=half_width),
        rng.gen_range(-half_width..=half_width),
    )
}

/// Fixed population of particles advected through a vector field.
///
/// Positions and colors are flat `xyz`/`rgb` arrays of length `3 * particle_count`,
/// allocated once and mutated in place by [`advance`](Self::advance). Particles that
/// leave the escape radius, fall inside the gap radius, or turn non-finite are
/// re-seeded uniformly inside the seed cube within the same call.
pub struct ParticleFieldSimulator<F = FieldParams> {
    field: F,
    positions: Vec<f32>,
    colors: Vec<f32>,
    speeds: Vec<f32>, // Last derivative magnitude per particle
    particle_count: usize,
    integration_scale: f32,
    escape_radius_sq: f32,
    gap_radius: f32,
    seed_half_width: f32,
    ramp: ColorRamp,
    rng: ChaCha8Rng,
    dirty: DirtyFlags,
    frame: u64,
    elapsed: f32,
    reseeded_last_frame: u32,
    total_reseeds: u64,
    pub stats: ParticleStats,
}

impl<F: VectorField> ParticleFieldSimulator<F> {
    /// Advance every particle by one forward-Euler step.
    ///
    /// `delta_time` only feeds the elapsed clock; the step size is the fixed
    /// integration scale. Returns how many particles were re-seeded.
    pub fn advance(&mut self, delta_time: f32) -> u32 {
        let scale = self.integration_scale;
        let escape_sq = self.escape_radius_sq;
        let gap_sq = self.gap_radius * self.gap_radius;
        let mut reseeded = 0u32;

        for i in 0..self.particle_count {
            let base = i * 3;
            let p = Vec3::from_slice(&self.positions[base..base + 3]);
            let d = self.field.derivative(p);

            let mut next = p + d * scale;
            let dist_sq = next.length_squared();
            if !dist_sq.is_finite() || dist_sq > escape_sq || dist_sq < gap_sq {
                next = seed_point(&mut self.rng, self.seed_half_width);
                reseeded += 1;
            }
            next.write_to_slice(&mut self.positions[base..base + 3]);

            let speed = d.length();
            self.speeds[i] = speed;
            let feature = match self.ramp.feature {
                ColorFeature::Speed => speed,
                ColorFeature::Radius => next.length(),
            };
            self.colors[base..base + 3].copy_from_slice(&self.ramp.color(feature));
        }

        let dt = if delta_time.is_finite() { delta_time.max(0.0) } else { 0.0 };
        self.elapsed += dt;
        self.frame += 1;
        self.reseeded_last_frame = reseeded;
        self.total_reseeds += reseeded as u64;
        self.dirty = DirtyFlags { positions: true, colors: true };

        log::trace!("frame {}: {} re-seeded", self.frame, reseeded);
        reseeded
    }
}

impl<F> ParticleFieldSimulator<F> {
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Derivative magnitudes from the most recent frame, zero before the first
    pub fn speeds(&self) -> &[f32] {
        &self.speeds
    }

    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    pub fn integration_scale(&self) -> f32 {
        self.integration_scale
    }

    pub fn escape_radius_sq(&self) -> f32 {
        self.escape_radius_sq
    }

    pub fn gap_radius(&self) -> f32 {
        self.gap_radius
    }

    pub fn seed_half_width(&self) -> f32 {
        self.seed_half_width
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn reseeded_last_frame(&self) -> u32 {
        self.reseeded_last_frame
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Return the dirty flags and mark both buffers clean
    pub fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }

    /// Re-seed every particle from the instance RNG without reallocating
    pub fn reset(&mut self) {
        for chunk in self.positions.chunks_exact_mut(3) {
            seed_point(&mut self.rng, self.seed_half_width).write_to_slice(chunk);
        }
        let cold = self.ramp.color(0.0);
        for chunk in self.colors.chunks_exact_mut(3) {
            chunk.copy_from_slice(&cold);
        }
        self.speeds.fill(0.0);
        self.frame = 0;
        self.elapsed = 0.0;
        self.reseeded_last_frame = 0;
        self.total_reseeds = 0;
        self.stats = ParticleStats::default();
        self.dirty = DirtyFlags { positions: true, colors: true };
    }

    pub fn update_stats(&mut self) {
        let count = self.particle_count as f32;

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        let mut radius_sum = 0.0;
        for chunk in self.positions.chunks_exact(3) {
            let p = Vec3::from_slice(chunk);
            min = min.min(p);
            max = max.max(p);
            radius_sum += p.length();
        }

        // A diverged derivative can be non-finite even though its particle was re-seeded
        let speed_sum: f32 = self.speeds.iter().filter(|s| s.is_finite()).sum();
        let max_speed = self.speeds.iter().copied().filter(|s| s.is_finite()).fold(0.0, f32::max);

        self.stats = ParticleStats {
            particle_count: self.particle_count as u32,
            reseeded_last_frame: self.reseeded_last_frame,
            total_reseeds: self.total_reseeds,
            mean_speed: speed_sum / count,
            max_speed,
            mean_radius: radius_sum / count,
            bounds_min: min.to_array(),
            bounds_max: max.to_array(),
            frame: self.frame,
            elapsed: self.elapsed,
        };
    }
}

impl ParticleFieldSimulator<FieldParams> {
    /// Build the attractor simulator described by a loaded configuration
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        SimulatorBuilder::new()
            .with_particle_count(config.world.particles as usize)
            .with_field(config.field)
            .with_integration_scale(config.integration_scale())
            .with_escape_radius_sq(config.integration.escape_radius_sq)
            .with_gap_radius(config.integration.gap_radius)
            .with_seed_half_width(config.seeding.half_width)
            .with_seed(config.world.seed)
            .with_color_ramp(ColorRamp::from_config(&config.color)?)
            .build()
    }
}

/// Builder for [`ParticleFieldSimulator`].
///
/// Defaults match the stock Lorenz scene: 200 000 particles, step 0.01,
/// escape radius 200, seed cube of half-width 5.
pub struct SimulatorBuilder<F> {
    particle_count: usize,
    field: Option<F>,
    integration_scale: f32,
    escape_radius_sq: f32,
    gap_radius: f32,
    seed_half_width: f32,
    seed: u64,
    ramp: ColorRamp,
}

impl<F> Default for SimulatorBuilder<F> {
    fn default() -> Self {
        Self {
            particle_count: 200_000,
            field: None,
            integration_scale: 0.01,
            escape_radius_sq: 40_000.0,
            gap_radius: 0.0,
            seed_half_width: 5.0,
            seed: 1337,
            ramp: ColorRamp::default(),
        }
    }
}

impl<F: VectorField> SimulatorBuilder<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_field(mut self, field: F) -> Self {
        self.field = Some(field);
        self
    }

    pub fn with_integration_scale(mut self, scale: f32) -> Self {
        self.integration_scale = scale;
        self
    }

    pub fn with_escape_radius_sq(mut self, radius_sq: f32) -> Self {
        self.escape_radius_sq = radius_sq;
        self
    }

    pub fn with_gap_radius(mut self, radius: f32) -> Self {
        self.gap_radius = radius;
        self
    }

    pub fn with_seed_half_width(mut self, half_width: f32) -> Self {
        self.seed_half_width = half_width;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_color_ramp(mut self, ramp: ColorRamp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn build(self) -> Result<ParticleFieldSimulator<F>, SimulationError> {
        if self.particle_count == 0 {
            return Err(SimulationError::EmptyPopulation);
        }
        let field = self.field.ok_or(SimulationError::MissingField)?;
        if !(self.integration_scale.is_finite() && self.integration_scale > 0.0) {
            return Err(SimulationError::InvalidIntegrationScale(self.integration_scale));
        }
        if !(self.escape_radius_sq.is_finite() && self.escape_radius_sq > 0.0) {
            return Err(SimulationError::InvalidEscapeRadius(self.escape_radius_sq));
        }
        if !(self.gap_radius.is_finite() && self.gap_radius >= 0.0) {
            return Err(SimulationError::InvalidGapRadius(self.gap_radius));
        }
        let hw = self.seed_half_width;
        if !(hw.is_finite() && hw > 0.0) {
            return Err(SimulationError::InvalidSeedHalfWidth(hw));
        }
        self.ramp.validate()?;
        if hw * hw > self.escape_radius_sq {
            log::warn!(
                "Seed half-width {} exceeds the escape radius (squared {}); most re-seeded particles will escape again next frame.",
                hw, self.escape_radius_sq
            );
        } else if 3.0 * hw * hw > self.escape_radius_sq {
            log::warn!("Seed cube corners lie outside the escape radius; some re-seeded particles will escape again next frame.");
        }
        if self.gap_radius >= hw {
            log::warn!("Gap radius {} is not smaller than the seed half-width {}; re-seeding will churn.", self.gap_radius, hw);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let n = self.particle_count;

        let mut positions = Vec::with_capacity(n * 3);
        for _ in 0..n {
            positions.extend_from_slice(&seed_point(&mut rng, hw).to_array());
        }
        let cold = self.ramp.color(0.0);
        let colors = cold.repeat(n);

        log::debug!(
            "Built particle field: {} particles, scale {}, escape_sq {}, seed {}",
            n, self.integration_scale, self.escape_radius_sq, self.seed
        );

        Ok(ParticleFieldSimulator {
            field,
            positions,
            colors,
            speeds: vec![0.0; n],
            particle_count: n,
            integration_scale: self.integration_scale,
            escape_radius_sq: self.escape_radius_sq,
            gap_radius: self.gap_radius,
            seed_half_width: hw,
            ramp: self.ramp,
            rng,
            dirty: DirtyFlags { positions: true, colors: true },
            frame: 0,
            elapsed: 0.0,
            reseeded_last_frame: 0,
            total_reseeds: 0,
            stats: ParticleStats::default(),
        })
    }
}
