pub mod vertex;

pub use vertex::*;

use lumen_params::{FrameUniforms, SimulationConfig};

use crate::sim::ParticleFieldSimulator;

/// Uniform block for the current simulator frame: y rotation follows elapsed time
///
/// The particle count is the simulator's live population, not the configured one.
pub fn frame_uniforms<F>(sim: &ParticleFieldSimulator<F>, config: &SimulationConfig) -> FrameUniforms {
    let elapsed = sim.elapsed();
    let mut uniforms = FrameUniforms::new(config, elapsed * config.view.rotation_speed, elapsed);
    uniforms.particle_count = u32::try_from(sim.particle_count()).unwrap_or(u32::MAX);
    uniforms
}
