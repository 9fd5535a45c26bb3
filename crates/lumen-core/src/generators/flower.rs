use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{jitter, rgb8, ParticleCloud};
use crate::sim::color::lerp_rgb;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    pub count: u32,
    pub layers: u32,     // Petal harmonics, layer k has k + 2 lobes
    pub max_radius: f32, // Radius at which the color reaches `outer`
    pub thickness: f32,
    pub inner: [f32; 3],
    pub outer: [f32; 3],
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            count: 300_000,
            layers: 5,
            max_radius: 10.0,
            thickness: 2.0,
            inner: rgb8(0x44, 0x00, 0xff),
            outer: rgb8(0xff, 0x00, 0xdd),
        }
    }
}

/// Flat rose-curve disc: each layer adds lobes to the radial envelope
pub fn flower<R: Rng>(config: &FlowerConfig, rng: &mut R) -> ParticleCloud {
    let layers = config.layers.max(1);
    let mut cloud = ParticleCloud::with_capacity(config.count as usize);
    for _ in 0..config.count {
        let angle = rng.gen::<f32>() * TAU;
        let layer = rng.gen_range(0..layers);
        let radius = ((angle * (layer + 2) as f32).sin() + 2.0) * rng.gen::<f32>() * 5.0;

        let p = Vec3::new(angle.cos() * radius, jitter(rng, config.thickness), angle.sin() * radius);
        let t = (radius / config.max_radius).min(1.0);
        cloud.push(p, lerp_rgb(config.inner, config.outer, t));
    }
    cloud
}
