use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{rgb8, ParticleCloud};
use crate::sim::color::lerp_rgb;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub count: u32,
    pub radius: f32,
    pub equator: [f32; 3],
    pub poles: [f32; 3],
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            count: 80_000,
            radius: 4.0,
            equator: rgb8(0x00, 0xf2, 0xff),
            poles: rgb8(0x70, 0x00, 0xff),
        }
    }
}

/// Fibonacci-spiral points evenly covering a sphere, colored by latitude
pub fn fibonacci_globe(config: &GlobeConfig) -> ParticleCloud {
    let n = config.count as f32;
    let r = config.radius;
    let winding = (n * PI).sqrt();

    let mut cloud = ParticleCloud::with_capacity(config.count as usize);
    for i in 0..config.count {
        // Clamp guards acos against rounding just past -1
        let phi = (-1.0 + 2.0 * i as f32 / n).clamp(-1.0, 1.0).acos();
        let theta = winding * phi;
        let p = Vec3::new(
            r * theta.cos() * phi.sin(),
            r * theta.sin() * phi.sin(),
            r * phi.cos(),
        );
        let t = (p.y.abs() / r).min(1.0);
        cloud.push(p, lerp_rgb(config.equator, config.poles, t));
    }
    cloud
}
