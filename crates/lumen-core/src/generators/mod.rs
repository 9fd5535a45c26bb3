//! Static procedural particle clouds
//!
//! Each generator fills a [`ParticleCloud`] once. None of them advance over time;
//! animating a cloud is the renderer's job.

pub mod flower;
pub mod forest;
pub mod galaxy;
pub mod globe;

pub use flower::*;
pub use forest::*;
pub use galaxy::*;
pub use globe::*;

use glam::Vec3;

/// Flat position/color buffers produced by a generator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleCloud {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl ParticleCloud {
    pub fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
        }
    }

    pub fn push(&mut self, position: Vec3, color: [f32; 3]) {
        self.positions.extend_from_slice(&position.to_array());
        self.colors.extend_from_slice(&color);
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    /// Append another cloud, keeping both buffers aligned
    pub fn extend(&mut self, other: &ParticleCloud) {
        self.positions.extend_from_slice(&other.positions);
        self.colors.extend_from_slice(&other.colors);
    }
}

/// Symmetric jitter in `[-amount / 2, amount / 2]`
pub(crate) fn jitter<R: rand::Rng>(rng: &mut R, amount: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * amount
}

pub(crate) fn rgb8(r: u8, g: u8, b: u8) -> [f32; 3] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

pub(crate) fn clamp_rgb(c: [f32; 3]) -> [f32; 3] {
    [c[0].clamp(0.0, 1.0), c[1].clamp(0.0, 1.0), c[2].clamp(0.0, 1.0)]
}

pub(crate) fn scale_rgb(c: [f32; 3], s: f32) -> [f32; 3] {
    [c[0] * s, c[1] * s, c[2] * s]
}
