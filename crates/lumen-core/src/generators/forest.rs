use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{jitter, rgb8, scale_rgb, ParticleCloud};
use crate::sim::color::lerp_rgb;

/// What a forest particle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ForestPart {
    Trunk = 0,
    Grass = 1,
    Root = 3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestPalette {
    pub trunk: [f32; 3],
    pub tips: [f32; 3],
    pub grass: [f32; 3],
    pub root: [f32; 3],
}

impl Default for ForestPalette {
    fn default() -> Self {
        Self {
            trunk: rgb8(0x5d, 0xff, 0x48),
            tips: rgb8(0xe0, 0x34, 0xe2),
            grass: rgb8(0x79, 0xa3, 0x79),
            root: rgb8(0x2e, 0xc1, 0x1b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub forest_size: f32, // Half extent of the square ground patch
    pub tree_count: usize,
    pub min_dist: f32,
    pub placement_attempts: u32,
    pub trunk_depth: u32,
    pub root_depth: u32,
    pub grass_count: usize,
    pub palette: ForestPalette,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            forest_size: 10.0,
            tree_count: 8,
            min_dist: 1.0,
            placement_attempts: 2000,
            trunk_depth: 10,
            root_depth: 3,
            grass_count: 50_000,
            palette: ForestPalette::default(),
        }
    }
}

impl ForestConfig {
    /// Copy with recursion depths capped at [`MAX_TRUNK_DEPTH`] and [`MAX_ROOT_DEPTH`]
    pub fn clamped(&self) -> Self {
        let mut config = self.clone();
        if config.trunk_depth > MAX_TRUNK_DEPTH {
            log::warn!("trunk_depth {} capped at {}", config.trunk_depth, MAX_TRUNK_DEPTH);
            config.trunk_depth = MAX_TRUNK_DEPTH;
        }
        if config.root_depth > MAX_ROOT_DEPTH {
            log::warn!("root_depth {} capped at {}", config.root_depth, MAX_ROOT_DEPTH);
            config.root_depth = MAX_ROOT_DEPTH;
        }
        config
    }
}

/// Forest particles plus a per-particle part tag
#[derive(Debug, Clone, Default)]
pub struct ForestCloud {
    pub cloud: ParticleCloud,
    pub parts: Vec<ForestPart>,
}

impl ForestCloud {
    fn push(&mut self, position: Vec3, color: [f32; 3], part: ForestPart) {
        self.cloud.push(position, color);
        self.parts.push(part);
    }

    pub fn count(&self, part: ForestPart) -> usize {
        self.parts.iter().filter(|p| **p == part).count()
    }
}

/// Deepest trunk recursion; each level adds up to three branches per tip
pub const MAX_TRUNK_DEPTH: u32 = 12;
/// Deepest root recursion; each level doubles the root tips
pub const MAX_ROOT_DEPTH: u32 = 10;

const TRUNK_SEGMENTS: u32 = 6;
const ROOT_SEGMENTS: u32 = 5;
const ROOT_SPOKES: u32 = 5;

struct ForestGrower<'a, R> {
    rng: &'a mut R,
    config: &'a ForestConfig,
    out: ForestCloud,
}

impl<'a, R: Rng> ForestGrower<'a, R> {
    /// Rejection-sampled tree sites at least `min_dist` apart
    fn tree_sites(&mut self) -> Vec<Vec3> {
        let size = self.config.forest_size;
        let mut sites: Vec<Vec3> = Vec::with_capacity(self.config.tree_count);
        let mut attempts = 0;
        while sites.len() < self.config.tree_count && attempts < self.config.placement_attempts {
            attempts += 1;
            let candidate = Vec3::new(jitter(self.rng, 2.0 * size), 0.0, jitter(self.rng, 2.0 * size));
            if sites.iter().all(|s| s.distance(candidate) >= self.config.min_dist) {
                sites.push(candidate);
            }
        }
        if sites.len() < self.config.tree_count {
            log::warn!("Placed only {} of {} trees", sites.len(), self.config.tree_count);
        }
        sites
    }

    fn grow_trunk(&mut self, start: Vec3, dir: Vec3, length: f32, depth: u32, tree: usize) {
        if depth == 0 {
            return;
        }
        let max_depth = self.config.trunk_depth;
        let end = start + dir * length;

        let ratio = 1.0 - depth as f32 / max_depth as f32;
        let color = lerp_rgb(self.config.palette.trunk, self.config.palette.tips, ratio);
        for i in 0..=TRUNK_SEGMENTS {
            let mut p = start.lerp(end, i as f32 / TRUNK_SEGMENTS as f32);
            p.x += jitter(self.rng, 0.15);
            p.z += jitter(self.rng, 0.15);
            self.out.push(p, color, ForestPart::Trunk);
        }

        let branches = if self.rng.gen::<f32>() > 0.4 { 3 } else { 2 };
        for i in 0..branches {
            let spread = 0.6 + self.rng.gen::<f32>() * 0.6;
            // Offset by tree index so no two trees branch alike
            let yaw = TAU / branches as f32 * i as f32 + tree as f32 * 0.5;
            let tilt_x = spread * (self.rng.gen::<f32>() - 0.5);
            let tilt_z = spread * (self.rng.gen::<f32>() - 0.5);

            let mut new_dir = Quat::from_axis_angle(Vec3::Y, yaw) * dir;
            new_dir = Quat::from_axis_angle(Vec3::X, tilt_x) * new_dir;
            new_dir = Quat::from_axis_angle(Vec3::Z, tilt_z) * new_dir;

            self.grow_trunk(end, new_dir.normalize(), length * 0.7, depth - 1, tree);
        }
    }

    fn grow_root(&mut self, start: Vec3, dir: Vec3, length: f32, depth: u32) {
        if depth == 0 {
            return;
        }
        let max_depth = self.config.root_depth;
        let end = start + dir * length;

        // Deeper roots are darker
        let color = scale_rgb(self.config.palette.root, 0.5 + (depth as f32 / max_depth as f32) * 0.5);
        for i in 0..=ROOT_SEGMENTS {
            let mut p = start.lerp(end, i as f32 / ROOT_SEGMENTS as f32);
            p.x += jitter(self.rng, 0.2);
            p.z += jitter(self.rng, 0.2);
            self.out.push(p, color, ForestPart::Root);
        }

        for i in 0..2 {
            let yaw = TAU / 2.0 * i as f32 + self.rng.gen::<f32>();
            let mut new_dir = Quat::from_axis_angle(Vec3::Y, yaw) * dir;
            new_dir.y -= 0.4;
            self.grow_root(end, new_dir.normalize(), length * 0.8, depth - 1);
        }
    }

    fn grow_grass(&mut self) {
        let size = self.config.forest_size;
        for _ in 0..self.config.grass_count {
            let p = Vec3::new(jitter(self.rng, 2.0 * size), -0.2, jitter(self.rng, 2.0 * size));
            let shade = 0.6 + self.rng.gen::<f32>() * 0.6;
            self.out.push(p, scale_rgb(self.config.palette.grass, shade), ForestPart::Grass);
        }
    }
}

/// Recursive trees with roots over a grass field
pub fn forest<R: Rng>(config: &ForestConfig, rng: &mut R) -> ForestCloud {
    let config = &config.clamped();
    let mut grower = ForestGrower {
        rng,
        config,
        out: ForestCloud::default(),
    };

    for (index, site) in grower.tree_sites().into_iter().enumerate() {
        let height = 3.0 + grower.rng.gen::<f32>() * 5.0;
        if config.trunk_depth > 0 {
            grower.grow_trunk(site, Vec3::Y, height / 3.0, config.trunk_depth, index);
        }
        if config.root_depth > 0 {
            let root_length = height * 0.4 / 2.0;
            for spoke in 0..ROOT_SPOKES {
                let angle = spoke as f32 / ROOT_SPOKES as f32 * TAU;
                let dir = Vec3::new(angle.cos(), -0.5, angle.sin()).normalize();
                grower.grow_root(site, dir, root_length, config.root_depth);
            }
        }
    }
    grower.grow_grass();

    log::debug!(
        "Forest: {} trunk, {} root, {} grass particles",
        grower.out.count(ForestPart::Trunk),
        grower.out.count(ForestPart::Root),
        grower.out.count(ForestPart::Grass)
    );
    grower.out
}
