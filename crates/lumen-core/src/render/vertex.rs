use bytemuck::{Pod, Zeroable};
use lumen_params::bindings::POINT_STRIDE;

use crate::generators::ParticleCloud;
use crate::sim::ParticleFieldSimulator;

/// Interleaved point vertex for upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

const _: () = assert!(std::mem::size_of::<PointVertex>() == POINT_STRIDE);

/// Interleave flat position/color buffers into `out`, scaling positions.
///
/// `out` is cleared and refilled, so callers can keep one allocation across frames.
pub fn fill_vertices(positions: &[f32], colors: &[f32], display_scale: f32, out: &mut Vec<PointVertex>) {
    debug_assert_eq!(positions.len(), colors.len());
    out.clear();
    out.extend(
        positions
            .chunks_exact(3)
            .zip(colors.chunks_exact(3))
            .map(|(p, c)| PointVertex {
                position: [p[0] * display_scale, p[1] * display_scale, p[2] * display_scale],
                color: [c[0], c[1], c[2]],
            }),
    );
}

/// Vertex staging buffer reused across frames
#[derive(Debug, Default)]
pub struct VertexStaging {
    vertices: Vec<PointVertex>,
}

impl VertexStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill from a simulator if its buffers changed; returns whether anything was staged
    pub fn stage_simulator<F>(&mut self, sim: &mut ParticleFieldSimulator<F>, display_scale: f32) -> bool {
        if !sim.take_dirty().any() {
            return false;
        }
        fill_vertices(sim.positions(), sim.colors(), display_scale, &mut self.vertices);
        true
    }

    pub fn stage_cloud(&mut self, cloud: &ParticleCloud, display_scale: f32) {
        fill_vertices(&cloud.positions, &cloud.colors, display_scale, &mut self.vertices);
    }

    pub fn vertices(&self) -> &[PointVertex] {
        &self.vertices
    }

    /// Raw bytes ready for a vertex buffer write
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
