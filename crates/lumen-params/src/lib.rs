//! Shared parameter types for Lumen particle field simulations
//!
//! This crate holds every configuration structure used by the simulator and the
//! headless runner, so both read the same defaults and the same field coefficients.

use bytemuck::{Pod, Zeroable};

/// World configuration parameters
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    pub particles: u32,
    pub frames: u32,
    pub frame_dt: f32, // Seconds per simulated frame
    pub seed: u64,
}

/// Chaotic vector field and its coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum FieldParams {
    Lorenz { sigma: f32, rho: f32, beta: f32 },
    Aizawa { a: f32, b: f32, c: f32, d: f32, e: f32, f: f32 },
    Thomas { b: f32 },
    Dadras { a: f32, b: f32, c: f32, d: f32, e: f32 },
    Chen { a: f32, b: f32, c: f32 },
}

impl FieldParams {
    pub const NAMES: [&'static str; 5] = ["lorenz", "aizawa", "thomas", "dadras", "chen"];

    pub fn lorenz() -> Self {
        FieldParams::Lorenz { sigma: 10.0, rho: 28.0, beta: 8.0 / 3.0 }
    }

    pub fn aizawa() -> Self {
        FieldParams::Aizawa { a: 0.95, b: 0.7, c: 0.6, d: 3.5, e: 0.25, f: 0.1 }
    }

    pub fn thomas() -> Self {
        FieldParams::Thomas { b: 0.2 }
    }

    pub fn dadras() -> Self {
        FieldParams::Dadras { a: 3.0, b: 2.7, c: 1.7, d: 2.0, e: 9.0 }
    }

    pub fn chen() -> Self {
        FieldParams::Chen { a: 40.0, b: 3.0, c: 28.0 }
    }

    /// Default coefficients for a field by its lowercase name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lorenz" => Some(Self::lorenz()),
            "aizawa" => Some(Self::aizawa()),
            "thomas" => Some(Self::thomas()),
            "dadras" => Some(Self::dadras()),
            "chen" => Some(Self::chen()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldParams::Lorenz { .. } => "lorenz",
            FieldParams::Aizawa { .. } => "aizawa",
            FieldParams::Thomas { .. } => "thomas",
            FieldParams::Dadras { .. } => "dadras",
            FieldParams::Chen { .. } => "chen",
        }
    }

    /// Per-field speed factor folded into the integration scale
    pub fn speed(&self) -> f32 {
        match self {
            FieldParams::Lorenz { .. } => 1.0,
            FieldParams::Aizawa { .. } => 2.0,
            FieldParams::Thomas { .. } => 1.5,
            FieldParams::Dadras { .. } => 0.5,
            FieldParams::Chen { .. } => 0.8,
        }
    }

    /// Render-only multiplier that brings the attractor to roughly unit size
    pub fn display_scale(&self) -> f32 {
        match self {
            FieldParams::Lorenz { .. } => 0.5,
            FieldParams::Aizawa { .. } => 15.0,
            FieldParams::Thomas { .. } => 4.0,
            FieldParams::Dadras { .. } => 2.5,
            FieldParams::Chen { .. } => 1.0,
        }
    }
}

impl Default for FieldParams {
    fn default() -> Self {
        Self::lorenz()
    }
}

/// Euler stepping and divergence thresholds
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegrationConfig {
    pub base_step: f32,        // Step size before multipliers
    pub speed_multiplier: f32, // User-facing speed control
    pub escape_radius_sq: f32, // Squared distance that triggers re-seeding
    #[cfg_attr(feature = "serde", serde(default))]
    pub gap_radius: f32,       // Inner radius that also re-seeds, 0 disables
}

impl IntegrationConfig {
    /// Scalar applied to each derivative before it is added to a position
    pub fn integration_scale(&self, field: &FieldParams) -> f32 {
        self.base_step * self.speed_multiplier * field.speed()
    }
}

/// Bounded cube used for initial placement and re-seeding
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeedingConfig {
    pub half_width: f32,
}

/// Scalar feature that drives the color ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorFeature {
    /// Magnitude of the local derivative
    #[default]
    Speed,
    /// Distance from the origin after the step
    Radius,
}

/// Two-endpoint color ramp configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorConfig {
    pub low: String,  // Hex color at feature 0
    pub high: String, // Hex color at feature >= normalize_max
    #[cfg_attr(feature = "serde", serde(default))]
    pub feature: ColorFeature,
    pub normalize_max: f32,
}

/// Render-side presentation values
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_scale: Option<f32>, // Overrides the field's own display scale
    pub rotation_speed: f32,        // Radians per second around y
    pub point_size: f32,
    pub opacity: f32,
}

/// Headless output cadence
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputConfig {
    pub metrics_every: u32,
    pub snapshot_frames: Vec<u32>,
    pub image_size: [u32; 2],
}

/// Complete simulation configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub field: FieldParams,
    pub integration: IntegrationConfig,
    pub seeding: SeedingConfig,
    pub color: ColorConfig,
    pub view: ViewConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub output: OutputConfig,
}

impl SimulationConfig {
    pub fn integration_scale(&self) -> f32 {
        self.integration.integration_scale(&self.field)
    }

    pub fn display_scale(&self) -> f32 {
        self.view.display_scale.unwrap_or_else(|| self.field.display_scale())
    }

    /// Default configuration with a different field, keeping everything else
    pub fn with_field(field: FieldParams) -> Self {
        Self {
            field,
            ..Self::default()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            metrics_every: 50,
            snapshot_frames: vec![0, 200, 1000, 2000],
            image_size: [512, 512],
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig {
                particles: 200_000,
                frames: 2000,
                frame_dt: 1.0 / 60.0,
                seed: 1337,
            },
            field: FieldParams::default(),
            integration: IntegrationConfig {
                base_step: 0.01,
                speed_multiplier: 1.0,
                escape_radius_sq: 40_000.0,
                gap_radius: 0.0,
            },
            seeding: SeedingConfig {
                half_width: 5.0,
            },
            color: ColorConfig {
                low: "#00aaff".to_string(),  // Cyan
                high: "#ff0055".to_string(), // Hot pink
                feature: ColorFeature::Speed,
                normalize_max: 40.0,
            },
            view: ViewConfig {
                display_scale: None,
                rotation_speed: 0.1,
                point_size: 0.03,
                opacity: 0.6,
            },
            output: OutputConfig::default(),
        }
    }
}

/// GPU-compatible per-frame uniform block for the point shader
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub display_scale: f32,
    pub rotation_y: f32,
    pub point_size: f32,
    pub opacity: f32,
    pub time: f32,
    pub particle_count: u32,
    pub _pad: [u32; 2], // Padding for alignment
}

impl FrameUniforms {
    pub fn new(config: &SimulationConfig, rotation_y: f32, time: f32) -> Self {
        Self {
            display_scale: config.display_scale(),
            rotation_y,
            point_size: config.view.point_size,
            opacity: config.view.opacity,
            time,
            particle_count: config.world.particles,
            _pad: [0, 0],
        }
    }
}

impl From<&SimulationConfig> for FrameUniforms {
    fn from(config: &SimulationConfig) -> Self {
        Self::new(config, 0.0, 0.0)
    }
}

/// WGSL binding layout documentation and validation
///
/// The point shader and any renderer uploading the simulator buffers must agree
/// on these layouts.
pub mod bindings {
    use super::*;

    /// Point sprite vertex attributes (one interleaved buffer)
    ///
    /// ```wgsl
    /// struct VertexInput {
    ///     @location(0) position: vec3<f32>,
    ///     @location(1) color: vec3<f32>,
    /// }
    /// ```
    pub const POINT_ATTRIBUTES: &str = "Vertex buffer 0: position(float32x3 @0), color(float32x3 @12), stride 24";

    /// Frame uniform bindings (group 0)
    ///
    /// ```wgsl
    /// @group(0) @binding(0) var<uniform> frame: FrameUniforms;
    /// ```
    pub const FRAME_BINDINGS: &str = "Frame Group 0: FrameUniforms(uniform)";

    /// Byte stride of one interleaved point vertex
    pub const POINT_STRIDE: usize = 24;

    /// Byte size of [`FrameUniforms`], a multiple of 16 for uniform buffers
    pub const FRAME_UNIFORMS_SIZE: usize = 32;

    /// Validate that FrameUniforms carries usable values for a config
    pub fn validate_frame_uniforms(uniforms: &FrameUniforms, config: &SimulationConfig) -> Result<(), String> {
        if !(uniforms.display_scale.is_finite() && uniforms.display_scale > 0.0) {
            return Err(format!("display_scale must be positive, got {}", uniforms.display_scale));
        }
        if uniforms.particle_count != config.world.particles {
            return Err(format!(
                "Particle count mismatch: expected {}, got {}",
                config.world.particles, uniforms.particle_count
            ));
        }
        if !(0.0..=1.0).contains(&uniforms.opacity) {
            return Err(format!("opacity must lie in [0, 1], got {}", uniforms.opacity));
        }
        Ok(())
    }

    /// Log binding layout information for debugging
    pub fn log_binding_layouts() {
        log::info!("Point attributes: {}", POINT_ATTRIBUTES);
        log::info!("Frame bindings: {}", FRAME_BINDINGS);
        log::info!("FrameUniforms size: {}", FRAME_UNIFORMS_SIZE);
    }
}
