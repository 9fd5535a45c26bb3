//! Lumen Core Engine
//!
//! Particle populations advected through chaotic vector fields, plus the static
//! procedural clouds and the vertex/uniform surface a renderer uploads.

pub mod error;
pub mod generators;
pub mod render;
pub mod shaders;
pub mod sim;

pub use glam::Vec3;

// Re-export main types
pub use error::*;
pub use generators::*;
pub use render::*;
pub use shaders::*;
pub use sim::*;

// Re-export params from lumen-params
pub use lumen_params::*;
