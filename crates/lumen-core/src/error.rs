//! Error types for Lumen.
//!
//! Numerical divergence is never an error: the simulator re-seeds diverged
//! particles in place. These types cover construction-time contract violations
//! and malformed configuration values only.

/// Errors raised while building a simulator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// Particle count was zero.
    #[error("particle count must be at least 1")]
    EmptyPopulation,
    /// No vector field was provided.
    #[error("no vector field provided. Use .with_field() to set one.")]
    MissingField,
    /// Integration scale was zero, negative, or not finite.
    #[error("integration scale must be positive and finite, got {0}")]
    InvalidIntegrationScale(f32),
    /// Escape radius was zero, negative, or not finite.
    #[error("escape radius squared must be positive and finite, got {0}")]
    InvalidEscapeRadius(f32),
    /// Gap radius was negative or not finite.
    #[error("gap radius must be non-negative and finite, got {0}")]
    InvalidGapRadius(f32),
    /// Seed cube half-width was zero, negative, or not finite.
    #[error("seed half-width must be positive and finite, got {0}")]
    InvalidSeedHalfWidth(f32),
    /// Color ramp normalization was zero, negative, or not finite.
    #[error("color normalize_max must be positive and finite, got {0}")]
    InvalidColorRange(f32),
    /// A configuration value could not be parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while interpreting configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Hex color was not of the form `#rrggbb`.
    #[error("invalid hex color {0:?}, expected #rrggbb")]
    InvalidHexColor(String),
    /// Field name did not match a known attractor.
    #[error("unknown field {0:?}, expected one of lorenz, aizawa, thomas, dadras, chen")]
    UnknownField(String),
}
