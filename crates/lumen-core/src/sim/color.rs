use lumen_params::{ColorConfig, ColorFeature};

use crate::error::{ConfigError, SimulationError};

/// Parse a `#rrggbb` string into linear-ish RGB in [0, 1]
pub fn parse_hex_color(hex: &str) -> Result<[f32; 3], ConfigError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(ConfigError::InvalidHexColor(hex.to_string()));
    }

    let mut rgb = [0.0; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map_err(|_| ConfigError::InvalidHexColor(hex.to_string()))?;
        *channel = byte as f32 / 255.0;
    }
    Ok(rgb)
}

/// Component-wise linear interpolation, `t` is not clamped here
pub fn lerp_rgb(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Two-endpoint ramp driven by a normalized scalar feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRamp {
    pub low: [f32; 3],
    pub high: [f32; 3],
    pub feature: ColorFeature,
    pub normalize_max: f32,
}

impl ColorRamp {
    pub fn new(low: [f32; 3], high: [f32; 3], feature: ColorFeature, normalize_max: f32) -> Self {
        Self {
            low,
            high,
            feature,
            normalize_max,
        }
    }

    pub fn from_config(config: &ColorConfig) -> Result<Self, SimulationError> {
        let ramp = Self::new(
            parse_hex_color(&config.low)?,
            parse_hex_color(&config.high)?,
            config.feature,
            config.normalize_max,
        );
        ramp.validate()?;
        Ok(ramp)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.normalize_max.is_finite() && self.normalize_max > 0.0) {
            return Err(SimulationError::InvalidColorRange(self.normalize_max));
        }
        Ok(())
    }

    /// Interpolation factor for a raw feature value, always in [0, 1]
    pub fn factor(&self, value: f32) -> f32 {
        let t = value / self.normalize_max;
        // NaN only shows up for a diverged derivative; paint it as the hot end
        if t.is_nan() {
            return 1.0;
        }
        t.clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f32) -> [f32; 3] {
        lerp_rgb(self.low, self.high, self.factor(value))
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::new(
            [0.0, 170.0 / 255.0, 1.0],
            [1.0, 0.0, 85.0 / 255.0],
            ColorFeature::Speed,
            40.0,
        )
    }
}
