/// Additive point sprite shader for simulator and cloud buffers
pub fn points() -> &'static str {
    include_str!("points.wgsl")
}

