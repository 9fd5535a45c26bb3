use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

use csv::Writer;
use lumen_core::ParticleStats;

/// Rows kept for the rolling re-seed rate
const HISTORY_LEN: usize = 200;

/// Metrics writer for CSV output and performance logging
pub struct MetricsWriter {
    csv_writer: Writer<File>,
    row_count: u32,
    reseed_history: VecDeque<f32>, // Fraction of the population re-seeded per sampled frame
}

impl MetricsWriter {
    /// Create a new metrics writer
    pub fn new(output_dir: &Path) -> Result<Self, anyhow::Error> {
        let csv_path = output_dir.join("metrics.csv");
        let file = File::create(&csv_path)?;

        let mut csv_writer = Writer::from_writer(file);
        csv_writer.write_record([
            "frame",
            "particles", "reseeded", "total_reseeds", "reseed_rate",
            "mean_speed", "max_speed", "mean_radius",
            "min_x", "min_y", "min_z", "max_x", "max_y", "max_z",
            "elapsed", "wall_time_ms", "fps_proxy",
        ])?;

        Ok(Self {
            csv_writer,
            row_count: 0,
            reseed_history: VecDeque::with_capacity(HISTORY_LEN),
        })
    }

    /// Rolling mean of the re-seeded fraction, a proxy for how unstable the field is
    pub fn reseed_rate(&self) -> f32 {
        if self.reseed_history.is_empty() {
            return 0.0;
        }
        self.reseed_history.iter().sum::<f32>() / self.reseed_history.len() as f32
    }

    /// Write metrics for a single sampled frame
    pub fn write_frame(&mut self, frame: u32, stats: &ParticleStats, step_time: Duration) -> Result<(), anyhow::Error> {
        let fraction = if stats.particle_count > 0 {
            stats.reseeded_last_frame as f32 / stats.particle_count as f32
        } else {
            0.0
        };
        self.reseed_history.push_back(fraction);
        if self.reseed_history.len() > HISTORY_LEN {
            self.reseed_history.pop_front();
        }

        let wall_time_ms = step_time.as_secs_f64() * 1000.0;
        let fps_proxy = if wall_time_ms > 0.0 { 1000.0 / wall_time_ms } else { 0.0 };

        self.csv_writer.write_record([
            frame.to_string(),
            stats.particle_count.to_string(),
            stats.reseeded_last_frame.to_string(),
            stats.total_reseeds.to_string(),
            self.reseed_rate().to_string(),
            stats.mean_speed.to_string(),
            stats.max_speed.to_string(),
            stats.mean_radius.to_string(),
            stats.bounds_min[0].to_string(),
            stats.bounds_min[1].to_string(),
            stats.bounds_min[2].to_string(),
            stats.bounds_max[0].to_string(),
            stats.bounds_max[1].to_string(),
            stats.bounds_max[2].to_string(),
            stats.elapsed.to_string(),
            wall_time_ms.to_string(),
            fps_proxy.to_string(),
        ])?;

        self.csv_writer.flush()?;
        self.row_count += 1;

        Ok(())
    }

    /// Get the number of rows written
    pub fn row_count(&self) -> u32 {
        self.row_count
    }
}
