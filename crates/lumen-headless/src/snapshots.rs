use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use csv::Writer;
use image::{ImageBuffer, Rgb, RgbImage};
use lumen_core::{ForestPart, ParticleCloud, ParticleFieldSimulator, PointVertex};

/// Fraction of the half image the projected cloud may occupy
const FILL: f32 = 0.45;

/// Snapshot writer for projected images and particle dumps
pub struct SnapshotWriter {
    output_dir: PathBuf,
}

impl SnapshotWriter {
    /// Create a new snapshot writer
    pub fn new(output_dir: &Path) -> Result<Self, anyhow::Error> {
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Write the projected point cloud as a PNG image
    pub fn write_projection(
        &self,
        name: &str,
        vertices: &[PointVertex],
        rotation_y: f32,
        opacity: f32,
        size: [u32; 2],
    ) -> Result<PathBuf, anyhow::Error> {
        let filepath = self.output_dir.join(format!("{name}.png"));
        let img = render_projection(vertices, rotation_y, opacity, size);
        img.save(&filepath)?;
        Ok(filepath)
    }

    /// Write simulator positions, colors and speeds to CSV
    pub fn write_particles_snapshot<F>(
        &self,
        frame: u32,
        sim: &ParticleFieldSimulator<F>,
    ) -> Result<(), anyhow::Error> {
        let filepath = self.output_dir.join(format!("particles_{:04}.csv", frame));
        let mut csv_writer = Writer::from_writer(File::create(&filepath)?);

        csv_writer.write_record(["id", "x", "y", "z", "r", "g", "b", "speed"])?;

        let positions = sim.positions().chunks_exact(3);
        let colors = sim.colors().chunks_exact(3);
        for (i, ((p, c), speed)) in positions.zip(colors).zip(sim.speeds()).enumerate() {
            csv_writer.write_record([
                i.to_string(),
                p[0].to_string(),
                p[1].to_string(),
                p[2].to_string(),
                c[0].to_string(),
                c[1].to_string(),
                c[2].to_string(),
                speed.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Write a generated cloud to CSV, with forest part tags when present
    pub fn write_cloud(
        &self,
        name: &str,
        cloud: &ParticleCloud,
        parts: Option<&[ForestPart]>,
    ) -> Result<(), anyhow::Error> {
        let filepath = self.output_dir.join(format!("{name}.csv"));
        let mut csv_writer = Writer::from_writer(File::create(&filepath)?);

        let mut header = vec!["id", "x", "y", "z", "r", "g", "b"];
        if parts.is_some() {
            header.push("part");
        }
        csv_writer.write_record(&header)?;

        for i in 0..cloud.len() {
            let p = cloud.position(i);
            let c = &cloud.colors[i * 3..i * 3 + 3];
            let mut record = vec![
                i.to_string(),
                p.x.to_string(),
                p.y.to_string(),
                p.z.to_string(),
                c[0].to_string(),
                c[1].to_string(),
                c[2].to_string(),
            ];
            if let Some(part) = parts.and_then(|parts| parts.get(i)) {
                record.push((*part as u8).to_string());
            }
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// Orthographic projection of rotated points onto the x/y plane with additive blending
///
/// The cloud is fitted to the image by its largest finite projected extent.
pub fn render_projection(vertices: &[PointVertex], rotation_y: f32, opacity: f32, size: [u32; 2]) -> RgbImage {
    let [w, h] = size;
    let mut img: RgbImage = ImageBuffer::new(w, h);
    if w == 0 || h == 0 {
        return img;
    }

    let (sin, cos) = rotation_y.sin_cos();
    let project = |v: &PointVertex| {
        let [x, y, z] = v.position;
        (x * cos + z * sin, y)
    };

    let extent = vertices
        .iter()
        .map(project)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .fold(0.0f32, |m, (x, y)| m.max(x.abs()).max(y.abs()));
    let extent = if extent > 0.0 { extent } else { 1.0 };

    let (wu, hu) = (w as usize, h as usize);
    let mut accum = vec![[0.0f32; 3]; wu * hu];
    for v in vertices {
        let (x, y) = project(v);
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let px = ((x / extent * FILL + 0.5) * w as f32) as i64;
        let py = ((0.5 - y / extent * FILL) * h as f32) as i64;
        if px < 0 || py < 0 || px >= w as i64 || py >= h as i64 {
            continue;
        }
        let cell = &mut accum[py as usize * wu + px as usize];
        for k in 0..3 {
            cell[k] += v.color[k] * opacity;
        }
    }

    // Exponential tone map keeps dense regions from clipping
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let cell = accum[y as usize * wu + x as usize];
        let tone = |c: f32| ((1.0 - (-c).exp()) * 255.0).clamp(0.0, 255.0) as u8;
        *pixel = Rgb([tone(cell[0]), tone(cell[1]), tone(cell[2])]);
    }

    img
}
