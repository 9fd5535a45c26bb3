mod metrics;
mod snapshots;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use lumen_core::{
    bindings, fibonacci_globe, flower, forest, frame_uniforms, galaxy_cloud, ConfigError, FieldParams, FlowerConfig, ForestConfig,
    GalaxyConfig, GlobeConfig, ParticleCloud, ParticleFieldSimulator, SimulationConfig, VertexStaging,
};
use metrics::MetricsWriter;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use snapshots::SnapshotWriter;

/// Smallest image edge the projection writer accepts
const MIN_IMAGE_EDGE: u32 = 16;
/// Largest image edge the projection writer accepts
const MAX_IMAGE_EDGE: u32 = 8192;

#[derive(Parser)]
#[command(name = "lumen-headless")]
#[command(about = "Headless CLI runner for Lumen particle field experiments")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Integrate an attractor scene and write metrics and snapshots
    Simulate {
        /// Configuration file path (stock Lorenz scene when omitted)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output directory for results
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        /// Replace the configured field with a named one at default coefficients
        #[arg(long, value_name = "NAME")]
        field: Option<String>,

        /// Override the configured frame count
        #[arg(long)]
        frames: Option<u32>,

        /// Enable strict mode (fail on warnings)
        #[arg(long)]
        strict: bool,
    },
    /// Generate a static procedural point cloud
    Generate {
        #[arg(short, long, value_enum)]
        kind: CloudKind,

        /// YAML file with generator settings (defaults when omitted)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output directory for results
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        #[arg(long, default_value_t = 1337)]
        seed: u64,

        #[arg(long, default_value_t = 512)]
        image_size: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CloudKind {
    Galaxy,
    Forest,
    Globe,
    Flower,
}

impl CloudKind {
    fn name(self) -> &'static str {
        match self {
            CloudKind::Galaxy => "galaxy",
            CloudKind::Forest => "forest",
            CloudKind::Globe => "globe",
            CloudKind::Flower => "flower",
        }
    }
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Simulate { config, out, field, frames, strict } => {
            let config = load_config(config.as_deref(), field.as_deref(), frames)?;
            run_simulation(&config, &out, strict)
        }
        Command::Generate { kind, config, out, seed, image_size } => {
            run_generate(kind, config.as_deref(), &out, seed, image_size)
        }
    }
}

/// Load a YAML configuration, or the defaults, and apply command line overrides
fn load_config(path: Option<&Path>, field: Option<&str>, frames: Option<u32>) -> Result<SimulationConfig, anyhow::Error> {
    let mut config = match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            serde_yaml::from_str(&std::fs::read_to_string(path)?)?
        }
        None => SimulationConfig::default(),
    };

    if let Some(name) = field {
        config.field = FieldParams::from_name(name).ok_or_else(|| ConfigError::UnknownField(name.to_string()))?;
    }
    if let Some(frames) = frames {
        config.world.frames = frames;
    }

    Ok(config)
}

/// Reject unusable configurations and collect warnings for questionable ones
fn validate_config(config: &SimulationConfig) -> Result<Vec<String>, anyhow::Error> {
    if config.world.particles == 0 {
        anyhow::bail!("Particle count must be greater than 0.");
    }
    if config.world.frames == 0 {
        anyhow::bail!("Frame count must be greater than 0.");
    }
    if !(config.world.frame_dt.is_finite() && config.world.frame_dt > 0.0) {
        anyhow::bail!("Frame time step (frame_dt) must be positive.");
    }
    if config.output.metrics_every == 0 {
        anyhow::bail!("metrics_every must be greater than 0.");
    }
    let [w, h] = config.output.image_size;
    if w < MIN_IMAGE_EDGE || h < MIN_IMAGE_EDGE {
        anyhow::bail!(
            "Image size too small ({}x{}). Minimum supported is {}x{}.",
            w, h, MIN_IMAGE_EDGE, MIN_IMAGE_EDGE
        );
    }
    if w > MAX_IMAGE_EDGE || h > MAX_IMAGE_EDGE {
        anyhow::bail!(
            "Image size too large ({}x{}). Maximum supported is {}x{}.",
            w, h, MAX_IMAGE_EDGE, MAX_IMAGE_EDGE
        );
    }

    let mut warnings = Vec::new();
    let hw = config.seeding.half_width;
    if 3.0 * hw * hw > config.integration.escape_radius_sq {
        warnings.push(format!(
            "Seed cube corners (half width {}) lie outside the escape radius; those seeds re-seed on their first step.",
            hw
        ));
    }
    if config.integration.gap_radius >= hw {
        warnings.push(format!(
            "Gap radius {} covers the seed cube (half width {}); most seeds re-seed immediately.",
            config.integration.gap_radius, hw
        ));
    }
    for frame in &config.output.snapshot_frames {
        if *frame > config.world.frames {
            warnings.push(format!(
                "Snapshot frame {} is past the last frame {} and will not be written.",
                frame, config.world.frames
            ));
        }
    }

    Ok(warnings)
}

fn run_simulation(config: &SimulationConfig, out: &Path, strict: bool) -> Result<(), anyhow::Error> {
    for warning in validate_config(config)? {
        if strict {
            anyhow::bail!("{}", warning);
        }
        log::warn!("{}", warning);
    }

    std::fs::create_dir_all(out)?;

    let mut sim = ParticleFieldSimulator::from_config(config)?;
    bindings::log_binding_layouts();
    log::info!(
        "Field {} with {} particles, step {}, display scale {}",
        config.field.name(),
        sim.particle_count(),
        sim.integration_scale(),
        config.display_scale()
    );

    let mut staging = VertexStaging::new();
    let mut metrics_writer = MetricsWriter::new(out)?;
    let snapshot_writer = SnapshotWriter::new(out)?;

    log::info!("Starting simulation for {} frames...", config.world.frames);
    let start_time = Instant::now();

    for frame in 0..=config.world.frames {
        let step_start = Instant::now();
        if frame > 0 {
            sim.advance(config.world.frame_dt);
        }
        let step_time = step_start.elapsed();

        if frame > 0 && sim.reseeded_last_frame() as usize == sim.particle_count() {
            if strict {
                anyhow::bail!("Every particle re-seeded at frame {}; the field diverges from the seed cube.", frame);
            }
            log::warn!("Every particle re-seeded at frame {}", frame);
        }

        if frame % config.output.metrics_every == 0 {
            sim.update_stats();
            metrics_writer.write_frame(frame, &sim.stats, step_time)?;

            log::info!(
                "Frame {}: speed={:.3}, radius={:.3}, reseeded={}, Time={:?}",
                frame,
                sim.stats.mean_speed,
                sim.stats.mean_radius,
                sim.stats.reseeded_last_frame,
                step_time
            );
        }

        if config.output.snapshot_frames.contains(&frame) {
            let uniforms = frame_uniforms(&sim, config);
            if let Err(e) = bindings::validate_frame_uniforms(&uniforms, config) {
                if strict {
                    anyhow::bail!("Frame uniforms invalid at frame {}: {}", frame, e);
                }
                log::warn!("Frame uniforms invalid at frame {}: {}", frame, e);
            }

            staging.stage_simulator(&mut sim, uniforms.display_scale);
            snapshot_writer.write_projection(
                &format!("frame_{:04}", frame),
                staging.vertices(),
                uniforms.rotation_y,
                uniforms.opacity,
                config.output.image_size,
            )?;
            snapshot_writer.write_particles_snapshot(frame, &sim)?;

            log::info!("Snapshot written for frame {}", frame);
        }
    }

    let total_time = start_time.elapsed();
    println!("Simulation completed in {:?}", total_time);
    println!(
        "{} metric rows, {} re-seeds in total, rolling re-seed rate {:.5}",
        metrics_writer.row_count(),
        sim.stats.total_reseeds,
        metrics_writer.reseed_rate()
    );
    println!("Results written to {}", out.display());

    Ok(())
}

/// Read a generator's settings from YAML, falling back to its defaults
fn load_generator_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, anyhow::Error> {
    match path {
        Some(path) => {
            log::info!("Loading generator settings from {}", path.display());
            Ok(serde_yaml::from_str(&std::fs::read_to_string(path)?)?)
        }
        None => Ok(T::default()),
    }
}

fn run_generate(
    kind: CloudKind,
    config: Option<&Path>,
    out: &Path,
    seed: u64,
    image_size: u32,
) -> Result<(), anyhow::Error> {
    if image_size < MIN_IMAGE_EDGE {
        anyhow::bail!("Image size too small ({}). Minimum supported is {}.", image_size, MIN_IMAGE_EDGE);
    }
    if image_size > MAX_IMAGE_EDGE {
        anyhow::bail!("Image size too large ({}). Maximum supported is {}.", image_size, MAX_IMAGE_EDGE);
    }
    std::fs::create_dir_all(out)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let start_time = Instant::now();

    let (cloud, parts) = match kind {
        CloudKind::Galaxy => {
            let galaxy = galaxy_cloud(&load_generator_config::<GalaxyConfig>(config)?, &mut rng);
            let mut cloud = ParticleCloud::with_capacity(galaxy.arms.len() + galaxy.stars.len());
            cloud.extend(&galaxy.arms);
            cloud.extend(&galaxy.stars);
            (cloud, None)
        }
        CloudKind::Forest => {
            let forest = forest(&load_generator_config::<ForestConfig>(config)?, &mut rng);
            (forest.cloud, Some(forest.parts))
        }
        CloudKind::Globe => (fibonacci_globe(&load_generator_config::<GlobeConfig>(config)?), None),
        CloudKind::Flower => (flower(&load_generator_config::<FlowerConfig>(config)?, &mut rng), None),
    };
    log::info!("Generated {} {} points in {:?}", cloud.len(), kind.name(), start_time.elapsed());

    let writer = SnapshotWriter::new(out)?;
    writer.write_cloud(kind.name(), &cloud, parts.as_deref())?;

    let mut staging = VertexStaging::new();
    staging.stage_cloud(&cloud, 1.0);
    let image = writer.write_projection(kind.name(), staging.vertices(), 0.0, 0.6, [image_size, image_size])?;

    println!("Results written to {} and {}", out.display(), image.display());
    Ok(())
}
