//! Administrative CLI that creates a labeling job.
//!
//! Reads an experiment manifest (experiment ids plus their motion borders),
//! derives the per-experiment region grid, samples the requested number of
//! regions without replacement, and inserts one new labeling job with its
//! regions. The manifest is the narrow interface to the imaging pipeline;
//! this tool never touches imaging data itself.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roilabel_core::geometry::{FieldOfView, MotionBorder, RegionRect};
use roilabel_core::sampling::{region_grid, sample_without_replacement};
use roilabel_db::models::region::CreateRegion;
use roilabel_db::repositories::{JobRepo, RegionRepo};

/// Create a new labeling job from an experiment manifest.
#[derive(Debug, Parser)]
#[command(name = "roilabel-populate")]
struct Args {
    /// Path to the SQLite database file.
    #[arg(long, env = "DATABASE_PATH", default_value = "labels.db")]
    database_path: PathBuf,

    /// Path to the experiment manifest (JSON).
    #[arg(long)]
    manifest: PathBuf,

    /// Number of regions to include in the labeling job.
    #[arg(short = 'n', long)]
    num_regions: usize,

    /// Amount by which each within-border field-of-view dimension is divided
    /// to obtain the region dimensions. A 512x512 field of view with divisor
    /// 4 yields 128x128 regions.
    #[arg(long, default_value_t = 4)]
    fov_divisor: i64,

    /// Field-of-view dimensions, WIDTHxHEIGHT.
    #[arg(long, default_value = "512x512")]
    field_of_view: String,

    /// Sample regions across the full field of view, ignoring each
    /// experiment's motion border.
    #[arg(long)]
    ignore_motion_border: bool,

    /// Seed for reproducible sampling.
    #[arg(long)]
    seed: Option<u64>,
}

/// The experiment manifest: one entry per experiment eligible for labeling.
#[derive(Debug, Deserialize)]
struct Manifest {
    experiments: Vec<ExperimentEntry>,
}

#[derive(Debug, Deserialize)]
struct ExperimentEntry {
    experiment_id: String,
    #[serde(default)]
    motion_border: MotionBorder,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roilabel_populate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let fov = parse_field_of_view(&args.field_of_view)?;

    let manifest: Manifest = serde_json::from_str(
        &std::fs::read_to_string(&args.manifest)
            .with_context(|| format!("reading manifest {}", args.manifest.display()))?,
    )
    .context("parsing manifest")?;
    anyhow::ensure!(
        !manifest.experiments.is_empty(),
        "manifest lists no experiments"
    );

    // Candidate pool: the full region grid of every experiment.
    let mut candidates: Vec<(String, RegionRect)> = Vec::new();
    for experiment in &manifest.experiments {
        let border = if args.ignore_motion_border {
            MotionBorder::NONE
        } else {
            experiment.motion_border
        };
        let grid = region_grid(fov, border, args.fov_divisor)
            .with_context(|| format!("experiment {}", experiment.experiment_id))?;
        for rect in grid {
            candidates.push((experiment.experiment_id.clone(), rect));
        }
    }
    tracing::info!(
        experiments = manifest.experiments.len(),
        candidates = candidates.len(),
        "Derived region grid"
    );

    let mut rng: StdRng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let sampled = sample_without_replacement(&candidates, args.num_regions, &mut rng)?;

    let database_url = format!("sqlite://{}", args.database_path.display());
    let pool = roilabel_db::create_pool(&database_url).await?;
    roilabel_db::run_migrations(&pool).await?;

    let job = JobRepo::create(&pool).await?;
    for (experiment_id, rect) in &sampled {
        RegionRepo::insert(
            &pool,
            job.job_id,
            &CreateRegion {
                experiment_id: experiment_id.clone(),
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            },
        )
        .await?;
    }

    let total = RegionRepo::count_by_job(&pool, job.job_id).await?;
    tracing::info!(job_id = job.job_id, regions = total, "Labeling job populated");

    Ok(())
}

fn parse_field_of_view(value: &str) -> anyhow::Result<FieldOfView> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .context("field of view must look like 512x512")?;
    Ok(FieldOfView {
        width: width.trim().parse().context("field-of-view width")?,
        height: height.trim().parse().context("field-of-view height")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_of_view_parses() {
        let fov = parse_field_of_view("512x512").unwrap();
        assert_eq!((fov.width, fov.height), (512, 512));
    }

    #[test]
    fn malformed_field_of_view_is_rejected() {
        assert!(parse_field_of_view("512").is_err());
    }

    #[test]
    fn manifest_border_defaults_to_zero() {
        let manifest: Manifest = serde_json::from_str(
            r#"{ "experiments": [ { "experiment_id": "785569423" } ] }"#,
        )
        .unwrap();
        assert_eq!(manifest.experiments[0].motion_border, MotionBorder::NONE);
    }
}
