//! Headless driver: walks a scripted observer path through a world, driving
//! the streaming manager the way a render loop would, without any windowing
//! or GPU backend.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use voxen_core::WorldConfig;
use voxen_world::{ChunkCoord, StreamingManager, World};

/// Drive a voxen world headlessly for a fixed number of ticks, logging
/// streaming progress. Useful for profiling generation/meshing without a
/// renderer attached.
#[derive(Debug, Parser)]
#[command(name = "voxen-cli", version, about)]
struct Args {
    /// Path to a world config TOML file. Falls back to built-in defaults if absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 32)]
    ticks: u32,

    /// Chunks the observer advances along +x between ticks.
    #[arg(long, default_value_t = 1)]
    step: i32,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => WorldConfig::load_from_path(path),
        None => WorldConfig::load(),
    };

    config
        .validate()
        .context("invalid world configuration")?;

    let radius = config.render_distance;
    let budget = config.mesh_budget_per_tick;
    let world = World::new(config);
    let mut streaming = StreamingManager::new(radius, budget);

    let mut observer = ChunkCoord::new(0, 0);
    for tick in 0..args.ticks {
        let report = streaming.tick(&world, observer);
        tracing::info!(
            tick,
            observer_x = observer.x,
            observer_z = observer.z,
            ensured = report.ensured,
            meshed = report.meshed,
            rescanned = report.rescanned,
            "tick complete"
        );
        observer = ChunkCoord::new(observer.x + args.step, observer.z);
    }

    Ok(())
}
