//! `rtw`: render the random-spheres scene and write it as a PPM file.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rtw_renderer::{random_scene, save_ppm, RenderOutcome, RenderSettings, Renderer};
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let settings = match &args.config {
        Some(path) => RenderSettings::from_json_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => RenderSettings::default(),
    };
    let settings = args.apply(settings);

    let renderer = Renderer::new(settings).context("Failed to start renderer")?;

    let start = Instant::now();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let scene = Arc::new(random_scene(&mut rng).context("Failed to build scene")?);
    log::info!("Scene built in {:?} ({} objects)", start.elapsed(), scene.len());

    match renderer.render(scene, renderer.camera())? {
        RenderOutcome::Completed { .. } => {}
        RenderOutcome::Cancelled { rendered, total } => {
            log::warn!("Writing partial image: {}/{} pixels", rendered, total);
        }
    }

    save_ppm(&args.output, &renderer.frame())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
