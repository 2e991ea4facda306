//! Tremor - headless trauma shake demo.
//!
//! Loads a scene (RON), fires its delayed explosions at the configured
//! shakeables and logs trauma and shake offsets on a fixed timestep.
//!
//! Usage: `tremor [scene.ron]`

mod config;
mod scene;

use std::path::PathBuf;

use anyhow::Result;
use engine_core::World;

use crate::config::{SceneConfig, DEFAULT_SCENE_PATH};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENE_PATH));
    let scene = SceneConfig::load(&path)?;

    log::info!(
        "Starting Tremor: {:.1}s at {:.1} Hz",
        scene.duration,
        1.0 / scene.timestep
    );

    let mut world = World::new();
    scene::spawn(&mut world, &scene)?;
    let summary = scene::run(&mut world, &scene)?;

    println!("frames       {}", summary.frames);
    println!("detonations  {}", summary.detonations);
    println!("peak trauma  {:.3}", summary.peak_trauma);
    println!("peak offset  {:.3}", summary.peak_offset);
    Ok(())
}
