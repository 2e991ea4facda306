//! Scene configuration for the headless demo. Loaded from a RON file at startup.

use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use shake::{ShakeConfig, StressSourceConfig};

/// File read when no path is given on the command line.
pub const DEFAULT_SCENE_PATH: &str = "scene.ron";

/// A shakeable object: usually a camera rig.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShakeableSpec {
    pub name: String,
    /// World position of the rest point; stress distance is measured from here.
    #[serde(default)]
    pub pivot: Vec3,
    #[serde(default)]
    pub shake: ShakeConfig,
    /// Fixed noise seed. Drawn at random when absent.
    #[serde(default)]
    pub seed: Option<f32>,
}

/// A delayed explosion aimed at one shakeable by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionSpec {
    pub position: Vec3,
    pub target: String,
    #[serde(default)]
    pub source: StressSourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Simulated seconds.
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Fixed step in seconds.
    #[serde(default = "default_timestep")]
    pub timestep: f32,
    /// Log shakeable state every this many frames (0 disables).
    #[serde(default = "default_report_every")]
    pub report_every: u32,
    #[serde(default)]
    pub shakeables: Vec<ShakeableSpec>,
    #[serde(default)]
    pub explosions: Vec<ExplosionSpec>,
}

fn default_duration() -> f32 {
    4.0
}
fn default_timestep() -> f32 {
    1.0 / 60.0
}
fn default_report_every() -> u32 {
    15
}

impl Default for SceneConfig {
    fn default() -> Self {
        let explosion = |position: Vec3, delay: f32| ExplosionSpec {
            position,
            target: "camera".to_string(),
            source: StressSourceConfig {
                delay,
                ..Default::default()
            },
        };
        Self {
            duration: default_duration(),
            timestep: default_timestep(),
            report_every: default_report_every(),
            shakeables: vec![ShakeableSpec {
                name: "camera".to_string(),
                pivot: Vec3::new(0.0, 1.7, 0.0),
                shake: ShakeConfig::default(),
                seed: None,
            }],
            explosions: vec![
                explosion(Vec3::new(4.0, 0.0, -3.0), 0.5),
                explosion(Vec3::new(22.5, 1.7, 0.0), 1.0),
                explosion(Vec3::new(0.0, 0.0, -60.0), 1.5),
            ],
        }
    }
}

impl SceneConfig {
    /// Load a scene from `path`. A missing file yields the built-in scene; an
    /// unreadable or invalid one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No scene at {:?}, using built-in scene", path);
            let scene = Self::default();
            scene.validate()?;
            return Ok(scene);
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene {:?}", path))?;
        let scene = Self::parse(&data).with_context(|| format!("loading scene {:?}", path))?;
        log::info!(
            "Loaded scene {:?}: {} shakeables, {} explosions",
            path,
            scene.shakeables.len(),
            scene.explosions.len()
        );
        Ok(scene)
    }

    /// Parse and validate RON scene text.
    pub fn parse(data: &str) -> Result<Self> {
        let scene: Self = ron::from_str(data)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Fail fast on setup mistakes before anything is spawned.
    pub fn validate(&self) -> Result<()> {
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            bail!("duration must be finite and non-negative, got {}", self.duration);
        }
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            bail!("timestep must be greater than zero, got {}", self.timestep);
        }
        for spec in &self.shakeables {
            spec.shake
                .validate()
                .with_context(|| format!("shakeable '{}'", spec.name))?;
        }
        for (i, spec) in self.explosions.iter().enumerate() {
            spec.source
                .validate()
                .with_context(|| format!("explosion #{}", i))?;
            if !self.shakeables.iter().any(|s| s.name == spec.target) {
                bail!("explosion #{} targets unknown shakeable '{}'", i, spec.target);
            }
        }
        Ok(())
    }

    /// Number of fixed steps needed to cover `duration`.
    pub fn frame_count(&self) -> u32 {
        (self.duration / self.timestep).ceil() as u32
    }
}
