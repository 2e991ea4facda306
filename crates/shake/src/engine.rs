//! Trauma-based shake engine.
//!
//! `trauma` is a scalar in `[0, 1]`. Each tick the engine raises it to
//! `trauma_exponent`, samples six noise channels at `elapsed * frequency`,
//! writes the resulting offset to the target, then recovers linearly.

use std::fmt;

use engine_core::{euler_degrees_to_quat, Time, Transform};
use glam::{Quat, Vec3};
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::error::ShakeError;
use crate::sampling::{default_noise, draw_seed, signed_sample, ROTATION_CHANNEL_BASE};

/// Tuning for a shakeable transform. Immutable once an engine is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Maximum distance along each local axis the transform moves while shaking.
    pub max_translation: Vec3,
    /// Maximum angle in degrees about each local axis.
    pub max_rotation_degrees: Vec3,
    /// Noise frequency. Higher values shake faster.
    pub frequency: f32,
    /// Trauma is raised to this power before rendering. 1 is linear, above 1 dies off
    /// sharply as trauma nears zero.
    pub trauma_exponent: f32,
    /// Trauma recovered per second.
    pub recovery_speed: f32,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            max_translation: Vec3::ONE,
            max_rotation_degrees: Vec3::splat(15.0),
            frequency: 25.0,
            trauma_exponent: 1.0,
            recovery_speed: 1.0,
        }
    }
}

impl ShakeConfig {
    /// Reject values that would turn per-tick math into NaN or run backwards.
    pub fn validate(&self) -> Result<(), ShakeError> {
        if !self.max_translation.is_finite() || self.max_translation.min_element() < 0.0 {
            return Err(ShakeError::InvalidConfig(
                "max_translation must be finite and non-negative",
            ));
        }
        if !self.max_rotation_degrees.is_finite() || self.max_rotation_degrees.min_element() < 0.0 {
            return Err(ShakeError::InvalidConfig(
                "max_rotation_degrees must be finite and non-negative",
            ));
        }
        if !self.frequency.is_finite() || self.frequency < 0.0 {
            return Err(ShakeError::InvalidConfig("frequency must be finite and non-negative"));
        }
        if !self.trauma_exponent.is_finite() || self.trauma_exponent <= 0.0 {
            return Err(ShakeError::InvalidConfig("trauma_exponent must be greater than zero"));
        }
        if !self.recovery_speed.is_finite() || self.recovery_speed < 0.0 {
            return Err(ShakeError::InvalidConfig(
                "recovery_speed must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Local pose offset produced by one shake sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShakeOffset {
    pub translation: Vec3,
    /// Euler angles in degrees.
    pub rotation_degrees: Vec3,
}

impl ShakeOffset {
    pub const ZERO: Self = Self {
        translation: Vec3::ZERO,
        rotation_degrees: Vec3::ZERO,
    };

    /// Rotation as a quaternion (Z, then X, then Y).
    pub fn rotation(&self) -> Quat {
        euler_degrees_to_quat(self.rotation_degrees)
    }

    pub fn is_zero(&self) -> bool {
        self.translation == Vec3::ZERO && self.rotation_degrees == Vec3::ZERO
    }
}

/// Anything that can receive a shake offset as its local pose.
pub trait ShakeTarget {
    /// Overwrite the local pose with `offset`. Offsets never accumulate across frames.
    fn apply_shake(&mut self, offset: &ShakeOffset);
}

impl ShakeTarget for Transform {
    fn apply_shake(&mut self, offset: &ShakeOffset) {
        if offset.is_zero() {
            self.reset_pose();
        } else {
            self.set_local_pose_degrees(offset.translation, offset.rotation_degrees);
        }
    }
}

/// Per-object shake state: configuration, trauma and a fixed noise seed.
#[derive(Clone)]
pub struct ShakeEngine<N = Perlin> {
    config: ShakeConfig,
    trauma: f32,
    seed: f32,
    noise: N,
}

impl ShakeEngine<Perlin> {
    /// Create an engine with a freshly drawn seed.
    pub fn new(config: ShakeConfig) -> Result<Self, ShakeError> {
        let seed = draw_seed(&mut rand::thread_rng());
        Self::with_seed(config, seed)
    }

    /// Create an engine with an explicit seed, for replays and tests.
    pub fn with_seed(config: ShakeConfig, seed: f32) -> Result<Self, ShakeError> {
        Self::with_noise(config, seed, default_noise())
    }
}

impl<N: NoiseFn<f64, 2>> ShakeEngine<N> {
    /// Create an engine sampling a custom noise field. Invalid configuration is
    /// rejected here, before anything can be rendered with it.
    pub fn with_noise(config: ShakeConfig, seed: f32, noise: N) -> Result<Self, ShakeError> {
        config.validate()?;
        if !seed.is_finite() {
            return Err(ShakeError::InvalidConfig("seed must be finite"));
        }
        Ok(Self {
            config,
            trauma: 0.0,
            seed,
            noise,
        })
    }

    /// Add stress to the current trauma, saturating at 1 and never going below 0.
    pub fn induce_stress(&mut self, stress: f32) {
        if !stress.is_finite() {
            log::warn!("Ignoring non-finite stress {}", stress);
            return;
        }
        self.trauma = (self.trauma + stress).clamp(0.0, 1.0);
        log::debug!("Induced stress {:.3}, trauma now {:.3}", stress, self.trauma);
    }

    /// Effective amplitude multiplier: `trauma ^ trauma_exponent`.
    pub fn shake_amount(&self) -> f32 {
        self.trauma.powf(self.config.trauma_exponent)
    }

    /// Render the offset for the current trauma at `elapsed` seconds without decaying.
    pub fn sample_offset(&self, elapsed: f64) -> ShakeOffset {
        let amount = self.shake_amount();
        if amount <= 0.0 {
            return ShakeOffset::ZERO;
        }
        let t = elapsed * self.config.frequency as f64;
        let channel = |index: usize| signed_sample(&self.noise, self.seed, index, t) * amount;

        let max_t = self.config.max_translation;
        let max_r = self.config.max_rotation_degrees;
        let r = ROTATION_CHANNEL_BASE;
        ShakeOffset {
            translation: Vec3::new(max_t.x * channel(0), max_t.y * channel(1), max_t.z * channel(2)),
            rotation_degrees: Vec3::new(
                max_r.x * channel(r),
                max_r.y * channel(r + 1),
                max_r.z * channel(r + 2),
            ),
        }
    }

    /// Per-frame update driven by the frame clock. Call at most once per frame.
    pub fn tick<T: ShakeTarget + ?Sized>(&mut self, time: &Time, target: &mut T) -> ShakeOffset {
        self.tick_at(time.elapsed_seconds_f64(), time.delta_seconds(), target)
    }

    /// Per-frame update with explicit time: render to `target`, then recover.
    pub fn tick_at<T: ShakeTarget + ?Sized>(
        &mut self,
        elapsed: f64,
        dt: f32,
        target: &mut T,
    ) -> ShakeOffset {
        let offset = self.sample_offset(elapsed);
        target.apply_shake(&offset);
        self.recover(dt);
        offset
    }

    /// Linear trauma recovery. Negative or non-finite `dt` counts as zero.
    fn recover(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.trauma = (self.trauma - self.config.recovery_speed * dt).clamp(0.0, 1.0);
    }

    pub fn trauma(&self) -> f32 {
        self.trauma
    }

    pub fn seed(&self) -> f32 {
        self.seed
    }

    pub fn config(&self) -> &ShakeConfig {
        &self.config
    }

    pub fn is_shaking(&self) -> bool {
        self.trauma > 0.0
    }

    /// Drop all trauma immediately.
    pub fn reset(&mut self) {
        self.trauma = 0.0;
    }
}

impl<N> fmt::Debug for ShakeEngine<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShakeEngine")
            .field("config", &self.config)
            .field("trauma", &self.trauma)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
