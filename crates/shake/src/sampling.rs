//! Noise sampling and seed helpers shared by the shake channels.
//!
//! Every channel samples the same 2D noise field along a vertical strip:
//! `x` is fixed per channel (`seed + channel`) and `y` is the scaled time.

use noise::{NoiseFn, Perlin};
use rand::Rng;

/// Number of independent noise channels: translation x/y/z, then rotation x/y/z.
pub const CHANNEL_COUNT: usize = 6;
/// First channel index used for rotation.
pub const ROTATION_CHANNEL_BASE: usize = 3;

/// The noise field used when none is supplied.
pub fn default_noise() -> Perlin {
    Perlin::new(Perlin::DEFAULT_SEED)
}

/// Draw a per-instance seed in `[0, 1)`.
pub fn draw_seed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>()
}

/// Sample `noise` at `(x, y)` and map the generator's `[-1, 1]` output into `[0, 1]`.
#[inline]
pub fn sample01<N: NoiseFn<f64, 2> + ?Sized>(noise: &N, x: f64, y: f64) -> f32 {
    (noise.get([x, y]) * 0.5 + 0.5).clamp(0.0, 1.0) as f32
}

/// Bidirectional sample in `[-1, 1]` for one channel at noise coordinate `t`.
#[inline]
pub fn signed_sample<N: NoiseFn<f64, 2> + ?Sized>(noise: &N, seed: f32, channel: usize, t: f64) -> f32 {
    sample01(noise, seed as f64 + channel as f64, t) * 2.0 - 1.0
}
