//! Frame clock: per-tick delta time and cumulative elapsed time.
//!
//! The clock can be driven two ways: from the wall clock with [`Time::update`]
//! (one call per rendered frame), or by explicit steps with [`Time::advance`]
//! for headless loops, replays and tests.

use std::time::{Duration, Instant};

/// Manages frame timing and delta time calculation.
#[derive(Debug, Clone)]
pub struct Time {
    /// Wall-clock instant of the last `update` call.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep used by [`Time::step_fixed`] (default 60 Hz).
    fixed_timestep: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new clock at time zero.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
        }
    }

    /// Create a clock whose fixed step runs at `hz` updates per second.
    pub fn with_fixed_rate(hz: f64) -> Self {
        let mut time = Self::new();
        time.set_fixed_rate(hz);
        time
    }

    /// Update timing from the wall clock at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.advance(now - self.last_frame);
        self.last_frame = now;
    }

    /// Step the clock forward by an explicit amount.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Step the clock forward by one fixed timestep.
    pub fn step_fixed(&mut self) {
        self.advance(self.fixed_timestep);
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Total elapsed time in seconds at double precision.
    /// Noise coordinates are derived from this so long sessions keep their resolution.
    pub fn elapsed_seconds_f64(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Get total elapsed time as Duration.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Set the fixed timestep rate in Hz. Non-positive rates are ignored.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        if hz > 0.0 && hz.is_finite() {
            self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
        } else {
            log::warn!("Ignoring invalid fixed rate {} Hz", hz);
        }
    }
}
