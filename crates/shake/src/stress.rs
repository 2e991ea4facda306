//! One-shot, delayed stress emitters (explosions and the like).
//!
//! Lifecycle: `Idle -> schedule -> Pending -> timer elapses -> Fired`.
//! `Fired` and `Cancelled` are terminal. Nothing is registered with an external
//! timer, so dropping a pending source is enough to guarantee it never fires.

use glam::Vec3;
use hecs::Entity;
use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::engine::ShakeEngine;
use crate::error::ShakeError;

/// Slack when comparing accumulated frame time against a delay, in seconds.
const TIMER_EPSILON: f64 = 1e-5;

/// Parabolic falloff: 1 at the source, 0 at or beyond `range`.
#[inline]
pub fn stress_falloff(distance: f32, range: f32) -> f32 {
    let distance01 = (distance / range).clamp(0.0, 1.0);
    1.0 - distance01 * distance01
}

/// Stress induced at `distance` from a source of strength `max_stress`.
#[inline]
pub fn stress_at_distance(distance: f32, max_stress: f32, range: f32) -> f32 {
    stress_falloff(distance, range) * max_stress
}

/// Tuning for a stress source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressSourceConfig {
    /// Seconds between `arm` and firing.
    pub delay: f32,
    /// Stress delivered to a target at the source position, in `[0, 1]`.
    pub max_stress: f32,
    /// Distance at which stress reaches zero.
    pub range: f32,
}

impl Default for StressSourceConfig {
    fn default() -> Self {
        Self {
            delay: 1.0,
            max_stress: 0.6,
            range: 45.0,
        }
    }
}

impl StressSourceConfig {
    pub fn validate(&self) -> Result<(), ShakeError> {
        if !self.range.is_finite() || self.range <= 0.0 {
            return Err(ShakeError::InvalidRange(self.range));
        }
        if !(0.0..=1.0).contains(&self.max_stress) {
            return Err(ShakeError::InvalidMaxStress(self.max_stress));
        }
        validate_delay(self.delay)
    }
}

fn validate_delay(delay: f32) -> Result<(), ShakeError> {
    if delay.is_finite() && delay >= 0.0 {
        Ok(())
    } else {
        Err(ShakeError::InvalidDelay(delay))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SourceState {
    #[default]
    Idle,
    Pending {
        /// Seconds accumulated since scheduling.
        elapsed: f64,
        /// Seconds to wait before firing.
        delay: f32,
    },
    Fired,
    Cancelled,
}

/// A delayed point emitter that induces stress on one target exactly once.
#[derive(Debug, Clone)]
pub struct StressSource {
    config: StressSourceConfig,
    pub position: Vec3,
    target: Option<Entity>,
    state: SourceState,
}

impl StressSource {
    /// Build a source at `position`. Invalid configuration is rejected here,
    /// never at fire time.
    pub fn new(config: StressSourceConfig, position: Vec3) -> Result<Self, ShakeError> {
        config.validate()?;
        Ok(Self {
            config,
            position,
            target: None,
            state: SourceState::Idle,
        })
    }

    pub fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    /// Retarget an idle source. Once scheduled the target is fixed.
    pub fn set_target(&mut self, target: Entity) -> Result<(), ShakeError> {
        match self.state {
            SourceState::Idle => {
                self.target = Some(target);
                Ok(())
            }
            SourceState::Pending { .. } => Err(ShakeError::AlreadyScheduled),
            SourceState::Fired | SourceState::Cancelled => Err(ShakeError::AlreadyFired),
        }
    }

    /// Start the one-shot timer. Fires after `after_delay` seconds of `advance`.
    pub fn schedule(&mut self, after_delay: f32) -> Result<(), ShakeError> {
        match self.state {
            SourceState::Idle => {}
            SourceState::Pending { .. } => return Err(ShakeError::AlreadyScheduled),
            SourceState::Fired | SourceState::Cancelled => return Err(ShakeError::AlreadyFired),
        }
        if self.target.is_none() {
            return Err(ShakeError::MissingTarget);
        }
        validate_delay(after_delay)?;
        self.state = SourceState::Pending {
            elapsed: 0.0,
            delay: after_delay,
        };
        log::debug!("Stress source at {:?} armed, fires in {:.2}s", self.position, after_delay);
        Ok(())
    }

    /// Schedule with the configured delay.
    pub fn arm(&mut self) -> Result<(), ShakeError> {
        self.schedule(self.config.delay)
    }

    /// Advance the timer by `dt` seconds. Returns the detonation on the tick the
    /// accumulated time reaches the delay and `None` on every other call.
    pub fn advance(&mut self, dt: f32) -> Option<Detonation> {
        let SourceState::Pending { elapsed, delay } = self.state else {
            return None;
        };
        let elapsed = elapsed + dt.max(0.0) as f64;
        if elapsed + TIMER_EPSILON < delay as f64 {
            self.state = SourceState::Pending { elapsed, delay };
            return None;
        }
        self.state = SourceState::Fired;
        let Some(target) = self.target else {
            log::warn!("Stress source at {:?} fired with no target", self.position);
            return None;
        };
        Some(Detonation {
            source_position: self.position,
            target,
            max_stress: self.config.max_stress,
            range: self.config.range,
        })
    }

    /// Stop a pending timer. The source will never fire afterwards.
    pub fn cancel(&mut self) {
        if !matches!(self.state, SourceState::Fired) {
            self.state = SourceState::Cancelled;
        }
    }

    pub fn state(&self) -> SourceState {
        self.state
    }

    /// Seconds left before a pending source fires.
    pub fn remaining(&self) -> Option<f32> {
        match self.state {
            SourceState::Pending { elapsed, delay } => Some((delay as f64 - elapsed).max(0.0) as f32),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SourceState::Pending { .. })
    }

    /// Fired or cancelled: nothing more will happen.
    pub fn is_spent(&self) -> bool {
        matches!(self.state, SourceState::Fired | SourceState::Cancelled)
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn config(&self) -> &StressSourceConfig {
        &self.config
    }
}

/// A fired source waiting to be delivered to its target. Applying consumes it.
#[derive(Debug)]
#[must_use = "a detonation does nothing until it is applied to its target"]
pub struct Detonation {
    pub source_position: Vec3,
    pub target: Entity,
    pub max_stress: f32,
    pub range: f32,
}

impl Detonation {
    pub fn stress_for(&self, target_position: Vec3) -> f32 {
        stress_at_distance(
            self.source_position.distance(target_position),
            self.max_stress,
            self.range,
        )
    }

    /// Induce this detonation's stress on `engine`. Returns the stress delivered.
    pub fn apply<N: NoiseFn<f64, 2>>(self, engine: &mut ShakeEngine<N>, target_position: Vec3) -> f32 {
        let stress = self.stress_for(target_position);
        log::debug!(
            "Detonation at {:?} delivers {:.3} stress to {:?}",
            self.source_position,
            stress,
            self.target
        );
        engine.induce_stress(stress);
        stress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ShakeConfig;
    use hecs::World;

    fn target() -> Entity {
        World::new().spawn(())
    }

    fn config() -> StressSourceConfig {
        StressSourceConfig {
            delay: 1.0,
            max_stress: 0.6,
            range: 45.0,
        }
    }

    #[test]
    fn falloff_scenario() {
        assert!((stress_at_distance(0.0, 0.6, 45.0) - 0.6).abs() < 1e-6);
        assert_eq!(stress_at_distance(45.0, 0.6, 45.0), 0.0);
        assert_eq!(stress_at_distance(200.0, 0.6, 45.0), 0.0);
        assert!((stress_falloff(22.5, 45.0) - 0.75).abs() < 1e-6);
        assert!((stress_at_distance(22.5, 0.6, 45.0) - 0.45).abs() < 1e-6);
    }

    #[test]
    fn falloff_strictly_decreasing_within_range() {
        let mut prev = stress_at_distance(0.0, 0.6, 45.0);
        for i in 1..450 {
            let s = stress_at_distance(i as f32 * 0.1, 0.6, 45.0);
            assert!(s < prev, "not decreasing at {}", i as f32 * 0.1);
            assert!((0.0..=0.6).contains(&s));
            prev = s;
        }
    }

    #[test]
    fn construction_rejects_bad_range_and_stress() {
        let bad_range = [0.0, -5.0, f32::NAN, f32::INFINITY];
        for range in bad_range {
            let err = StressSource::new(StressSourceConfig { range, ..config() }, Vec3::ZERO).unwrap_err();
            assert!(matches!(err, ShakeError::InvalidRange(_)));
        }
        let err = StressSource::new(StressSourceConfig { max_stress: 1.5, ..config() }, Vec3::ZERO)
            .unwrap_err();
        assert_eq!(err, ShakeError::InvalidMaxStress(1.5));
        let err = StressSource::new(StressSourceConfig { delay: -1.0, ..config() }, Vec3::ZERO)
            .unwrap_err();
        assert_eq!(err, ShakeError::InvalidDelay(-1.0));
    }

    #[test]
    fn schedule_requires_target() {
        let mut source = StressSource::new(config(), Vec3::ZERO).unwrap();
        assert_eq!(source.arm(), Err(ShakeError::MissingTarget));
        assert_eq!(source.state(), SourceState::Idle);
    }

    #[test]
    fn fires_once_after_delay() {
        let mut source = StressSource::new(config(), Vec3::ZERO).unwrap().with_target(target());
        source.arm().unwrap();
        assert!(source.advance(0.4).is_none());
        assert!(source.advance(0.4).is_none());
        assert!(source.is_pending());
        let detonation = source.advance(0.4).expect("should fire once delay elapses");
        assert_eq!(detonation.max_stress, 0.6);
        assert_eq!(source.state(), SourceState::Fired);
        assert!(source.advance(10.0).is_none());
        assert_eq!(source.schedule(0.0), Err(ShakeError::AlreadyFired));
    }

    #[test]
    fn fires_on_the_frame_the_clock_reaches_the_delay() {
        let dt = 1.0 / 60.0;
        for (delay, expected_frame) in [(0.5, 30), (1.0, 60), (1.5, 90), (2.0, 120)] {
            let mut source = StressSource::new(StressSourceConfig { delay, ..config() }, Vec3::ZERO)
                .unwrap()
                .with_target(target());
            source.arm().unwrap();
            let fired_at = (1..=200).find(|_| source.advance(dt).is_some());
            assert_eq!(fired_at, Some(expected_frame), "delay {}", delay);
        }
    }

    #[test]
    fn remaining_counts_down() {
        let mut source = StressSource::new(config(), Vec3::ZERO).unwrap().with_target(target());
        assert_eq!(source.remaining(), None);
        source.arm().unwrap();
        let _ = source.advance(0.25);
        assert!((source.remaining().unwrap() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn zero_delay_fires_on_first_advance() {
        let mut source = StressSource::new(config(), Vec3::ZERO).unwrap().with_target(target());
        source.schedule(0.0).unwrap();
        assert!(source.advance(0.0).is_some());
    }

    #[test]
    fn idle_source_never_fires() {
        let mut source = StressSource::new(config(), Vec3::ZERO).unwrap().with_target(target());
        assert!(source.advance(100.0).is_none());
        assert_eq!(source.state(), SourceState::Idle);
    }

    #[test]
    fn cannot_reschedule_or_retarget_while_pending() {
        let mut source = StressSource::new(config(), Vec3::ZERO).unwrap().with_target(target());
        source.arm().unwrap();
        assert_eq!(source.schedule(2.0), Err(ShakeError::AlreadyScheduled));
        assert_eq!(source.set_target(target()), Err(ShakeError::AlreadyScheduled));
        assert_eq!(source.schedule(f32::NAN), Err(ShakeError::AlreadyScheduled));
    }

    #[test]
    fn cancelled_source_never_fires() {
        let mut source = StressSource::new(config(), Vec3::ZERO).unwrap().with_target(target());
        source.arm().unwrap();
        let _ = source.advance(0.5);
        source.cancel();
        assert!(source.advance(5.0).is_none());
        assert!(source.is_spent());
        assert_eq!(source.arm(), Err(ShakeError::AlreadyFired));
    }

    #[test]
    fn detonation_induces_distance_scaled_stress() {
        let mut source = StressSource::new(config(), Vec3::new(22.5, 0.0, 0.0))
            .unwrap()
            .with_target(target());
        source.schedule(0.0).unwrap();
        let detonation = source.advance(0.016).unwrap();

        let mut engine = ShakeEngine::with_seed(ShakeConfig::default(), 0.5).unwrap();
        let delivered = detonation.apply(&mut engine, Vec3::ZERO);
        assert!((delivered - 0.45).abs() < 1e-6);
        assert!((engine.trauma() - 0.45).abs() < 1e-6);
    }

    #[test]
    fn simultaneous_detonations_accumulate_and_clamp() {
        let mut engine = ShakeEngine::with_seed(ShakeConfig::default(), 0.5).unwrap();
        for _ in 0..3 {
            let mut source = StressSource::new(config(), Vec3::ZERO).unwrap().with_target(target());
            source.schedule(0.0).unwrap();
            source.advance(0.0).unwrap().apply(&mut engine, Vec3::ZERO);
        }
        assert_eq!(engine.trauma(), 1.0);
    }
}
