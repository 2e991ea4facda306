//! Configuration errors for shake engines and stress sources.

use hecs::Entity;
use thiserror::Error;

/// Setup mistakes detected eagerly at construction or scheduling time.
/// None of these are transient, so callers should surface them rather than retry.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ShakeError {
    #[error("invalid shake configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("stress range must be finite and greater than zero, got {0}")]
    InvalidRange(f32),
    #[error("max stress must be between 0.0 and 1.0, got {0}")]
    InvalidMaxStress(f32),
    #[error("delay must be finite and non-negative, got {0}")]
    InvalidDelay(f32),
    #[error("stress source has no target")]
    MissingTarget,
    #[error("stress source is already scheduled")]
    AlreadyScheduled,
    #[error("stress source has already fired or was cancelled")]
    AlreadyFired,
    #[error("stress target {0:?} does not exist or has no shake engine")]
    TargetNotFound(Entity),
    #[error("stress target {0:?} has no pivot to measure distance from")]
    MissingPivot(Entity),
}
