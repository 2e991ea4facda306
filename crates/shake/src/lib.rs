//! Trauma-driven procedural shake for cameras and other transforms, plus the
//! explosion stress emitters that feed it.
//!
//! A [`ShakeEngine`] owns a single `trauma` scalar in `[0, 1]`. Stress events add
//! to it, it recovers linearly every tick, and each tick it is rendered into a
//! local position/rotation offset by sampling smooth noise along a time axis.
//! A [`StressSource`] is a one-shot, delayed point emitter whose induced stress
//! falls off with the distance to its target.

pub mod engine;
pub mod error;
pub mod sampling;
pub mod stress;
pub mod systems;

pub use engine::*;
pub use error::*;
pub use sampling::*;
pub use stress::*;
pub use systems::*;
