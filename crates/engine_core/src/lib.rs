//! Core engine types and utilities for Tremor.
//!
//! This crate provides the foundational types shared by the effect crates:
//! - Transform (local pose) and Euler conversion
//! - Frame clock with delta and elapsed time

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{EulerRot, Quat, Vec3};
pub use hecs::{Entity, World};
