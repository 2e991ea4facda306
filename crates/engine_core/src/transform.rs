//! Transform component and utilities for spatial positioning.

use glam::{EulerRot, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
///
/// For a shakeable object this is the *local* pose relative to its parent rig,
/// so at rest it is the identity and while shaking it holds the shake offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Overwrite the local pose with a position and an Euler rotation in degrees.
    /// Scale is left untouched.
    pub fn set_local_pose_degrees(&mut self, position: Vec3, euler_degrees: Vec3) {
        self.position = position;
        self.rotation = euler_degrees_to_quat(euler_degrees);
    }

    /// Return to the rest pose (zero offset, identity rotation).
    pub fn reset_pose(&mut self) {
        self.position = Vec3::ZERO;
        self.rotation = Quat::IDENTITY;
    }
}

/// Convert Euler angles in degrees to a quaternion.
///
/// Rotation is applied about Z first, then X, then Y.
#[inline]
pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}
