//! Orientation helpers for placed objects

use std::f32::consts::TAU;

use crate::core::types::{Quat, Vec3};
use glam::{EulerRot, Mat3};

/// Rotation whose local +Z axis points along `direction`, with local +Y
/// kept as close to `up` as possible.
///
/// Returns identity when `direction` is zero or parallel to `up`.
pub fn look_rotation(direction: Vec3, up: Vec3) -> Quat {
    let forward = direction.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let right = up.cross(forward).normalize_or_zero();
    if right == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let new_up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, new_up, forward)).normalize()
}

/// Rotation about +Y by a fraction of a full turn
pub fn yaw_rotation(turns: f32) -> Quat {
    Quat::from_rotation_y(turns * TAU)
}

/// Rotation from XYZ Euler angles in degrees
pub fn euler_degrees(angles: [f32; 3]) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        angles[0].to_radians(),
        angles[1].to_radians(),
        angles[2].to_radians(),
    )
}
