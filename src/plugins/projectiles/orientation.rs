//! Shortest-arc rotation used to point a projectile's icon along its flight path.

use std::f32::consts::PI;

use bevy::prelude::*;

/// Below this `w / (|a||b|)` the two vectors count as opposite.
const ANTI_PARALLEL_EPS: f32 = 1e-6;

/// Rotation taking direction `from` onto direction `to`.
///
/// Built as the quaternion `(from × to, sqrt(|from|²|to|²) + from·to)`, normalised.
/// That construction collapses to zero for opposite vectors; in that case any axis
/// perpendicular to `from` is valid and we rotate half a turn around it.
/// A zero-length input has no direction to align, so the result is the identity.
pub fn align_rotation(from: Vec3, to: Vec3) -> Quat {
    let len_sq = from.length_squared() * to.length_squared();
    if len_sq <= f32::EPSILON {
        return Quat::IDENTITY;
    }

    let norm = len_sq.sqrt();
    let w = norm + from.dot(to);
    if w <= ANTI_PARALLEL_EPS * norm {
        let axis = from.normalize().any_orthonormal_vector();
        return Quat::from_axis_angle(axis, PI);
    }

    let axis = from.cross(to);
    Quat::from_xyzw(axis.x, axis.y, axis.z, w).normalize()
}
