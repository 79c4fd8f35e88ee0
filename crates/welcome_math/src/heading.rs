//! Yaw headings on the XZ plane
//!
//! A heading is the angle `atan2(x, z)` of a direction vector, so heading 0
//! looks down +Z and heading π/2 looks down +X.

use std::f32::consts::{PI, TAU};

use crate::Vec3;

/// Heading angle of a direction, in (-π, π]
#[inline]
pub fn heading_of(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

/// Unit direction on the XZ plane for a yaw angle
#[inline]
pub fn yaw_direction(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Wrap an angle into (-π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}
