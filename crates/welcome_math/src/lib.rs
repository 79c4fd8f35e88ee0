//! Math for the welcome scene
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`heading`] - Angle helpers for yaw headings on the XZ plane

mod vec3;
pub mod heading;

pub use vec3::Vec3;
pub use heading::{heading_of, wrap_angle, yaw_direction};
