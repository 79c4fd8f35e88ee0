//! Rigid body types

use crate::collision::CollisionFilter;
use crate::material::PhysicsMaterial;
use crate::shapes::{Aabb, Collider, Sphere};
use welcome_math::{wrap_angle, yaw_direction, Vec3};
use slotmap::new_key_type;

new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Generational: a key to a removed body returns None even if its slot
    /// has been reused.
    pub struct BodyKey;
}

/// A rigid body with position, yaw, velocities and a collision shape
///
/// Linear and angular factors scale what the simulation does to the body
/// (gravity, impulses, contact spin). Velocities set directly through
/// [`set_velocity`](Self::set_velocity) and
/// [`set_angular_velocity_y`](Self::set_angular_velocity_y) are not scaled,
/// so a character with angular factor zero still turns when told to.
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Position in world coordinates
    pub position: Vec3,
    /// Linear velocity (units per second)
    pub velocity: Vec3,
    /// Rotation about the Y axis in radians, wrapped to (-π, π]
    pub yaw: f32,
    /// Angular velocity in radians per second (only Y is integrated)
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub material: PhysicsMaterial,
    /// Per-axis scale on gravity and linear impulses
    pub linear_factor: Vec3,
    /// Per-axis scale on angular impulses
    pub angular_factor: Vec3,
    pub affected_by_gravity: bool,
    /// Static bodies never move
    pub is_static: bool,
    pub collider: Collider,
    pub filter: CollisionFilter,
    /// Motion per step above which the move is swept in pieces (0 disables)
    pub ccd_motion_threshold: f32,
    /// Radius used to size the swept pieces (0 disables)
    pub ccd_swept_sphere_radius: f32,
    /// Whether the body rested on an upward-facing contact last step
    pub grounded: bool,
}

impl RigidBody {
    /// Create a dynamic body with a sphere collider
    pub fn new_sphere(position: Vec3, radius: f32) -> Self {
        Self::with_collider(position, Collider::Sphere(Sphere::new(position, radius)))
    }

    /// Create an immovable body occupying the given box
    pub fn new_static_aabb(aabb: Aabb) -> Self {
        Self::with_collider(aabb.center(), Collider::Aabb(aabb))
            .with_static(true)
            .with_linear_factor(Vec3::ZERO)
            .with_angular_factor(Vec3::ZERO)
            .with_filter(CollisionFilter::static_world())
    }

    fn with_collider(position: Vec3, collider: Collider) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
            material: PhysicsMaterial::default(),
            linear_factor: Vec3::ONE,
            angular_factor: Vec3::ONE,
            affected_by_gravity: true,
            is_static: false,
            collider,
            filter: CollisionFilter::default(),
            ccd_motion_threshold: 0.0,
            ccd_swept_sphere_radius: 0.0,
            grounded: false,
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass.max(f32::EPSILON);
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.material = PhysicsMaterial::new(friction, self.material.restitution);
        self
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = wrap_angle(yaw);
        self
    }

    pub fn with_linear_factor(mut self, factor: Vec3) -> Self {
        self.linear_factor = factor;
        self
    }

    pub fn with_angular_factor(mut self, factor: Vec3) -> Self {
        self.angular_factor = factor;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Enable swept integration for fast motion
    pub fn with_ccd(mut self, motion_threshold: f32, swept_sphere_radius: f32) -> Self {
        self.ccd_motion_threshold = motion_threshold;
        self.ccd_swept_sphere_radius = swept_sphere_radius;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        if is_static {
            self.affected_by_gravity = false;
        }
        self
    }

    /// Unit facing direction on the XZ plane
    pub fn forward(&self) -> Vec3 {
        yaw_direction(self.yaw)
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn set_angular_velocity_y(&mut self, omega: f32) {
        self.angular_velocity.y = omega;
    }

    /// Apply an instantaneous impulse at the center of mass
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.is_static {
            return;
        }
        self.velocity += impulse.component_mul(self.linear_factor) / self.mass;
    }

    /// Upward (or downward) impulse
    pub fn apply_impulse_y(&mut self, impulse: f32) {
        self.apply_impulse(Vec3::new(0.0, impulse, 0.0));
    }

    /// Spin impulse about Y, scaled by the angular factor
    pub fn apply_angular_impulse_y(&mut self, impulse: f32) {
        if self.is_static {
            return;
        }
        self.angular_velocity.y += impulse * self.angular_factor.y / self.mass;
    }

    /// Move to a position, keeping the collider in sync
    pub fn set_position(&mut self, position: Vec3) {
        let delta = position - self.position;
        self.position = position;
        self.collider = self.collider.translated(delta);
    }

    /// Apply a positional correction (e.g. from collision resolution)
    pub fn apply_correction(&mut self, correction: Vec3) {
        self.position += correction;
        self.collider = self.collider.translated(correction);
    }

    /// Bounding sphere radius of the collider, used to size CCD pieces
    pub fn radius(&self) -> f32 {
        match self.collider {
            Collider::Sphere(s) => s.radius,
            Collider::Aabb(b) => b.half_extents().length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_new_sphere_body() {
        let pos = Vec3::new(35.0, -3.5, 0.0);
        let body = RigidBody::new_sphere(pos, 0.25);
        assert_eq!(body.position, pos);
        assert_eq!(body.collider.center(), pos);
        assert!(body.affected_by_gravity);
        assert!(!body.is_static);
        assert_eq!(body.radius(), 0.25);
    }

    #[test]
    fn test_static_body_has_zero_factors() {
        let body = RigidBody::new_static_aabb(Aabb::new(Vec3::ZERO, Vec3::ONE));
        assert!(body.is_static);
        assert!(!body.affected_by_gravity);
        assert_eq!(body.linear_factor, Vec3::ZERO);
        assert_eq!(body.angular_factor, Vec3::ZERO);
        assert_eq!(body.position, Vec3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_impulse_divides_by_mass() {
        let mut body = RigidBody::new_sphere(Vec3::ZERO, 0.25).with_mass(2.0);
        body.apply_impulse_y(6.0);
        assert_eq!(body.velocity.y, 3.0);
    }

    #[test]
    fn test_impulse_respects_linear_factor() {
        let mut body = RigidBody::new_sphere(Vec3::ZERO, 0.25)
            .with_linear_factor(Vec3::new(1.0, 0.0, 1.0));
        body.apply_impulse(Vec3::new(1.0, 6.0, 2.0));
        assert_eq!(body.velocity, Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_static_ignores_impulse() {
        let mut body = RigidBody::new_static_aabb(Aabb::new(Vec3::ZERO, Vec3::ONE));
        body.apply_impulse_y(6.0);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_angular_factor_blocks_impulse_but_not_set() {
        let mut body = RigidBody::new_sphere(Vec3::ZERO, 0.25)
            .with_angular_factor(Vec3::ZERO);
        body.apply_angular_impulse_y(5.0);
        assert_eq!(body.angular_velocity.y, 0.0);

        body.set_angular_velocity_y(8.0);
        assert_eq!(body.angular_velocity.y, 8.0);
    }

    #[test]
    fn test_yaw_is_wrapped_and_forward_matches() {
        let body = RigidBody::new_sphere(Vec3::ZERO, 0.25).with_yaw(1.5 * PI);
        assert!((body.yaw + PI / 2.0).abs() < 1e-5);
        let f = body.forward();
        assert!((f.x + 1.0).abs() < 1e-5);
        assert!(f.z.abs() < 1e-5);
    }

    #[test]
    fn test_set_position_moves_collider() {
        let mut body = RigidBody::new_sphere(Vec3::ZERO, 1.0);
        body.set_position(Vec3::new(5.0, 10.0, 3.0));
        assert_eq!(body.collider.center(), Vec3::new(5.0, 10.0, 3.0));
        body.apply_correction(Vec3::Y);
        assert_eq!(body.position, Vec3::new(5.0, 11.0, 3.0));
    }
}
