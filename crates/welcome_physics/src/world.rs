//! Physics world and fixed-step simulation

use crate::body::{BodyKey, RigidBody};
use crate::collision::{aabb_vs_aabb, sphere_vs_aabb, sphere_vs_sphere, Contact};
use crate::material::PhysicsMaterial;
use crate::shapes::Collider;
use welcome_math::{wrap_angle, Vec3};
use slotmap::SlotMap;

/// Upper bound on swept pieces per fixed step
const MAX_CCD_PIECES: u32 = 16;

/// Configuration for the physics simulation
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// Gravity acceleration along Y (negative = down)
    pub gravity: f32,
    /// Most fixed steps run for a single call to [`PhysicsWorld::step`]
    pub max_sub_steps: u32,
    /// Duration of one fixed step in seconds
    pub fixed_time_step: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            max_sub_steps: 10,
            fixed_time_step: 1.0 / 120.0,
        }
    }
}

impl PhysicsConfig {
    pub fn new(gravity: f32, max_sub_steps: u32, fixed_time_step: f32) -> Self {
        Self {
            gravity,
            max_sub_steps,
            fixed_time_step,
        }
    }
}

/// Static collider snapshot taken before dynamic bodies are mutated
struct StaticShape {
    collider: Collider,
    material: PhysicsMaterial,
    filter: crate::collision::CollisionFilter,
}

/// The physics world containing all rigid bodies
pub struct PhysicsWorld {
    bodies: SlotMap<BodyKey, RigidBody>,
    pub config: PhysicsConfig,
    /// Unsimulated time carried to the next call
    accumulator: f32,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            config,
            accumulator: 0.0,
        }
    }

    /// Replace the stepping parameters, keeping all bodies
    pub fn configure(&mut self, config: PhysicsConfig) {
        log::debug!(
            "Physics stepping: {} sub-steps of {:.5}s, gravity {}",
            config.max_sub_steps,
            config.fixed_time_step,
            config.gravity
        );
        self.config = config;
        self.accumulator = 0.0;
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        self.bodies.insert(body)
    }

    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        self.bodies.remove(key)
    }

    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advance the simulation by `dt` seconds of wall time
    ///
    /// Time is consumed in fixed steps. At most `max_sub_steps` run per call;
    /// whole steps beyond that are dropped so a long stall does not snowball.
    /// Returns the number of fixed steps taken.
    pub fn step(&mut self, dt: f32) -> u32 {
        let fixed = self.config.fixed_time_step;
        if fixed <= 0.0 || dt <= 0.0 {
            return 0;
        }

        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= fixed && steps < self.config.max_sub_steps {
            self.fixed_step(fixed);
            self.accumulator -= fixed;
            steps += 1;
        }
        if self.accumulator >= fixed {
            log::trace!("Dropping {:.4}s of physics time", self.accumulator - self.accumulator % fixed);
            self.accumulator %= fixed;
        }
        steps
    }

    /// Run exactly one fixed step of `dt` seconds
    pub fn fixed_step(&mut self, dt: f32) {
        let statics: Vec<StaticShape> = self
            .bodies
            .values()
            .filter(|b| b.is_static)
            .map(|b| StaticShape {
                collider: b.collider,
                material: b.material,
                filter: b.filter,
            })
            .collect();
        let gravity = self.config.gravity;

        for body in self.bodies.values_mut() {
            if body.is_static {
                continue;
            }

            if body.affected_by_gravity {
                body.velocity.y += gravity * dt * body.linear_factor.y;
            }

            body.yaw = wrap_angle(body.yaw + body.angular_velocity.y * dt);

            let pieces = Self::ccd_pieces(body, body.velocity * dt);
            let piece_dt = dt / pieces as f32;

            body.grounded = false;
            for _ in 0..pieces {
                body.apply_correction(body.velocity * piece_dt);
                Self::resolve_statics(body, &statics, gravity, piece_dt);
            }
        }
    }

    /// Number of pieces to sweep a move in
    fn ccd_pieces(body: &RigidBody, motion: Vec3) -> u32 {
        let distance = motion.length();
        if body.ccd_motion_threshold <= 0.0
            || body.ccd_swept_sphere_radius <= 0.0
            || distance <= body.ccd_motion_threshold
        {
            return 1;
        }
        ((distance / body.ccd_swept_sphere_radius).ceil() as u32).clamp(1, MAX_CCD_PIECES)
    }

    fn contact_with(body: &Collider, other: &Collider) -> Option<Contact> {
        match (body, other) {
            (Collider::Sphere(s), Collider::Aabb(b)) => sphere_vs_aabb(s, b),
            (Collider::Aabb(a), Collider::Aabb(b)) => aabb_vs_aabb(a, b),
            (Collider::Sphere(a), Collider::Sphere(b)) => sphere_vs_sphere(a, b),
            (Collider::Aabb(b), Collider::Sphere(s)) => sphere_vs_aabb(s, b).map(|mut c| {
                c.normal = -c.normal;
                c
            }),
        }
    }

    /// Push a dynamic body out of static shapes and apply the contact response
    fn resolve_statics(body: &mut RigidBody, statics: &[StaticShape], gravity: f32, dt: f32) {
        for shape in statics {
            if !body.filter.collides_with(&shape.filter) {
                continue;
            }
            let Some(contact) = Self::contact_with(&body.collider, &shape.collider) else {
                continue;
            };
            if !contact.is_colliding() {
                continue;
            }

            body.apply_correction(contact.normal * contact.penetration);
            if contact.normal.y > 0.5 {
                body.grounded = true;
            }

            let combined = body.material.combine(&shape.material);
            let along_normal = body.velocity.dot(contact.normal);
            if along_normal >= 0.0 {
                continue;
            }

            // Cancel (or bounce) the approaching component
            body.velocity -= contact.normal * along_normal * (1.0 + combined.restitution);

            // Coulomb friction: the tangent speed drops by at most μ·|g|·dt
            let normal_part = contact.normal * body.velocity.dot(contact.normal);
            let tangent = body.velocity - normal_part;
            let tangent_speed = tangent.length();
            if tangent_speed > 0.0001 {
                let drop = combined.friction * gravity.abs() * dt;
                let kept = (tangent_speed - drop).max(0.0) / tangent_speed;
                body.velocity = normal_part + tangent * kept;
            }
        }
    }
}
