//! Collision detection and filtering

use bitflags::bitflags;

use crate::shapes::{Aabb, Sphere};
use welcome_math::Vec3;

bitflags! {
    /// Collision layers for filtering which bodies can touch
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        const DEFAULT = 1 << 0;
        /// The player character
        const PLAYER = 1 << 1;
        /// Immovable scenery (the book)
        const STATIC = 1 << 2;
        const ALL = 0xFFFFFFFF;
    }
}

/// Layer/mask pair deciding what a body collides with
///
/// Two bodies A and B collide if `A.layer & B.mask` and `B.layer & A.mask`
/// are both non-empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    pub layer: CollisionLayer,
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// Players collide with everything except other players
    pub fn player() -> Self {
        Self {
            layer: CollisionLayer::PLAYER,
            mask: CollisionLayer::ALL & !CollisionLayer::PLAYER,
        }
    }

    pub fn static_world() -> Self {
        Self {
            layer: CollisionLayer::STATIC,
            mask: CollisionLayer::ALL,
        }
    }
}

/// Contact information from a collision
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Point of contact
    pub point: Vec3,
    /// Normal pointing from the second shape toward the first
    pub normal: Vec3,
    /// Penetration depth (positive means overlapping)
    pub penetration: f32,
}

impl Contact {
    pub fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    pub fn is_colliding(&self) -> bool {
        self.penetration > 0.0
    }
}

/// Test sphere vs AABB
///
/// The normal points from the box toward the sphere.
pub fn sphere_vs_aabb(sphere: &Sphere, aabb: &Aabb) -> Option<Contact> {
    let closest = aabb.closest_point(sphere.center);
    let delta = sphere.center - closest;
    let dist_squared = delta.length_squared();

    if dist_squared >= sphere.radius * sphere.radius {
        return None;
    }

    let dist = dist_squared.sqrt();
    if dist > 0.0001 {
        return Some(Contact::new(closest, delta.normalized(), sphere.radius - dist));
    }

    // Center is inside the box: escape through the nearest face
    let to_min = sphere.center - aabb.min;
    let to_max = aabb.max - sphere.center;
    let faces = [
        (to_min.x, -Vec3::X),
        (to_max.x, Vec3::X),
        (to_min.y, -Vec3::Y),
        (to_max.y, Vec3::Y),
        (to_min.z, -Vec3::Z),
        (to_max.z, Vec3::Z),
    ];
    let (depth, normal) = faces
        .iter()
        .copied()
        .fold((f32::INFINITY, Vec3::Y), |best, face| if face.0 < best.0 { face } else { best });

    Some(Contact::new(closest, normal, depth + sphere.radius))
}

/// Test AABB vs AABB
///
/// The normal points from `b` toward `a` along the axis of least overlap.
pub fn aabb_vs_aabb(a: &Aabb, b: &Aabb) -> Option<Contact> {
    if a.max.x < b.min.x || a.min.x > b.max.x {
        return None;
    }
    if a.max.y < b.min.y || a.min.y > b.max.y {
        return None;
    }
    if a.max.z < b.min.z || a.min.z > b.max.z {
        return None;
    }

    let overlap = Vec3::new(
        (a.max.x.min(b.max.x) - a.min.x.max(b.min.x)).max(0.0),
        (a.max.y.min(b.max.y) - a.min.y.max(b.min.y)).max(0.0),
        (a.max.z.min(b.max.z) - a.min.z.max(b.min.z)).max(0.0),
    );
    let (ca, cb) = (a.center(), b.center());
    let side = |ac: f32, bc: f32, axis: Vec3| if ac < bc { -axis } else { axis };

    let mut penetration = overlap.x;
    let mut normal = side(ca.x, cb.x, Vec3::X);
    if overlap.y < penetration {
        penetration = overlap.y;
        normal = side(ca.y, cb.y, Vec3::Y);
    }
    if overlap.z < penetration {
        penetration = overlap.z;
        normal = side(ca.z, cb.z, Vec3::Z);
    }

    Some(Contact::new(a.closest_point(cb), normal, penetration))
}

/// Test sphere vs sphere
///
/// The normal points from `b` toward `a`.
pub fn sphere_vs_sphere(a: &Sphere, b: &Sphere) -> Option<Contact> {
    let delta = a.center - b.center;
    let dist_sq = delta.length_squared();
    let min_dist = a.radius + b.radius;

    if dist_sq < min_dist * min_dist && dist_sq > 0.0001 {
        let dist = dist_sq.sqrt();
        let normal = delta.normalized();
        Some(Contact::new(b.center + normal * b.radius, normal, min_dist - dist))
    } else {
        None
    }
}
