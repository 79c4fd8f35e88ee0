//! Collision shapes
//!
//! Lightweight primitives used for collision detection. Concave meshes are
//! approximated by their bounding box.

use welcome_math::Vec3;

/// A sphere defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside or on the sphere
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }
}

/// An axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two corners, in any order
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min_components(b),
            max: a.max_components(b),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if a point is inside or on the box
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Closest point inside or on the box to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp_components(self.min, self.max)
    }

    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min_components(other.min),
            max: self.max.max_components(other.max),
        }
    }
}

/// Collision shape of a body, stored in world coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    Sphere(Sphere),
    Aabb(Aabb),
}

impl Collider {
    pub fn center(&self) -> Vec3 {
        match self {
            Collider::Sphere(s) => s.center,
            Collider::Aabb(b) => b.center(),
        }
    }

    pub fn translated(&self, delta: Vec3) -> Self {
        match self {
            Collider::Sphere(s) => Collider::Sphere(Sphere::new(s.center + delta, s.radius)),
            Collider::Aabb(b) => Collider::Aabb(b.translated(delta)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_new_orders_corners() {
        let b = Aabb::new(Vec3::new(1.0, -1.0, 2.0), Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(b.center(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_aabb_closest_point() {
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let inside = Vec3::new(0.5, 0.5, 0.5);
        assert_eq!(b.closest_point(inside), inside);
        assert_eq!(b.closest_point(Vec3::new(2.0, 0.5, -3.0)), Vec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_aabb_union() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(2.0, -1.0, 0.5), Vec3::new(3.0, 0.0, 0.6));
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(u.max, Vec3::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn test_collider_translated() {
        let c = Collider::Sphere(Sphere::new(Vec3::ZERO, 0.25)).translated(Vec3::Y);
        assert_eq!(c.center(), Vec3::Y);
        assert!(Sphere::new(Vec3::ZERO, 1.0).contains(Vec3::new(0.0, 1.0, 0.0)));
    }
}
