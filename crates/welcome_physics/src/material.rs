//! Surface material used during contact resolution

use serde::{Deserialize, Serialize};

/// Friction and bounciness of a body's surface
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Friction coefficient (0.0 = frictionless, 1.0 = grippy)
    pub friction: f32,
    /// Restitution (0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
        }
    }
}

impl PhysicsMaterial {
    pub const FRICTIONLESS: Self = Self {
        friction: 0.0,
        restitution: 0.0,
    };

    /// Create a material, clamping both values to [0.0, 1.0]
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction: friction.clamp(0.0, 1.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Default material with a different friction
    pub fn with_friction(friction: f32) -> Self {
        Self::new(friction, 0.0)
    }

    /// Combine two materials for a contact
    ///
    /// Friction is the geometric mean, restitution the maximum.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            friction: (self.friction * other.friction).sqrt(),
            restitution: self.restitution.max(other.restitution),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_values() {
        let m = PhysicsMaterial::new(1.5, -0.5);
        assert_eq!(m.friction, 1.0);
        assert_eq!(m.restitution, 0.0);
    }

    #[test]
    fn test_player_against_default_surface() {
        let player = PhysicsMaterial::with_friction(0.8);
        let combined = player.combine(&PhysicsMaterial::default());
        assert!((combined.friction - (0.8_f32 * 0.5).sqrt()).abs() < 0.0001);
        assert_eq!(combined.restitution, 0.0);
    }

    #[test]
    fn test_frictionless_dominates() {
        let combined = PhysicsMaterial::FRICTIONLESS.combine(&PhysicsMaterial::with_friction(0.9));
        assert_eq!(combined.friction, 0.0);
    }

    #[test]
    fn test_combine_is_commutative() {
        let a = PhysicsMaterial::new(0.3, 0.5);
        let b = PhysicsMaterial::new(0.7, 0.2);
        let ab = a.combine(&b);
        let ba = b.combine(&a);
        assert!((ab.friction - ba.friction).abs() < 0.0001);
        assert_eq!(ab.restitution, ba.restitution);
    }
}
