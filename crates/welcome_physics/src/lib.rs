//! Physics simulation for the welcome scene
//!
//! This crate provides a small rigid body simulation, including:
//! - Collision shapes (spheres, AABBs)
//! - Collision detection and layer filtering
//! - Rigid bodies with linear/angular factors and CCD parameters
//! - A fixed-timestep world with a sub-step cap

pub mod body;
pub mod collision;
pub mod material;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, RigidBody};
pub use collision::{aabb_vs_aabb, sphere_vs_aabb, sphere_vs_sphere, CollisionFilter, CollisionLayer, Contact};
pub use material::PhysicsMaterial;
pub use shapes::{Aabb, Collider, Sphere};
pub use world::{PhysicsConfig, PhysicsWorld};
