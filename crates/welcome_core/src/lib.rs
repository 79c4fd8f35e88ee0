//! Core types for the welcome scene
//!
//! - [`AssetCache`] / [`AssetLoader`] - model loading on worker threads, delivered to the loop thread
//! - [`ModelAsset`] - the parts of a GLB model the scene needs
//! - [`AnimationState`] / [`AnimationMixer`] - named clips and the player's animation state
//! - [`Timers`] - one-shot delayed events driven by the scene clock
//! - [`PlayerEntity`] / [`BookEntity`] - the two things in the scene

mod asset_error;
mod asset_cache;
mod asset_loader;
mod model;
mod animation;
mod timer;
mod entity;

pub use asset_error::AssetError;
pub use asset_cache::{Asset, AssetCache, AssetHandle, AssetId};
pub use asset_loader::{AssetEvent, AssetKey, AssetLoader};
pub use model::{AnimationClip, MeshInfo, ModelAsset};
pub use animation::{AnimationMixer, AnimationState};
pub use timer::{TimerId, Timers};
pub use entity::{BookEntity, PlayerEntity};

// Re-export math and physics types used in entity records
pub use welcome_math::Vec3;
pub use welcome_physics::{Aabb, BodyKey};
