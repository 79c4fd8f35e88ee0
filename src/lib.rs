//! Welcome - a small third-person demo scene
//!
//! A book level and a running character, steered with W/Space or an
//! on-screen joystick while the camera orbits behind.

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
