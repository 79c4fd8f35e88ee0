//! The welcome scene
//!
//! [`SceneController`] owns the scene state and drives it once per frame.
//! [`Viewport`] keeps the scene's aspect ratio when the window changes size.

mod controller;
mod viewport;

pub use controller::{turn_velocity, InputState, SceneController};
pub use viewport::{Viewport, ViewportRect};
