//! Application systems
//!
//! Window, GPU surface and frame clock, kept apart from main.rs so each can be
//! tested on its own.

mod render;
mod simulation;
mod window;

pub use render::{RenderError, RenderSystem};
pub use simulation::SimulationSystem;
pub use window::{format_title, WindowError, WindowSystem};
