//! Input handling module
//!
//! Maps window-level keys and clicks to application actions. Scene input
//! (movement keys, touch joystick) is handled by the scene controller.

mod input_mapper;

pub use input_mapper::{InputMapper, InputAction};
