//! Input handling for the welcome scene
//!
//! - [`KeyState`] - held movement keys (W/A/S/D/Space)
//! - [`VirtualJoystick`] - on-screen axis and buttons for touch devices
//! - [`ThirdPersonControls`] - orbit camera around the player

mod keys;
mod joystick;
mod third_person;

pub use keys::{KeyState, Keys};
pub use joystick::{Button, ButtonStyles, JoystickEvent, VirtualJoystick, AXIS_STYLES, BUTTON_A_STYLES, BUTTON_B_STYLES};
pub use third_person::ThirdPersonControls;
