//! Input mapping from raw events to application actions
//!
//! Maps keyboard and mouse input to window-level actions like ToggleCursor and Exit.
//! Scene keys (W/A/S/D, Space) are NOT mapped here - they go to the scene's key state.

use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Actions handled by the application rather than the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Toggle cursor capture (Escape when captured, click when released)
    ToggleCursor,
    /// Exit application (Escape when not captured)
    Exit,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
}

/// Maps raw input events to application actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for application keys, `None` for everything else
    pub fn map_keyboard(
        key: KeyCode,
        state: ElementState,
        cursor_captured: bool,
    ) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => {
                if cursor_captured {
                    Some(InputAction::ToggleCursor)
                } else {
                    Some(InputAction::Exit)
                }
            }
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            _ => None,
        }
    }

    /// Map mouse button to an action
    ///
    /// Left click captures the cursor, but only where pointer lock is used
    pub fn map_mouse_button(
        button: MouseButton,
        state: ElementState,
        cursor_captured: bool,
        pointer_lock: bool,
    ) -> Option<InputAction> {
        if pointer_lock
            && button == MouseButton::Left
            && state == ElementState::Pressed
            && !cursor_captured
        {
            Some(InputAction::ToggleCursor)
        } else {
            None
        }
    }
}
