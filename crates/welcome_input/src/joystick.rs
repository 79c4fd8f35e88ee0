//! On-screen joystick for touch devices
//!
//! One analog axis and lettered buttons, positioned by pixel offsets from
//! the surface edges. Touches are hit-tested against those positions and
//! turned into [`JoystickEvent`]s.

use serde::{Deserialize, Serialize};
use winit::event::TouchPhase;

/// Pixel placement of a joystick element
///
/// Horizontal position comes from `left` if set, otherwise from `right`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ButtonStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f32>,
    pub bottom: f32,
    pub size: f32,
}

pub const AXIS_STYLES: ButtonStyles = ButtonStyles {
    left: Some(20.0),
    right: None,
    bottom: 195.0,
    size: 100.0,
};

pub const BUTTON_A_STYLES: ButtonStyles = ButtonStyles {
    left: None,
    right: Some(20.0),
    bottom: 270.0,
    size: 80.0,
};

pub const BUTTON_B_STYLES: ButtonStyles = ButtonStyles {
    left: None,
    right: Some(95.0),
    bottom: 195.0,
    size: 80.0,
};

impl ButtonStyles {
    /// Center of the element on a surface of the given size
    pub fn center(&self, surface: (f32, f32)) -> (f32, f32) {
        let half = self.size * 0.5;
        let x = match (self.left, self.right) {
            (Some(left), _) => left + half,
            (None, Some(right)) => surface.0 - right - half,
            (None, None) => half,
        };
        (x, surface.1 - self.bottom - half)
    }

    fn hit(&self, surface: (f32, f32), x: f32, y: f32) -> bool {
        let (cx, cy) = self.center(surface);
        let r = self.size * 0.5;
        (x - cx) * (x - cx) + (y - cy) * (y - cy) <= r * r
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JoystickEvent {
    /// Axis deflection in [-1, 1]; `top` is positive when pushed up
    AxisMove { top: f32, right: f32 },
    /// Button pressed down
    Click(Button),
    /// Button let go
    Release(Button),
}

#[derive(Clone, Debug)]
struct Axis {
    styles: ButtonStyles,
    touch: Option<u64>,
}

#[derive(Clone, Debug)]
struct TouchButton {
    letter: Button,
    styles: ButtonStyles,
    touch: Option<u64>,
}

/// Virtual joystick overlay
#[derive(Clone, Debug)]
pub struct VirtualJoystick {
    surface: (f32, f32),
    axis: Option<Axis>,
    buttons: Vec<TouchButton>,
}

impl VirtualJoystick {
    /// Joystick for a surface of `width` x `height` pixels
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            surface: (width, height),
            axis: None,
            buttons: Vec::new(),
        }
    }

    pub fn add_axis(&mut self, styles: ButtonStyles) {
        self.axis = Some(Axis { styles, touch: None });
    }

    pub fn add_button(&mut self, letter: Button, styles: ButtonStyles) {
        self.buttons.push(TouchButton {
            letter,
            styles,
            touch: None,
        });
    }

    pub fn has_axis(&self) -> bool {
        self.axis.is_some()
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface = (width, height);
    }

    /// Feed one touch update, returning the events it produced
    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32) -> Vec<JoystickEvent> {
        let mut events = Vec::new();
        let surface = self.surface;

        match phase {
            TouchPhase::Started => {
                if let Some(axis) = self.axis.as_mut() {
                    if axis.touch.is_none() && axis.styles.hit(surface, x, y) {
                        axis.touch = Some(id);
                        events.push(Self::deflect(&axis.styles, surface, x, y));
                        return events;
                    }
                }
                if let Some(button) = self
                    .buttons
                    .iter_mut()
                    .find(|b| b.touch.is_none() && b.styles.hit(surface, x, y))
                {
                    button.touch = Some(id);
                    log::debug!("Joystick button {:?} pressed", button.letter);
                    events.push(JoystickEvent::Click(button.letter));
                }
            }
            TouchPhase::Moved => {
                if let Some(axis) = self.axis.as_ref().filter(|a| a.touch == Some(id)) {
                    events.push(Self::deflect(&axis.styles, surface, x, y));
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if let Some(axis) = self.axis.as_mut().filter(|a| a.touch == Some(id)) {
                    axis.touch = None;
                    events.push(JoystickEvent::AxisMove { top: 0.0, right: 0.0 });
                }
                for button in self.buttons.iter_mut().filter(|b| b.touch == Some(id)) {
                    button.touch = None;
                    events.push(JoystickEvent::Release(button.letter));
                }
            }
        }

        events
    }

    /// Axis deflection for a touch point, clamped to the unit circle
    fn deflect(styles: &ButtonStyles, surface: (f32, f32), x: f32, y: f32) -> JoystickEvent {
        let (cx, cy) = styles.center(surface);
        let r = (styles.size * 0.5).max(f32::EPSILON);
        let mut right = (x - cx) / r;
        let mut top = (cy - y) / r;
        let len = (right * right + top * top).sqrt();
        if len > 1.0 {
            right /= len;
            top /= len;
        }
        JoystickEvent::AxisMove { top, right }
    }
}
