//! Third-person orbit camera
//!
//! The camera sits on a sphere of `target_radius` around the target point
//! (the player position plus `offset`) and always looks at it. `theta` is
//! the azimuth in degrees, `phi` the elevation in degrees.

use welcome_math::{heading_of, Vec3};

/// Elevation limit in degrees
const PHI_LIMIT: f32 = 85.0;

/// Orbit controls following a target
#[derive(Clone, Debug)]
pub struct ThirdPersonControls {
    /// Added to the target position to get the look-at point
    pub offset: Vec3,
    /// Distance from the look-at point to the camera
    pub target_radius: f32,
    /// Azimuth in degrees
    pub theta: f32,
    /// Elevation in degrees, clamped to ±85
    pub phi: f32,
    /// Horizontal and vertical sensitivity
    pub sensitivity: (f32, f32),
    /// Whether mouse motion steers the camera while the cursor is locked
    pointer_lock: bool,
    pointer_locked: bool,
    target: Vec3,
    pending_x: f32,
    pending_y: f32,
}

impl Default for ThirdPersonControls {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.0, 0.0), 3.0)
    }
}

impl ThirdPersonControls {
    pub fn new(offset: Vec3, target_radius: f32) -> Self {
        Self {
            offset,
            target_radius,
            theta: 0.0,
            phi: 0.0,
            sensitivity: (1.0, 1.0),
            pointer_lock: false,
            pointer_locked: false,
            target: Vec3::ZERO,
            pending_x: 0.0,
            pending_y: 0.0,
        }
    }

    /// Builder: enable pointer-lock mouse look
    pub fn with_pointer_lock(mut self, enabled: bool) -> Self {
        self.pointer_lock = enabled;
        self
    }

    /// Builder: initial azimuth in degrees
    pub fn with_theta(mut self, theta: f32) -> Self {
        self.theta = theta;
        self
    }

    pub fn with_sensitivity(mut self, x: f32, y: f32) -> Self {
        self.sensitivity = (x, y);
        self
    }

    pub fn pointer_lock(&self) -> bool {
        self.pointer_lock
    }

    /// Enable or disable pointer-lock mouse look; disabling also unlocks
    pub fn set_pointer_lock(&mut self, enabled: bool) {
        self.pointer_lock = enabled;
        self.pointer_locked &= enabled;
    }

    /// Tell the controls whether the cursor is currently grabbed
    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked && self.pointer_lock;
    }

    /// Accumulate raw mouse motion; applied on the next [`update`](Self::update)
    pub fn process_mouse_motion(&mut self, dx: f64, dy: f64) {
        if self.pointer_locked {
            self.pending_x += dx as f32;
            self.pending_y += dy as f32;
        }
    }

    /// Follow a new target position
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Orbit by `x` (azimuth) and `y` (elevation) plus any pending mouse motion
    pub fn update(&mut self, x: f32, y: f32) {
        let x = x + self.pending_x;
        let y = y + self.pending_y;
        self.pending_x = 0.0;
        self.pending_y = 0.0;

        self.theta -= x * (self.sensitivity.0 / 2.0);
        self.theta %= 360.0;
        self.phi += y * (self.sensitivity.1 / 2.0);
        self.phi = self.phi.clamp(-PHI_LIMIT, PHI_LIMIT);
    }

    /// Place the camera behind the target so that it looks along `heading`
    pub fn face_heading(&mut self, heading: f32) {
        self.theta = (heading + std::f32::consts::PI).to_degrees() % 360.0;
    }

    /// Point the camera looks at
    pub fn look_at(&self) -> Vec3 {
        self.target + self.offset
    }

    pub fn camera_position(&self) -> Vec3 {
        let (theta, phi) = (self.theta.to_radians(), self.phi.to_radians());
        self.look_at()
            + Vec3::new(
                self.target_radius * theta.sin() * phi.cos(),
                self.target_radius * phi.sin(),
                self.target_radius * theta.cos() * phi.cos(),
            )
    }

    /// Unit world direction the camera looks in
    pub fn camera_direction(&self) -> Vec3 {
        (self.look_at() - self.camera_position()).normalized()
    }

    /// Heading of the camera direction, `atan2(x, z)`
    pub fn heading(&self) -> f32 {
        heading_of(self.camera_direction())
    }
}
