//! Scene controller
//!
//! Owns everything mutable in the welcome scene: the physics world, loaded
//! assets, the player and book, input state, the third-person camera and
//! the one-shot timers. All of it is touched from the loop thread only;
//! asset decoding happens on workers and arrives through [`frame`].
//!
//! [`frame`]: SceneController::frame

use std::f32::consts::PI;
use std::path::Path;
use std::time::Duration;

use winit::event::{ElementState, TouchPhase};
use winit::keyboard::KeyCode;

use welcome_core::{
    AnimationState, AssetCache, AssetError, AssetEvent, AssetHandle, AssetKey, AssetLoader,
    BookEntity, ModelAsset, PlayerEntity, Timers,
};
use welcome_input::{Button, JoystickEvent, KeyState, Keys, ThirdPersonControls, VirtualJoystick};
use welcome_math::{heading_of, Vec3};
use welcome_physics::{Aabb, CollisionFilter, PhysicsWorld, RigidBody};

use crate::config::AppConfig;
use super::viewport::{Viewport, ViewportRect};

/// Player debug log interval in seconds
const PLAYER_LOG_INTERVAL: f32 = 1.0;

/// Input read every tick
#[derive(Clone, Debug, Default)]
pub struct InputState {
    pub keys: KeyState,
    /// Joystick axis deflection, positive up
    pub joystick_top: f32,
    /// Joystick axis deflection, positive right
    pub joystick_right: f32,
    /// Joystick B held
    pub move_held: bool,
}

/// Deferred scene events
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SceneEvent {
    JumpCooldownEnded,
    HidePlaceholder,
}

/// Yaw velocity that turns a body at `theta_player` toward `theta_cam`
///
/// Both headings are `atan2(x, z)` angles. Differences within `dead_zone`
/// give zero; near a half turn the direction flips so the body takes the
/// short way around the ±π seam.
pub fn turn_velocity(theta_cam: f32, theta_player: f32, speed: f32, dead_zone: f32) -> f32 {
    let l = (theta_cam - theta_player).abs();
    if l <= dead_zone {
        return 0.0;
    }
    let mut speed = speed;
    if l > PI - dead_zone {
        speed = -speed;
    }
    if theta_cam < theta_player {
        speed = -speed;
    }
    speed
}

/// The welcome scene
pub struct SceneController {
    config: AppConfig,
    viewport: Viewport,
    /// Window size in logical pixels; joystick styles are laid out in these
    window_size: (f32, f32),
    /// Physical pixels per logical pixel
    scale_factor: f64,
    pixel_ratio: f64,
    physics: PhysicsWorld,
    assets: AssetCache,
    loader: AssetLoader<ModelAsset>,
    timers: Timers<SceneEvent>,
    input: InputState,
    touch_device: bool,
    /// Cursor captured by the window; outlives the camera controls
    pointer_locked: bool,
    joystick: Option<VirtualJoystick>,
    controls: Option<ThirdPersonControls>,
    player: Option<PlayerEntity>,
    book: Option<BookEntity>,
    can_jump: bool,
    placeholder_visible: bool,
    player_log_timer: f32,
}

impl SceneController {
    /// Create the scene and start the loading placeholder timer
    pub fn new(config: AppConfig) -> Self {
        let viewport = Viewport::new(config.viewport.width as f32, config.viewport.height as f32);
        let physics = PhysicsWorld::with_config(config.physics.to_physics_config());

        let mut timers = Timers::new();
        timers.schedule(
            Duration::from_millis(config.assets.placeholder_delay_ms),
            SceneEvent::HidePlaceholder,
        );

        Self {
            window_size: (viewport.width, viewport.height),
            viewport,
            scale_factor: 1.0,
            pixel_ratio: 1.0,
            physics,
            assets: AssetCache::new(),
            loader: AssetLoader::new(),
            timers,
            input: InputState::default(),
            touch_device: false,
            pointer_locked: false,
            joystick: None,
            controls: None,
            player: None,
            book: None,
            can_jump: true,
            placeholder_visible: true,
            player_log_timer: 0.0,
            config,
        }
    }

    /// Configure physics stepping and output size
    ///
    /// `width` and `height` are logical; `device_pixel_ratio` is the window
    /// scale factor.
    pub fn init(&mut self, width: f32, height: f32, device_pixel_ratio: f64) {
        self.physics.configure(self.config.physics.to_physics_config());
        self.viewport = Viewport::new(width, height);
        self.window_size = (width, height);
        self.scale_factor = device_pixel_ratio.max(f64::EPSILON);
        self.pixel_ratio = Viewport::pixel_ratio(device_pixel_ratio);
        log::info!(
            "Scene initialized at {}x{} (aspect {:.3}, pixel ratio {})",
            width,
            height,
            self.viewport.aspect(),
            self.pixel_ratio
        );
    }

    /// Start loading the book and character in the background
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] if a loader thread cannot be started.
    pub fn load_assets(&mut self) -> Result<(), AssetError> {
        self.loader.request(AssetKey::Book, &self.config.assets.book)?;
        self.loader.request(AssetKey::Character, &self.config.assets.character)?;
        Ok(())
    }

    /// Register the movement keys, plus the on-screen joystick on touch devices
    pub fn bind_input(&mut self, is_touch_device: bool) {
        self.input.keys = KeyState::with_default_bindings();
        self.touch_device = is_touch_device;

        if is_touch_device {
            let (w, h) = self.window_size;
            let mut joystick = VirtualJoystick::new(w, h);
            joystick.add_axis(self.config.input.axis);
            joystick.add_button(Button::A, self.config.input.button_a);
            joystick.add_button(Button::B, self.config.input.button_b);
            self.joystick = Some(joystick);
        } else {
            self.joystick = None;
        }

        if let Some(controls) = self.controls.as_mut() {
            controls.set_pointer_lock(!is_touch_device);
        }

        log::info!(
            "Input bound ({} keys, joystick {})",
            self.input.keys.binding_count(),
            if is_touch_device { "on" } else { "off" }
        );
    }

    /// Feed a key event; returns true if the key is bound
    pub fn process_keyboard(&mut self, code: KeyCode, state: ElementState) -> bool {
        self.input.keys.process_keyboard(code, state)
    }

    /// Feed a touch event to the joystick, if there is one
    ///
    /// `x` and `y` are physical pixels, as the window reports them.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32) {
        let Some(joystick) = self.joystick.as_mut() else {
            return;
        };
        let scale = self.scale_factor as f32;
        for event in joystick.touch(id, phase, x / scale, y / scale) {
            self.handle_joystick_event(event);
        }
    }

    /// Apply one joystick event to the input state
    pub fn handle_joystick_event(&mut self, event: JoystickEvent) {
        match event {
            JoystickEvent::AxisMove { top, right } => {
                self.input.joystick_top = top;
                self.input.joystick_right = right;
            }
            JoystickEvent::Click(Button::A) => self.jump(),
            JoystickEvent::Click(Button::B) => self.input.move_held = true,
            JoystickEvent::Release(Button::B) => self.input.move_held = false,
            JoystickEvent::Release(Button::A) => {}
        }
    }

    /// Raw mouse motion for pointer-lock camera control
    pub fn process_mouse_motion(&mut self, dx: f64, dy: f64) {
        if let Some(controls) = self.controls.as_mut() {
            controls.process_mouse_motion(dx, dy);
        }
    }

    /// Tell the camera whether the cursor is currently captured
    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
        if let Some(controls) = self.controls.as_mut() {
            controls.set_pointer_locked(locked);
        }
    }

    /// Window scale factor changed; a resize follows
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor.max(f64::EPSILON);
    }

    /// Window resized to a physical size; returns where the scene should be
    /// drawn, in physical pixels
    pub fn resize(&mut self, window_width: f32, window_height: f32) -> ViewportRect {
        let scale = self.scale_factor as f32;
        self.window_size = (window_width / scale, window_height / scale);
        if let Some(joystick) = self.joystick.as_mut() {
            joystick.resize(self.window_size.0, self.window_size.1);
        }
        self.viewport.fit_within(window_width, window_height)
    }

    /// Jump if the player exists and the cooldown has passed
    pub fn jump(&mut self) {
        if !self.can_jump {
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };

        self.can_jump = false;
        player.set_action(AnimationState::JumpRunning);
        self.timers.schedule(
            Duration::from_millis(self.config.player.jump_cooldown_ms),
            SceneEvent::JumpCooldownEnded,
        );
        if let Some(body) = player.body.and_then(|key| self.physics.get_body_mut(key)) {
            body.apply_impulse_y(self.config.player.jump_impulse);
        }
        log::debug!("Jump");
    }

    /// Steer the player from input and the camera heading
    ///
    /// Does nothing until the character has been attached.
    pub fn update(&mut self, _delta: f32) {
        let Some(body_key) = self.player.as_ref().and_then(|p| p.body) else {
            return;
        };
        let Some(controls) = self.controls.as_mut() else {
            return;
        };
        if self.physics.get_body(body_key).is_none() {
            return;
        }

        let look = self.config.camera.joystick_look_scale;
        controls.update(self.input.joystick_right * look, -self.input.joystick_top * look);
        let theta = controls.heading();

        let Some(body) = self.physics.get_body_mut(body_key) else {
            return;
        };
        let theta_player = heading_of(body.forward());
        let player_cfg = &self.config.player;
        body.set_angular_velocity_y(turn_velocity(
            theta,
            theta_player,
            player_cfg.turn_speed,
            player_cfg.turn_dead_zone,
        ));

        let moving = self.input.keys.is_down(Keys::FORWARD) || self.input.move_held;
        if moving {
            let vy = body.velocity.y;
            let speed = player_cfg.run_speed;
            body.set_velocity(Vec3::new(theta.sin() * speed, vy, theta.cos() * speed));
        }

        if let Some(player) = self.player.as_mut() {
            let current = player.current_animation();
            if moving {
                if current == Some(AnimationState::Idle) && self.can_jump {
                    player.set_action(AnimationState::Run);
                }
            } else if current == Some(AnimationState::Run) && self.can_jump {
                player.set_action(AnimationState::Idle);
            }
        }

        if self.input.keys.is_down(Keys::JUMP) && self.can_jump {
            self.jump();
        }
    }

    /// Run one loop iteration
    ///
    /// Attaches finished assets, fires due timers, steers the player, steps
    /// physics, advances animations and moves the camera with the player.
    pub fn frame(&mut self, delta: Duration) {
        for event in self.loader.poll() {
            self.on_asset_ready(event);
        }
        for event in self.timers.advance(delta) {
            self.on_timer(event);
        }

        let dt = delta.as_secs_f32();
        self.update(dt);
        self.physics.step(dt);

        if let Some(player) = self.player.as_mut() {
            player.mixer.update(dt);
        }
        if let Some(book) = self.book.as_mut() {
            book.mixer.update(dt);
        }

        let position = self.player_body().map(|b| b.position);
        if let (Some(controls), Some(position)) = (self.controls.as_mut(), position) {
            controls.set_target(position);
        }

        if self.config.debug.log_player {
            self.player_log_timer += dt;
            if self.player_log_timer >= PLAYER_LOG_INTERVAL {
                self.player_log_timer = 0.0;
                if let Some(body) = self.player_body() {
                    log::debug!(
                        "Player at ({:.2}, {:.2}, {:.2}) grounded={}",
                        body.position.x,
                        body.position.y,
                        body.position.z,
                        body.grounded
                    );
                }
            }
        }
    }

    fn on_timer(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::JumpCooldownEnded => {
                self.can_jump = true;
                if let Some(player) = self.player.as_mut() {
                    player.set_action(AnimationState::Idle);
                }
            }
            SceneEvent::HidePlaceholder => {
                self.placeholder_visible = false;
                log::info!("Loading placeholder hidden");
            }
        }
    }

    /// Handle a finished background load
    pub fn on_asset_ready(&mut self, event: AssetEvent<ModelAsset>) {
        let AssetEvent { key, path, result } = event;
        let model = match result {
            Ok(model) => model,
            Err(e) => {
                log::error!("Failed to load {} from {}: {}", key, path.display(), e);
                return;
            }
        };

        let attached = match key {
            AssetKey::Book => self.book.is_some(),
            AssetKey::Character => self.player.is_some(),
        };
        if attached {
            log::warn!("{} already attached, ignoring {}", key, path.display());
            return;
        }

        let handle = self.assets.insert(&path, model);
        self.assets.alias(key.as_str(), &handle);
        match key {
            AssetKey::Book => self.attach_book(&handle),
            AssetKey::Character => self.attach_character(&handle),
        }
        log::debug!("{} ready, {} loads pending", key, self.loader.in_flight());
    }

    /// Decode and attach a model synchronously (no worker thread)
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] if the file cannot be loaded.
    pub fn load_now(&mut self, key: AssetKey, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let result = self.assets.load::<ModelAsset>(path.as_ref()).and_then(|handle| {
            self.assets
                .get::<ModelAsset>(&handle)
                .map(|model| (*model).clone())
                .ok_or_else(|| AssetError::NotFound(key.to_string()))
        });
        let path = path.as_ref().to_path_buf();
        let model = result?;
        self.on_asset_ready(AssetEvent {
            key,
            path,
            result: Ok(model),
        });
        Ok(())
    }

    /// Build the book from a cached model: one static body per collider mesh
    pub fn attach_book(&mut self, handle: &AssetHandle) {
        let Some(model) = self.assets.get::<ModelAsset>(handle) else {
            log::warn!("Book model missing from cache");
            return;
        };
        let assets = &self.config.assets;
        let offset = Vec3::from_array(assets.book_offset);
        let fallback = Aabb::new(
            Vec3::from_array(assets.book_fallback_bounds[0]),
            Vec3::from_array(assets.book_fallback_bounds[1]),
        );

        let mut book = BookEntity::new(handle.clone(), &model);
        for mesh in model.meshes.iter().filter(|m| m.name_contains(&assets.book_mesh_filter)) {
            let bounds = mesh.bounds.unwrap_or(fallback);
            let body = RigidBody::new_static_aabb(bounds.translated(offset));
            book.bodies.push(self.physics.add_body(body));
        }
        if book.bodies.is_empty() {
            log::warn!(
                "Book has no meshes matching '{}'; nothing to stand on",
                assets.book_mesh_filter
            );
        }

        log::info!(
            "Book attached ({} colliders, {} clips)",
            book.bodies.len(),
            book.mixer.clip_count()
        );
        self.book = Some(book);
    }

    /// Build the player from a cached model and put the camera behind it
    pub fn attach_character(&mut self, handle: &AssetHandle) {
        let Some(model) = self.assets.get::<ModelAsset>(handle) else {
            log::warn!("Character model missing from cache");
            return;
        };
        let cfg = &self.config.player;

        let body = RigidBody::new_sphere(Vec3::from_array(cfg.spawn), cfg.radius)
            .with_mass(cfg.mass)
            .with_friction(cfg.friction)
            .with_yaw(cfg.yaw)
            .with_angular_factor(Vec3::ZERO)
            .with_filter(CollisionFilter::player())
            .with_ccd(cfg.ccd_motion_threshold, cfg.ccd_swept_sphere_radius);
        let position = body.position;
        let key = self.physics.add_body(body);

        let mut player = PlayerEntity::new(handle.clone(), &model).with_body(key);
        player.set_action(AnimationState::Idle);

        let camera = &self.config.camera;
        let mut controls = ThirdPersonControls::new(Vec3::from_array(camera.offset), camera.target_radius)
            .with_pointer_lock(!self.touch_device)
            .with_theta(camera.theta)
            .with_sensitivity(camera.sensitivity[0], camera.sensitivity[1]);
        controls.set_pointer_locked(self.pointer_locked);
        controls.set_target(position);

        log::info!(
            "Character attached at ({:.1}, {:.1}, {:.1}) with {} clips",
            position.x,
            position.y,
            position.z,
            player.mixer.clip_count()
        );
        self.player = Some(player);
        self.controls = Some(controls);
    }

    /// Remove the player and book
    ///
    /// Pending timers stay queued; a cooldown that fires afterwards only
    /// restores `can_jump`.
    pub fn teardown(&mut self) {
        if let Some(body) = self.player.take().and_then(|p| p.body) {
            self.physics.remove_body(body);
        }
        if let Some(book) = self.book.take() {
            for body in book.bodies {
                self.physics.remove_body(body);
            }
        }
        self.controls = None;
        self.input.move_held = false;
        log::info!("Scene torn down");
    }

    /// The player, once the character has been attached
    pub fn player(&self) -> Option<&PlayerEntity> {
        self.player.as_ref()
    }

    /// The book, once attached
    pub fn book(&self) -> Option<&BookEntity> {
        self.book.as_ref()
    }

    /// The player's physics body
    pub fn player_body(&self) -> Option<&RigidBody> {
        self.player
            .as_ref()
            .and_then(|p| p.body)
            .and_then(|key| self.physics.get_body(key))
    }

    /// Mutable access to the player's physics body
    pub fn player_body_mut(&mut self) -> Option<&mut RigidBody> {
        let key = self.player.as_ref().and_then(|p| p.body)?;
        self.physics.get_body_mut(key)
    }

    /// False while the jump cooldown runs
    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    /// The physics world
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Third-person camera controls, present while a player exists
    pub fn controls(&self) -> Option<&ThirdPersonControls> {
        self.controls.as_ref()
    }

    /// Mutable access to the camera controls
    pub fn controls_mut(&mut self) -> Option<&mut ThirdPersonControls> {
        self.controls.as_mut()
    }

    /// Input read every tick
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Mutable access to the input state
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// On-screen joystick, bound on touch devices only
    pub fn joystick(&self) -> Option<&VirtualJoystick> {
        self.joystick.as_ref()
    }

    /// Cache of loaded models
    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    /// Logical scene size
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Render pixel ratio derived from the device ratio
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Whether the loading placeholder is still shown
    pub fn is_placeholder_visible(&self) -> bool {
        self.placeholder_visible
    }
}
