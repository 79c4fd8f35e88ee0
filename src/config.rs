//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`WG_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use welcome_input::{ButtonStyles, AXIS_STYLES, BUTTON_A_STYLES, BUTTON_B_STYLES};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    /// Logical scene size and clear color
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Player body and locomotion tuning
    #[serde(default)]
    pub player: PlayerConfig,
    /// Third-person camera
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub input: InputConfig,
    /// Model paths and book collider placement
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`WG_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // WG_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("WG_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in logical pixels
    pub width: u32,
    /// Initial inner height in logical pixels
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
    /// Appended to the title until the loading placeholder is hidden
    pub loading_suffix: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Welcome".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
            vsync: true,
            loading_suffix: " - loading...".to_string(),
        }
    }
}

/// Logical scene size; resizing keeps this aspect ratio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
    /// Clear color [r, g, b, a]
    pub background_color: [f32; 4],
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background_color: [0.53, 0.81, 0.92, 1.0],
        }
    }
}

/// Physics stepping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity along Y (negative = downward)
    pub gravity: f32,
    pub max_sub_steps: u32,
    /// Fixed step length in seconds
    pub fixed_time_step: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            max_sub_steps: 10,
            fixed_time_step: 1.0 / 120.0,
        }
    }
}

impl PhysicsConfig {
    /// Convert to the physics crate's config
    pub fn to_physics_config(&self) -> welcome_physics::PhysicsConfig {
        welcome_physics::PhysicsConfig::new(self.gravity, self.max_sub_steps, self.fixed_time_step)
    }
}

/// Player body and locomotion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Spawn position [x, y, z]
    pub spawn: [f32; 3],
    /// Initial yaw in radians
    pub yaw: f32,
    pub radius: f32,
    pub mass: f32,
    pub friction: f32,
    /// Horizontal speed while moving (units per second)
    pub run_speed: f32,
    /// Yaw speed while turning (radians per second)
    pub turn_speed: f32,
    /// No turn is commanded below this heading difference (radians)
    pub turn_dead_zone: f32,
    pub jump_impulse: f32,
    /// Time after a jump before the next one is allowed
    pub jump_cooldown_ms: u64,
    pub ccd_motion_threshold: f32,
    pub ccd_swept_sphere_radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: [35.0, -3.5, 0.0],
            yaw: std::f32::consts::PI * 1.5,
            radius: 0.25,
            mass: 1.0,
            friction: 0.8,
            run_speed: 4.0,
            turn_speed: 8.0,
            turn_dead_zone: std::f32::consts::PI / 24.0,
            jump_impulse: 6.0,
            jump_cooldown_ms: 750,
            ccd_motion_threshold: 1e-7,
            ccd_swept_sphere_radius: 0.25,
        }
    }
}

/// Third-person camera
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Look-at offset from the player [x, y, z]
    pub offset: [f32; 3],
    pub target_radius: f32,
    /// Initial azimuth in degrees
    pub theta: f32,
    /// Mouse sensitivity [x, y]
    pub sensitivity: [f32; 2],
    /// Joystick deflection is multiplied by this before orbiting
    pub joystick_look_scale: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, 1.0, 0.0],
            target_radius: 3.0,
            theta: 90.0,
            sensitivity: [1.0, 1.0],
            joystick_look_scale: 3.0,
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Show the on-screen joystick and disable pointer lock
    pub touch: bool,
    pub axis: ButtonStyles,
    pub button_a: ButtonStyles,
    pub button_b: ButtonStyles,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            touch: false,
            axis: AXIS_STYLES,
            button_a: BUTTON_A_STYLES,
            button_b: BUTTON_B_STYLES,
        }
    }
}

/// Asset locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub book: String,
    pub character: String,
    /// Meshes of the book whose name contains this get a collider
    pub book_mesh_filter: String,
    /// Translation applied to book colliders [x, y, z]
    pub book_offset: [f32; 3],
    /// Collider box [min, max] for book meshes without bounds
    pub book_fallback_bounds: [[f32; 3]; 2],
    /// Delay before the loading placeholder is hidden
    pub placeholder_delay_ms: u64,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            book: "assets/glb/book.glb".to_string(),
            character: "assets/glb/box_man.glb".to_string(),
            book_mesh_filter: "mesh".to_string(),
            book_offset: [-18.8, 4.35, -15.55],
            book_fallback_bounds: [[-20.0, -0.5, -20.0], [20.0, 0.0, 20.0]],
            placeholder_delay_ms: 500,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter used when RUST_LOG is unset (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log the player position once per second
    pub log_player: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_player: false,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
