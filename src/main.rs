//! Welcome - third-person demo scene
//!
//! Loads the book level and the character, then runs the scene until the
//! window closes.

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use welcome_game::config::AppConfig;
use welcome_game::input::{InputAction, InputMapper};
use welcome_game::scene::{SceneController, ViewportRect};
use welcome_game::systems::{RenderError, RenderSystem, SimulationSystem, WindowSystem};

/// Main application state
struct App {
    config: AppConfig,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    scene: SceneController,
    simulation: SimulationSystem,
    /// Where the scene is drawn inside the window
    viewport_rect: ViewportRect,
    /// Last title state, to avoid setting the title every frame
    title_state: Option<(bool, bool)>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let scene = SceneController::new(config.clone());
        let viewport = scene.viewport();
        Self {
            viewport_rect: viewport.fit_within(viewport.width, viewport.height),
            config,
            window: None,
            render: None,
            scene,
            simulation: SimulationSystem::new(),
            title_state: None,
        }
    }

    fn pointer_lock(&self) -> bool {
        !self.config.input.touch
    }

    fn cursor_captured(&self) -> bool {
        self.window.as_ref().is_some_and(|w| w.is_cursor_captured())
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.as_mut() else {
            return;
        };
        match action {
            InputAction::ToggleCursor => {
                if window.is_cursor_captured() {
                    window.release_cursor();
                    self.scene.set_pointer_locked(false);
                } else if window.capture_cursor() {
                    self.scene.set_pointer_locked(true);
                }
            }
            InputAction::Exit => event_loop.exit(),
            InputAction::ToggleFullscreen => window.toggle_fullscreen(),
        }
    }

    fn refresh_title(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let state = (self.scene.is_placeholder_visible(), window.is_cursor_captured());
        if self.title_state != Some(state) {
            window.update_title(state.0, self.pointer_lock());
            self.title_state = Some(state);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let render = match RenderSystem::new(
            window.window().clone(),
            self.config.window.vsync,
            self.config.viewport.background_color,
        ) {
            Ok(render) => render,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        self.scene.init(
            self.config.viewport.width as f32,
            self.config.viewport.height as f32,
            window.scale_factor(),
        );
        self.scene.bind_input(self.config.input.touch);
        if let Err(e) = self.scene.load_assets() {
            log::error!("Could not start loading assets: {}", e);
        }

        let (width, height) = render.size();
        self.viewport_rect = self.scene.resize(width as f32, height as f32);

        self.window = Some(window);
        self.render = Some(render);
        self.refresh_title();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.scene.teardown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render {
                    render.resize(size.width, size.height);
                }
                self.viewport_rect = self.scene.resize(size.width as f32, size.height as f32);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scene.set_scale_factor(scale_factor);
            }

            WindowEvent::Focused(false) => {
                self.scene.input_mut().keys.clear();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) =
                        InputMapper::map_keyboard(key, event.state, self.cursor_captured())
                    {
                        self.handle_action(action, event_loop);
                        return;
                    }
                    self.scene.process_keyboard(key, event.state);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(action) = InputMapper::map_mouse_button(
                    button,
                    state,
                    self.cursor_captured(),
                    self.pointer_lock(),
                ) {
                    self.handle_action(action, event_loop);
                }
            }

            WindowEvent::Touch(touch) => {
                self.scene.touch(
                    touch.id,
                    touch.phase,
                    touch.location.x as f32,
                    touch.location.y as f32,
                );
            }

            WindowEvent::RedrawRequested => {
                self.simulation.update(&mut self.scene);
                self.refresh_title();

                if let Some(render) = &mut self.render {
                    match render.render_frame(self.viewport_rect) {
                        Ok(()) => {}
                        Err(RenderError::SurfaceLost) => render.reconfigure(),
                        Err(RenderError::OutOfMemory) => {
                            log::error!("GPU out of memory");
                            event_loop.exit();
                            return;
                        }
                        Err(e) => log::warn!("{}", e),
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.scene.process_mouse_motion(delta.0, delta.1);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = AppConfig::load();
    let log_level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    log::info!("Starting {}", config.window.title);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
