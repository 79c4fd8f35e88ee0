//! Window management system
//!
//! Handles window creation, cursor capture/release, fullscreen toggle, and title updates.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{CursorGrabMode, Fullscreen, Window},
};
use crate::config::WindowConfig;

/// Manages the application window and cursor state
pub struct WindowSystem {
    window: Arc<Window>,
    cursor_captured: bool,
    base_title: String,
    loading_suffix: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(format!("{}{}", config.title, config.loading_suffix))
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            cursor_captured: false,
            base_title: config.title.clone(),
            loading_suffix: config.loading_suffix.clone(),
        })
    }

    /// Get window reference (for RenderSystem creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn is_cursor_captured(&self) -> bool {
        self.cursor_captured
    }

    /// Capture cursor for mouse-look camera control
    pub fn capture_cursor(&mut self) -> bool {
        let grab_result = self.window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));

        if grab_result.is_ok() {
            self.window.set_cursor_visible(false);
            self.cursor_captured = true;
            log::info!("Cursor captured - Escape to release");
            true
        } else {
            log::warn!("Failed to capture cursor");
            false
        }
    }

    /// Release cursor
    pub fn release_cursor(&mut self) {
        let _ = self.window.set_cursor_grab(CursorGrabMode::None);
        self.window.set_cursor_visible(true);
        self.cursor_captured = false;
        log::info!("Cursor released - click to capture");
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Refresh the title from loading and cursor state
    pub fn update_title(&self, loading: bool, pointer_lock: bool) {
        let title = format_title(
            &self.base_title,
            &self.loading_suffix,
            loading,
            pointer_lock.then_some(self.cursor_captured),
        );
        self.window.set_title(&title);
    }

    /// Logical-to-physical scale of the window's monitor
    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

/// Window title text
///
/// `captured` is `None` when the cursor cannot be captured at all (touch).
pub fn format_title(base: &str, loading_suffix: &str, loading: bool, captured: Option<bool>) -> String {
    let mut title = base.to_string();
    if loading {
        title.push_str(loading_suffix);
    }
    match captured {
        Some(true) => title.push_str(" [Esc to release]"),
        Some(false) => title.push_str(" [Click to capture]"),
        None => {}
    }
    title
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_while_loading() {
        let title = format_title("Welcome", " - loading...", true, Some(false));
        assert_eq!(title, "Welcome - loading... [Click to capture]");
    }

    #[test]
    fn test_title_captured() {
        let title = format_title("Welcome", " - loading...", false, Some(true));
        assert_eq!(title, "Welcome [Esc to release]");
    }

    #[test]
    fn test_title_touch_has_no_hint() {
        assert_eq!(format_title("Welcome", "!", false, None), "Welcome");
    }

    #[test]
    fn test_error_display() {
        let err = WindowError::CreationFailed("no display".to_string());
        assert_eq!(err.to_string(), "Window creation failed: no display");
    }
}
