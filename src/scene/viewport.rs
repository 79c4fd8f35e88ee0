//! Logical viewport and aspect-preserving resize

use serde::{Deserialize, Serialize};

/// Rectangle inside the window the scene is drawn to, in physical pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Logical scene size
///
/// Everything that scales with the window keeps `width / height` fixed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Height that keeps the aspect ratio at `new_width`
    pub fn fit_height(&self, new_width: f32) -> f32 {
        self.height / self.width * new_width
    }

    /// Largest centered rectangle with this aspect that fits the window
    pub fn fit_within(&self, window_width: f32, window_height: f32) -> ViewportRect {
        let mut width = window_width;
        let mut height = self.fit_height(window_width);
        if height > window_height {
            height = window_height;
            width = window_height * self.aspect();
        }
        ViewportRect {
            x: (window_width - width) * 0.5,
            y: (window_height - height) * 0.5,
            width,
            height,
        }
    }

    /// Render resolution multiplier for a display's device pixel ratio
    ///
    /// High-density displays render at half their native density.
    pub fn pixel_ratio(device_pixel_ratio: f64) -> f64 {
        (device_pixel_ratio / 2.0).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect() {
        assert!((Viewport::new(800.0, 600.0).aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_height_doubles() {
        assert_eq!(Viewport::new(800.0, 600.0).fit_height(1600.0), 1200.0);
    }

    #[test]
    fn test_fit_within_wide_window_letterboxes_sides() {
        let rect = Viewport::new(800.0, 600.0).fit_within(1600.0, 600.0);
        assert_eq!(rect.height, 600.0);
        assert_eq!(rect.width, 800.0);
        assert_eq!(rect.x, 400.0);
        assert_eq!(rect.y, 0.0);
    }

    #[test]
    fn test_fit_within_tall_window_letterboxes_top() {
        let rect = Viewport::new(800.0, 600.0).fit_within(800.0, 1000.0);
        assert_eq!(rect.width, 800.0);
        assert_eq!(rect.height, 600.0);
        assert_eq!(rect.y, 200.0);
    }

    #[test]
    fn test_pixel_ratio() {
        assert_eq!(Viewport::pixel_ratio(1.0), 1.0);
        assert_eq!(Viewport::pixel_ratio(1.5), 1.0);
        assert_eq!(Viewport::pixel_ratio(3.0), 1.5);
    }
}
