//! GPU rendering system
//!
//! Owns the wgpu surface and device. Each frame clears the window and sets
//! the viewport to the aspect-preserving rectangle the scene occupies; mesh
//! drawing is left to a later pipeline.

use std::sync::Arc;
use winit::window::Window;

use crate::scene::ViewportRect;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// No adapter or device matched the surface
    NoAdapter,
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::NoAdapter => write!(f, "No suitable GPU adapter"),
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Surface, device and queue for one window
struct RenderContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::Other(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .map_err(|e| RenderError::Other(e.to_string()))?;

        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(RenderError::NoAdapter)?;
        config.present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &config);

        log::info!(
            "Render surface {}x{} ({:?}, {:?})",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    background_color: [f32; 4],
}

impl RenderSystem {
    /// Create render system for a window
    pub fn new(window: Arc<Window>, vsync: bool, background_color: [f32; 4]) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::new(window, vsync))?;
        Ok(Self {
            context,
            background_color,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
    }

    /// Reconfigure the surface at its current size (after `SurfaceLost`)
    pub fn reconfigure(&mut self) {
        let (width, height) = self.size();
        self.context.resize(width, height);
    }

    /// Render a single frame into `rect`
    pub fn render_frame(&mut self, rect: ViewportRect) -> Result<(), RenderError> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                return Err(RenderError::SurfaceLost)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let bg = &self.background_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg[0] as f64,
                            g: bg[1] as f64,
                            b: bg[2] as f64,
                            a: bg[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            let (x, y, w, h) = clamp_rect(rect, self.size());
            pass.set_viewport(x, y, w, h, 0.0, 1.0);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.config.width, self.context.config.height)
    }
}

/// Keep the viewport inside the surface; wgpu rejects anything outside it
fn clamp_rect(rect: ViewportRect, surface: (u32, u32)) -> (f32, f32, f32, f32) {
    let (sw, sh) = (surface.0 as f32, surface.1 as f32);
    let x = rect.x.clamp(0.0, sw);
    let y = rect.y.clamp(0.0, sh);
    let w = rect.width.min(sw - x).max(1.0);
    let h = rect.height.min(sh - y).max(1.0);
    (x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_display() {
        assert_eq!(format!("{}", RenderError::SurfaceLost), "Surface lost");
        assert_eq!(format!("{}", RenderError::OutOfMemory), "Out of memory");
        assert_eq!(
            format!("{}", RenderError::Other("test".to_string())),
            "Render error: test"
        );
    }

    #[test]
    fn test_clamp_rect() {
        let rect = ViewportRect { x: 400.0, y: 0.0, width: 800.0, height: 600.0 };
        assert_eq!(clamp_rect(rect, (1600, 600)), (400.0, 0.0, 800.0, 600.0));

        let rect = ViewportRect { x: -5.0, y: 0.0, width: 900.0, height: 700.0 };
        assert_eq!(clamp_rect(rect, (800, 600)), (0.0, 0.0, 800.0, 600.0));
    }
}
