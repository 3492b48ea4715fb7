//! Window setup
//!
//! Windows are created inside `ApplicationHandler::resumed` (winit 0.30+), so
//! this module only describes them.

use winit::window::Window;

/// Smallest drawable area that still yields a usable hourglass.
pub const MIN_WINDOW_SIZE: (u32, u32) = (160, 240);

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sandglass".to_string(),
            width: 480,
            height: 720,
        }
    }
}

/// Create window attributes from config
pub fn window_attributes(config: &WindowConfig) -> winit::window::WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.width.max(MIN_WINDOW_SIZE.0),
            config.height.max(MIN_WINDOW_SIZE.1),
        ))
        .with_min_inner_size(winit::dpi::LogicalSize::new(
            MIN_WINDOW_SIZE.0,
            MIN_WINDOW_SIZE.1,
        ))
}
