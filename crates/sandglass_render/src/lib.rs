//! Sandglass Render
//!
//! Turns a read-only simulation snapshot into a [`Scene`] and draws it with
//! wgpu. Scene building never needs a device.

pub mod effects;
pub mod error;
pub mod gpu;
pub mod palette;
pub mod scene;
pub mod tessellate;
pub mod window;

pub use wgpu;
pub use winit;

pub use effects::Effects;
pub use error::RenderError;
pub use gpu::Renderer;
pub use palette::{Color, Palette};
pub use scene::{DrawCommand, RenderState, Scene};
pub use window::{window_attributes, WindowConfig};
