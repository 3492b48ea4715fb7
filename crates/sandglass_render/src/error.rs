use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create drawing surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no graphics adapter compatible with the window surface")]
    NoAdapter,

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,

    #[error("failed to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface frame unavailable: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

impl RenderError {
    /// Errors cured by reconfiguring the surface at its current size.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)
        )
    }

    /// Errors after which rendering cannot continue.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            RenderError::Surface(
                wgpu::SurfaceError::Lost
                    | wgpu::SurfaceError::Outdated
                    | wgpu::SurfaceError::Timeout
            )
        )
    }
}
