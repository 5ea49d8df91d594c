use std::sync::Arc;

use crate::core::{DrawTarget, PresentError, Presenter, SurfaceError, SurfaceProvider};
use crate::gpu::{GpuContext, GpuProvider, GpuSurface};

/// Draws straight into the swapchain; no bridge step
pub struct GpuPresenter {
    provider: GpuProvider,
    surface: GpuSurface,
}

impl GpuPresenter {
    pub fn new(
        context: Arc<GpuContext>,
        target: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<Self, SurfaceError> {
        let provider = GpuProvider::new(context, target)?;
        let surface = provider.create_surface(width, height)?;
        Ok(Self { provider, surface })
    }
}

impl Presenter for GpuPresenter {
    fn canvas(&mut self) -> &mut dyn DrawTarget {
        &mut self.surface
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        self.surface = self.provider.create_surface(width, height)?;
        Ok(())
    }

    fn present(&mut self) -> Result<(), PresentError> {
        self.surface.flush()
    }
}
