use std::sync::Arc;

use crate::core::{
    Canvas, DrawTarget, PresentError, Presenter, RasterProvider, RowOrder, SurfaceError,
    SurfaceProvider,
};
use crate::gpu::texture_bridge::UPLOAD_FORMAT;
use crate::gpu::{GpuContext, TextureBridge};

/// Rasterizes on the CPU, then hands each frame to the texture bridge
pub struct TexturePresenter {
    provider: RasterProvider,
    canvas: Canvas,
    bridge: TextureBridge,
}

impl TexturePresenter {
    pub fn new(
        context: Arc<GpuContext>,
        target: wgpu::Surface<'static>,
        row_order: RowOrder,
        width: u32,
        height: u32,
    ) -> Result<Self, SurfaceError> {
        let provider = RasterProvider::new(UPLOAD_FORMAT).with_row_order(row_order);
        let canvas = provider.create_surface(width, height)?;
        let bridge = TextureBridge::new(context, target, width, height)?;
        Ok(Self {
            provider,
            canvas,
            bridge,
        })
    }
}

impl Presenter for TexturePresenter {
    fn canvas(&mut self) -> &mut dyn DrawTarget {
        &mut self.canvas
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        self.canvas = self.provider.create_surface(width, height)?;
        self.bridge.resize(width, height)?;
        Ok(())
    }

    fn present(&mut self) -> Result<(), PresentError> {
        let info = self.canvas.info();
        self.bridge.present(&info, self.canvas.pixels(), info.stride())
    }
}
