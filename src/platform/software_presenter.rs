use std::num::NonZeroU32;
use std::sync::Arc;

use winit::window::Window;

use crate::core::{
    copy_rows, Canvas, CopyOutcome, DrawTarget, PixelFormat, PresentError, Presenter,
    RasterProvider, RowLayout, RowOrder, SurfaceError, SurfaceProvider,
};

/// softbuffer wants 0RGB in native-endian u32s, which is BGRA bytes on
/// little-endian hosts
const SOFTWARE_FORMAT: PixelFormat = PixelFormat::Bgra8Premul;

/// Rasterizes on the CPU and copies rows into a softbuffer window buffer
pub struct SoftwarePresenter {
    provider: RasterProvider,
    canvas: Canvas,
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
    window: Arc<Window>,
    warned_skip: bool,
    // Keeps the display connection open for `surface`
    _context: softbuffer::Context<Arc<Window>>,
}

impl SoftwarePresenter {
    pub fn new(
        window: Arc<Window>,
        row_order: RowOrder,
        width: u32,
        height: u32,
    ) -> Result<Self, SurfaceError> {
        let provider = RasterProvider::new(SOFTWARE_FORMAT).with_row_order(row_order);
        let canvas = provider.create_surface(width, height)?;

        let context = softbuffer::Context::new(window.clone()).map_err(backend_error)?;
        let mut surface =
            softbuffer::Surface::new(&context, window.clone()).map_err(backend_error)?;
        resize_buffer(&mut surface, width, height)?;

        Ok(Self {
            provider,
            canvas,
            surface,
            window,
            warned_skip: false,
            _context: context,
        })
    }
}

impl Presenter for SoftwarePresenter {
    fn canvas(&mut self) -> &mut dyn DrawTarget {
        &mut self.canvas
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        self.canvas = self.provider.create_surface(width, height)?;
        resize_buffer(&mut self.surface, width, height)?;
        Ok(())
    }

    fn present(&mut self) -> Result<(), PresentError> {
        let info = self.canvas.info();
        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|err| PresentError::Skipped(err.to_string()))?;

        let dst_stride = info.width as usize * 4;
        let outcome = copy_rows(
            self.canvas.pixels(),
            RowLayout::new(info.stride(), info.format.bytes_per_pixel()),
            bytemuck::cast_slice_mut(&mut buffer[..]),
            RowLayout::new(dst_stride, 4),
            info.height as usize,
            info.row_order.needs_flip(RowOrder::TopDown),
        );

        if let CopyOutcome::Skipped(reason) = outcome {
            if !self.warned_skip {
                log::warn!("window buffer not updated: {:?}", reason);
                self.warned_skip = true;
            }
        }

        // The window system reads the top byte as alpha on some platforms
        for px in buffer.iter_mut() {
            *px &= 0x00FF_FFFF;
        }

        self.window.pre_present_notify();
        buffer
            .present()
            .map_err(|err| PresentError::Skipped(err.to_string()))
    }
}

fn resize_buffer(
    surface: &mut softbuffer::Surface<Arc<Window>, Arc<Window>>,
    width: u32,
    height: u32,
) -> Result<(), SurfaceError> {
    let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
        return Err(SurfaceError::ZeroSize { width, height });
    };
    surface.resize(w, h).map_err(backend_error)
}

fn backend_error(err: softbuffer::SoftBufferError) -> SurfaceError {
    SurfaceError::Backend(err.to_string())
}
