use super::color::{PixelFormat, RowOrder};

/// Surface geometry and pixel layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    pub format: PixelFormat,
    pub row_order: RowOrder,
}

impl SurfaceInfo {
    /// Create a top-down surface description
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            row_order: RowOrder::TopDown,
        }
    }

    pub fn with_row_order(mut self, row_order: RowOrder) -> Self {
        self.row_order = row_order;
        self
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes in one tightly packed row
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Total size in bytes of the pixel buffer
    pub fn byte_len(&self) -> usize {
        self.stride() * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
