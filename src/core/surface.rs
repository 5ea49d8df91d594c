use std::fmt;

use super::canvas::{Canvas, DrawTarget};
use super::color::{PixelFormat, RowOrder};
use super::surface_info::SurfaceInfo;

/// Where a surface's pixels live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageLocation {
    /// Host memory, readable through `Surface::pixels`
    Cpu,
    /// A GPU render target, not readable from the host
    Gpu,
}

/// A drawable pixel buffer
pub trait Surface: DrawTarget {
    fn info(&self) -> SurfaceInfo;

    fn storage(&self) -> StorageLocation;

    /// Raw pixel bytes for CPU surfaces, `None` for GPU surfaces
    fn pixels(&self) -> Option<&[u8]>;
}

/// Surface creation failure. Always fatal at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    ZeroSize { width: u32, height: u32 },
    FormatMismatch { expected: PixelFormat, found: PixelFormat },
    Unsupported(String),
    Backend(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::ZeroSize { width, height } => {
                write!(f, "surface dimensions must be non-zero, got {}x{}", width, height)
            }
            SurfaceError::FormatMismatch { expected, found } => {
                write!(
                    f,
                    "pixel format mismatch: consumer expects {:?}, surface is {:?}",
                    expected, found
                )
            }
            SurfaceError::Unsupported(what) => write!(f, "unsupported surface: {}", what),
            SurfaceError::Backend(msg) => write!(f, "graphics backend error: {}", msg),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Capability: create a display surface.
///
/// Resizing is done by asking the provider for a fresh surface.
pub trait SurfaceProvider {
    type Surface: Surface;

    fn storage(&self) -> StorageLocation;

    fn create_surface(&self, width: u32, height: u32) -> Result<Self::Surface, SurfaceError>;
}

/// Allocates CPU canvases in a fixed format and row order
#[derive(Debug, Clone, Copy)]
pub struct RasterProvider {
    format: PixelFormat,
    row_order: RowOrder,
}

impl RasterProvider {
    pub fn new(format: PixelFormat) -> Self {
        Self {
            format,
            row_order: RowOrder::TopDown,
        }
    }

    pub fn with_row_order(mut self, row_order: RowOrder) -> Self {
        self.row_order = row_order;
        self
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }
}

impl SurfaceProvider for RasterProvider {
    type Surface = Canvas;

    fn storage(&self) -> StorageLocation {
        StorageLocation::Cpu
    }

    fn create_surface(&self, width: u32, height: u32) -> Result<Canvas, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSize { width, height });
        }
        let info = SurfaceInfo::new(width, height, self.format).with_row_order(self.row_order);
        log::debug!("allocating {}x{} raster surface ({} bytes)", width, height, info.byte_len());
        Ok(Canvas::new(info))
    }
}

impl Surface for Canvas {
    fn info(&self) -> SurfaceInfo {
        Canvas::info(self)
    }

    fn storage(&self) -> StorageLocation {
        StorageLocation::Cpu
    }

    fn pixels(&self) -> Option<&[u8]> {
        Some(Canvas::pixels(self))
    }
}

/// Reject a surface whose format differs from what its consumer reads
pub fn ensure_format(info: &SurfaceInfo, expected: PixelFormat) -> Result<(), SurfaceError> {
    if info.format != expected {
        return Err(SurfaceError::FormatMismatch {
            expected,
            found: info.format,
        });
    }
    Ok(())
}
