//! wgpu-backed surfaces and the CPU-to-GPU texture bridge.

pub mod context;
pub mod surface;
pub mod tessellate;
pub mod texture_bridge;

pub use context::GpuContext;
pub use surface::{GpuProvider, GpuSurface};
pub use tessellate::{tessellate, ShapeBatch, ShapeVertex};
pub use texture_bridge::{fullscreen_quad, QuadVertex, TextureBridge};

use crate::core::{PixelFormat, PresentError, SurfaceError};

/// Byte layout of a swapchain format, if it is one the CPU side can describe
pub fn pixel_format_for(format: wgpu::TextureFormat) -> Option<PixelFormat> {
    match format {
        wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => {
            Some(PixelFormat::Rgba8Premul)
        }
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => {
            Some(PixelFormat::Bgra8Premul)
        }
        _ => None,
    }
}

/// Pick a swapchain format. Linear 8-bit formats come first so GPU output
/// matches the raster path byte for byte.
pub fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb() && pixel_format_for(*f).is_some())
        .or_else(|| formats.iter().copied().find(|f| pixel_format_for(*f).is_some()))
}

/// Composite mode for swapchains: opaque when offered, else the first listed
pub fn choose_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    if modes.contains(&wgpu::CompositeAlphaMode::Opaque) {
        wgpu::CompositeAlphaMode::Opaque
    } else {
        modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto)
    }
}

pub(crate) fn surface_config(
    format: wgpu::TextureFormat,
    alpha_mode: wgpu::CompositeAlphaMode,
    width: u32,
    height: u32,
) -> wgpu::SurfaceConfiguration {
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width,
        height,
        present_mode: wgpu::PresentMode::Fifo,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    }
}

/// Configure `target`, turning validation failures into a `SurfaceError`
pub(crate) fn configure_target(
    target: &wgpu::Surface<'_>,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> Result<(), SurfaceError> {
    if config.width == 0 || config.height == 0 {
        return Err(SurfaceError::ZeroSize {
            width: config.width,
            height: config.height,
        });
    }

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    target.configure(device, config);
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(SurfaceError::Backend(err.to_string())),
        None => Ok(()),
    }
}

/// Map a frame acquisition failure to what the loop should do about it
pub(crate) fn classify_acquire_error(
    err: wgpu::SurfaceError,
    target: &wgpu::Surface<'_>,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> PresentError {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            target.configure(device, config);
            PresentError::Skipped(format!("swapchain {err}; reconfigured"))
        }
        wgpu::SurfaceError::OutOfMemory => PresentError::Fatal(err.to_string()),
        other => PresentError::Skipped(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn linear_bgra_preferred_over_srgb() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats), Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn srgb_accepted_when_alone() {
        let formats = [TextureFormat::Rgb10a2Unorm, TextureFormat::Rgba8UnormSrgb];
        assert_eq!(choose_surface_format(&formats), Some(TextureFormat::Rgba8UnormSrgb));
    }

    #[test]
    fn unknown_formats_rejected() {
        assert_eq!(choose_surface_format(&[TextureFormat::Rgba16Float]), None);
        assert_eq!(choose_surface_format(&[]), None);
    }

    #[test]
    fn format_mapping() {
        assert_eq!(pixel_format_for(TextureFormat::Bgra8Unorm), Some(PixelFormat::Bgra8Premul));
        assert_eq!(pixel_format_for(TextureFormat::Rgba8Unorm), Some(PixelFormat::Rgba8Premul));
        assert_eq!(pixel_format_for(TextureFormat::R8Unorm), None);
    }

    #[test]
    fn opaque_alpha_preferred() {
        use wgpu::CompositeAlphaMode as Mode;
        assert_eq!(choose_alpha_mode(&[Mode::PreMultiplied, Mode::Opaque]), Mode::Opaque);
        assert_eq!(choose_alpha_mode(&[Mode::PostMultiplied, Mode::Inherit]), Mode::PostMultiplied);
        assert_eq!(choose_alpha_mode(&[]), Mode::Auto);
    }

    #[test]
    fn config_uses_requested_size() {
        let config =
            surface_config(TextureFormat::Bgra8Unorm, wgpu::CompositeAlphaMode::Opaque, 800, 600);
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.present_mode, wgpu::PresentMode::Fifo);
    }
}
