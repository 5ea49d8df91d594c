use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::{Adapter, Device, DeviceDescriptor, Features, Instance, Limits, Queue};
use winit::window::Window;

/// Connection to the GPU for one window.
///
/// Surfaces and bridges hold an `Arc<GpuContext>`, so the device and queue
/// stay alive until the last surface drawing through them is dropped.
pub struct GpuContext {
    instance: Instance,
    adapter: Adapter,
    device: Device,
    queue: Queue,
}

impl GpuContext {
    /// Create a context whose adapter can present to `window`.
    ///
    /// Returns the window's presentation surface alongside the context; both
    /// come from the same instance.
    pub async fn for_window(window: Arc<Window>) -> Result<(Self, wgpu::Surface<'static>)> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create presentation surface for window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;

        let info = adapter.get_info();
        log::info!("using {} ({:?})", info.name, info.backend);

        let (device, queue) = Self::request_device(&adapter).await?;

        Ok((
            Self {
                instance,
                adapter,
                device,
                queue,
            },
            surface,
        ))
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        // Two pipelines and one texture; downlevel limits are plenty
        let limits = Limits::downlevel_defaults().using_resolution(adapter.limits());

        adapter
            .request_device(&DeviceDescriptor {
                label: Some("paint-window device"),
                required_features: Features::empty(),
                required_limits: limits,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("failed to create GPU device")
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        log::debug!("releasing GPU context");
    }
}
