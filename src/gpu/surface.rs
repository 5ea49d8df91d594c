use std::sync::Arc;

use wgpu::util::DeviceExt;

use super::context::GpuContext;
use super::tessellate::{tessellate, ShapeVertex};
use super::{
    choose_alpha_mode, choose_surface_format, classify_acquire_error, configure_target,
    pixel_format_for, surface_config,
};
use crate::core::{
    Color, DrawCommand, DrawTarget, PixelFormat, PresentError, StorageLocation, Surface,
    SurfaceError, SurfaceInfo, SurfaceProvider,
};

/// Render pipeline for solid premultiplied triangles
pub struct ShapePipeline {
    pipeline: wgpu::RenderPipeline,
}

impl ShapePipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shape Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shapes.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shape Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shape Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[ShapeVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self { pipeline }
    }
}

/// Creates render-target surfaces backed by a window's swapchain
pub struct GpuProvider {
    target: Arc<wgpu::Surface<'static>>,
    pipeline: Arc<ShapePipeline>,
    texture_format: wgpu::TextureFormat,
    format: PixelFormat,
    alpha_mode: wgpu::CompositeAlphaMode,
    // Declared last: dropped after the swapchain and pipeline
    context: Arc<GpuContext>,
}

impl GpuProvider {
    pub fn new(
        context: Arc<GpuContext>,
        target: wgpu::Surface<'static>,
    ) -> Result<Self, SurfaceError> {
        let caps = target.get_capabilities(context.adapter());
        let texture_format = choose_surface_format(&caps.formats).ok_or_else(|| {
            SurfaceError::Unsupported(format!(
                "no 8-bit RGBA swapchain format in {:?}",
                caps.formats
            ))
        })?;
        let format = pixel_format_for(texture_format)
            .ok_or_else(|| SurfaceError::Unsupported(format!("{:?}", texture_format)))?;
        let alpha_mode = choose_alpha_mode(&caps.alpha_modes);
        log::debug!("swapchain format {:?}, alpha {:?}", texture_format, alpha_mode);

        let pipeline = Arc::new(ShapePipeline::new(context.device(), texture_format));

        Ok(Self {
            target: Arc::new(target),
            pipeline,
            texture_format,
            format,
            alpha_mode,
            context,
        })
    }
}

impl SurfaceProvider for GpuProvider {
    type Surface = GpuSurface;

    fn storage(&self) -> StorageLocation {
        StorageLocation::Gpu
    }

    fn create_surface(&self, width: u32, height: u32) -> Result<GpuSurface, SurfaceError> {
        let config = surface_config(self.texture_format, self.alpha_mode, width, height);
        configure_target(&self.target, self.context.device(), &config)?;
        log::debug!("configured {}x{} swapchain", width, height);

        Ok(GpuSurface {
            target: self.target.clone(),
            pipeline: self.pipeline.clone(),
            config,
            info: SurfaceInfo::new(width, height, self.format),
            commands: Vec::new(),
            context: self.context.clone(),
        })
    }
}

/// Swapchain-backed surface. Commands are recorded, then replayed as one
/// render pass by `flush`.
pub struct GpuSurface {
    target: Arc<wgpu::Surface<'static>>,
    pipeline: Arc<ShapePipeline>,
    config: wgpu::SurfaceConfiguration,
    info: SurfaceInfo,
    commands: Vec<DrawCommand>,
    // Declared last: the device outlives every resource above
    context: Arc<GpuContext>,
}

impl GpuSurface {
    /// Draw the recorded commands into the next swapchain image and present it
    pub fn flush(&mut self) -> Result<(), PresentError> {
        let batch = tessellate(&self.commands, self.info.width, self.info.height);
        self.commands.clear();

        let device = self.context.device();
        let frame = self
            .target
            .get_current_texture()
            .map_err(|err| classify_acquire_error(err, &self.target, device, &self.config))?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let vertices = (!batch.vertices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Shape Vertex Buffer"),
                contents: bytemuck::cast_slice(&batch.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Shape Encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shape Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(
                            batch.clear.unwrap_or(Color::TRANSPARENT),
                        )),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(buffer) = &vertices {
                pass.set_pipeline(&self.pipeline.pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..batch.vertices.len() as u32, 0..1);
            }
        }

        self.context.queue().submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl DrawTarget for GpuSurface {
    fn execute(&mut self, command: &DrawCommand) {
        self.commands.push(command.clone());
    }
}

impl Surface for GpuSurface {
    fn info(&self) -> SurfaceInfo {
        self.info
    }

    fn storage(&self) -> StorageLocation {
        StorageLocation::Gpu
    }

    fn pixels(&self) -> Option<&[u8]> {
        None
    }
}

fn clear_color(color: Color) -> wgpu::Color {
    let [r, g, b, a] = color.to_premultiplied_f32();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}
