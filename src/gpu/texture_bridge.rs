use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::context::GpuContext;
use super::{
    choose_alpha_mode, choose_surface_format, classify_acquire_error, configure_target,
    surface_config,
};
use crate::core::{
    ensure_format, pack_rows, PixelFormat, PresentError, RowOrder, SurfaceError, SurfaceInfo,
};

/// Pixel format the bridge uploads
pub const UPLOAD_FORMAT: PixelFormat = PixelFormat::Rgba8Premul;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl QuadVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Two triangles covering the viewport. Texture row 0 lands at the top of
/// the screen unless `flip_vertical` is set.
pub fn fullscreen_quad(flip_vertical: bool) -> [QuadVertex; 6] {
    let (v_top, v_bottom) = if flip_vertical { (1.0, 0.0) } else { (0.0, 1.0) };
    let tl = QuadVertex { position: [-1.0, 1.0], uv: [0.0, v_top] };
    let bl = QuadVertex { position: [-1.0, -1.0], uv: [0.0, v_bottom] };
    let br = QuadVertex { position: [1.0, -1.0], uv: [1.0, v_bottom] };
    let tr = QuadVertex { position: [1.0, 1.0], uv: [1.0, v_top] };
    [tl, bl, br, tl, br, tr]
}

/// Upload target for one frame size
struct FrameTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl FrameTexture {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Bridge Frame Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bridge Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            texture,
            bind_group,
            width,
            height,
        }
    }
}

/// Puts CPU-rendered frames on a window by uploading them to a texture and
/// drawing a full-viewport quad.
pub struct TextureBridge {
    target: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    frame: FrameTexture,
    quad: wgpu::Buffer,
    flipped: bool,
    // Declared last: the device outlives the swapchain and every resource above
    context: Arc<GpuContext>,
}

impl TextureBridge {
    pub fn new(
        context: Arc<GpuContext>,
        target: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<Self, SurfaceError> {
        let caps = target.get_capabilities(context.adapter());
        let texture_format = choose_surface_format(&caps.formats).ok_or_else(|| {
            SurfaceError::Unsupported(format!(
                "no 8-bit RGBA swapchain format in {:?}",
                caps.formats
            ))
        })?;
        let alpha_mode = choose_alpha_mode(&caps.alpha_modes);
        let config = surface_config(texture_format, alpha_mode, width, height);

        let device = context.device();
        configure_target(&target, device, &config)?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bridge Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Frames are drawn 1:1, nearest keeps pixels exact
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Bridge Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let pipeline = Self::create_pipeline(device, &bind_group_layout, texture_format);
        let frame = FrameTexture::new(device, &bind_group_layout, &sampler, width, height);

        let quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Bridge Quad"),
            contents: bytemuck::cast_slice(&fullscreen_quad(false)),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        log::debug!("texture bridge ready: {}x{} via {:?}", width, height, texture_format);

        Ok(Self {
            target,
            config,
            pipeline,
            bind_group_layout,
            sampler,
            frame,
            quad,
            flipped: false,
            context,
        })
    }

    /// Reconfigure the swapchain for a new window size
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        let mut config = self.config.clone();
        config.width = width;
        config.height = height;
        configure_target(&self.target, self.context.device(), &config)?;
        self.config = config;
        Ok(())
    }

    /// Upload a CPU frame described by `info` and present it.
    ///
    /// `stride` is the source's byte distance between rows; rows are packed
    /// before upload when it exceeds `width * 4`.
    pub fn present(
        &mut self,
        info: &SurfaceInfo,
        pixels: &[u8],
        stride: usize,
    ) -> Result<(), PresentError> {
        ensure_format(info, UPLOAD_FORMAT)?;
        if info.is_empty() {
            return Err(PresentError::Skipped("empty frame".into()));
        }

        let device = self.context.device();
        let queue = self.context.queue();

        if (self.frame.width, self.frame.height) != (info.width, info.height) {
            log::debug!("recreating bridge texture at {}x{}", info.width, info.height);
            self.frame = FrameTexture::new(
                device,
                &self.bind_group_layout,
                &self.sampler,
                info.width,
                info.height,
            );
        }

        let flip = info.row_order.needs_flip(RowOrder::TopDown);
        if flip != self.flipped {
            queue.write_buffer(&self.quad, 0, bytemuck::cast_slice(&fullscreen_quad(flip)));
            self.flipped = flip;
        }

        let row_bytes = info.width as usize * UPLOAD_FORMAT.bytes_per_pixel();
        let packed = pack_rows(pixels, stride, row_bytes, info.height as usize);
        queue.write_texture(
            self.frame.texture.as_image_copy(),
            &packed,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(row_bytes as u32),
                rows_per_image: Some(info.height),
            },
            wgpu::Extent3d {
                width: info.width,
                height: info.height,
                depth_or_array_layers: 1,
            },
        );

        let surface_texture = self
            .target
            .get_current_texture()
            .map_err(|err| classify_acquire_error(err, &self.target, device, &self.config))?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Bridge Encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Bridge Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.frame.bind_group, &[]);
            pass.set_vertex_buffer(0, self.quad.slice(..));
            pass.draw(0..6, 0..1);
        }

        queue.submit(Some(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn create_pipeline(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Bridge Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../present.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Bridge Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Bridge Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[QuadVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}
