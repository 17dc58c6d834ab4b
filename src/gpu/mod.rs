//! wgpu implementation of [`RenderBackend`].
//!
//! Fields live in floating-point textures. Every blit draws a full-screen
//! triangle into its target with the bound program. Uniform values
//! collected by [`set_uniform`](RenderBackend::set_uniform) are packed into
//! one block and uploaded per blit, so later changes never leak into
//! earlier passes.
//!
//! Passes are recorded into a single command encoder; call
//! [`WgpuBackend::flush`] once per frame to submit them.

mod shaders;

pub use shaders::program_source;

use std::collections::HashMap;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::backend::{ProgramKind, RenderBackend, Uniform, UniformValue};
use crate::error::GpuError;

/// Field format with hardware filtering and blending.
pub const FILTERABLE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// Full-precision field format. Not filterable on most devices, so the
/// advection program falls back to manual bilinear sampling.
pub const PRECISE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
struct ProgramUniforms {
    color: [f32; 4],
    point: [f32; 2],
    texel_size: [f32; 2],
    dye_texel_size: [f32; 2],
    aspect_ratio: f32,
    radius: f32,
    dt: f32,
    dissipation: f32,
    _padding: [f32; 2],
}

impl ProgramUniforms {
    fn set(&mut self, uniform: Uniform, value: UniformValue) -> bool {
        let [x, y, z, w] = value.to_array(1.0);
        match uniform {
            Uniform::Color => self.color = [x, y, z, w],
            Uniform::Point => self.point = [x, y],
            Uniform::TexelSize => self.texel_size = [x, y],
            Uniform::DyeTexelSize => self.dye_texel_size = [x, y],
            Uniform::AspectRatio => self.aspect_ratio = x,
            Uniform::Radius => self.radius = x,
            Uniform::Dt => self.dt = x,
            Uniform::Dissipation => self.dissipation = x,
            Uniform::Target | Uniform::Velocity | Uniform::Source => return false,
        }
        true
    }
}

/// A field texture that can be rendered to and sampled.
pub struct GpuSurface {
    texture: wgpu::Texture,
    view: Arc<wgpu::TextureView>,
    width: u32,
    height: u32,
}

impl GpuSurface {
    fn new(device: &wgpu::Device, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Field Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = Arc::new(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

type PipelineKey = (ProgramKind, wgpu::TextureFormat, bool);

/// [`RenderBackend`] on a wgpu device.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    field_format: wgpu::TextureFormat,
    linear_filtering: bool,

    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    sampler: wgpu::Sampler,
    modules: HashMap<ProgramKind, wgpu::ShaderModule>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    // Bound to texture slots nothing was bound to.
    placeholder: GpuSurface,

    program: Option<ProgramKind>,
    uniforms: ProgramUniforms,
    textures: [Option<Arc<wgpu::TextureView>>; 2],
    blending: bool,
    screen: Option<(Arc<wgpu::TextureView>, wgpu::TextureFormat)>,
    encoder: Option<wgpu::CommandEncoder>,
}

impl WgpuBackend {
    /// Wrap an existing device. Fields are allocated as `field_format`.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, field_format: wgpu::TextureFormat) -> Self {
        let linear_filtering = field_format
            .guaranteed_format_features(device.features())
            .flags
            .contains(wgpu::TextureFormatFeatureFlags::FILTERABLE);

        let bind_group_layout = create_bind_group_layout(&device, linear_filtering);
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Fluid Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let filter = if linear_filtering {
            wgpu::FilterMode::Linear
        } else {
            wgpu::FilterMode::Nearest
        };
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Field Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let modules = [ProgramKind::Splat, ProgramKind::Advection, ProgramKind::Color]
            .into_iter()
            .map(|program| {
                let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(program_label(program)),
                    source: wgpu::ShaderSource::Wgsl(
                        program_source(program, !linear_filtering).into(),
                    ),
                });
                (program, module)
            })
            .collect();

        let placeholder = GpuSurface::new(&device, 1, 1, field_format);

        log::debug!(
            "wgpu backend ready: field format {:?}, linear filtering {}",
            field_format,
            linear_filtering
        );

        Self {
            device,
            queue,
            field_format,
            linear_filtering,
            bind_group_layout,
            pipeline_layout,
            sampler,
            modules,
            pipelines: HashMap::new(),
            placeholder,
            program: None,
            uniforms: ProgramUniforms::default(),
            textures: [None, None],
            blending: false,
            screen: None,
            encoder: None,
        }
    }

    /// Create a device without a window.
    pub fn headless(field_format: wgpu::TextureFormat) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        Ok(Self::new(device, queue, field_format))
    }

    /// Target for `blit(None)`, usually the current swapchain view.
    pub fn set_screen(&mut self, view: wgpu::TextureView, format: wgpu::TextureFormat) {
        self.screen = Some((Arc::new(view), format));
    }

    /// Submit every pass recorded since the last flush.
    pub fn flush(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.queue.submit(Some(encoder.finish()));
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn field_format(&self) -> wgpu::TextureFormat {
        self.field_format
    }

    fn blendable(&self, format: wgpu::TextureFormat) -> bool {
        format
            .guaranteed_format_features(self.device.features())
            .flags
            .contains(wgpu::TextureFormatFeatureFlags::BLENDABLE)
    }

    fn ensure_pipeline(&mut self, key: PipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        let (program, format, blend) = key;
        let Some(module) = self.modules.get(&program) else {
            return;
        };
        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program_label(program)),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: blend.then_some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
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
        });
        log::debug!("Created {:?} pipeline for {:?} (blend {})", program, format, blend);
        self.pipelines.insert(key, pipeline);
    }
}

impl RenderBackend for WgpuBackend {
    type Surface = GpuSurface;

    fn create_surface(&mut self, width: u32, height: u32) -> GpuSurface {
        GpuSurface::new(&self.device, width, height, self.field_format)
    }

    fn supports_linear_filtering(&self) -> bool {
        self.linear_filtering
    }

    fn bind_program(&mut self, program: ProgramKind) {
        self.program = Some(program);
        self.textures = [None, None];
    }

    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue) {
        if !self.uniforms.set(uniform, value) {
            log::warn!("{:?} is a texture slot, not a value uniform", uniform);
        }
    }

    fn bind_texture(&mut self, uniform: Uniform, surface: &GpuSurface, _unit: u32) {
        let slot = match uniform {
            Uniform::Target | Uniform::Velocity => 0,
            Uniform::Source => 1,
            other => {
                log::warn!("{:?} is not a texture slot", other);
                return;
            }
        };
        self.textures[slot] = Some(surface.view.clone());
    }

    fn set_blending(&mut self, enabled: bool) {
        self.blending = enabled;
    }

    fn blit(&mut self, target: Option<&GpuSurface>) {
        let Some(program) = self.program else {
            log::warn!("Blit without a bound program");
            return;
        };
        let (view, format) = match target {
            Some(surface) => (surface.view.clone(), self.field_format),
            None => match &self.screen {
                Some((view, format)) => (view.clone(), *format),
                None => {
                    log::warn!("Blit to screen without a screen target");
                    return;
                }
            },
        };

        let required = match program {
            ProgramKind::Splat => 1,
            ProgramKind::Advection => 2,
            ProgramKind::Color => 0,
        };
        if self.textures[..required].iter().any(Option::is_none) {
            log::warn!("{:?} blit is missing a texture binding", program);
        }

        let blend = self.blending && self.blendable(format);
        let key = (program, format, blend);
        self.ensure_pipeline(key);
        let Some(pipeline) = self.pipelines.get(&key) else {
            return;
        };

        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Program Uniforms"),
            contents: bytemuck::bytes_of(&self.uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let first = self.textures[0].as_ref().unwrap_or(&self.placeholder.view);
        let second = self.textures[1].as_ref().unwrap_or(&self.placeholder.view);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Program Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(first),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(second),
                },
            ],
        });

        let device = &self.device;
        let encoder = self.encoder.get_or_insert_with(|| {
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Fluid Encoder"),
            })
        });
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(program_label(program)),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

fn program_label(program: ProgramKind) -> &'static str {
    match program {
        ProgramKind::Splat => "Splat Program",
        ProgramKind::Advection => "Advection Program",
        ProgramKind::Color => "Color Program",
    }
}

fn create_bind_group_layout(device: &wgpu::Device, filterable: bool) -> wgpu::BindGroupLayout {
    let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    };
    let sampler_type = if filterable {
        wgpu::SamplerBindingType::Filtering
    } else {
        wgpu::SamplerBindingType::NonFiltering
    };

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Fluid Bind Group Layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(sampler_type),
                count: None,
            },
            texture_entry(2),
            texture_entry(3),
        ],
    })
}
