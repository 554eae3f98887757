use glam::Mat4;
use serde::{Deserialize, Serialize};
use wara_common::Viewport;
use wara_render::{OrbitCamera, Scene};
use wgpu::util::DeviceExt;

use crate::mesh::{self, GroundVertex, IconInstance, QuadVertex, Uniforms};
use crate::shaders;
use crate::texture::{IconImage, IconTexture};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Backend settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// MSAA sample count. Only 1 and 4 are portable; anything else falls back.
    pub msaa_samples: u32,
    /// Blend from plain texture (0) to texture times icon color (1).
    pub tint_strength: f32,
    /// Background color in sRGB.
    pub clear_color: [f64; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            msaa_samples: 4,
            tint_strength: 0.0,
            clear_color: [0.976, 0.965, 1.0],
        }
    }
}

/// Clamp a requested sample count to one every wgpu backend supports.
pub(crate) fn supported_sample_count(requested: u32) -> u32 {
    match requested {
        0 | 1 => 1,
        4 => 4,
        other => {
            let fallback = if other > 4 { 4 } else { 1 };
            tracing::warn!("msaa_samples={other} unsupported, using {fallback}");
            fallback
        }
    }
}

/// Render targets sized to the surface.
struct FrameTargets {
    depth: wgpu::TextureView,
    msaa: Option<wgpu::TextureView>,
}

/// wgpu-based scene renderer.
pub struct WgpuRenderer {
    ground_pipeline: wgpu::RenderPipeline,
    icon_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    ground_vertex_buffer: wgpu::Buffer,
    ground_vertex_count: u32,
    quad_vertex_buffer: wgpu::Buffer,
    quad_vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    targets: FrameTargets,
    surface_format: wgpu::TextureFormat,
    sample_count: u32,
    options: RenderOptions,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        scene: &Scene,
        icon_image: &IconImage,
        options: RenderOptions,
    ) -> Self {
        let sample_count = supported_sample_count(options.msaa_samples);

        // Uniform buffer
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                tint_strength: options.tint_strength,
                _padding: [0.0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // Icon texture
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
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

        let icon_texture = IconTexture::upload(device, queue, icon_image);
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&icon_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&icon_texture.sampler),
                },
            ],
        });

        let multisample = wgpu::MultisampleState {
            count: sample_count,
            ..Default::default()
        };
        let depth_stencil = wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        };

        // Ground pipeline
        let ground_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ground_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let ground_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ground_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::GROUND_SHADER.into()),
        });

        let ground_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ground_pipeline"),
            layout: Some(&ground_layout),
            vertex: wgpu::VertexState {
                module: &ground_shader,
                entry_point: Some("vs_ground"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GroundVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &ground_shader,
                entry_point: Some("fs_ground"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // The orbit can dip below the ground, so draw both faces.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil.clone()),
            multisample,
            multiview: None,
            cache: None,
        });

        // Icon pipeline
        let icon_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("icon_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let icon_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("icon_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::ICON_SHADER.into()),
        });

        let icon_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("icon_pipeline"),
            layout: Some(&icon_layout),
            vertex: wgpu::VertexState {
                module: &icon_shader,
                entry_point: Some("vs_icon"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<QuadVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x2,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<IconInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &icon_shader,
                entry_point: Some("fs_icon"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Icons spin, so both faces are visible over a turn.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil),
            multisample,
            multiview: None,
            cache: None,
        });

        // Ground mesh
        let ground_verts = mesh::ground_mesh(
            scene.ground_half_extent(),
            mesh::surface_color(mesh::GROUND_COLOR, surface_format.is_srgb()),
        );
        let ground_vertex_count = ground_verts.len() as u32;
        let ground_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ground_vertex_buffer"),
            contents: bytemuck::cast_slice(&ground_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Icon quad
        let quad_verts = mesh::quad_mesh(scene.icon_half_size());
        let quad_vertex_count = quad_verts.len() as u32;
        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertex_buffer"),
            contents: bytemuck::cast_slice(&quad_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Instance buffer sized to the ring; the icon count never changes.
        let max_instances = scene.icons().len().max(1) as u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<IconInstance>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let targets = Self::create_targets(device, surface_format, sample_count, viewport);

        tracing::debug!(
            sample_count,
            icons = scene.icons().len(),
            "renderer initialized"
        );

        Self {
            ground_pipeline,
            icon_pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group,
            ground_vertex_buffer,
            ground_vertex_count,
            quad_vertex_buffer,
            quad_vertex_count,
            instance_buffer,
            max_instances,
            targets,
            surface_format,
            sample_count,
            options,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, viewport: Viewport) {
        self.targets =
            Self::create_targets(device, self.surface_format, self.sample_count, viewport);
    }

    /// Render one frame: ground plane, then all icons in one instanced draw.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
        scene: &Scene,
        viewport: Viewport,
    ) {
        let vp = camera.view_proj(viewport.aspect_ratio());
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: vp.to_cols_array_2d(),
                tint_strength: self.options.tint_strength,
                _padding: [0.0; 3],
            }),
        );

        let srgb_surface = self.surface_format.is_srgb();
        let mut instances = mesh::icon_instances(scene, srgb_surface);
        instances.truncate(self.max_instances as usize);
        if !instances.is_empty() {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&instances),
            );
        }

        let [r, g, b] = self.options.clear_color;
        let [r, g, b, _] =
            mesh::surface_color([r as f32, g as f32, b as f32, 1.0], srgb_surface).map(f64::from);
        let (color_view, resolve_target) = match &self.targets.msaa {
            Some(msaa) => (msaa, Some(view)),
            None => (view, None),
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            // Draw ground plane
            pass.set_pipeline(&self.ground_pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.ground_vertex_buffer.slice(..));
            pass.draw(0..self.ground_vertex_count, 0..1);

            // Draw icons
            if !instances.is_empty() {
                pass.set_pipeline(&self.icon_pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_bind_group(1, &self.texture_bind_group, &[]);
                pass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                pass.draw(0..self.quad_vertex_count, 0..instances.len() as u32);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_targets(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        viewport: Viewport,
    ) -> FrameTargets {
        let size = wgpu::Extent3d {
            width: viewport.width.max(1),
            height: viewport.height.max(1),
            depth_or_array_layers: 1,
        };

        let depth = device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("depth_texture"),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&Default::default());

        let msaa = (sample_count > 1).then(|| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some("msaa_color_texture"),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format: surface_format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&Default::default())
        });

        FrameTargets { depth, msaa }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portable_sample_counts_pass_through() {
        assert_eq!(supported_sample_count(1), 1);
        assert_eq!(supported_sample_count(4), 4);
    }

    #[test]
    fn unsupported_sample_counts_fall_back() {
        assert_eq!(supported_sample_count(0), 1);
        assert_eq!(supported_sample_count(2), 1);
        assert_eq!(supported_sample_count(8), 4);
    }

    #[test]
    fn default_options_match_reference_look() {
        let opts = RenderOptions::default();
        assert_eq!(opts.msaa_samples, 4);
        assert_eq!(opts.clear_color, [0.976, 0.965, 1.0]);
        assert_eq!(opts.tint_strength, 0.0);
    }
}
