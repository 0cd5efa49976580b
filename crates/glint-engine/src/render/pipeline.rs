//! Lazily built render pipelines, one per light medium.

use std::num::NonZeroU64;

use crate::scene::LightMedium;

use super::geometry::Vertex;
use super::uniform::UniformBlock;

/// Overwrites color and alpha.
pub fn opaque_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent::REPLACE,
        alpha: wgpu::BlendComponent::REPLACE,
    }
}

/// Additive color accumulation weighted by source alpha; alpha is overwritten.
///
/// Order-dependent, hence the back-to-front sort of transparent draws.
pub fn transparent_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::Zero,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

pub fn blend_for(medium: LightMedium) -> wgpu::BlendState {
    match medium {
        LightMedium::Opaque => opaque_blend(),
        LightMedium::Transparent => transparent_blend(),
    }
}

/// Reversed depth: cleared to 0.0, nearer fragments carry larger z and win on ties.
pub fn depth_state(format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::GreaterEqual,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Front faces are clockwise on screen and culled. Unit geometry is
/// counter-clockwise after the vertex stage flips Y, so it survives.
pub fn primitive_state() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Cw,
        cull_mode: Some(wgpu::Face::Front),
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

fn uniform_min_binding_size() -> Option<NonZeroU64> {
    NonZeroU64::new(std::mem::size_of::<UniformBlock>() as u64)
}

/// Shader module and layouts shared by both pipeline variants.
struct SharedLayout {
    shader: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
}

impl SharedLayout {
    fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glint primitive shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/primitive.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glint draw bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: uniform_min_binding_size(),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glint pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        Self {
            shader,
            bind_group_layout,
            pipeline_layout,
        }
    }

    fn build_pipeline(
        &self,
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        medium: LightMedium,
    ) -> wgpu::RenderPipeline {
        let label = match medium {
            LightMedium::Opaque => "glint opaque pipeline",
            LightMedium::Transparent => "glint transparent pipeline",
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(blend_for(medium)),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive_state(),
            depth_stencil: Some(depth_state(depth_format)),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}

/// Builds each pipeline variant at most once and caches it for the renderer
/// lifetime. Formats are fixed at construction; a format change means a new
/// registry.
pub struct PipelineRegistry {
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,

    shared: Option<SharedLayout>,
    opaque: Option<wgpu::RenderPipeline>,
    transparent: Option<wgpu::RenderPipeline>,

    builds: u32,
}

impl PipelineRegistry {
    pub fn new(color_format: wgpu::TextureFormat, depth_format: wgpu::TextureFormat) -> Self {
        Self {
            color_format,
            depth_format,
            shared: None,
            opaque: None,
            transparent: None,
            builds: 0,
        }
    }

    /// Returns the pipeline for `medium`, building it on first use.
    pub fn pipeline_for(
        &mut self,
        device: &wgpu::Device,
        medium: LightMedium,
    ) -> &wgpu::RenderPipeline {
        let (color_format, depth_format) = (self.color_format, self.depth_format);
        let shared = self.shared.get_or_insert_with(|| SharedLayout::new(device));
        let slot = match medium {
            LightMedium::Opaque => &mut self.opaque,
            LightMedium::Transparent => &mut self.transparent,
        };
        let builds = &mut self.builds;

        slot.get_or_insert_with(|| {
            log::debug!("building {medium:?} pipeline for {color_format:?}");
            *builds += 1;
            shared.build_pipeline(device, color_format, depth_format, medium)
        })
    }

    /// Layout every transient uniform bind group is created against.
    pub fn bind_group_layout(&mut self, device: &wgpu::Device) -> &wgpu::BindGroupLayout {
        &self
            .shared
            .get_or_insert_with(|| SharedLayout::new(device))
            .bind_group_layout
    }

    /// Cached pipeline for `medium`, if it has been built.
    pub fn get(&self, medium: LightMedium) -> Option<&wgpu::RenderPipeline> {
        match medium {
            LightMedium::Opaque => self.opaque.as_ref(),
            LightMedium::Transparent => self.transparent.as_ref(),
        }
    }

    /// Number of pipelines built so far. Never exceeds 2.
    pub fn builds(&self) -> u32 {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_have_distinct_blend() {
        assert_ne!(blend_for(LightMedium::Opaque), blend_for(LightMedium::Transparent));
    }

    #[test]
    fn opaque_blend_overwrites() {
        let b = opaque_blend();
        for c in [b.color, b.alpha] {
            assert_eq!(c.src_factor, wgpu::BlendFactor::One);
            assert_eq!(c.dst_factor, wgpu::BlendFactor::Zero);
            assert_eq!(c.operation, wgpu::BlendOperation::Add);
        }
    }

    #[test]
    fn transparent_blend_accumulates_color() {
        let b = transparent_blend();
        assert_eq!(b.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(b.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(b.alpha.src_factor, wgpu::BlendFactor::One);
        assert_eq!(b.alpha.dst_factor, wgpu::BlendFactor::Zero);
    }

    #[test]
    fn depth_is_reversed_and_written() {
        let d = depth_state(wgpu::TextureFormat::Depth32Float);
        assert!(d.depth_write_enabled);
        assert_eq!(d.depth_compare, wgpu::CompareFunction::GreaterEqual);
    }

    #[test]
    fn front_faces_are_culled() {
        let p = primitive_state();
        assert_eq!(p.cull_mode, Some(wgpu::Face::Front));
        assert_eq!(p.front_face, wgpu::FrontFace::Cw);
    }

    #[test]
    fn uniform_binding_size_is_one_block() {
        assert_eq!(uniform_min_binding_size().map(NonZeroU64::get), Some(64));
    }
}
