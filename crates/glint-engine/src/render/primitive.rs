use crate::device::DEPTH_CLEAR;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{LightMedium, PrimitiveKind};

use super::geometry::GeometryCache;
use super::pipeline::PipelineRegistry;
use super::plan::{draw_calls, FramePlan};
use super::uniform::{TransientUniform, UniformAllocator};

/// Renderer for quads and circles.
///
/// Owns the lazily built geometry buffers and pipeline variants, and the
/// allocator for per-draw uniforms. Geometry is provided in logical pixels and
/// converted to NDC in the vertex shader.
pub struct PrimitiveRenderer {
    geometry: GeometryCache,
    pipelines: PipelineRegistry,
    uniforms: UniformAllocator,
}

impl PrimitiveRenderer {
    pub fn new(color_format: wgpu::TextureFormat, depth_format: wgpu::TextureFormat) -> Self {
        Self {
            geometry: GeometryCache::new(),
            pipelines: PipelineRegistry::new(color_format, depth_format),
            uniforms: UniformAllocator::new(),
        }
    }

    /// Builds the geometry buffer for `kind` and the pipeline for `medium` if
    /// they do not exist yet.
    pub fn warm(&mut self, device: &wgpu::Device, kind: PrimitiveKind, medium: LightMedium) {
        self.geometry.ensure(device, kind);
        self.pipelines.pipeline_for(device, medium);
    }

    /// Builds every geometry buffer and pipeline variant up front.
    pub fn prepare(&mut self, device: &wgpu::Device) {
        for kind in [PrimitiveKind::Quad, PrimitiveKind::Circle] {
            self.geometry.ensure(device, kind);
        }
        for medium in [LightMedium::Opaque, LightMedium::Transparent] {
            self.pipelines.pipeline_for(device, medium);
        }
    }

    /// Records `plan` into `target`.
    ///
    /// Returns the transient uniforms referenced by the recorded commands. They
    /// must outlive the command buffer's submission and then go back through
    /// [`PrimitiveRenderer::release`].
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        plan: &FramePlan,
    ) -> Vec<TransientUniform> {
        if plan.is_empty() {
            return Vec::new();
        }

        // Mutating builds must happen before borrowing pipelines/buffers immutably.
        for pass in plan.passes() {
            self.pipelines.pipeline_for(ctx.device, pass.medium);
            for request in &pass.requests {
                self.geometry.ensure(ctx.device, request.kind());
            }
        }

        let mut transients = Vec::with_capacity(plan.request_count());
        {
            let layout = self.pipelines.bind_group_layout(ctx.device);
            for request in plan.encode_order() {
                transients.push(self.uniforms.create_transient_uniform(
                    ctx.device,
                    layout,
                    request,
                    ctx.viewport,
                ));
            }
        }

        let mut next = 0;
        for pass in plan.passes() {
            let bound = &transients[next..next + pass.requests.len()];
            next += pass.requests.len();

            let Some(pipeline) = self.pipelines.get(pass.medium) else {
                continue;
            };

            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(pass_label(pass.medium)),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);

            for (request, uniform) in pass.requests.iter().zip(bound) {
                let Some(vbo) = self.geometry.get(request.kind()) else {
                    continue;
                };
                rpass.set_bind_group(0, uniform.bind_group(), &[]);
                rpass.set_vertex_buffer(0, vbo.slice(..));
                for vertices in draw_calls(request.kind()) {
                    rpass.draw(vertices, 0..1);
                }
            }
        }

        transients
    }

    /// Clears color to `color` and depth to the far plane.
    pub fn clear(&self, target: &mut RenderTarget<'_>, color: Color) {
        let _rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glint clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(DEPTH_CLEAR),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    /// Destroys the uniforms of a frame whose commands were submitted.
    pub fn release(&mut self, uniforms: Vec<TransientUniform>) {
        self.uniforms.release(uniforms);
    }

    pub fn geometry(&self) -> &GeometryCache {
        &self.geometry
    }

    pub fn pipelines(&self) -> &PipelineRegistry {
        &self.pipelines
    }

    pub fn uniforms(&self) -> &UniformAllocator {
        &self.uniforms
    }
}

fn pass_label(medium: LightMedium) -> &'static str {
    match medium {
        LightMedium::Opaque => "glint opaque pass",
        LightMedium::Transparent => "glint transparent pass",
    }
}
