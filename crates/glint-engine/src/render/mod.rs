//! GPU rendering subsystem.
//!
//! Consumes a frame's draw requests and issues wgpu commands. The primitive
//! renderer owns its GPU resources (pipelines, geometry buffers, per-draw
//! uniforms).
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - The vertex shader converts to NDC using the logical screen size in the uniform block.
//! - Depth is reversed: larger z is nearer, cleared to 0.0.

mod ctx;
pub mod geometry;
pub mod pipeline;
pub mod plan;
mod primitive;
pub mod uniform;

pub use ctx::{RenderCtx, RenderTarget};
pub use geometry::{GeometryCache, CIRCLE_FACES};
pub use pipeline::PipelineRegistry;
pub use plan::{draw_calls, FramePlan, PassPlan};
pub use primitive::PrimitiveRenderer;
pub use uniform::{aligned_size, TransientUniform, UniformAllocator, UniformBlock};
