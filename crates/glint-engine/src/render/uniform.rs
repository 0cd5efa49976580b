//! Per-draw uniform packing and transient GPU buffer management.

use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;
use crate::scene::DrawRequest;

/// Alignment for uniform buffer sizes.
pub const UNIFORM_ALIGNMENT: u64 = 16;
/// Alignment for every other buffer size (`wgpu::COPY_BUFFER_ALIGNMENT`).
pub const BUFFER_ALIGNMENT: u64 = wgpu::COPY_BUFFER_ALIGNMENT;

/// Rounds `byte_len` up to 16 for uniform buffers, to 4 otherwise.
#[inline]
pub fn aligned_size(byte_len: u64, is_uniform: bool) -> u64 {
    let align = if is_uniform { UNIFORM_ALIGNMENT } else { BUFFER_ALIGNMENT };
    byte_len.div_ceil(align) * align
}

/// Uniform data for a single draw (64 bytes):
///
///  offset  0  screen    [f32; 2] + 2 reserved
///  offset 16  position  [f32; 3] + 1 reserved
///  offset 32  size      [f32; 2] + 2 reserved
///  offset 48  color     [f32; 4]
///
/// Reserved slots are always zero. The primitive kind is not encoded; the
/// bound geometry buffer decides it.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct UniformBlock {
    screen: [f32; 2],
    _pad0: [f32; 2],
    position: [f32; 3],
    _pad1: f32,
    size: [f32; 2],
    _pad2: [f32; 2],
    color: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<UniformBlock>() == 64);

impl UniformBlock {
    pub fn pack(request: &DrawRequest, viewport: Viewport) -> Self {
        let p = request.position();
        let s = request.size();
        Self {
            screen: [viewport.width, viewport.height],
            _pad0: [0.0; 2],
            position: [p.x, p.y, p.z],
            _pad1: 0.0,
            size: [s.width, s.height],
            _pad2: [0.0; 2],
            color: request.color().to_array(),
        }
    }

    /// The block as the 16 floats the shader reads.
    pub fn to_floats(&self) -> [f32; 16] {
        bytemuck::cast(*self)
    }
}

/// Creates a buffer of the aligned size and fills it with `data`.
///
/// The buffer is mapped at creation and unmapped before returning, so the GPU
/// can read it immediately without a separate upload.
pub fn create_buffer(
    device: &wgpu::Device,
    label: &str,
    data: &[u8],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    let is_uniform = usage.contains(wgpu::BufferUsages::UNIFORM);
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: aligned_size(data.len() as u64, is_uniform),
        usage,
        mapped_at_creation: true,
    });
    fill_buffer(&buffer, data);
    buffer
}

/// Writes `data` at the start of a currently mapped buffer, then unmaps it.
pub fn fill_buffer(buffer: &wgpu::Buffer, data: &[u8]) {
    buffer.slice(..).get_mapped_range_mut()[..data.len()].copy_from_slice(data);
    buffer.unmap();
}

/// Uniform buffer + bind group backing exactly one draw request.
pub struct TransientUniform {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl TransientUniform {
    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Creates and destroys the per-draw uniform resources.
///
/// Resources are released after the frame's command buffer is submitted. wgpu
/// keeps destroyed buffers alive until in-flight work that references them
/// completes.
#[derive(Debug, Default)]
pub struct UniformAllocator {
    live: usize,
    created_total: u64,
}

impl UniformAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_transient_uniform(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        request: &DrawRequest,
        viewport: Viewport,
    ) -> TransientUniform {
        let block = UniformBlock::pack(request, viewport);
        let buffer = create_buffer(
            device,
            "glint draw ubo",
            bytemuck::bytes_of(&block),
            wgpu::BufferUsages::UNIFORM,
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glint draw bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        self.live += 1;
        self.created_total += 1;

        TransientUniform { buffer, bind_group }
    }

    /// Destroys every transient uniform of a submitted frame.
    pub fn release(&mut self, uniforms: Vec<TransientUniform>) {
        let n = uniforms.len();
        for TransientUniform { buffer, bind_group } in uniforms {
            drop(bind_group);
            buffer.destroy();
        }
        self.live = self.live.saturating_sub(n);
    }

    /// Transient uniforms created but not yet released.
    #[inline]
    pub fn live(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn created_total(&self) -> u64 {
        self.created_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    #[test]
    fn aligned_size_uniform_rounds_to_16() {
        assert_eq!(aligned_size(0, true), 0);
        assert_eq!(aligned_size(1, true), 16);
        assert_eq!(aligned_size(16, true), 16);
        assert_eq!(aligned_size(17, true), 32);
        assert_eq!(aligned_size(64, true), 64);
    }

    #[test]
    fn aligned_size_other_rounds_to_4() {
        assert_eq!(aligned_size(1, false), 4);
        assert_eq!(aligned_size(4, false), 4);
        assert_eq!(aligned_size(6, false), 8);
        assert_eq!(aligned_size(48, false), 48);
    }

    #[test]
    fn aligned_size_properties_hold_over_a_range() {
        for len in 0..=300u64 {
            for uniform in [true, false] {
                let align = if uniform { 16 } else { 4 };
                let out = aligned_size(len, uniform);
                assert!(out >= len);
                assert_eq!(out % align, 0);
                assert!(out - len < align);
                if len % align == 0 {
                    assert_eq!(out, len);
                }
            }
        }
    }

    #[test]
    fn block_layout_matches_shader_contract() {
        let req = DrawRequest::quad(
            (100.0, 120.0, 0.25),
            (50.0, 40.0),
            Color::rgba(0.1, 0.2, 0.3, 0.4),
        );
        let floats = UniformBlock::pack(&req, Viewport::new(224.0, 288.0)).to_floats();
        assert_eq!(
            floats,
            [
                224.0, 288.0, 0.0, 0.0, //
                100.0, 120.0, 0.25, 0.0, //
                50.0, 40.0, 0.0, 0.0, //
                0.1, 0.2, 0.3, 0.4,
            ]
        );
    }

    #[test]
    fn circle_block_carries_radius_on_both_axes() {
        let req = DrawRequest::circle((10.0, 10.0), 8.0, Color::GREEN);
        let floats = UniformBlock::pack(&req, Viewport::new(1.0, 1.0)).to_floats();
        assert_eq!(&floats[8..10], &[8.0, 8.0]);
        assert_eq!(floats[15], 1.0);
    }
}
