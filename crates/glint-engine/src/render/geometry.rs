//! Static unit geometry shared by every draw of a kind.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

use crate::scene::PrimitiveKind;

use super::uniform::create_buffer;

/// Number of triangles in the circle fan.
pub const CIRCLE_FACES: u32 = 64;

/// Vertices per triangle; every draw call covers exactly one triangle.
pub const TRIANGLE_VERTICES: u32 = 3;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2], // unit-centered local space
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { pos: [x, y] }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Unit quad as two triangles sharing the top-right/bottom-left diagonal.
pub const QUAD_VERTICES: [Vertex; 6] = [
    Vertex::new(-0.5, 0.5),
    Vertex::new(0.5, 0.5),
    Vertex::new(-0.5, -0.5),
    Vertex::new(-0.5, -0.5),
    Vertex::new(0.5, 0.5),
    Vertex::new(0.5, -0.5),
];

/// Unit circle as a centered fan of `faces` triangles.
///
/// Rim point `i` sits at angle `i * 2π / faces` using `(sin, cos)`, so the fan
/// starts at +Y and walks clockwise. Triangle `i` is
/// `{center, rim[i], rim[(i + 1) % faces]}`; the last triangle closes on the
/// exact first rim point, leaving no seam.
pub fn circle_vertices(faces: u32) -> Vec<Vertex> {
    let rim: Vec<Vertex> = (0..faces)
        .map(|i| {
            let angle = i as f32 * TAU / faces as f32;
            Vertex::new(angle.sin(), angle.cos())
        })
        .collect();

    let center = Vertex::new(0.0, 0.0);
    let mut out = Vec::with_capacity((faces * TRIANGLE_VERTICES) as usize);
    for i in 0..rim.len() {
        out.push(center);
        out.push(rim[i]);
        out.push(rim[(i + 1) % rim.len()]);
    }
    out
}

/// Vertex count of the static buffer for `kind`.
#[inline]
pub fn vertex_count(kind: PrimitiveKind) -> u32 {
    match kind {
        PrimitiveKind::Quad => QUAD_VERTICES.len() as u32,
        PrimitiveKind::Circle => CIRCLE_FACES * TRIANGLE_VERTICES,
    }
}

/// Owns the two immutable vertex buffers. Each is built on first request and
/// kept for the renderer lifetime.
#[derive(Default)]
pub struct GeometryCache {
    quad: Option<wgpu::Buffer>,
    circle: Option<wgpu::Buffer>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quad_buffer(&mut self, device: &wgpu::Device) -> &wgpu::Buffer {
        self.quad.get_or_insert_with(|| {
            log::debug!("building quad geometry ({} vertices)", QUAD_VERTICES.len());
            create_buffer(
                device,
                "glint quad vbo",
                bytemuck::cast_slice(&QUAD_VERTICES),
                wgpu::BufferUsages::VERTEX,
            )
        })
    }

    pub fn circle_buffer(&mut self, device: &wgpu::Device) -> &wgpu::Buffer {
        self.circle.get_or_insert_with(|| {
            let vertices = circle_vertices(CIRCLE_FACES);
            log::debug!("building circle geometry ({} faces)", CIRCLE_FACES);
            create_buffer(
                device,
                "glint circle vbo",
                bytemuck::cast_slice(&vertices),
                wgpu::BufferUsages::VERTEX,
            )
        })
    }

    /// Builds the buffer for `kind` if needed.
    pub fn ensure(&mut self, device: &wgpu::Device, kind: PrimitiveKind) {
        match kind {
            PrimitiveKind::Quad => {
                self.quad_buffer(device);
            }
            PrimitiveKind::Circle => {
                self.circle_buffer(device);
            }
        }
    }

    /// Cached buffer for `kind`, if it has been built.
    pub fn get(&self, kind: PrimitiveKind) -> Option<&wgpu::Buffer> {
        match kind {
            PrimitiveKind::Quad => self.quad.as_ref(),
            PrimitiveKind::Circle => self.circle.as_ref(),
        }
    }
}
