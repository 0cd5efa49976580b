//! Frame plan: which requests go in which pass, in which order, with which
//! draw calls. Pure data; the GPU encoder records exactly this.

use std::ops::Range;

use crate::scene::{order_for_compositing, DrawRequest, LightMedium, PrimitiveKind};

use super::geometry::{vertex_count, TRIANGLE_VERTICES};

/// Vertex ranges issued for one request of `kind`, one triangle per call.
///
/// Quad: `0..3, 3..6`. Circle: `0..3, 3..6, …` for every fan face.
pub fn draw_calls(kind: PrimitiveKind) -> impl Iterator<Item = Range<u32>> {
    let triangles = vertex_count(kind) / TRIANGLE_VERTICES;
    (0..triangles).map(|t| {
        let first = t * TRIANGLE_VERTICES;
        first..first + TRIANGLE_VERTICES
    })
}

/// One render pass: a pipeline variant and the requests drawn with it.
#[derive(Debug, Clone, PartialEq)]
pub struct PassPlan {
    pub medium: LightMedium,
    pub requests: Vec<DrawRequest>,
}

impl PassPlan {
    pub fn draw_call_count(&self) -> u32 {
        self.requests
            .iter()
            .map(|r| draw_calls(r.kind()).count() as u32)
            .sum()
    }
}

/// Ordered passes for one `submit()`.
///
/// Opaque requests come first in enqueue order; transparent requests follow,
/// back-to-front. Empty passes are omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePlan {
    passes: Vec<PassPlan>,
}

impl FramePlan {
    pub fn build(requests: Vec<DrawRequest>) -> Self {
        let transparent: Vec<DrawRequest> = order_for_compositing(&requests)
            .into_iter()
            .cloned()
            .collect();
        let opaque: Vec<DrawRequest> = requests
            .into_iter()
            .filter(|r| r.medium() == LightMedium::Opaque)
            .collect();

        let passes = [
            (LightMedium::Opaque, opaque),
            (LightMedium::Transparent, transparent),
        ]
        .into_iter()
        .filter(|(_, requests)| !requests.is_empty())
        .map(|(medium, requests)| PassPlan { medium, requests })
        .collect();

        Self { passes }
    }

    #[inline]
    pub fn passes(&self) -> &[PassPlan] {
        &self.passes
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn request_count(&self) -> usize {
        self.passes.iter().map(|p| p.requests.len()).sum()
    }

    pub fn draw_call_count(&self) -> u32 {
        self.passes.iter().map(PassPlan::draw_call_count).sum()
    }

    /// Every request in the order it will be encoded.
    pub fn encode_order(&self) -> impl Iterator<Item = &DrawRequest> {
        self.passes.iter().flat_map(|p| p.requests.iter())
    }
}
