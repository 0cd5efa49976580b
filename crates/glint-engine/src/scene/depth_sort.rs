use std::cmp::Ordering;

use super::{DrawRequest, LightMedium};

/// Sort key for compositing order.
///
/// Ordering rules:
/// 1) `z`: ascending (far first; larger z is nearer under reversed depth)
/// 2) `order`: ascending (enqueue order for equal z)
#[derive(Debug, Copy, Clone)]
pub struct DepthKey {
    z: f32,
    order: usize,
}

impl DepthKey {
    #[inline]
    pub fn new(z: f32, order: usize) -> Self {
        // -0.0 and 0.0 compare equal; keep them equal under total_cmp too.
        let z = if z == 0.0 { 0.0 } else { z };
        Self { z, order }
    }
}

impl Ord for DepthKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        match self.z.total_cmp(&other.z) {
            Ordering::Equal => self.order.cmp(&other.order),
            o => o,
        }
    }
}

impl PartialOrd for DepthKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DepthKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DepthKey {}

/// Returns the transparent requests back-to-front.
///
/// Opaque requests are filtered out: the depth test makes their order
/// irrelevant, so they are encoded in enqueue order elsewhere. Equal depths
/// keep their enqueue order for any queue length.
pub fn order_for_compositing(requests: &[DrawRequest]) -> Vec<&DrawRequest> {
    let mut keyed: Vec<(DepthKey, &DrawRequest)> = requests
        .iter()
        .filter(|r| r.medium() == LightMedium::Transparent)
        .enumerate()
        .map(|(i, r)| (DepthKey::new(r.depth(), i), r))
        .collect();

    keyed.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, r)| r).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    fn glass(x: f32, z: f32) -> DrawRequest {
        DrawRequest::quad((x, 0.0, z), (1.0, 1.0), Color::WHITE.with_alpha(0.5))
    }

    fn xs(ordered: &[&DrawRequest]) -> Vec<f32> {
        ordered.iter().map(|r| r.position().x).collect()
    }

    #[test]
    fn sorts_ascending_by_z() {
        let reqs = vec![glass(0.0, 0.9), glass(1.0, 0.1), glass(2.0, 0.5)];
        assert_eq!(xs(&order_for_compositing(&reqs)), vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn equal_z_keeps_enqueue_order() {
        let reqs = vec![glass(0.0, 0.5), glass(1.0, 0.2), glass(2.0, 0.5), glass(3.0, 0.5)];
        let first = xs(&order_for_compositing(&reqs));
        assert_eq!(first, vec![1.0, 0.0, 2.0, 3.0]);

        // Same input, same output.
        for _ in 0..8 {
            assert_eq!(xs(&order_for_compositing(&reqs)), first);
        }
    }

    #[test]
    fn opaque_requests_are_excluded() {
        let reqs = vec![
            DrawRequest::quad((0.0, 0.0, 0.2), (1.0, 1.0), Color::BLUE),
            glass(1.0, 0.8),
        ];
        assert_eq!(xs(&order_for_compositing(&reqs)), vec![1.0]);
    }

    #[test]
    fn signed_zeros_are_equal() {
        let reqs = vec![glass(0.0, 0.0), glass(1.0, -0.0)];
        assert_eq!(xs(&order_for_compositing(&reqs)), vec![0.0, 1.0]);
    }

    #[test]
    fn key_is_antisymmetric() {
        let a = DepthKey::new(0.25, 0);
        let b = DepthKey::new(0.75, 1);
        assert_eq!(a.cmp(&b), Ordering::Less);
        assert_eq!(b.cmp(&a), Ordering::Greater);
        assert_eq!(a.cmp(&a), Ordering::Equal);

        let c = DepthKey::new(0.25, 2);
        assert_eq!(a.cmp(&c), Ordering::Less);
        assert_eq!(c.cmp(&a), Ordering::Greater);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn tiebreak_does_not_wrap_past_u32() {
        let early = DepthKey::new(0.5, u32::MAX as usize);
        let late = DepthKey::new(0.5, u32::MAX as usize + 1);
        assert_eq!(early.cmp(&late), Ordering::Less);
    }
}
