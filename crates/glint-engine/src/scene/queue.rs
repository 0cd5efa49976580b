use super::DrawRequest;

/// Draw requests recorded for the current frame.
///
/// - `enqueue()` is O(1) and keeps call order; no dedup, no limit
/// - `drain()` hands back every pending request and leaves the queue empty
#[derive(Debug, Default)]
pub struct FrameRenderQueue {
    pending: Vec<DrawRequest>,
}

impl FrameRenderQueue {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn enqueue(&mut self, request: DrawRequest) {
        self.pending.push(request);
    }

    /// Takes all pending requests in enqueue order.
    #[inline]
    pub fn drain(&mut self) -> Vec<DrawRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Drops pending requests without encoding them. Returns how many were dropped.
    #[inline]
    pub fn discard(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    #[inline]
    pub fn pending(&self) -> &[DrawRequest] {
        &self.pending
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    fn quad_at(x: f32) -> DrawRequest {
        DrawRequest::quad((x, 0.0), (1.0, 1.0), Color::WHITE)
    }

    #[test]
    fn drain_returns_enqueue_order() {
        let mut q = FrameRenderQueue::new();
        q.enqueue(quad_at(1.0));
        q.enqueue(quad_at(2.0));
        q.enqueue(quad_at(1.0));

        let xs: Vec<f32> = q.drain().iter().map(|r| r.position().x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 1.0]);
    }

    #[test]
    fn drain_empties_queue_for_any_size() {
        for n in [0usize, 1, 17] {
            let mut q = FrameRenderQueue::new();
            for i in 0..n {
                q.enqueue(quad_at(i as f32));
            }
            assert_eq!(q.drain().len(), n);
            assert!(q.is_empty());
            assert!(q.drain().is_empty());
        }
    }

    #[test]
    fn discard_drops_pending() {
        let mut q = FrameRenderQueue::new();
        q.enqueue(quad_at(0.0));
        q.enqueue(quad_at(1.0));
        assert_eq!(q.discard(), 2);
        assert!(q.is_empty());
    }
}
