/// Drawing space size in logical pixels.
///
/// Uploaded with every draw so the vertex stage can map logical positions to
/// NDC. The surface itself is sized in physical pixels; the two differ by the
/// window's scale factor.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Logical size of a `width`x`height` physical target.
    ///
    /// A scale factor that is not a positive finite number is treated as 1.0.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        Self::new(
            (width as f64 / scale) as f32,
            (height as f64 / scale) as f32,
        )
    }
}
