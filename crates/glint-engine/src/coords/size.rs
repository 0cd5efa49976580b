/// Extent of a primitive in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Square extent, used for circles (`radius` on both axes).
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { width: v, height: v }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl From<(f32, f32)> for Size {
    #[inline]
    fn from((width, height): (f32, f32)) -> Self {
        Self::new(width, height)
    }
}

impl From<[f32; 2]> for Size {
    #[inline]
    fn from([width, height]: [f32; 2]) -> Self {
        Self::new(width, height)
    }
}
