use crate::coords::{Position, Size};
use crate::paint::Color;

/// Closed set of primitives the renderer knows how to draw.
///
/// The kind selects the geometry buffer and the draw-call sequence; it is not
/// written into the uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveKind {
    Quad,
    Circle,
}

/// Opaque/transparent classification driving pipeline choice and pass order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LightMedium {
    Opaque,
    Transparent,
}

impl LightMedium {
    /// Classifies a resolved alpha value. Anything below `1.0` blends.
    #[inline]
    pub fn from_alpha(alpha: f32) -> Self {
        if alpha < 1.0 {
            LightMedium::Transparent
        } else {
            LightMedium::Opaque
        }
    }
}

/// One instruction to render a single primitive this frame.
///
/// Fields are private so the medium can never disagree with the color it was
/// derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    kind: PrimitiveKind,
    position: Position,
    size: Size,
    color: Color,
    medium: LightMedium,
}

impl DrawRequest {
    /// Axis-aligned quad centered on `position`.
    pub fn quad(
        position: impl Into<Position>,
        size: impl Into<Size>,
        color: impl Into<Color>,
    ) -> Self {
        Self::new(PrimitiveKind::Quad, position.into(), size.into(), color.into())
    }

    /// Filled circle centered on `position`.
    ///
    /// The unit fan has radius 1, so the radius is carried as a square size.
    pub fn circle(position: impl Into<Position>, radius: f32, color: impl Into<Color>) -> Self {
        Self::new(PrimitiveKind::Circle, position.into(), Size::splat(radius), color.into())
    }

    fn new(kind: PrimitiveKind, position: Position, size: Size, color: Color) -> Self {
        Self {
            kind,
            position,
            size,
            color,
            medium: LightMedium::from_alpha(color.a),
        }
    }

    #[inline]
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Width/height for quads; `(radius, radius)` for circles.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn medium(&self) -> LightMedium {
        self.medium
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.position.z
    }
}
