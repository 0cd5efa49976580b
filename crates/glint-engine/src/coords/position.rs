/// Screen-space position in pixels plus a depth value.
///
/// `x`/`y` use a top-left origin with +Y down. `z` follows the reversed-depth
/// convention: 0.0 is the far plane (the cleared depth) and larger values are
/// nearer the viewer. Callers keep `z` in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Position on the far plane (`z = 0`).
    #[inline]
    pub const fn flat(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<(f32, f32)> for Position {
    #[inline]
    fn from((x, y): (f32, f32)) -> Self {
        Self::flat(x, y)
    }
}

impl From<(f32, f32, f32)> for Position {
    #[inline]
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[f32; 2]> for Position {
    #[inline]
    fn from([x, y]: [f32; 2]) -> Self {
        Self::flat(x, y)
    }
}

impl From<[f32; 3]> for Position {
    #[inline]
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_component_forms_default_z_to_far_plane() {
        assert_eq!(Position::from((3.0, 4.0)).z, 0.0);
        assert_eq!(Position::from([3.0, 4.0]).z, 0.0);
    }

    #[test]
    fn three_component_forms_keep_z() {
        assert_eq!(Position::from((1.0, 2.0, 0.5)), Position::new(1.0, 2.0, 0.5));
        assert_eq!(Position::from([1.0, 2.0, 0.5]), Position::new(1.0, 2.0, 0.5));
    }

    #[test]
    fn nan_is_not_finite() {
        assert!(!Position::new(0.0, f32::NAN, 0.0).is_finite());
        assert!(Position::flat(10.0, 20.0).is_finite());
    }
}
