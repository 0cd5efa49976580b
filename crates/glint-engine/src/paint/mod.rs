//! Color model shared between applications and the renderer.

mod color;

pub use color::Color;
