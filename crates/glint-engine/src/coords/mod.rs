//! Coordinate types shared by the renderer and applications.
//!
//! Canonical space:
//! - pixels, origin top-left, +X right, +Y down
//! - `z` in `[0, 1]`, larger is nearer (reversed depth)
//!
//! The vertex stage converts pixels to NDC using the viewport carried in each
//! draw's uniform block.

mod position;
mod size;
mod viewport;

pub use position::Position;
pub use size::Size;
pub use viewport::Viewport;
