//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and one Window, and binds a `Renderer` to it.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
pub use winit::dpi::LogicalSize;
