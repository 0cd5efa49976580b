//! glint engine crate.
//!
//! Immediate-mode quad/circle renderer on wgpu, plus the window runtime that
//! drives it.
//!
//! Per frame: `Renderer::clear_screen` → `draw_quad`/`draw_circle` → `submit`.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;

mod renderer;

pub use renderer::{FrameStats, Renderer, RendererState};
