//! GPU context provider.
//!
//! This module is responsible for:
//! - creating the wgpu Adapter/Device/Queue
//! - creating & configuring the color target (window surface or offscreen texture)
//! - keeping a reversed-depth `Depth32Float` target sized to the color target
//! - acquiring per-frame color views

mod config;
mod depth;
mod error;
mod frame;
mod gpu;
mod readback;
mod surface;

pub use config::RendererConfig;
pub use depth::{DepthTarget, DEPTH_CLEAR, DEPTH_FORMAT};
pub use error::{FrameError, InitError, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use gpu::{Gpu, OFFSCREEN_FORMAT};
