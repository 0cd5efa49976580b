//! Frame draw stream.
//!
//! Responsibilities:
//! - describe one primitive per `DrawRequest`, with its light medium resolved up front
//! - accumulate requests for the current frame (`FrameRenderQueue`)
//! - provide deterministic back-to-front order for translucent requests

mod depth_sort;
mod queue;
mod request;

pub use depth_sort::{order_for_compositing, DepthKey};
pub use queue::FrameRenderQueue;
pub use request::{DrawRequest, LightMedium, PrimitiveKind};
