use crate::device::FrameError;
use crate::renderer::Renderer;
use crate::time::FrameTime;

use super::app::AppControl;

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Renderer<'w>`
pub struct FrameCtx<'a, 'w> {
    pub renderer: &'a mut Renderer<'w>,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// Maps a frame result onto loop control: fatal surface errors end the
    /// loop, anything else only loses this frame.
    pub fn control<T>(&self, result: Result<T, FrameError>) -> AppControl {
        match result {
            Ok(_) => AppControl::Continue,
            Err(e) if e.is_fatal() => {
                log::error!("frame {} failed fatally: {e}", self.time.frame_index);
                AppControl::Exit
            }
            Err(e) => {
                log::debug!("frame {} skipped: {e}", self.time.frame_index);
                AppControl::Continue
            }
        }
    }
}
