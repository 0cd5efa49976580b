use thiserror::Error;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// Renderer initialization failure. Always fatal for the caller.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("render target has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },

    #[error("failed to create wgpu surface")]
    Surface(#[source] wgpu::CreateSurfaceError),

    #[error("failed to find a suitable GPU adapter")]
    NoAdapter(#[source] wgpu::RequestAdapterError),

    #[error("failed to create wgpu device/queue")]
    Device(#[source] wgpu::RequestDeviceError),

    #[error("surface is not compatible with the selected adapter")]
    NoSurfaceFormat,
}

/// A frame that could not be produced. Later frames are unaffected.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("failed to acquire the next frame (action: {action:?})")]
    Surface {
        #[source]
        source: wgpu::SurfaceError,
        action: SurfaceErrorAction,
    },

    #[error("pixel readback requires an offscreen render target")]
    NotOffscreen,

    #[error("device poll failed during readback")]
    Poll(#[source] wgpu::PollError),

    #[error("readback buffer could not be mapped")]
    Map(#[source] wgpu::BufferAsyncError),

    #[error("readback callback was dropped before completing")]
    ReadbackDropped,
}

impl FrameError {
    /// True when the caller should stop rendering altogether.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FrameError::Surface {
                action: SurfaceErrorAction::Fatal,
                ..
            }
        )
    }
}
