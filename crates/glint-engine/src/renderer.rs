use crate::coords::{Position, Size, Viewport};
use crate::device::{FrameError, Gpu, GpuFrame, InitError, RendererConfig, DEPTH_FORMAT};
use crate::paint::Color;
use crate::render::{FramePlan, PrimitiveRenderer, RenderCtx, RenderTarget};
use crate::scene::{DrawRequest, FrameRenderQueue};

/// Lifecycle of the lazily built GPU resources.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererState {
    /// Device ready, no pipeline or geometry buffer built yet.
    Uninitialized,
    /// At least one pipeline and geometry buffer exist. Never goes back.
    Ready,
}

/// Counts for one `submit()`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub requests: usize,
    pub passes: usize,
    pub draw_calls: u32,
}

/// Immediate-mode primitive renderer.
///
/// Per frame: `clear_screen` → any number of `draw_quad`/`draw_circle` →
/// `submit`. Draw calls only enqueue; all GPU work for them happens in
/// `submit`, which never waits for the GPU to finish.
pub struct Renderer<'w> {
    gpu: Gpu<'w>,
    primitives: PrimitiveRenderer,
    queue: FrameRenderQueue,

    /// Frame acquired by `clear_screen` and still waiting for `submit`.
    frame: Option<GpuFrame>,
    state: RendererState,
    frames_submitted: u64,

    /// Physical pixels per logical pixel of the color target.
    scale_factor: f64,
}

impl<'w> Renderer<'w> {
    /// Creates a renderer drawing into a presentable target (usually a window)
    /// with default settings.
    ///
    /// `width`/`height` are the target's physical size. Draw coordinates are
    /// logical pixels; see [`Renderer::set_scale_factor`].
    pub async fn initialize(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        width: u32,
        height: u32,
    ) -> Result<Self, InitError> {
        Self::initialize_with(target, width, height, RendererConfig::default()).await
    }

    pub async fn initialize_with(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        width: u32,
        height: u32,
        config: RendererConfig,
    ) -> Result<Self, InitError> {
        let gpu = Gpu::new(target, width, height, config).await?;
        Ok(Self::from_gpu(gpu))
    }

    fn from_gpu(gpu: Gpu<'w>) -> Self {
        let primitives = PrimitiveRenderer::new(gpu.surface_format(), DEPTH_FORMAT);
        Self {
            gpu,
            primitives,
            queue: FrameRenderQueue::new(),
            frame: None,
            state: RendererState::Uninitialized,
            frames_submitted: 0,
            scale_factor: 1.0,
        }
    }

    /// Builds all pipelines and geometry buffers now instead of on first draw.
    pub fn prepare(&mut self) {
        self.primitives.prepare(self.gpu.device());
        self.mark_ready();
    }

    /// Discards pending requests and clears color to `color` and depth to the
    /// far plane.
    ///
    /// The acquired frame is kept for the following `submit()`.
    pub fn clear_screen(&mut self, color: impl Into<Color>) -> Result<(), FrameError> {
        let discarded = self.queue.discard();
        if discarded > 0 {
            log::debug!("clear_screen discarded {discarded} pending draw requests");
        }

        let frame = self.take_frame()?;

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("glint clear encoder"),
            });
        {
            let mut target =
                RenderTarget::new(&mut encoder, &frame.view, self.gpu.depth_view());
            self.primitives.clear(&mut target, color.into());
        }
        self.gpu.queue().submit(Some(encoder.finish()));

        self.frame = Some(frame);
        Ok(())
    }

    /// Enqueues an axis-aligned quad centered on `position`.
    pub fn draw_quad(
        &mut self,
        position: impl Into<Position>,
        dimensions: impl Into<Size>,
        color: impl Into<Color>,
    ) {
        self.enqueue(DrawRequest::quad(position, dimensions, color));
    }

    /// Enqueues a filled circle centered on `position`.
    pub fn draw_circle(
        &mut self,
        position: impl Into<Position>,
        radius: f32,
        color: impl Into<Color>,
    ) {
        self.enqueue(DrawRequest::circle(position, radius, color));
    }

    fn enqueue(&mut self, request: DrawRequest) {
        self.primitives
            .warm(self.gpu.device(), request.kind(), request.medium());
        self.mark_ready();
        self.queue.enqueue(request);
    }

    /// Encodes every pending request, submits one command buffer and presents.
    ///
    /// The queue is empty afterwards, including when the frame could not be
    /// acquired.
    pub fn submit(&mut self) -> Result<FrameStats, FrameError> {
        let plan = FramePlan::build(self.queue.drain());

        let (width, height) = self.gpu.size();
        if width == 0 || height == 0 {
            log::trace!("submit skipped: zero-sized target");
            self.frame = None;
            return Ok(FrameStats::default());
        }

        let frame = self.take_frame()?;

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("glint frame encoder"),
            });

        let transients = {
            let ctx = RenderCtx::new(self.gpu.device(), self.viewport());
            let mut target =
                RenderTarget::new(&mut encoder, &frame.view, self.gpu.depth_view());
            self.primitives.render(&ctx, &mut target, &plan)
        };

        self.gpu.queue().submit(Some(encoder.finish()));
        self.primitives.release(transients);
        frame.present();

        let stats = FrameStats {
            requests: plan.request_count(),
            passes: plan.passes().len(),
            draw_calls: plan.draw_call_count(),
        };
        self.frames_submitted += 1;
        log::trace!(
            "frame {}: {} requests, {} passes, {} draws",
            self.frames_submitted,
            stats.requests,
            stats.passes,
            stats.draw_calls
        );

        Ok(stats)
    }

    /// Resizes the color and depth targets. A held frame is dropped unpresented.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.frame = None;
        self.gpu.resize(width, height);
    }

    /// Sets the physical-per-logical pixel ratio of the target.
    ///
    /// Draw coordinates are logical pixels: with a factor of 2 a quad at
    /// `(10, 10)` lands on physical pixel `(20, 20)`.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Logical drawing space that positions and sizes are expressed in.
    pub fn viewport(&self) -> Viewport {
        let (width, height) = self.gpu.size();
        Viewport::from_physical(width, height, self.scale_factor)
    }

    /// Reads the offscreen color target back as tightly packed RGBA8 rows.
    ///
    /// Only available on renderers created with `initialize_headless`.
    pub fn read_pixels(&self) -> Result<Vec<u8>, FrameError> {
        self.gpu.read_pixels()
    }

    #[inline]
    pub fn state(&self) -> RendererState {
        self.state
    }

    /// Requests enqueued since the last `submit` or `clear_screen`.
    #[inline]
    pub fn pending(&self) -> &[DrawRequest] {
        self.queue.pending()
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.gpu.size()
    }

    #[inline]
    pub fn gpu(&self) -> &Gpu<'w> {
        &self.gpu
    }

    #[inline]
    pub fn primitives(&self) -> &PrimitiveRenderer {
        &self.primitives
    }

    #[inline]
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    fn mark_ready(&mut self) {
        if self.state == RendererState::Uninitialized {
            log::debug!("renderer ready");
            self.state = RendererState::Ready;
        }
    }

    fn take_frame(&mut self) -> Result<GpuFrame, FrameError> {
        if let Some(frame) = self.frame.take() {
            return Ok(frame);
        }

        match self.gpu.begin_frame() {
            Ok(frame) => Ok(frame),
            Err(source) => {
                let action = self.gpu.handle_surface_error(&source);
                log::warn!("frame dropped: {source} ({action:?})");
                Err(FrameError::Surface { source, action })
            }
        }
    }
}

impl Renderer<'static> {
    /// Creates a renderer drawing into an offscreen `Rgba8Unorm` texture.
    pub async fn initialize_headless(width: u32, height: u32) -> Result<Self, InitError> {
        Self::initialize_headless_with(width, height, RendererConfig::headless()).await
    }

    pub async fn initialize_headless_with(
        width: u32,
        height: u32,
        config: RendererConfig,
    ) -> Result<Self, InitError> {
        let gpu = Gpu::new_headless(width, height, config).await?;
        Ok(Self::from_gpu(gpu))
    }
}
