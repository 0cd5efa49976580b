use wgpu::SurfaceError;

use super::depth::DepthTarget;
use super::surface;
use super::{FrameError, GpuFrame, InitError, RendererConfig, SurfaceErrorAction};

/// Color format of offscreen targets. Unorm so readback bytes map 1:1 to channels.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

enum ColorTarget<'w> {
    Surface {
        surface: wgpu::Surface<'w>,
        config: wgpu::SurfaceConfiguration,
    },
    Offscreen {
        texture: wgpu::Texture,
    },
}

/// Owns wgpu core objects plus the color and depth targets.
///
/// This type is the low-level rendering context:
/// - creates and stores Device/Queue
/// - creates and configures the color target (window surface or offscreen texture)
/// - keeps a depth target sized to match the color target
/// - acquires per-frame color views
pub struct Gpu<'w> {
    device: wgpu::Device,
    queue: wgpu::Queue,

    color: ColorTarget<'w>,
    format: wgpu::TextureFormat,
    depth: DepthTarget,

    /// Current drawable size in physical pixels.
    size: (u32, u32),
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a presentable surface target (usually a window).
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        width: u32,
        height: u32,
        config: RendererConfig,
    ) -> Result<Self, InitError> {
        if width == 0 || height == 0 {
            return Err(InitError::ZeroSize { width, height });
        }

        let instance = new_instance();
        let surface = instance.create_surface(target).map_err(InitError::Surface)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(InitError::NoAdapter)?;

        let (device, queue) = request_device(&adapter, &config).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, config.prefer_srgb)
            .ok_or(InitError::NoSurfaceFormat)?;
        let alpha_mode = surface::choose_alpha_mode(&caps, config.alpha_mode);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: config.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: config.desired_maximum_frame_latency,
        };
        surface.configure(&device, &surface_config);

        log::info!(
            "gpu ready: adapter={:?} backend={:?} format={format:?} size={width}x{height}",
            adapter.get_info().name,
            adapter.get_info().backend,
        );

        let depth = DepthTarget::new(&device, width, height);

        Ok(Self {
            device,
            queue,
            color: ColorTarget::Surface {
                surface,
                config: surface_config,
            },
            format,
            depth,
            size: (width, height),
        })
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the color target format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        self.depth.view()
    }

    /// Resizes the color target and rebuilds the depth target to match.
    ///
    /// wgpu does not support a 0x0 surface; in that case only the recorded size
    /// changes and configuration is deferred.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        if width == 0 || height == 0 {
            return;
        }

        match &mut self.color {
            ColorTarget::Surface { surface, config } => {
                config.width = width;
                config.height = height;
                surface.configure(&self.device, config);
            }
            ColorTarget::Offscreen { texture } => {
                *texture = create_offscreen_texture(&self.device, width, height);
            }
        }

        self.depth = DepthTarget::new(&self.device, width, height);
        log::debug!("gpu targets resized to {width}x{height}");
    }

    /// Acquires the color view for the next frame.
    pub fn begin_frame(&self) -> Result<GpuFrame, SurfaceError> {
        match &self.color {
            ColorTarget::Surface { surface, .. } => {
                let surface_texture = surface.get_current_texture()?;
                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                Ok(GpuFrame {
                    surface_texture: Some(surface_texture),
                    view,
                })
            }
            ColorTarget::Offscreen { texture } => Ok(GpuFrame {
                surface_texture: None,
                view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            }),
        }
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: &SurfaceError) -> SurfaceErrorAction {
        match &self.color {
            ColorTarget::Surface { surface, config } => {
                surface::map_surface_error(surface, &self.device, config, err)
            }
            ColorTarget::Offscreen { .. } => SurfaceErrorAction::SkipFrame,
        }
    }

    /// Reads the offscreen color target back as tightly packed RGBA8 rows.
    pub fn read_pixels(&self) -> Result<Vec<u8>, FrameError> {
        match &self.color {
            ColorTarget::Offscreen { texture } => {
                super::readback::read_rgba8(&self.device, &self.queue, texture)
            }
            ColorTarget::Surface { .. } => Err(FrameError::NotOffscreen),
        }
    }
}

impl Gpu<'static> {
    /// Creates a GPU context that renders into an offscreen texture.
    pub async fn new_headless(
        width: u32,
        height: u32,
        config: RendererConfig,
    ) -> Result<Self, InitError> {
        if width == 0 || height == 0 {
            return Err(InitError::ZeroSize { width, height });
        }

        let instance = new_instance();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(InitError::NoAdapter)?;

        let (device, queue) = request_device(&adapter, &config).await?;

        log::info!(
            "headless gpu ready: adapter={:?} backend={:?} size={width}x{height}",
            adapter.get_info().name,
            adapter.get_info().backend,
        );

        let texture = create_offscreen_texture(&device, width, height);
        let depth = DepthTarget::new(&device, width, height);

        Ok(Self {
            device,
            queue,
            color: ColorTarget::Offscreen { texture },
            format: OFFSCREEN_FORMAT,
            depth,
            size: (width, height),
        })
    }
}

fn new_instance() -> wgpu::Instance {
    // Use all backends to allow wgpu to select the optimal platform backend.
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

async fn request_device(
    adapter: &wgpu::Adapter,
    config: &RendererConfig,
) -> Result<(wgpu::Device, wgpu::Queue), InitError> {
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("glint device"),
            required_features: wgpu::Features::empty(),
            required_limits: config.required_limits.clone().using_resolution(adapter.limits()),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .map_err(InitError::Device)
}

fn create_offscreen_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("glint offscreen color target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OFFSCREEN_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}
