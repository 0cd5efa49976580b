/// Color target for one frame.
///
/// Short-lived: holding a surface texture blocks acquisition of the next one,
/// so the renderer presents it at the end of `submit()`.
pub struct GpuFrame {
    /// `None` for offscreen targets.
    pub surface_texture: Option<wgpu::SurfaceTexture>,
    pub view: wgpu::TextureView,
}

impl GpuFrame {
    /// Presents the frame to the window. No-op for offscreen targets.
    pub fn present(self) {
        drop(self.view);
        if let Some(surface_texture) = self.surface_texture {
            surface_texture.present();
        }
    }
}
