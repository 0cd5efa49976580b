use anyhow::Result;

use glint_engine::core::{App, AppControl, FrameCtx};
use glint_engine::device::{FrameError, RendererConfig};
use glint_engine::logging::{init_logging, LoggingConfig};
use glint_engine::paint::Color;
use glint_engine::window::{LogicalSize, Runtime, RuntimeConfig};

/// Arcade playfield, in pixels.
const PLAYFIELD: (f64, f64) = (224.0, 288.0);

/// Static test scene: a red invader, a green ground line and a blue shield,
/// with a translucent "beam" drifting across them.
#[derive(Default)]
struct Invaders {
    elapsed: f32,
}

impl Invaders {
    fn draw(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<(), FrameError> {
        self.elapsed += ctx.time.dt;
        let r = &mut *ctx.renderer;

        r.clear_screen(Color::BLACK)?;

        r.draw_quad((100.0, 100.0), (50.0, 50.0), Color::RED);
        r.draw_quad((100.0, 200.0), (190.0, 5.0), Color::GREEN);
        r.draw_quad((130.0, 130.0), (50.0, 50.0), Color::BLUE);

        let x = 112.0 + 60.0 * self.elapsed.sin();
        r.draw_circle((x, 150.0, 0.5), 24.0, Color::rgba(1.0, 1.0, 0.0, 0.5));

        r.submit()?;
        Ok(())
    }
}

impl App for Invaders {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let result = self.draw(ctx);
        ctx.control(result)
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("starting glint-invaders");

    Runtime::run(
        RuntimeConfig {
            title: "glint invaders".to_string(),
            initial_size: LogicalSize::new(PLAYFIELD.0, PLAYFIELD.1),
            resizable: false,
        },
        RendererConfig::default(),
        Invaders::default(),
    )
}
