//! Renders into an offscreen target and checks the pixels.
//!
//! Every test returns early when the machine exposes no GPU adapter
//! (including no software rasterizer).

use glint_engine::device::InitError;
use glint_engine::paint::Color;
use glint_engine::{Renderer, RendererState};

const W: u32 = 64;
const H: u32 = 64;

fn headless(width: u32, height: u32) -> Option<Renderer<'static>> {
    match pollster::block_on(Renderer::initialize_headless(width, height)) {
        Ok(r) => Some(r),
        Err(e @ (InitError::NoAdapter(_) | InitError::Device(_))) => {
            eprintln!("skipping GPU test: {e}");
            None
        }
        Err(e) => panic!("headless renderer failed to initialize: {e}"),
    }
}

fn pixel(bytes: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]
}

fn assert_close(got: [u8; 4], want: [u8; 4], what: &str) {
    let ok = got
        .iter()
        .zip(want.iter())
        .all(|(g, w)| (*g as i16 - *w as i16).abs() <= 2);
    assert!(ok, "{what}: got {got:?}, want {want:?}");
}

const BLACK: [u8; 4] = [0, 0, 0, 255];
const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

#[test]
fn zero_size_is_rejected_before_touching_the_gpu() {
    let err = pollster::block_on(Renderer::initialize_headless(0, 16)).err();
    assert!(matches!(err, Some(InitError::ZeroSize { width: 0, height: 16 })));
}

#[test]
fn clear_then_empty_submit_fills_target() {
    let Some(mut r) = headless(32, 16) else {
        return;
    };

    r.clear_screen(Color::rgb(0.2, 0.4, 0.6)).unwrap();
    let stats = r.submit().unwrap();
    assert_eq!(stats.requests, 0);
    assert_eq!(stats.passes, 0);

    let px = r.read_pixels().unwrap();
    assert_eq!(px.len(), 32 * 16 * 4);
    for y in 0..16 {
        for x in 0..32 {
            assert_close(pixel(&px, 32, x, y), [51, 102, 153, 255], "clear color");
        }
    }
}

#[test]
fn submit_empties_queue_and_releases_uniforms() {
    let Some(mut r) = headless(W, H) else { return };
    assert_eq!(r.state(), RendererState::Uninitialized);

    r.clear_screen(Color::BLACK).unwrap();
    for i in 0..4 {
        r.draw_quad((8.0 + i as f32 * 10.0, 8.0), (6.0, 6.0), Color::GREEN);
    }
    r.draw_circle((32.0, 40.0, 0.3), 8.0, Color::WHITE.with_alpha(0.4));
    assert_eq!(r.pending().len(), 5);
    assert_eq!(r.state(), RendererState::Ready);

    let stats = r.submit().unwrap();
    assert_eq!(stats.requests, 5);
    assert_eq!(stats.passes, 2);
    assert_eq!(stats.draw_calls, 4 * 2 + 64);

    assert!(r.pending().is_empty());
    assert_eq!(r.primitives().uniforms().live(), 0);
    assert_eq!(r.primitives().uniforms().created_total(), 5);
}

#[test]
fn pipelines_are_built_at_most_once_each() {
    let Some(mut r) = headless(W, H) else { return };

    for frame in 0..3 {
        r.clear_screen(Color::BLACK).unwrap();
        r.draw_quad((10.0, 10.0, 0.1), (4.0, 4.0), Color::RED);
        r.draw_quad((20.0, 10.0, 0.2), (4.0, 4.0), Color::RED.with_alpha(0.5));
        r.draw_circle((30.0, 30.0), 5.0, Color::BLUE);
        r.submit().unwrap();
        assert_eq!(r.primitives().pipelines().builds(), 2, "frame {frame}");
    }
    assert_eq!(r.frames_submitted(), 3);
}

#[test]
fn prepare_builds_everything_up_front() {
    let Some(mut r) = headless(W, H) else { return };
    r.prepare();
    assert_eq!(r.state(), RendererState::Ready);
    assert_eq!(r.primitives().pipelines().builds(), 2);

    r.clear_screen(Color::BLACK).unwrap();
    r.draw_quad((10.0, 10.0), (4.0, 4.0), Color::RED);
    r.submit().unwrap();
    assert_eq!(r.primitives().pipelines().builds(), 2);
}

#[test]
fn quad_is_centered_with_y_down() {
    let Some(mut r) = headless(W, H) else { return };

    r.clear_screen(Color::BLACK).unwrap();
    r.draw_quad((16.0, 8.0), (10.0, 10.0), Color::RED);
    r.submit().unwrap();

    let px = r.read_pixels().unwrap();
    assert_close(pixel(&px, W, 16, 8), RED, "quad center");
    assert_close(pixel(&px, W, 12, 4), RED, "inside top-left");
    assert_close(pixel(&px, W, 16, 56), BLACK, "mirrored position stays empty");
    assert_close(pixel(&px, W, 30, 8), BLACK, "outside right edge");
}

#[test]
fn circle_covers_center_but_not_bounding_corners() {
    let Some(mut r) = headless(W, H) else { return };

    r.clear_screen(Color::BLACK).unwrap();
    r.draw_circle((32.0, 32.0), 12.0, Color::BLUE);
    r.submit().unwrap();

    let px = r.read_pixels().unwrap();
    assert_close(pixel(&px, W, 32, 32), BLUE, "center");
    assert_close(pixel(&px, W, 32, 22), BLUE, "near top rim");
    assert_close(pixel(&px, W, 42, 32), BLUE, "near right rim");
    assert_close(pixel(&px, W, 22, 22), BLACK, "bounding box corner");
    assert_close(pixel(&px, W, 43, 43), BLACK, "bounding box corner");
}

#[test]
fn later_opaque_quad_wins_at_equal_depth() {
    let Some(mut r) = headless(W, H) else { return };

    r.clear_screen(Color::BLACK).unwrap();
    r.draw_quad((24.0, 24.0), (20.0, 20.0), Color::RED);
    r.draw_quad((32.0, 32.0), (20.0, 20.0), Color::BLUE);
    r.submit().unwrap();

    let px = r.read_pixels().unwrap();
    assert_close(pixel(&px, W, 18, 18), RED, "only A");
    assert_close(pixel(&px, W, 28, 28), BLUE, "overlap");
}

#[test]
fn nearer_opaque_quad_wins_regardless_of_order() {
    let Some(mut r) = headless(W, H) else { return };

    r.clear_screen(Color::BLACK).unwrap();
    r.draw_quad((32.0, 32.0, 0.8), (20.0, 20.0), Color::RED);
    r.draw_quad((32.0, 32.0, 0.2), (20.0, 20.0), Color::BLUE);
    r.submit().unwrap();

    let px = r.read_pixels().unwrap();
    assert_close(pixel(&px, W, 32, 32), RED, "larger z is nearer");
}

#[test]
fn transparent_in_front_adds_over_opaque() {
    let Some(mut r) = headless(W, H) else { return };

    r.clear_screen(Color::BLACK).unwrap();
    // Enqueued first, still composited after the opaque quad.
    r.draw_quad((32.0, 32.0, 0.8), (20.0, 20.0), Color::RED.with_alpha(0.5));
    r.draw_quad((32.0, 32.0, 0.2), (20.0, 20.0), Color::BLUE);
    r.submit().unwrap();

    let px = r.read_pixels().unwrap();
    assert_close(pixel(&px, W, 32, 32), [128, 0, 255, 128], "blended");
}

#[test]
fn transparent_quads_composite_back_to_front() {
    let Some(mut r) = headless(W, H) else { return };

    r.clear_screen(Color::BLACK).unwrap();
    // Near glass first: drawn in this order its depth write would reject the far one.
    r.draw_quad((32.0, 32.0, 0.8), (20.0, 20.0), Color::RED.with_alpha(0.5));
    r.draw_quad((32.0, 32.0, 0.3), (20.0, 20.0), Color::GREEN.with_alpha(0.5));
    r.submit().unwrap();

    let px = r.read_pixels().unwrap();
    assert_close(pixel(&px, W, 32, 32), [128, 128, 0, 128], "both layers summed");
}

#[test]
fn scale_factor_maps_logical_coordinates() {
    let Some(mut r) = headless(W, H) else { return };

    r.set_scale_factor(2.0);
    assert_eq!(r.viewport().width, 32.0);
    assert_eq!(r.viewport().height, 32.0);

    r.clear_screen(Color::BLACK).unwrap();
    // Logical 4..12 on both axes, physical 8..24.
    r.draw_quad((8.0, 8.0), (8.0, 8.0), Color::RED);
    r.submit().unwrap();

    let px = r.read_pixels().unwrap();
    assert_close(pixel(&px, W, 20, 20), RED, "inside the scaled quad");
    assert_close(pixel(&px, W, 10, 10), RED, "scaled top-left corner");
    assert_close(pixel(&px, W, 6, 6), BLACK, "outside the scaled quad");
    assert_close(pixel(&px, W, 28, 28), BLACK, "outside the scaled quad");
}

#[test]
fn transparent_behind_opaque_is_hidden() {
    let Some(mut r) = headless(W, H) else { return };

    r.clear_screen(Color::BLACK).unwrap();
    r.draw_quad((32.0, 32.0, 0.8), (20.0, 20.0), Color::BLUE);
    r.draw_quad((32.0, 32.0, 0.1), (20.0, 20.0), Color::RED.with_alpha(0.5));
    r.submit().unwrap();

    let px = r.read_pixels().unwrap();
    assert_close(pixel(&px, W, 32, 32), BLUE, "depth rejects the far glass");
}

#[test]
fn clear_screen_discards_pending_requests() {
    let Some(mut r) = headless(W, H) else { return };

    r.draw_quad((32.0, 32.0), (20.0, 20.0), Color::RED);
    r.clear_screen(Color::BLACK).unwrap();
    assert!(r.pending().is_empty());
    r.submit().unwrap();

    let px = r.read_pixels().unwrap();
    assert_close(pixel(&px, W, 32, 32), BLACK, "discarded quad");
}

#[test]
fn resize_rebuilds_targets() {
    let Some(mut r) = headless(W, H) else { return };

    r.resize(20, 10);
    assert_eq!(r.size(), (20, 10));

    r.clear_screen(Color::WHITE).unwrap();
    r.submit().unwrap();
    let px = r.read_pixels().unwrap();
    assert_eq!(px.len(), 20 * 10 * 4);
    assert_close(pixel(&px, 20, 19, 9), [255, 255, 255, 255], "corner");
}
