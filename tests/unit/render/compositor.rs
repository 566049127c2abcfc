use super::*;
use crate::foundation::core::FrameCount;
use crate::foundation::error::ScrollseqError;
use crate::render::surface::FrameRGBA;

#[derive(Default)]
struct RecordingSurface {
    viewport: Option<Viewport>,
    ops: Vec<String>,
}

impl RecordingSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Some(Viewport::new(width, height)),
            ops: Vec::new(),
        }
    }
}

impl DrawSurface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport.unwrap_or(Viewport::new(0, 0))
    }

    fn resize(&mut self, viewport: Viewport) -> ScrollseqResult<()> {
        self.viewport = Some(viewport);
        self.ops.push(format!("resize {}x{}", viewport.width, viewport.height));
        Ok(())
    }

    fn clear(&mut self) {
        self.ops.push("clear".to_string());
    }

    fn draw_image(&mut self, image: &PreparedImage, fit: &CoverFit) -> ScrollseqResult<()> {
        self.ops.push(format!(
            "draw {}x{} at {},{} x{}",
            image.width, image.height, fit.offset.x, fit.offset.y, fit.ratio
        ));
        Ok(())
    }

    fn readback_rgba8(&self) -> FrameRGBA {
        let vp = self.viewport();
        FrameRGBA {
            width: vp.width,
            height: vp.height,
            data: vec![0; vp.width as usize * vp.height as usize * 4],
            premultiplied: true,
        }
    }
}

fn store_with(n: usize, ready: &[(usize, u32, u32)]) -> FrameStore {
    let mut s = FrameStore::new(FrameCount::new(n).unwrap());
    for &(i, w, h) in ready {
        s.complete(FrameIndex(i), Ok(PreparedImage::solid(w, h, [255, 0, 0, 255])));
    }
    s
}

#[test]
fn cover_fit_square_into_landscape() {
    let fit = cover_fit(Viewport::new(800, 600), (400, 400)).unwrap();
    assert_eq!(fit.ratio, 1.5);
    assert_eq!(fit.scaled, Size::new(600.0, 600.0));
    assert_eq!(fit.offset, Vec2::new(100.0, 0.0));
    assert_eq!(fit.dest_rect(), Rect::new(100.0, 0.0, 700.0, 600.0));
}

#[test]
fn cover_fit_crops_overflow_with_negative_offsets() {
    let fit = cover_fit(Viewport::new(800, 600), (1920, 1080)).unwrap();
    assert_eq!(fit.ratio, 600.0 / 1080.0);
    assert!((fit.scaled.width - 1066.666_666).abs() < 1e-3);
    assert_eq!(fit.scaled.height, 600.0);
    assert!(fit.offset.x < 0.0);
    assert_eq!(fit.offset.y, 0.0);
    assert!((fit.offset.x * 2.0 + fit.scaled.width - 800.0).abs() < 1e-9);
}

#[test]
fn cover_fit_transform_maps_image_corners() {
    let fit = cover_fit(Viewport::new(800, 600), (400, 400)).unwrap();
    let t = fit.transform();
    assert_eq!(t * kurbo::Point::new(0.0, 0.0), kurbo::Point::new(100.0, 0.0));
    assert_eq!(
        t * kurbo::Point::new(400.0, 400.0),
        kurbo::Point::new(700.0, 600.0)
    );
}

#[test]
fn cover_fit_rejects_zero_sizes() {
    assert!(cover_fit(Viewport::new(0, 600), (10, 10)).is_none());
    assert!(cover_fit(Viewport::new(800, 600), (0, 10)).is_none());
}

#[test]
fn not_ready_frame_leaves_surface_untouched() {
    let store = store_with(3, &[(0, 4, 4)]);
    let mut surface = RecordingSurface::new(8, 8);
    let mut c = Compositor::new();

    let out = c.render(FrameIndex(1), &store, &mut surface).unwrap();
    assert_eq!(out, RenderOutcome::Skipped(SkipReason::NotReady));
    assert!(surface.ops.is_empty());
    assert_eq!(c.state(), CompositorState::Idle);

    let out = c.render(FrameIndex(7), &store, &mut surface).unwrap();
    assert_eq!(out, RenderOutcome::Skipped(SkipReason::NotReady));
    assert!(surface.ops.is_empty());
}

#[test]
fn ready_frame_clears_then_draws() {
    let store = store_with(3, &[(2, 400, 400)]);
    let mut surface = RecordingSurface::new(800, 600);
    let mut c = Compositor::new();

    let out = c.render(FrameIndex(2), &store, &mut surface).unwrap();
    assert_eq!(out, RenderOutcome::Drawn(FrameIndex(2)));
    assert_eq!(surface.ops, vec!["clear", "draw 400x400 at 100,0 x1.5"]);
    assert_eq!(c.state(), CompositorState::Drawn(FrameIndex(2)));
    assert_eq!(c.draw_count(), 1);
}

#[test]
fn skipped_render_keeps_previous_state() {
    let store = store_with(3, &[(0, 2, 2)]);
    let mut surface = RecordingSurface::new(4, 4);
    let mut c = Compositor::new();
    c.render(FrameIndex(0), &store, &mut surface).unwrap();
    c.render(FrameIndex(1), &store, &mut surface).unwrap();
    assert_eq!(c.state(), CompositorState::Drawn(FrameIndex(0)));
    assert_eq!(c.draw_count(), 1);
}

#[test]
fn invalidate_returns_to_idle_and_allows_redraw_of_same_frame() {
    let store = store_with(1, &[(0, 2, 2)]);
    let mut surface = RecordingSurface::new(4, 4);
    let mut c = Compositor::new();
    c.render(FrameIndex(0), &store, &mut surface).unwrap();

    c.invalidate();
    assert_eq!(c.state(), CompositorState::Idle);
    assert_eq!(c.draw_count(), 1);

    let out = c.render(FrameIndex(0), &store, &mut surface).unwrap();
    assert_eq!(out, RenderOutcome::Drawn(FrameIndex(0)));
    assert_eq!(c.state(), CompositorState::Drawn(FrameIndex(0)));
}

#[test]
fn empty_surface_is_skipped() {
    let store = store_with(1, &[(0, 2, 2)]);
    let mut surface = RecordingSurface::default();
    let mut c = Compositor::new();
    let out = c.render(FrameIndex(0), &store, &mut surface).unwrap();
    assert_eq!(out, RenderOutcome::Skipped(SkipReason::EmptySurface));
    assert!(surface.ops.is_empty());
}

#[test]
fn failed_frame_is_skipped() {
    let mut store = store_with(2, &[]);
    store.complete(FrameIndex(0), Err(ScrollseqError::decode("bad")));
    let mut surface = RecordingSurface::new(4, 4);
    let mut c = Compositor::new();
    let out = c.render(FrameIndex(0), &store, &mut surface).unwrap();
    assert_eq!(out, RenderOutcome::Skipped(SkipReason::NotReady));
}
