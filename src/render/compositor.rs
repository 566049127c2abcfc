use crate::{
    assets::store::{FrameStore, PreparedImage},
    foundation::core::{Affine, FrameIndex, Rect, Size, Vec2, Viewport},
    foundation::error::ScrollseqResult,
    render::surface::DrawSurface,
};

/// Placement of an image scaled to cover a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    /// Uniform scale factor applied to the image.
    pub ratio: f64,
    /// Image size after scaling.
    pub scaled: Size,
    /// Top-left corner of the scaled image; negative components crop that edge.
    pub offset: Vec2,
}

impl CoverFit {
    /// Destination rectangle on the surface.
    pub fn dest_rect(&self) -> Rect {
        Rect::from_origin_size(self.offset.to_point(), self.scaled)
    }

    /// Maps image pixel space onto the surface.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.ratio)
    }
}

/// Scale `image` to fill `surface` completely while preserving aspect ratio, centered.
///
/// Returns `None` when either side of either size is zero.
pub fn cover_fit(surface: Viewport, image: (u32, u32)) -> Option<CoverFit> {
    let (iw, ih) = image;
    if surface.is_empty() || iw == 0 || ih == 0 {
        return None;
    }
    let sw = f64::from(surface.width);
    let sh = f64::from(surface.height);
    let iw = f64::from(iw);
    let ih = f64::from(ih);

    let ratio = (sw / iw).max(sh / ih);
    let scaled = Size::new(iw * ratio, ih * ratio);
    let offset = Vec2::new((sw - scaled.width) / 2.0, (sh - scaled.height) / 2.0);
    Some(CoverFit {
        ratio,
        scaled,
        offset,
    })
}

/// What the compositor has put on the surface so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositorState {
    /// Nothing drawn yet.
    #[default]
    Idle,
    /// The surface shows this frame.
    Drawn(FrameIndex),
}

/// Why a render call left the surface untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The frame is out of range, still loading, or failed to load.
    NotReady,
    /// The surface has no pixels to draw into.
    EmptySurface,
}

/// Result of [`Compositor::render`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Surface cleared and redrawn with this frame.
    Drawn(FrameIndex),
    /// No pixels changed.
    Skipped(SkipReason),
}

/// Draws frames from a [`FrameStore`] onto a [`DrawSurface`] with cover fit.
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    state: CompositorState,
    draws: u64,
}

impl Compositor {
    /// Create an idle compositor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> CompositorState {
        self.state
    }

    /// Number of completed draws.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    /// Forget what was drawn; the surface pixels were discarded behind the compositor's back.
    pub fn invalidate(&mut self) {
        self.state = CompositorState::Idle;
    }

    /// Redraw `frame` if its image is ready; otherwise leave the previous pixels in place.
    ///
    /// Call [`Compositor::invalidate`] first when the surface was reallocated.
    pub fn render<S: DrawSurface + ?Sized>(
        &mut self,
        frame: FrameIndex,
        store: &FrameStore,
        surface: &mut S,
    ) -> ScrollseqResult<RenderOutcome> {
        let Some(image) = store.get(frame) else {
            return Ok(RenderOutcome::Skipped(SkipReason::NotReady));
        };
        self.draw(frame, image, surface)
    }

    fn draw<S: DrawSurface + ?Sized>(
        &mut self,
        frame: FrameIndex,
        image: &PreparedImage,
        surface: &mut S,
    ) -> ScrollseqResult<RenderOutcome> {
        let Some(fit) = cover_fit(surface.viewport(), (image.width, image.height)) else {
            return Ok(RenderOutcome::Skipped(SkipReason::EmptySurface));
        };

        surface.clear();
        surface.draw_image(image, &fit)?;

        self.state = CompositorState::Drawn(frame);
        self.draws += 1;
        tracing::trace!(%frame, ratio = fit.ratio, "frame drawn");
        Ok(RenderOutcome::Drawn(frame))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
