use crate::{
    assets::store::PreparedImage,
    eval::scroll::ScrollProgress,
    foundation::core::FrameIndex,
    foundation::error::ScrollseqResult,
    render::compositor::SkipReason,
};

/// Input to [`crate::ScrollSession::dispatch`].
#[derive(Debug)]
pub enum ScrollEvent {
    /// Scroll position update with its own distance or as a fraction.
    Scrolled(ScrollProgress),
    /// Raw pixel offset measured against the session's configured span.
    ScrolledTo(f64),
    /// Drawing surface size changed.
    Resized {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// A background frame load finished.
    FrameLoaded {
        /// Frame the load was for.
        index: FrameIndex,
        /// Decoded image, or why it could not be loaded.
        result: ScrollseqResult<PreparedImage>,
    },
}

/// What a dispatched event did to the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The surface was redrawn with this frame.
    Redrawn(FrameIndex),
    /// A redraw of this frame was wanted but nothing was drawn.
    Skipped(FrameIndex, SkipReason),
    /// Nothing needed redrawing.
    Unchanged,
    /// The event carried unusable values and was dropped.
    Ignored,
}

impl DispatchOutcome {
    /// Return `true` for [`DispatchOutcome::Redrawn`].
    pub fn is_redraw(self) -> bool {
        matches!(self, Self::Redrawn(_))
    }
}
