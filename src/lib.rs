//! scrollseq scrubs a pre-rendered image sequence by scroll position.
//!
//! A long scroll region acts as the timeline of an animation stored as N still frames. Each
//! scroll update is quantized to one frame, and that frame is drawn onto a fixed-size surface
//! scaled to cover it (fill, keep aspect ratio, crop the overflow, center).
//!
//! # Pipeline overview
//!
//! 1. **Load**: [`FrameLoader`] decodes every frame in the background; completions arrive as
//!    [`ScrollEvent::FrameLoaded`] and are recorded in the [`FrameStore`].
//! 2. **Map**: [`ScrollMapper`] turns scroll progress into a [`FrameIndex`],
//!    `round(offset / distance * (count - 1))`, emitting only when the frame changes.
//! 3. **Composite**: [`Compositor`] clears the [`DrawSurface`] and draws the frame with
//!    [`cover_fit`], or leaves the surface untouched when the frame is not ready yet.
//!
//! [`ScrollSession`] owns all three and applies [`ScrollEvent`]s one at a time.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod eval;
mod foundation;
mod render;
mod sequence;
mod session;

pub use assets::decode::{decode_image, decode_image_file};
pub use assets::loader::{DirFrameSource, FrameLoader, FrameSource};
pub use assets::path::{DEFAULT_PAD_WIDTH, FramePathPattern, frame_path};
pub use assets::store::{FrameSlot, FrameStore, PreparedImage};
pub use eval::scroll::{
    ScrollMapper, ScrollProgress, ScrollSpan, frame_for_fraction, frame_for_offset,
};
pub use foundation::core::{
    Affine, FrameCount, FrameIndex, Rect, Rgba8Premul, Size, Vec2, Viewport,
};
pub use foundation::error::{ScrollseqError, ScrollseqResult};
pub use render::compositor::{
    Compositor, CompositorState, CoverFit, RenderOutcome, SkipReason, cover_fit,
};
pub use render::cpu::{CpuSurface, SurfaceSettings};
pub use render::surface::{DrawSurface, FrameRGBA};
pub use sequence::model::SequenceConfig;
pub use session::event::{DispatchOutcome, ScrollEvent};
pub use session::scroll_session::{EventQueue, ScrollSession};
