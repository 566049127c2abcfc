use crate::foundation::core::{FrameCount, FrameIndex, Viewport};
use crate::foundation::error::{ScrollseqError, ScrollseqResult};

/// Scroll position reported by the host scroller.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollProgress {
    /// Raw offset into a scroll region of `distance` pixels.
    Offset {
        /// Pixels scrolled since the start of the region.
        offset: f64,
        /// Total scrollable distance of the region.
        distance: f64,
    },
    /// Normalized position in `[0, 1]`.
    Fraction(f64),
}

impl ScrollProgress {
    /// Normalized position, clamped into `[0, 1]`.
    ///
    /// Non-finite inputs and a non-positive `distance` map to `0.0`.
    pub fn fraction(self) -> f64 {
        let f = match self {
            Self::Offset { offset, distance } => {
                if !distance.is_finite() || distance <= 0.0 {
                    return 0.0;
                }
                offset / distance
            }
            Self::Fraction(f) => f,
        };
        if f.is_nan() { 0.0 } else { f.clamp(0.0, 1.0) }
    }
}

/// Length of the scroll region the sequence is scrubbed over.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollSpan {
    /// Fixed distance in pixels.
    Pixels(f64),
    /// Multiple of the viewport height (`6.0` scrubs over six screens).
    ViewportHeights(f64),
}

impl Default for ScrollSpan {
    fn default() -> Self {
        Self::ViewportHeights(6.0)
    }
}

impl ScrollSpan {
    /// Reject non-finite or non-positive spans.
    pub fn validate(self) -> ScrollseqResult<()> {
        let v = match self {
            Self::Pixels(v) | Self::ViewportHeights(v) => v,
        };
        if !v.is_finite() || v <= 0.0 {
            return Err(ScrollseqError::validation(
                "scroll span must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Scroll distance in pixels for a viewport.
    pub fn distance(self, viewport: Viewport) -> f64 {
        match self {
            Self::Pixels(px) => px,
            Self::ViewportHeights(n) => n * f64::from(viewport.height),
        }
    }
}

/// Quantize a fraction in `[0, 1]` to the nearest frame.
pub fn frame_for_fraction(fraction: f64, count: FrameCount) -> FrameIndex {
    let f = ScrollProgress::Fraction(fraction).fraction();
    let last = count.last().0 as f64;
    count.clamp(FrameIndex((f * last).round() as usize))
}

/// `round(clamp(offset, 0, distance) / distance * (count - 1))`.
///
/// A zero, negative or non-finite `distance` yields frame 0.
pub fn frame_for_offset(offset: f64, distance: f64, count: FrameCount) -> FrameIndex {
    frame_for_fraction(ScrollProgress::Offset { offset, distance }.fraction(), count)
}

/// Turns scroll updates into frame changes.
///
/// Only emits when the quantized frame differs from the last emitted one; scrolling back
/// simply runs the same formula, so any offset always maps to the same frame.
#[derive(Clone, Debug)]
pub struct ScrollMapper {
    count: FrameCount,
    span: ScrollSpan,
    distance: f64,
    current: FrameIndex,
    emitted: Option<FrameIndex>,
}

impl ScrollMapper {
    /// Create a mapper sized for `viewport`. Starts at frame 0 with nothing emitted.
    pub fn new(count: FrameCount, span: ScrollSpan, viewport: Viewport) -> ScrollseqResult<Self> {
        span.validate()?;
        Ok(Self {
            count,
            span,
            distance: span.distance(viewport),
            current: FrameIndex(0),
            emitted: None,
        })
    }

    /// Frame derived from the latest scroll update.
    pub fn current(&self) -> FrameIndex {
        self.current
    }

    /// Current scroll distance in pixels.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Frame count this mapper quantizes to.
    pub fn count(&self) -> FrameCount {
        self.count
    }

    /// Apply a scroll update, returning the new frame when it changed.
    pub fn update(&mut self, progress: ScrollProgress) -> Option<FrameIndex> {
        let frame = frame_for_fraction(progress.fraction(), self.count);
        self.current = frame;
        if self.emitted == Some(frame) {
            return None;
        }
        self.emitted = Some(frame);
        Some(frame)
    }

    /// Apply a raw pixel offset measured against the configured span.
    pub fn update_offset(&mut self, offset: f64) -> Option<FrameIndex> {
        self.update(ScrollProgress::Offset {
            offset,
            distance: self.distance,
        })
    }

    /// Recompute the span distance after a resize. The current frame is left untouched.
    pub fn resize(&mut self, viewport: Viewport) {
        self.distance = self.span.distance(viewport);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/scroll.rs"]
mod tests;
