use std::sync::Arc;

use crate::foundation::core::{FrameCount, FrameIndex};
use crate::foundation::error::ScrollseqResult;

/// Decoded frame image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Build an image where every pixel has the same premultiplied color.
    pub fn solid(width: u32, height: u32, rgba8_premul: [u8; 4]) -> Self {
        let px = (width as usize).saturating_mul(height as usize);
        let mut data = Vec::with_capacity(px.saturating_mul(4));
        for _ in 0..px {
            data.extend_from_slice(&rgba8_premul);
        }
        Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        }
    }
}

/// Load state of a single frame slot.
#[derive(Clone, Debug, Default)]
pub enum FrameSlot {
    /// Load requested, not completed yet.
    #[default]
    Pending,
    /// Decoded and drawable.
    Ready(PreparedImage),
    /// Load finished with an error; the frame is never drawn.
    Failed,
}

impl FrameSlot {
    /// Return `true` for [`FrameSlot::Ready`].
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Fixed-size table of frame slots, indexed `0..count`.
///
/// The slot count never changes after construction. Loads complete in any order through
/// [`FrameStore::complete`].
#[derive(Clone, Debug)]
pub struct FrameStore {
    count: FrameCount,
    slots: Vec<FrameSlot>,
    ready: usize,
    failed: usize,
}

impl FrameStore {
    /// Create a store with every slot pending.
    pub fn new(count: FrameCount) -> Self {
        Self {
            count,
            slots: vec![FrameSlot::Pending; count.get()],
            ready: 0,
            failed: 0,
        }
    }

    /// Number of frames in the sequence.
    pub fn count(&self) -> FrameCount {
        self.count
    }

    /// Slot state, `None` for out-of-range indices.
    pub fn slot(&self, index: FrameIndex) -> Option<&FrameSlot> {
        self.slots.get(index.0)
    }

    /// Return `true` when `index` is in range and its image is decoded.
    pub fn is_ready(&self, index: FrameIndex) -> bool {
        self.slot(index).is_some_and(FrameSlot::is_ready)
    }

    /// Drawable image for `index`, or `None` when out of range, pending or failed.
    pub fn get(&self, index: FrameIndex) -> Option<&PreparedImage> {
        match self.slot(index)? {
            FrameSlot::Ready(img) => Some(img),
            FrameSlot::Pending | FrameSlot::Failed => None,
        }
    }

    /// Record a finished load. Returns `false` when `index` is out of range or already settled.
    pub fn complete(&mut self, index: FrameIndex, result: ScrollseqResult<PreparedImage>) -> bool {
        let Some(slot) = self.slots.get_mut(index.0) else {
            tracing::warn!(%index, "load completion for frame outside the sequence ignored");
            return false;
        };
        if !matches!(slot, FrameSlot::Pending) {
            return false;
        }
        match result {
            Ok(img) => {
                *slot = FrameSlot::Ready(img);
                self.ready += 1;
            }
            Err(err) => {
                tracing::warn!(%index, error = %err, "frame failed to load; it will be skipped");
                *slot = FrameSlot::Failed;
                self.failed += 1;
            }
        }
        true
    }

    /// Number of decoded frames.
    pub fn ready_count(&self) -> usize {
        self.ready
    }

    /// Number of frames whose load failed.
    pub fn failed_count(&self) -> usize {
        self.failed
    }

    /// Number of frames still loading.
    pub fn pending_count(&self) -> usize {
        self.count.get() - self.ready - self.failed
    }

    /// Return `true` once every slot is either ready or failed.
    pub fn is_settled(&self) -> bool {
        self.pending_count() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
