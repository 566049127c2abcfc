use crate::foundation::error::{ScrollseqError, ScrollseqResult};

pub use kurbo::{Affine, Rect, Size, Vec2};

/// 0-based index into a frame sequence.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub usize);

impl FrameIndex {
    /// 1-based frame number used by on-disk file names.
    pub fn number(self) -> usize {
        self.0.saturating_add(1)
    }
}

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of frames in a sequence, always `>= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct FrameCount(usize);

impl FrameCount {
    /// Create a validated frame count.
    pub fn new(count: usize) -> ScrollseqResult<Self> {
        if count == 0 {
            return Err(ScrollseqError::validation("frame count must be > 0"));
        }
        Ok(Self(count))
    }

    /// Number of frames.
    pub fn get(self) -> usize {
        self.0
    }

    /// Last valid frame index (`count - 1`).
    pub fn last(self) -> FrameIndex {
        FrameIndex(self.0 - 1)
    }

    /// Return `true` when `f` addresses a frame of this sequence.
    pub fn contains(self, f: FrameIndex) -> bool {
        f.0 < self.0
    }

    /// Clamp a frame index into `[0, count - 1]`.
    pub fn clamp(self, f: FrameIndex) -> FrameIndex {
        FrameIndex(f.0.min(self.0 - 1))
    }

    /// Iterate all frame indices in order.
    pub fn indices(self) -> impl Iterator<Item = FrameIndex> {
        (0..self.0).map(FrameIndex)
    }
}

impl TryFrom<usize> for FrameCount {
    type Error = ScrollseqError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FrameCount> for usize {
    fn from(value: FrameCount) -> Self {
        value.0
    }
}

/// Drawing surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Return `true` when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Viewport size as floating point.
    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channel bytes in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba8Premul {
    fn default() -> Self {
        Self::transparent()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
