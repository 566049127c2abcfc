use crate::{
    assets::store::PreparedImage,
    foundation::core::Viewport,
    foundation::error::ScrollseqResult,
    render::compositor::CoverFit,
};

/// A rendered surface as RGBA8 pixels.
///
/// Surfaces hold **premultiplied alpha**; the `premultiplied` flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight alpha in place. No-op when already straight.
    pub fn unpremultiply(&mut self) {
        if !self.premultiplied {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        self.premultiplied = false;
    }

    /// RGBA8 of the pixel at `(x, y)`, `None` when outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// A drawing target the compositor owns exclusively.
pub trait DrawSurface {
    /// Current pixel dimensions.
    fn viewport(&self) -> Viewport;

    /// Change dimensions. Previous pixel contents are discarded.
    fn resize(&mut self, viewport: Viewport) -> ScrollseqResult<()>;

    /// Clear every pixel to the surface background.
    fn clear(&mut self);

    /// Draw `image` at the placement described by `fit`.
    fn draw_image(&mut self, image: &PreparedImage, fit: &CoverFit) -> ScrollseqResult<()>;

    /// Copy out the current pixels.
    fn readback_rgba8(&self) -> FrameRGBA;
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
