use std::sync::Arc;

use crate::{
    assets::store::PreparedImage,
    foundation::core::{Affine, Rgba8Premul, Viewport},
    foundation::error::{ScrollseqError, ScrollseqResult},
    render::compositor::CoverFit,
    render::surface::{DrawSurface, FrameRGBA},
};

/// Surface settings.
#[derive(Clone, Debug, Default)]
pub struct SurfaceSettings {
    /// Straight-alpha RGBA8 background used by `clear`. `None` clears to transparent.
    pub clear_rgba: Option<[u8; 4]>,
}

/// CPU drawing surface backed by a `vello_cpu` pixmap.
pub struct CpuSurface {
    settings: SurfaceSettings,
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    image_cache: Option<CachedPaint>,
}

struct CachedPaint {
    source: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

impl CpuSurface {
    /// Allocate a surface of `viewport` size, cleared to the background.
    pub fn new(viewport: Viewport, settings: SurfaceSettings) -> ScrollseqResult<Self> {
        let (width, height) = surface_dims(viewport)?;
        let mut surface = Self {
            settings,
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
            image_cache: None,
        };
        surface.clear();
        Ok(surface)
    }

    fn clear_premul(&self) -> Rgba8Premul {
        self.settings
            .clear_rgba
            .map(|[r, g, b, a]| Rgba8Premul::from_straight_rgba(r, g, b, a))
            .unwrap_or_else(Rgba8Premul::transparent)
    }

    fn image_paint_for(&mut self, image: &PreparedImage) -> ScrollseqResult<vello_cpu::Image> {
        if let Some(cached) = &self.image_cache
            && Arc::ptr_eq(&cached.source, &image.rgba8_premul)
        {
            return Ok(cached.paint.clone());
        }

        let pixmap =
            image_premul_bytes_to_pixmap(image.rgba8_premul.as_slice(), image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache = Some(CachedPaint {
            source: Arc::clone(&image.rgba8_premul),
            paint: paint.clone(),
        });
        Ok(paint)
    }
}

impl DrawSurface for CpuSurface {
    fn viewport(&self) -> Viewport {
        Viewport::new(u32::from(self.width), u32::from(self.height))
    }

    fn resize(&mut self, viewport: Viewport) -> ScrollseqResult<()> {
        let (width, height) = surface_dims(viewport)?;
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixmap = vello_cpu::Pixmap::new(width, height);
        }
        self.clear();
        Ok(())
    }

    fn clear(&mut self) {
        let rgba = self.clear_premul().to_array();
        clear_pixmap(&mut self.pixmap, rgba);
    }

    fn draw_image(&mut self, image: &PreparedImage, fit: &CoverFit) -> ScrollseqResult<()> {
        let paint = self.image_paint_for(image)?;

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(self.width),
                f64::from(self.height),
            ));
        }

        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(fit.transform()));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        Ok(())
    }

    fn readback_rgba8(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

fn surface_dims(viewport: Viewport) -> ScrollseqResult<(u16, u16)> {
    if viewport.is_empty() {
        return Err(ScrollseqError::validation(
            "surface width/height must be > 0",
        ));
    }
    let w: u16 = viewport
        .width
        .try_into()
        .map_err(|_| ScrollseqError::validation("surface width exceeds u16"))?;
    let h: u16 = viewport
        .height
        .try_into()
        .map_err(|_| ScrollseqError::validation("surface height exceeds u16"))?;
    Ok((w, h))
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ScrollseqResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ScrollseqError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ScrollseqError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ScrollseqError::render("frame image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
