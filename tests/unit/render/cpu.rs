use super::*;
use crate::render::compositor::cover_fit;

fn close(px: [u8; 4], want: [u8; 4]) -> bool {
    px.iter()
        .zip(want.iter())
        .all(|(a, b)| (i16::from(*a) - i16::from(*b)).abs() <= 4)
}

fn split_image() -> PreparedImage {
    // 4x2: left two columns red, right two blue.
    let red = [255u8, 0, 0, 255];
    let blue = [0u8, 0, 255, 255];
    let mut data = Vec::new();
    for _ in 0..2 {
        for px in [red, red, blue, blue] {
            data.extend_from_slice(&px);
        }
    }
    PreparedImage {
        width: 4,
        height: 2,
        rgba8_premul: Arc::new(data),
    }
}

#[test]
fn new_surface_is_transparent_by_default() {
    let s = CpuSurface::new(Viewport::new(3, 2), SurfaceSettings::default()).unwrap();
    let f = s.readback_rgba8();
    assert_eq!((f.width, f.height), (3, 2));
    assert!(f.premultiplied);
    assert!(f.data.iter().all(|&b| b == 0));
}

#[test]
fn clear_uses_premultiplied_background() {
    let settings = SurfaceSettings {
        clear_rgba: Some([255, 0, 0, 128]),
    };
    let s = CpuSurface::new(Viewport::new(2, 2), settings).unwrap();
    assert_eq!(s.readback_rgba8().pixel(1, 1), Some([128, 0, 0, 128]));
}

#[test]
fn invalid_dimensions_are_rejected() {
    assert!(CpuSurface::new(Viewport::new(0, 2), SurfaceSettings::default()).is_err());
    assert!(CpuSurface::new(Viewport::new(70_000, 2), SurfaceSettings::default()).is_err());
    let mut s = CpuSurface::new(Viewport::new(2, 2), SurfaceSettings::default()).unwrap();
    assert!(s.resize(Viewport::new(2, 0)).is_err());
    assert_eq!(s.viewport(), Viewport::new(2, 2));
}

#[test]
fn solid_image_covers_every_pixel() {
    let mut s = CpuSurface::new(Viewport::new(6, 4), SurfaceSettings::default()).unwrap();
    let img = PreparedImage::solid(2, 2, [0, 255, 0, 255]);
    let fit = cover_fit(s.viewport(), (img.width, img.height)).unwrap();
    s.clear();
    s.draw_image(&img, &fit).unwrap();

    let f = s.readback_rgba8();
    for (x, y) in [(0, 0), (5, 0), (3, 2), (0, 3), (5, 3)] {
        assert!(close(f.pixel(x, y).unwrap(), [0, 255, 0, 255]), "pixel {x},{y}");
    }
}

#[test]
fn wide_image_is_centered_and_cropped() {
    let mut s = CpuSurface::new(Viewport::new(4, 4), SurfaceSettings::default()).unwrap();
    let img = split_image();
    let fit = cover_fit(s.viewport(), (img.width, img.height)).unwrap();
    assert_eq!(fit.offset.x, -2.0);
    s.draw_image(&img, &fit).unwrap();

    let f = s.readback_rgba8();
    assert!(close(f.pixel(0, 1).unwrap(), [255, 0, 0, 255]));
    assert!(close(f.pixel(3, 1).unwrap(), [0, 0, 255, 255]));
}

#[test]
fn resize_reallocates_and_clears() {
    let mut s = CpuSurface::new(Viewport::new(2, 2), SurfaceSettings::default()).unwrap();
    let img = PreparedImage::solid(1, 1, [9, 9, 9, 255]);
    let fit = cover_fit(s.viewport(), (1, 1)).unwrap();
    s.draw_image(&img, &fit).unwrap();

    s.resize(Viewport::new(5, 3)).unwrap();
    let f = s.readback_rgba8();
    assert_eq!((f.width, f.height), (5, 3));
    assert_eq!(f.data.len(), 5 * 3 * 4);
    assert!(f.data.iter().all(|&b| b == 0));
}

#[test]
fn mismatched_image_bytes_are_a_render_error() {
    let mut s = CpuSurface::new(Viewport::new(2, 2), SurfaceSettings::default()).unwrap();
    let img = PreparedImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(vec![0; 3]),
    };
    let fit = cover_fit(s.viewport(), (2, 2)).unwrap();
    assert!(matches!(
        s.draw_image(&img, &fit),
        Err(ScrollseqError::Render(_))
    ));
}
