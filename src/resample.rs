// Mask resampling: stretch a rasterized mask onto the active rectangle of the surface.
// Visual: inside the rectangle the mask shows up scaled to fit; outside it the buffer
// stays transparent, i.e. zero blur there.

use tracing::debug;

use crate::types::{PixelSize, RasterMask, Rect};

/// Allocate a `target_size` buffer (same color space as `source`) and draw `source`
/// stretched into `target_rect` with nearest-neighbour sampling.
///
/// `target_rect` may be smaller than the buffer, offset inside it, or hang over its
/// edges; only the overlapping part is drawn. Returns `None` when the buffer cannot be
/// allocated (empty `target_size`).
pub fn resample(source: &RasterMask, target_size: PixelSize, target_rect: Rect) -> Option<RasterMask> {
    let Some(mut out) = RasterMask::blank(target_size, source.color_space) else {
        debug!(?target_size, "mask buffer has no area, skipping resample");
        return None;
    };

    let (rx, ry, rect) = target_rect.to_pixels();
    if rect.is_empty() || source.size().is_empty() {
        // Nothing to draw: the whole surface gets zero blur
        return Some(out);
    }

    // Clip the destination rectangle against the buffer. Extreme insets can push the
    // rectangle out to the i64 limits, so the bounds saturate instead of wrapping.
    let x0 = rx.max(0);
    let y0 = ry.max(0);
    let x1 = rx.saturating_add(rect.width as i64).min(target_size.width as i64);
    let y1 = ry.saturating_add(rect.height as i64).min(target_size.height as i64);
    if x0 >= x1 || y0 >= y1 {
        debug!(?target_rect, "active rectangle lies outside the surface");
        return Some(out);
    }

    let (sw, sh) = (source.width() as u128, source.height() as u128);
    let (dw, dh) = (rect.width as u128, rect.height as u128);

    for dy in y0..y1 {
        // Map destination pixel centers back onto the source grid
        let local_y = (dy as i128 - ry as i128) as u128;
        let sy = (((2 * local_y + 1) * sh) / (2 * dh)).min(sh - 1) as u32;
        for dx in x0..x1 {
            let local_x = (dx as i128 - rx as i128) as u128;
            let sx = (((2 * local_x + 1) * sw) / (2 * dw)).min(sw - 1) as u32;
            let px = *source.pixels.get_pixel(sx, sy);
            out.pixels.put_pixel(dx as u32, dy as u32, px);
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use image::LumaA;

    use super::*;
    use crate::types::ColorSpace;

    fn white(w: u32, h: u32) -> RasterMask {
        RasterMask::filled(PixelSize::new(w, h), 255, ColorSpace::SrgbGray).unwrap()
    }

    fn covered(mask: &RasterMask) -> usize {
        mask.pixels.pixels().filter(|p| p[1] > 0).count()
    }

    #[test]
    fn test_full_rect_is_all_white() {
        let out = resample(&white(16, 16), PixelSize::new(200, 200), Rect::new(0.0, 0.0, 200.0, 200.0))
            .unwrap();
        assert_eq!(out.size(), PixelSize::new(200, 200));
        assert!(out.pixels.pixels().all(|p| *p == LumaA([255, 255])));
    }

    #[test]
    fn test_outside_rect_stays_clear() {
        let out = resample(&white(4, 4), PixelSize::new(10, 10), Rect::new(2.0, 3.0, 4.0, 5.0)).unwrap();
        assert_eq!(covered(&out), 20);
        assert_eq!(out.weight(0, 0), 0.0);
        assert_eq!(out.weight(2, 3), 1.0);
        assert_eq!(out.weight(5, 7), 1.0);
        assert_eq!(out.weight(6, 7), 0.0);
        assert_eq!(out.weight(5, 8), 0.0);
    }

    #[test]
    fn test_partially_outside_is_clipped() {
        let out = resample(&white(4, 4), PixelSize::new(10, 10), Rect::new(-5.0, 8.0, 10.0, 10.0)).unwrap();
        // Visible part: x in 0..5, y in 8..10
        assert_eq!(covered(&out), 10);
    }

    #[test]
    fn test_fully_outside_draws_nothing() {
        let out = resample(&white(4, 4), PixelSize::new(10, 10), Rect::new(50.0, 50.0, 10.0, 10.0)).unwrap();
        assert_eq!(covered(&out), 0);
    }

    #[test]
    fn test_rect_at_numeric_limits() {
        let out = resample(&white(4, 4), PixelSize::new(10, 10), Rect::new(1e30, 1e30, 1e30, 1e30)).unwrap();
        assert_eq!(covered(&out), 0);

        let out = resample(&white(4, 4), PixelSize::new(10, 10), Rect::new(-1e10, -1e10, 4e9, 4e9)).unwrap();
        assert_eq!(covered(&out), 0);
        // Starts far before the buffer and reaches past it: the whole buffer is covered
        let out = resample(&white(4, 4), PixelSize::new(10, 10), Rect::new(-1e9, -1e9, 3e9, 3e9)).unwrap();
        assert_eq!(covered(&out), 100);

        // An infinite origin saturates; its (capped) extent no longer reaches the buffer
        let out = resample(&white(4, 4), PixelSize::new(10, 10), Rect::new(f32::NEG_INFINITY, 0.0, f32::INFINITY, 5.0))
            .unwrap();
        assert_eq!(covered(&out), 0);
    }

    #[test]
    fn test_empty_rect_draws_nothing() {
        let out = resample(&white(4, 4), PixelSize::new(10, 10), Rect::new(0.0, 0.0, 0.0, 10.0)).unwrap();
        assert_eq!(covered(&out), 0);
    }

    #[test]
    fn test_empty_target_fails() {
        assert!(resample(&white(4, 4), PixelSize::new(0, 10), Rect::new(0.0, 0.0, 5.0, 5.0)).is_none());
    }

    #[test]
    fn test_stretch_keeps_orientation() {
        // Two rows: white on top, black below
        let mut source = white(1, 2);
        source.pixels.put_pixel(0, 1, LumaA([0, 255]));

        let out = resample(&source, PixelSize::new(3, 6), Rect::new(0.0, 0.0, 3.0, 6.0)).unwrap();
        for y in 0..3 {
            assert_eq!(out.weight(1, y), 1.0, "row {y}");
        }
        for y in 3..6 {
            assert_eq!(out.weight(1, y), 0.0, "row {y}");
        }
        assert_eq!(out.color_space, source.color_space);
    }
}
