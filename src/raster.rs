// Mask rasterization: turns a mask description into gray+alpha pixels.
// Visual: whatever is white in the mask becomes "blur at full radius", black becomes sharp.
// This runs once per layout pass, never per frame: sources may be arbitrarily expensive.

use std::path::Path;

use image::{DynamicImage, GrayAlphaImage, LumaA, imageops};
use tracing::{debug, trace};

use crate::error::Error;
use crate::types::{ColorSpace, PixelSize, RasterMask};
use crate::unit_frame::{UnitFrame, UnitPoint};

/// Anything that can paint a blur-strength mask.
pub trait MaskSource {
    /// Size the source prefers to be rendered at. `None` means "whatever the target is".
    fn intrinsic_size(&self) -> Option<PixelSize> {
        None
    }

    /// Paint the mask at `size`. `None` when nothing could be rendered.
    fn render(&self, size: PixelSize) -> Option<RasterMask>;
}

/// Closures work as ad-hoc (and possibly dynamic) mask sources.
impl<F> MaskSource for F
where
    F: Fn(PixelSize) -> Option<RasterMask>,
{
    fn render(&self, size: PixelSize) -> Option<RasterMask> {
        self(size)
    }
}

/// Render `source` at its intrinsic size, or at `fallback` if it has none.
/// Returns `None` (and logs why) instead of failing: the caller skips this pass.
pub fn rasterize(source: &dyn MaskSource, fallback: PixelSize) -> Option<RasterMask> {
    let size = source.intrinsic_size().unwrap_or(fallback);
    if size.is_empty() {
        debug!(?size, "mask has no area, nothing to rasterize");
        return None;
    }

    let Some(mask) = source.render(size) else {
        debug!(?size, "mask source rendered nothing");
        return None;
    };
    if mask.size().is_empty() {
        debug!("mask source returned an empty buffer");
        return None;
    }

    trace!(requested = ?size, rendered = ?mask.size(), "mask rasterized");
    Some(mask)
}

/// The same gray level everywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolidMask {
    pub luma: u8,
}

impl SolidMask {
    pub const WHITE: Self = Self { luma: 255 };
    pub const BLACK: Self = Self { luma: 0 };
}

impl MaskSource for SolidMask {
    fn render(&self, size: PixelSize) -> Option<RasterMask> {
        RasterMask::filled(size, self.luma, ColorSpace::SrgbGray)
    }
}

/// A two-stop linear gradient between unit-space endpoints.
/// Visual: a smooth ramp from `from` (at `start`) to `to` (at `end`), flat beyond both ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: UnitPoint,
    pub end: UnitPoint,
    pub from: u8,
    pub to: u8,
    /// Gradients are resolution-independent, so they render at a fixed size and get
    /// stretched onto the active rectangle later.
    pub size: PixelSize,
}

impl LinearGradient {
    pub const DEFAULT_SIZE: PixelSize = PixelSize::new(1024, 1024);

    pub fn new(start: UnitPoint, end: UnitPoint, from: u8, to: u8) -> Self {
        Self { start, end, from, to, size: Self::DEFAULT_SIZE }
    }

    /// White at the top fading to black at the bottom: strongest blur under a title bar.
    pub fn top_to_bottom() -> Self {
        Self::new(UnitPoint::TOP, UnitPoint::BOTTOM, 255, 0)
    }

    /// Vertical ramp confined to `frame`: `from` at its top, `to` at its bottom.
    /// `UnitFrame::from_edge(Edge::Top, 0.3)` fades out over the top 30% of the mask.
    pub fn vertical_in(frame: UnitFrame, from: u8, to: u8) -> Self {
        let mid = (frame.start.x + frame.end.x) / 2.0;
        Self::new(UnitPoint::new(mid, frame.start.y), UnitPoint::new(mid, frame.end.y), from, to)
    }

    pub fn with_size(mut self, size: PixelSize) -> Self {
        self.size = size;
        self
    }

    /// Gradient position in [0,1] for a point in unit space.
    fn param(&self, x: f32, y: f32) -> f32 {
        let (dx, dy) = (self.end.x - self.start.x, self.end.y - self.start.y);
        let len2 = dx * dx + dy * dy;
        if len2 <= f32::EPSILON {
            return 0.0;
        }
        (((x - self.start.x) * dx + (y - self.start.y) * dy) / len2).clamp(0.0, 1.0)
    }
}

impl MaskSource for LinearGradient {
    fn intrinsic_size(&self) -> Option<PixelSize> {
        Some(self.size)
    }

    fn render(&self, size: PixelSize) -> Option<RasterMask> {
        if size.is_empty() {
            return None;
        }
        let (w, h) = (size.width as f32, size.height as f32);
        let (from, to) = (self.from as f32, self.to as f32);

        let mut mask = RasterMask::blank(size, ColorSpace::SrgbGray)?;
        // Sample at pixel centers
        for (x, y, px) in mask.pixels.enumerate_pixels_mut() {
            let t = self.param((x as f32 + 0.5) / w, (y as f32 + 0.5) / h);
            let luma = (from + (to - from) * t).round().clamp(0.0, 255.0) as u8;
            *px = LumaA([luma, 255]);
        }
        Some(mask)
    }
}

/// A bitmap mask, e.g. loaded from a PNG. Color images are reduced to luminance.
#[derive(Clone, Debug)]
pub struct ImageMask {
    image: GrayAlphaImage,
    color_space: ColorSpace,
}

impl ImageMask {
    pub fn new(image: &DynamicImage) -> Self {
        Self { image: image.to_luma_alpha8(), color_space: ColorSpace::SrgbGray }
    }

    /// For bitmaps that already store linear blur strengths.
    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let image = image::open(path)?;
        Ok(Self::new(&image))
    }
}

impl MaskSource for ImageMask {
    fn intrinsic_size(&self) -> Option<PixelSize> {
        Some(PixelSize::new(self.image.width(), self.image.height()))
    }

    fn render(&self, size: PixelSize) -> Option<RasterMask> {
        if size.is_empty() || self.image.width() == 0 || self.image.height() == 0 {
            return None;
        }
        let pixels = if (size.width, size.height) == self.image.dimensions() {
            self.image.clone()
        } else {
            imageops::resize(&self.image, size.width, size.height, imageops::FilterType::Triangle)
        };
        Some(RasterMask { pixels, color_space: self.color_space })
    }
}
