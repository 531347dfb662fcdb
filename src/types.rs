// Core value types shared by the blur pipeline.
// Geometry is top-down: origin at the top-left corner, y grows downward, and pixel rows
// are stored top row first.

use image::{GrayAlphaImage, LumaA};

use crate::gamma;
use crate::inset::ResolvedInsets;

/// A surface size in logical units (one unit = one pixel of the mask buffer).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self { width: 0.0, height: 0.0 };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The active rectangle left over after insetting every edge.
    /// Conflicting insets never produce a negative extent: width and height clamp to 0.
    pub fn inset_by(self, insets: ResolvedInsets) -> Rect {
        Rect {
            x: insets.leading,
            y: insets.top,
            width: (self.width - (insets.leading + insets.trailing)).max(0.0),
            height: (self.height - (insets.top + insets.bottom)).max(0.0),
        }
    }

    /// The full size moved by the leading/top offsets, without shrinking.
    pub fn translated_by(self, insets: ResolvedInsets) -> Rect {
        Rect {
            x: insets.leading,
            y: insets.top,
            width: self.width,
            height: self.height,
        }
    }

    /// Whole-pixel size of a buffer covering this surface. Negative or NaN extents become 0.
    pub fn to_pixels(self) -> PixelSize {
        PixelSize {
            width: round_extent(self.width),
            height: round_extent(self.height),
        }
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

/// Size of a pixel buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when a buffer of this size would hold no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Origin y measured from the bottom edge of a surface `surface_height` tall,
    /// for compositors whose y axis points up.
    pub fn bottom_up_y(&self, surface_height: f32) -> f32 {
        surface_height - self.y - self.height
    }

    /// The part of this rectangle that lies inside `(0, 0, size)`. Never negative.
    pub fn clipped_to(&self, size: Size) -> Rect {
        let x0 = self.x.max(0.0);
        let y0 = self.y.max(0.0);
        let x1 = (self.x + self.width).min(size.width);
        let y1 = (self.y + self.height).min(size.height);
        Rect {
            x: x0,
            y: y0,
            width: (x1 - x0).max(0.0),
            height: (y1 - y0).max(0.0),
        }
    }

    /// Snap to whole pixels: (x, y) rounded, extents rounded and never negative.
    pub fn to_pixels(&self) -> (i64, i64, PixelSize) {
        (
            self.x.round() as i64,
            self.y.round() as i64,
            PixelSize::new(round_extent(self.width), round_extent(self.height)),
        )
    }
}

fn round_extent(v: f32) -> u32 {
    // `as` saturates: NaN -> 0, huge -> u32::MAX
    if v > 0.0 { v.round() as u32 } else { 0 }
}

/// Content pixels as the window expects them: one u32 per pixel, 0x00RRGGBB.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    /// A black frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0; width * height] }
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width as u32, self.height as u32)
    }

    /// Reallocate for a new size if it changed. Contents are undefined afterwards.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height];
        }
    }
}

/// How mask luminance values should be interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Values are sRGB encoded gray, as produced by most renderers.
    #[default]
    SrgbGray,
    /// Values are already linear blur strengths.
    LinearGray,
}

/// A rasterized mask: gray + alpha, 8 bits per component.
/// Visual: white opaque pixels get the full blur radius, black or transparent pixels none.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterMask {
    pub pixels: GrayAlphaImage,
    pub color_space: ColorSpace,
}

impl RasterMask {
    /// A fully transparent mask ("no blur anywhere").
    /// Returns `None` for empty sizes or when the buffer cannot be allocated.
    pub fn blank(size: PixelSize, color_space: ColorSpace) -> Option<Self> {
        let pixels = alloc_gray_alpha(size, [0, 0])?;
        Some(Self { pixels, color_space })
    }

    /// A mask where every pixel has the same gray level, fully opaque.
    pub fn filled(size: PixelSize, luma: u8, color_space: ColorSpace) -> Option<Self> {
        let pixels = alloc_gray_alpha(size, [luma, 255])?;
        Some(Self { pixels, color_space })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width(), self.height())
    }

    pub fn bits_per_component(&self) -> u8 {
        8
    }

    /// Blur strength in [0,1] at (x, y): linear luminance scaled by coverage.
    /// sRGB gray is decoded first. Out-of-range coordinates read as 0.
    #[inline]
    pub fn weight(&self, x: u32, y: u32) -> f32 {
        let Some(LumaA([l, a])) = self.pixels.get_pixel_checked(x, y) else {
            return 0.0;
        };
        let strength = match self.color_space {
            ColorSpace::SrgbGray => gamma::shared().to_linear(*l),
            ColorSpace::LinearGray => *l as f32 / 255.0,
        };
        strength * (*a as f32 / 255.0)
    }
}

/// A gray+alpha buffer filled with `fill`. `None` when empty, when the byte count overflows,
/// or when the allocator refuses the request.
fn alloc_gray_alpha(size: PixelSize, fill: [u8; 2]) -> Option<GrayAlphaImage> {
    if size.is_empty() {
        return None;
    }
    let len = (size.width as usize).checked_mul(size.height as usize)?.checked_mul(2)?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).ok()?;
    if fill == [0, 0] {
        buf.resize(len, 0);
    } else {
        buf.extend(fill.iter().copied().cycle().take(len));
    }
    GrayAlphaImage::from_raw(size.width, size.height, buf)
}
