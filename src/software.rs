// A CPU stand-in for the variable-radius blur filter, used by the demo and in tests.
// It approximates a per-pixel radius by blurring once at the full radius and then mixing
// blurred and sharp pixels by mask strength, in linear light.
// Visual: white mask areas look fully blurred, gray areas partially, black areas sharp.

use tracing::trace;

use crate::error::Error;
use crate::filter::{BlurFilterParams, VariableBlur};
use crate::gamma::GammaLut;
use crate::types::FrameBuffer;

/// Holds scratch buffers so repeated frames do not reallocate.
pub struct SoftwareBlur {
    tmp: FrameBuffer,
    blurred: FrameBuffer,
    lut: GammaLut,
}

impl Default for SoftwareBlur {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareBlur {
    pub fn new() -> Self {
        Self {
            tmp: FrameBuffer::new(0, 0),
            blurred: FrameBuffer::new(0, 0),
            lut: GammaLut::new(),
        }
    }
}

impl VariableBlur for SoftwareBlur {
    fn apply(&mut self, backdrop: &FrameBuffer, params: &BlurFilterParams, out: &mut FrameBuffer)
    -> Result<(), Error> {
        if params.mask.size() != backdrop.size() {
            return Err(Error::SizeMismatch {
                context: "software blur mask",
                expected: backdrop.size(),
                actual: params.mask.size(),
            });
        }
        out.resize(backdrop.width, backdrop.height);

        // Radius <= 0 is an identity pass
        let radius = params.radius.round();
        if radius < 1.0 {
            out.pixels.copy_from_slice(&backdrop.pixels);
            return Ok(());
        }

        // Past the frame size a wider window only adds more copies of the edge pixels
        let radius = (radius as usize).min(backdrop.width.max(backdrop.height));

        self.tmp.resize(backdrop.width, backdrop.height);
        self.blurred.resize(backdrop.width, backdrop.height);
        box_blur_rgb(backdrop, &mut self.tmp, &mut self.blurred, radius)?;

        let width = backdrop.width;
        for (i, (dst, (&sharp, &soft))) in out
            .pixels
            .iter_mut()
            .zip(backdrop.pixels.iter().zip(self.blurred.pixels.iter()))
            .enumerate()
        {
            let (x, y) = ((i % width) as u32, (i / width) as u32);
            let a = params.mask.weight(x, y);
            *dst = if a <= 0.0 {
                sharp
            } else if a >= 1.0 {
                soft
            } else {
                self.lut.mix(sharp, soft, a)
            };
        }

        trace!(radius, size = ?backdrop.size(), "software blur composited");
        Ok(())
    }
}

/// Two-pass sliding-window box blur with clamped edges (no dark borders).
/// `tmp` holds the horizontal pass, `dst` the final result.
pub fn box_blur_rgb(
    src: &FrameBuffer,
    tmp: &mut FrameBuffer,
    dst: &mut FrameBuffer,
    radius: usize,
) -> Result<(), Error> {
    for (context, other) in [("box blur dst", &*dst), ("box blur tmp", &*tmp)] {
        if other.size() != src.size() {
            return Err(Error::SizeMismatch { context, expected: src.size(), actual: other.size() });
        }
    }
    if src.width == 0 || src.height == 0 {
        return Ok(());
    }

    let (w, h) = (src.width, src.height);
    // Keeps the u64 window sums from overflowing
    let radius = radius.min(u32::MAX as usize);
    // Horizontal: rows are contiguous
    for y in 0..h {
        let row = y * w;
        blur_line(&src.pixels, &mut tmp.pixels, row, 1, w, radius);
    }
    // Vertical: columns stride by the row width
    for x in 0..w {
        blur_line(&tmp.pixels, &mut dst.pixels, x, w, h, radius);
    }
    Ok(())
}

/// Box-average one line of `len` pixels starting at `start`, `stride` apart.
fn blur_line(src: &[u32], dst: &mut [u32], start: usize, stride: usize, len: usize, radius: usize) {
    let at = |i: usize| src[start + i.min(len - 1) * stride];
    let win = 2 * radius as u64 + 1;

    // Window centered on pixel 0: the left half repeats the edge pixel
    let first = at(0);
    let mut sums = channels(first).map(|c| c * (radius as u64 + 1));
    for i in 1..=radius.min(len) {
        let p = channels(at(i));
        for (s, c) in sums.iter_mut().zip(p) {
            *s += c;
        }
    }
    // Past the end of the line the right half repeats the last pixel
    let last = channels(at(len - 1));
    let overhang = radius.saturating_sub(len) as u64;
    for (s, c) in sums.iter_mut().zip(last) {
        *s += c * overhang;
    }

    for i in 0..len {
        let [r, g, b] = sums.map(|s| (s / win) as u32);
        dst[start + i * stride] = (r << 16) | (g << 8) | b;

        // Slide: drop the leftmost pixel, take the next one on the right
        let out = channels(at(i.saturating_sub(radius)));
        let inc = channels(at(i.saturating_add(radius + 1)));
        for k in 0..3 {
            sums[k] = sums[k] + inc[k] - out[k];
        }
    }
}

#[inline]
fn channels(px: u32) -> [u64; 3] {
    [(px >> 16) & 0xFF, (px >> 8) & 0xFF, px & 0xFF].map(u64::from)
}
