// sRGB <-> linear lookup tables for gamma-correct mixing of sharp and blurred pixels.
// Visual: the edge between blurred and sharp regions fades smoothly, without dark halos.

use std::sync::LazyLock;

static SHARED: LazyLock<GammaLut> = LazyLock::new(GammaLut::new);

/// Process-wide tables, for code that has nowhere to keep its own.
pub fn shared() -> &'static GammaLut {
    &SHARED
}

pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1)
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255), quantized to 4096 steps
    linear_to_srgb: [u8; 4096],
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaLut {
    /// Build both tables once; they are reused for every composited frame.
    pub fn new() -> Self {
        let mut s2l = [0.0f32; 256];
        for (v, slot) in s2l.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        let mut l2s = [0u8; 4096];
        for (i, slot) in l2s.iter_mut().enumerate() {
            let l = i as f32 / 4095.0;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { srgb_to_linear: s2l, linear_to_srgb: l2s }
    }

    #[inline]
    pub fn to_linear(&self, v: u8) -> f32 {
        self.srgb_to_linear[v as usize]
    }

    #[inline]
    pub fn to_srgb(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * 4095.0).round() as usize;
        self.linear_to_srgb[idx]
    }

    /// Mix two 0x00RRGGBB pixels in linear light; `t = 0` gives `a`, `t = 1` gives `b`.
    #[inline]
    pub fn mix(&self, a: u32, b: u32, t: f32) -> u32 {
        let mut out = 0u32;
        for shift in [16, 8, 0] {
            let ca = self.to_linear(((a >> shift) & 0xFF) as u8);
            let cb = self.to_linear(((b >> shift) & 0xFF) as u8);
            let c = self.to_srgb(ca + (cb - ca) * t) as u32;
            out |= c << shift;
        }
        out
    }
}
