// The variable-radius blur filter, seen from the outside.
// The blur itself belongs to whoever composites the surface; this crate only prepares
// what it needs: a maximum radius and a per-pixel strength mask.

use crate::error::Error;
use crate::types::{FrameBuffer, RasterMask, Rect};

/// Everything a variable blur needs for one layout pass.
/// Replaced as a whole on every pass, never patched.
#[derive(Clone, Debug, PartialEq)]
pub struct BlurFilterParams {
    /// Radius where the mask is fully white. `<= 0` means no blur at all.
    pub radius: f32,
    /// Strength mask covering the whole surface; zero outside `active_rect`.
    pub mask: RasterMask,
    /// Where the mask was drawn, in surface coordinates.
    pub active_rect: Rect,
}

/// A compositing primitive that blurs a backdrop with a radius that varies per pixel.
pub trait VariableBlur {
    /// Write the filtered `backdrop` to `out`.
    /// Both buffers and `params.mask` must have the same size.
    fn apply(&mut self, backdrop: &FrameBuffer, params: &BlurFilterParams, out: &mut FrameBuffer)
    -> Result<(), Error>;
}
