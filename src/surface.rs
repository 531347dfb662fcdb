// The blur application surface: owns the installed filter and the mask layer, and
// rebuilds both on every layout pass.
// Visual: whenever the surface changes size, the blurred region is recomputed from the
// insets and the mask is redrawn to fit it, so the effect never looks stretched or stale.

use tracing::{debug, warn};

use crate::error::Error;
use crate::filter::{BlurFilterParams, VariableBlur};
use crate::inset::Insets;
use crate::raster::{MaskSource, rasterize};
use crate::resample::resample;
use crate::types::{FrameBuffer, PixelSize, RasterMask, Rect, Size};

pub const DEFAULT_BLUR_RADIUS: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceState {
    /// No filter installed.
    Detached,
    /// A filter from an earlier pass is installed but the size has changed since.
    AttachedStale,
    /// The installed filter matches the current size, insets and mask.
    AttachedFresh,
}

/// Why a layout pass left the installed filter untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The mask source produced no pixels.
    MaskUnavailable,
    /// The surface has no area, so there is no buffer to draw into.
    EmptySurface,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutOutcome {
    /// A fresh filter is installed.
    Installed,
    /// The effect is inactive; nothing ran.
    Inactive,
    /// The pass failed softly; whatever was installed before is still installed.
    Skipped(SkipReason),
}

/// The persistent mask layer. Mutated in place on every pass, never recreated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaskLayer {
    /// Frame of the layer in surface coordinates (the whole surface).
    pub frame: Rect,
    /// Where the mask content was drawn inside the frame.
    pub active_rect: Rect,
    /// The rasterized mask as produced by the source, before resampling.
    pub contents: Option<RasterMask>,
}

impl MaskLayer {
    fn clear(&mut self) {
        self.frame = Rect::default();
        self.active_rect = Rect::default();
        self.contents = None;
    }
}

pub struct BlurSurface {
    radius: f32,
    insets: Insets,
    mask_source: Box<dyn MaskSource>,
    active: bool,
    state: SurfaceState,
    size: Option<Size>,
    mask_layer: MaskLayer,
    filter: Option<BlurFilterParams>,
}

impl BlurSurface {
    /// A detached surface. Nothing is rendered until it is both active and laid out.
    pub fn new(radius: f32, insets: Insets, mask_source: Box<dyn MaskSource>) -> Self {
        Self {
            radius,
            insets,
            mask_source,
            active: false,
            state: SurfaceState::Detached,
            size: None,
            mask_layer: MaskLayer::default(),
            filter: None,
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Last size seen through `on_resize`/`on_layout`.
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn insets(&self) -> Insets {
        self.insets
    }

    /// The installed filter, if any.
    pub fn filter(&self) -> Option<&BlurFilterParams> {
        self.filter.as_ref()
    }

    pub fn mask_layer(&self) -> &MaskLayer {
        &self.mask_layer
    }

    /// New radius; applies from the next layout pass.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        self.mark_stale();
    }

    /// New insets; apply from the next layout pass.
    pub fn set_insets(&mut self, insets: Insets) {
        self.insets = insets;
        self.mark_stale();
    }

    /// New mask source; applies from the next layout pass.
    pub fn set_mask(&mut self, mask_source: Box<dyn MaskSource>) {
        self.mask_source = mask_source;
        self.mark_stale();
    }

    /// Turn the effect on or off.
    ///
    /// Turning it on runs a full pass right away if the size is already known.
    /// Turning it off drops the filter and the mask buffers immediately.
    pub fn set_active(&mut self, active: bool) -> LayoutOutcome {
        if !active {
            if self.active || self.state != SurfaceState::Detached {
                debug!(from = ?self.state, "blur surface deactivated");
            }
            self.active = false;
            self.detach();
            return LayoutOutcome::Inactive;
        }

        let was_active = std::mem::replace(&mut self.active, true);
        match self.size {
            Some(size) if !was_active || self.state != SurfaceState::AttachedFresh => {
                self.on_layout(size)
            }
            Some(_) => LayoutOutcome::Installed,
            // Not laid out yet; the first layout pass installs the filter
            None => LayoutOutcome::Skipped(SkipReason::EmptySurface),
        }
    }

    /// The host surface changed size. The installed filter is now stale until the next
    /// layout pass; rendering does not happen here.
    pub fn on_resize(&mut self, size: Size) {
        if self.size != Some(size) {
            self.size = Some(size);
            self.mark_stale();
        }
    }

    /// Run the whole pipeline for `size`: resolve insets, rasterize the mask, stretch it
    /// into the active rectangle, install the filter.
    ///
    /// Calling it twice with the same size re-renders the mask and installs an identical
    /// filter. Failures leave the previous filter in place.
    pub fn on_layout(&mut self, size: Size) -> LayoutOutcome {
        self.size = Some(size);
        if !self.active {
            return LayoutOutcome::Inactive;
        }

        let buffer_size = size.to_pixels();
        if buffer_size.is_empty() {
            debug!(?size, "surface has no area, keeping previous filter");
            return LayoutOutcome::Skipped(SkipReason::EmptySurface);
        }

        let active_rect = self.insets.resolve(size).active_rect(size);

        // Sources without an intrinsic size render straight at the visible part of the
        // active rectangle, never larger than the surface itself
        let (_, _, visible) = active_rect.clipped_to(size).to_pixels();
        let fallback = if visible.is_empty() {
            buffer_size
        } else {
            PixelSize::new(visible.width.min(buffer_size.width), visible.height.min(buffer_size.height))
        };
        let Some(contents) = rasterize(self.mask_source.as_ref(), fallback) else {
            warn!(?size, "mask rendered nothing, keeping previous filter");
            return LayoutOutcome::Skipped(SkipReason::MaskUnavailable);
        };

        let Some(mask) = resample(&contents, buffer_size, active_rect) else {
            return LayoutOutcome::Skipped(SkipReason::EmptySurface);
        };

        self.mask_layer.frame = Rect::new(0.0, 0.0, size.width, size.height);
        self.mask_layer.active_rect = active_rect;
        self.mask_layer.contents = Some(contents);

        self.filter = Some(BlurFilterParams { radius: self.radius, mask, active_rect });
        if self.state != SurfaceState::AttachedFresh {
            debug!(from = ?self.state, ?active_rect, radius = self.radius, "blur filter installed");
        }
        self.state = SurfaceState::AttachedFresh;
        LayoutOutcome::Installed
    }

    /// Composite `backdrop` through the installed filter into `out`.
    /// Without a filter the backdrop is copied unchanged. A stale filter whose mask no
    /// longer matches the backdrop is stretched over it, like a layer being resized.
    pub fn composite(
        &self,
        backdrop: &FrameBuffer,
        blur: &mut dyn VariableBlur,
        out: &mut FrameBuffer,
    ) -> Result<(), Error> {
        let passthrough = |out: &mut FrameBuffer| -> Result<(), Error> {
            out.resize(backdrop.width, backdrop.height);
            out.pixels.copy_from_slice(&backdrop.pixels);
            Ok(())
        };

        let Some(params) = &self.filter else {
            return passthrough(out);
        };
        if params.mask.size() == backdrop.size() {
            return blur.apply(backdrop, params, out);
        }

        let size = backdrop.size();
        let full = Rect::new(0.0, 0.0, size.width as f32, size.height as f32);
        match resample(&params.mask, size, full) {
            Some(mask) => {
                let stretched = BlurFilterParams { mask, ..params.clone() };
                blur.apply(backdrop, &stretched, out)
            }
            None => passthrough(out),
        }
    }

    fn mark_stale(&mut self) {
        if self.state == SurfaceState::AttachedFresh {
            self.state = SurfaceState::AttachedStale;
        }
    }

    fn detach(&mut self) {
        self.filter = None;
        self.mask_layer.clear();
        self.state = SurfaceState::Detached;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::inset::Inset;
    use crate::raster::{LinearGradient, SolidMask};
    use crate::types::ColorSpace;

    fn active_surface(insets: Insets) -> BlurSurface {
        let mut surface = BlurSurface::new(DEFAULT_BLUR_RADIUS, insets, Box::new(SolidMask::WHITE));
        surface.set_active(true);
        surface
    }

    #[test]
    fn test_starts_detached() {
        let surface = BlurSurface::new(10.0, Insets::default(), Box::new(SolidMask::WHITE));
        assert_eq!(surface.state(), SurfaceState::Detached);
        assert!(surface.filter().is_none());
        assert!(!surface.is_active());
    }

    #[test]
    fn test_zero_insets_full_white() {
        let mut surface = active_surface(Insets::default());
        assert_eq!(surface.on_layout(Size::new(200.0, 200.0)), LayoutOutcome::Installed);
        assert_eq!(surface.state(), SurfaceState::AttachedFresh);

        let filter = surface.filter().unwrap();
        assert_eq!(filter.active_rect, Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(filter.radius, DEFAULT_BLUR_RADIUS);
        assert_eq!(filter.mask.size(), PixelSize::new(200, 200));
        assert!(filter.mask.pixels.pixels().all(|p| p[0] == 255 && p[1] == 255));
        assert_eq!(surface.mask_layer().frame, Rect::new(0.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut surface = active_surface(Insets::default().with_top(Inset::Relative(0.25)));
        surface.on_layout(Size::new(120.0, 90.0));
        let first = surface.filter().cloned();
        surface.on_layout(Size::new(120.0, 90.0));
        assert_eq!(surface.filter().cloned(), first);
        assert!(first.is_some());
    }

    #[test]
    fn test_resize_marks_stale_then_fresh() {
        let mut surface = active_surface(Insets::default());
        surface.on_layout(Size::new(100.0, 100.0));

        surface.on_resize(Size::new(100.0, 100.0));
        assert_eq!(surface.state(), SurfaceState::AttachedFresh);

        surface.on_resize(Size::new(150.0, 100.0));
        assert_eq!(surface.state(), SurfaceState::AttachedStale);
        // Stale filter is still the old one
        assert_eq!(surface.filter().unwrap().mask.size(), PixelSize::new(100, 100));

        surface.on_layout(Size::new(150.0, 100.0));
        assert_eq!(surface.state(), SurfaceState::AttachedFresh);
        assert_eq!(surface.filter().unwrap().mask.size(), PixelSize::new(150, 100));
    }

    #[test]
    fn test_deactivate_drops_everything() {
        let mut surface = active_surface(Insets::default());
        surface.on_layout(Size::new(64.0, 64.0));
        assert_eq!(surface.state(), SurfaceState::AttachedFresh);

        assert_eq!(surface.set_active(false), LayoutOutcome::Inactive);
        assert_eq!(surface.state(), SurfaceState::Detached);
        assert!(surface.filter().is_none());
        assert_eq!(surface.mask_layer(), &MaskLayer::default());

        assert_eq!(surface.on_layout(Size::new(80.0, 80.0)), LayoutOutcome::Inactive);
        assert_eq!(surface.state(), SurfaceState::Detached);
        assert!(surface.filter().is_none());

        // Reactivation lays out at the last known size
        assert_eq!(surface.set_active(true), LayoutOutcome::Installed);
        assert_eq!(surface.filter().unwrap().mask.size(), PixelSize::new(80, 80));
    }

    #[test]
    fn test_activate_before_layout() {
        let mut surface = BlurSurface::new(10.0, Insets::default(), Box::new(SolidMask::WHITE));
        assert_eq!(surface.set_active(true), LayoutOutcome::Skipped(SkipReason::EmptySurface));
        assert_eq!(surface.state(), SurfaceState::Detached);
        assert_eq!(surface.on_layout(Size::new(10.0, 10.0)), LayoutOutcome::Installed);
    }

    #[test]
    fn test_failed_mask_keeps_previous_filter() {
        let fail = Rc::new(Cell::new(false));
        let flag = fail.clone();
        let source = move |size: PixelSize| {
            if flag.get() { None } else { RasterMask::filled(size, 255, ColorSpace::SrgbGray) }
        };

        let mut surface = BlurSurface::new(20.0, Insets::default(), Box::new(source));
        surface.set_active(true);
        assert_eq!(surface.on_layout(Size::new(30.0, 30.0)), LayoutOutcome::Installed);
        let before = surface.filter().cloned();

        fail.set(true);
        surface.on_resize(Size::new(40.0, 40.0));
        assert_eq!(
            surface.on_layout(Size::new(40.0, 40.0)),
            LayoutOutcome::Skipped(SkipReason::MaskUnavailable)
        );
        assert_eq!(surface.filter().cloned(), before);
        assert_eq!(surface.state(), SurfaceState::AttachedStale);
    }

    #[test]
    fn test_conflicting_insets_do_not_crash() {
        let insets = Insets::default()
            .with_leading(Inset::Fixed(1000.0))
            .with_trailing(Inset::Fixed(1000.0));
        let mut surface = active_surface(insets);
        assert_eq!(surface.on_layout(Size::new(300.0, 100.0)), LayoutOutcome::Installed);

        let filter = surface.filter().unwrap();
        assert_eq!(filter.active_rect.width, 0.0);
        assert!(filter.mask.pixels.pixels().all(|p| p[1] == 0));
    }

    #[test]
    fn test_runaway_insets_stay_within_the_surface() {
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let seen = sizes.clone();
        let source = move |size: PixelSize| {
            seen.borrow_mut().push(size);
            RasterMask::filled(size, 255, ColorSpace::SrgbGray)
        };
        let outward = Inset::Fixed(-1e7);
        let insets = Insets::new(outward, outward, outward, outward);
        let mut surface = BlurSurface::new(4.0, insets, Box::new(source));
        surface.set_active(true);

        assert_eq!(surface.on_layout(Size::new(100.0, 100.0)), LayoutOutcome::Installed);
        assert_eq!(sizes.borrow().as_slice(), &[PixelSize::new(100, 100)]);
        let filter = surface.filter().unwrap();
        assert_eq!(filter.mask.size(), PixelSize::new(100, 100));
        assert_eq!(filter.mask.weight(0, 0), 1.0);
        assert_eq!(filter.mask.weight(99, 99), 1.0);
    }

    #[test]
    fn test_mirrored_insets_past_the_axis() {
        let insets = Insets::default()
            .with_leading(Inset::FixedMirrored(1e10))
            .with_top(Inset::FixedMirrored(1e10));
        let mut surface = active_surface(insets);
        assert_eq!(surface.on_layout(Size::new(100.0, 100.0)), LayoutOutcome::Installed);
        assert_eq!(surface.filter().unwrap().mask.size(), PixelSize::new(100, 100));

        let mut gradient = BlurSurface::new(4.0, insets, Box::new(LinearGradient::top_to_bottom()));
        gradient.set_active(true);
        assert_eq!(gradient.on_layout(Size::new(100.0, 100.0)), LayoutOutcome::Installed);
    }

    #[test]
    fn test_empty_surface_is_skipped() {
        let mut surface = active_surface(Insets::default());
        assert_eq!(
            surface.on_layout(Size::new(0.0, 100.0)),
            LayoutOutcome::Skipped(SkipReason::EmptySurface)
        );
        assert_eq!(surface.state(), SurfaceState::Detached);
    }

    #[test]
    fn test_mirrored_bottom_blurs_top_band() {
        let insets = Insets::default().with_bottom(Inset::Fixed(50.0).mirrored());
        let mut surface = active_surface(insets);
        surface.on_layout(Size::new(200.0, 300.0));

        let filter = surface.filter().unwrap();
        assert_eq!(filter.active_rect.height, 50.0);
        assert_eq!(filter.active_rect.bottom_up_y(300.0), 250.0);
        assert_eq!(filter.mask.weight(10, 49), 1.0);
        assert_eq!(filter.mask.weight(10, 50), 0.0);
    }

    #[test]
    fn test_parameter_changes_go_stale() {
        let mut surface = active_surface(Insets::default());
        surface.on_layout(Size::new(20.0, 20.0));
        surface.set_radius(5.0);
        assert_eq!(surface.state(), SurfaceState::AttachedStale);
        assert_eq!(surface.filter().unwrap().radius, DEFAULT_BLUR_RADIUS);
        surface.on_layout(Size::new(20.0, 20.0));
        assert_eq!(surface.filter().unwrap().radius, 5.0);
    }

    #[test]
    fn test_stale_filter_is_stretched_on_composite() {
        use crate::software::SoftwareBlur;

        let mut surface = active_surface(Insets::default());
        surface.on_layout(Size::new(4.0, 4.0));
        surface.on_resize(Size::new(8.0, 8.0));

        let backdrop = FrameBuffer::new(8, 8);
        let mut out = FrameBuffer::new(0, 0);
        surface.composite(&backdrop, &mut SoftwareBlur::new(), &mut out).unwrap();
        assert_eq!(out, backdrop);
    }
}
