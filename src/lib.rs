//! Progressive (mask-driven) blur for UI surfaces.
//!
//! The blur strength at each pixel follows the luminance of a mask: white gets the full
//! radius, black gets none. On every layout pass the surface resolves its [`Insets`] into
//! an active rectangle, rasterizes the mask, stretches it into that rectangle and installs
//! a [`BlurFilterParams`] for whatever [`VariableBlur`] does the actual compositing.
//!
//! ```no_run
//! use progressive_blur::{LinearGradient, MorphConfig, ProgressiveBlurView, Size, SoftwareBlur, FrameBuffer};
//!
//! let content = |out: &mut FrameBuffer| out.pixels.fill(0x00_33_66_99);
//! let mut view = ProgressiveBlurView::new(MorphConfig::default(), content, LinearGradient::top_to_bottom());
//! view.on_resize(Size::new(640.0, 480.0));
//! view.run_turn();
//!
//! let mut frame = FrameBuffer::new(640, 480);
//! view.render(&mut SoftwareBlur::new(), &mut frame).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod gamma;
pub mod inset;
pub mod orchestrator;
pub mod raster;
pub mod resample;
pub mod software;
pub mod surface;
pub mod types;
pub mod unit_frame;
pub mod view;

pub use config::MorphConfig;
pub use error::Error;
pub use filter::{BlurFilterParams, VariableBlur};
pub use inset::{Inset, Insets, ResolvedInsets};
pub use orchestrator::Orchestrator;
pub use raster::{ImageMask, LinearGradient, MaskSource, SolidMask, rasterize};
pub use resample::resample;
pub use software::SoftwareBlur;
pub use surface::{BlurSurface, LayoutOutcome, MaskLayer, SkipReason, SurfaceState};
pub use types::{ColorSpace, FrameBuffer, PixelSize, RasterMask, Rect, Size};
pub use unit_frame::{Edge, UnitFrame, UnitPoint};
pub use view::{Content, ProgressiveBlurView};
