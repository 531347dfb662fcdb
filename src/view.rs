// The embeddable component: hosts some content and a blur surface on top of it.
// Visual: the content is drawn as usual, then blurred wherever the mask says so.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::config::MorphConfig;
use crate::error::Error;
use crate::filter::VariableBlur;
use crate::inset::Insets;
use crate::orchestrator::Orchestrator;
use crate::raster::MaskSource;
use crate::surface::{BlurSurface, LayoutOutcome};
use crate::types::{FrameBuffer, Size};

/// Whatever is being blurred. Never inspected, only drawn.
pub trait Content {
    /// Paint into `out`, which is already sized to the surface.
    fn render(&self, out: &mut FrameBuffer);
}

impl<F> Content for F
where
    F: Fn(&mut FrameBuffer),
{
    fn render(&self, out: &mut FrameBuffer) {
        self(out)
    }
}

pub struct ProgressiveBlurView<C> {
    // Declared before `surface`: unsubscribed and dropped first
    orchestrator: Orchestrator,
    surface: Rc<RefCell<BlurSurface>>,
    content: C,
    backdrop: FrameBuffer,
}

impl<C: Content> ProgressiveBlurView<C> {
    pub fn new(config: MorphConfig, content: C, mask: impl MaskSource + 'static) -> Self {
        let config = config.sanitized();
        let mut surface = BlurSurface::new(config.blur_radius, config.insets, Box::new(mask));
        surface.set_active(config.is_active);

        let surface = Rc::new(RefCell::new(surface));
        Self {
            orchestrator: Orchestrator::subscribe(&surface),
            surface,
            content,
            backdrop: FrameBuffer::new(0, 0),
        }
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    pub fn surface(&self) -> Ref<'_, BlurSurface> {
        self.surface.borrow()
    }

    pub fn set_active(&mut self, active: bool) -> LayoutOutcome {
        self.surface.borrow_mut().set_active(active)
    }

    /// Applies on the next turn.
    pub fn set_radius(&mut self, radius: f32) {
        self.surface.borrow_mut().set_radius(radius);
        self.schedule_relayout();
    }

    /// Applies on the next turn.
    pub fn set_insets(&mut self, insets: Insets) {
        self.surface.borrow_mut().set_insets(insets);
        self.schedule_relayout();
    }

    /// Wire this to the host's resize callback.
    pub fn on_resize(&mut self, size: Size) {
        self.orchestrator.on_resize(size);
    }

    /// Call once per UI update cycle, before `render`.
    pub fn run_turn(&mut self) -> Option<LayoutOutcome> {
        self.orchestrator.run_turn()
    }

    /// Draw the content into a backdrop sized like `out`, then composite it through the
    /// installed filter into `out`.
    pub fn render(&mut self, blur: &mut dyn VariableBlur, out: &mut FrameBuffer) -> Result<(), Error> {
        self.backdrop.resize(out.width, out.height);
        self.content.render(&mut self.backdrop);
        self.surface.borrow().composite(&self.backdrop, blur, out)
    }

    fn schedule_relayout(&mut self) {
        let size = self.surface.borrow().size();
        if let Some(size) = size {
            self.orchestrator.on_resize(size);
        }
    }
}

impl<C> Drop for ProgressiveBlurView<C> {
    fn drop(&mut self) {
        self.orchestrator.unsubscribe();
    }
}
