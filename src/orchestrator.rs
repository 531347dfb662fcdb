// Routes size changes from the host into the blur surface, at most once per UI turn.
// Visual: dragging a window edge produces dozens of resize events per frame; the mask is
// still redrawn only once per frame, with the latest size.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::surface::{BlurSurface, LayoutOutcome};
use crate::types::Size;

/// Holds a non-owning reference to one surface. Dropping the surface elsewhere simply
/// turns every later call into a no-op.
#[derive(Debug, Default)]
pub struct Orchestrator {
    target: Option<Weak<RefCell<BlurSurface>>>,
    pending: Option<Size>,
    coalesced: usize,
}

impl Orchestrator {
    pub fn subscribe(surface: &Rc<RefCell<BlurSurface>>) -> Self {
        Self {
            target: Some(Rc::downgrade(surface)),
            pending: None,
            coalesced: 0,
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.target.is_some()
    }

    /// Size waiting for the next turn, if any.
    pub fn pending(&self) -> Option<Size> {
        self.pending
    }

    /// Resize notifications folded into a later one so far.
    pub fn coalesced(&self) -> usize {
        self.coalesced
    }

    /// Record a new host size. The surface is marked stale now; the mask is rendered on
    /// the next `run_turn`, never from inside this call.
    pub fn on_resize(&mut self, size: Size) {
        let Some(surface) = self.surface() else {
            return;
        };
        if let Some(previous) = self.pending.replace(size) {
            self.coalesced += 1;
            trace!(?previous, ?size, "resize coalesced");
        }
        // A surface already borrowed is mid-layout; it will be refreshed on the turn anyway
        if let Ok(mut surface) = surface.try_borrow_mut() {
            surface.on_resize(size);
        }
    }

    /// Run the deferred layout for this turn. `None` when there was nothing to do.
    /// A surface that is borrowed elsewhere keeps its pending size for the next turn.
    pub fn run_turn(&mut self) -> Option<LayoutOutcome> {
        self.pending?;
        let Some(surface) = self.surface() else {
            trace!("surface gone before its layout turn");
            self.pending = None;
            return None;
        };
        let Ok(mut surface) = surface.try_borrow_mut() else {
            trace!("surface busy, layout deferred");
            return None;
        };
        let size = self.pending.take()?;
        if !surface.is_active() {
            trace!("surface inactive, dropping layout turn");
            return None;
        }
        Some(surface.on_layout(size))
    }

    /// Stop routing notifications. Any pending turn is discarded.
    pub fn unsubscribe(&mut self) {
        self.target = None;
        self.pending = None;
    }

    fn surface(&self) -> Option<Rc<RefCell<BlurSurface>>> {
        self.target.as_ref()?.upgrade()
    }
}
