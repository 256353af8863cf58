//! Transition scheduler
//!
//! Drives a segment set from frame callback to frame callback until every
//! transition has run its course. At most one frame request is outstanding
//! per scheduler; starting over always cancels the previous one first.

use crate::reconcile::SegmentSet;
use ringbar_core::{FrameToken, Surface};
use tracing::{debug, trace};

/// Result of delivering a frame token to [`TransitionScheduler::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The token was not the one this scheduler is waiting for.
    Stale,
    /// Frame painted, another one requested.
    Continue,
    /// Frame painted, every transition has settled.
    Settled,
}

/// Frame-callback driver for one gauge.
#[derive(Debug, Default)]
pub struct TransitionScheduler {
    pending: Option<FrameToken>,
}

impl TransitionScheduler {
    /// Create an idle scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding frame request, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Whether a frame request is outstanding.
    #[must_use]
    pub const fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a fresh tick chain, cancelling any outstanding request first.
    pub fn restart(&mut self, surface: &mut dyn Surface) {
        self.cancel(surface);
        let token = surface.request_frame();
        debug!(?token, "transition started");
        self.pending = Some(token);
    }

    /// Drop the outstanding request, if any.
    pub fn cancel(&mut self, surface: &mut dyn Surface) {
        if let Some(token) = self.pending.take() {
            surface.cancel_frame(token);
            trace!(?token, "frame cancelled");
        }
    }

    /// Restart when something is moving, otherwise make sure nothing is scheduled.
    pub fn schedule(&mut self, surface: &mut dyn Surface, segments: &SegmentSet) {
        if segments.is_animating() {
            self.restart(surface);
        } else {
            self.cancel(surface);
        }
    }

    /// Handle a delivered frame.
    ///
    /// Samples every segment at the surface clock and paints. Retiring
    /// segments that have fully decayed are then disposed, and the next frame
    /// is requested while anything is still animating.
    pub fn tick<F>(
        &mut self,
        surface: &mut dyn Surface,
        token: FrameToken,
        segments: &mut SegmentSet,
        paint: F,
    ) -> TickOutcome
    where
        F: FnOnce(&mut dyn Surface, &SegmentSet),
    {
        if self.pending != Some(token) {
            trace!(?token, "stale frame ignored");
            return TickOutcome::Stale;
        }
        self.pending = None;

        let now = surface.now();
        segments.sample(now);
        paint(&mut *surface, &*segments);
        segments.prune();

        if segments.is_animating() {
            self.pending = Some(surface.request_frame());
            trace!(now, "frame painted");
            TickOutcome::Continue
        } else {
            debug!(now, "transition settled");
            TickOutcome::Settled
        }
    }
}
