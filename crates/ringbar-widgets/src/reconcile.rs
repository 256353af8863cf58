//! Reconciliation of the segment set against newly assigned values.
//!
//! Live segments occupy indices `0..n` where `n` is the length of the last
//! assigned value sequence. When the sequence shrinks, surplus segments move
//! to a retiring list: they decay to zero and keep painting until they get
//! there, then they are disposed. A regrow at an index that still has a
//! retiring segment picks that segment back up, so the ring never pops.

use crate::segment::Segment;
use ringbar_core::{Color, Easing};
use serde::Serialize;
use tracing::debug;

/// Values at or below this count as fully decayed.
const DECAYED: f64 = 1e-9;

/// What a call to [`SegmentSet::reconcile`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Existing live segments that got a new target
    pub retargeted: usize,
    /// Segments created from zero
    pub created: usize,
    /// Retiring segments brought back to life
    pub revived: usize,
    /// Live segments moved to the retiring list
    pub retired: usize,
}

impl ReconcileReport {
    /// Whether any segment started a new transition or changed membership.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.retargeted + self.created + self.revived + self.retired > 0
    }
}

/// The ordered set of segments owned by one gauge.
#[derive(Debug, Clone)]
pub struct SegmentSet {
    live: Vec<Segment>,
    retiring: Vec<Segment>,
    palette: Vec<Color>,
    easing: Easing,
}

impl SegmentSet {
    /// Create an empty set coloring segments from `palette`.
    ///
    /// An empty palette paints every segment black.
    #[must_use]
    pub fn new(palette: Vec<Color>, easing: Easing) -> Self {
        Self {
            live: Vec::new(),
            retiring: Vec::new(),
            palette,
            easing,
        }
    }

    /// Color for segment `index` (cyclic palette lookup).
    #[must_use]
    pub fn color_for(&self, index: usize) -> Color {
        if self.palette.is_empty() {
            return Color::BLACK;
        }
        self.palette[index % self.palette.len()]
    }

    /// Live segments, in index order.
    #[must_use]
    pub fn live(&self) -> &[Segment] {
        &self.live
    }

    /// Segments decaying after a shrink, in index order.
    #[must_use]
    pub fn retiring(&self) -> &[Segment] {
        &self.retiring
    }

    /// Number of live segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether there are no live segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Values of the live segments at `now`, without sampling.
    #[must_use]
    pub fn values_at(&self, now: f64) -> Vec<f64> {
        self.live.iter().map(|s| s.value_at(now)).collect()
    }

    /// Target values of the live segments.
    #[must_use]
    pub fn targets(&self) -> Vec<f64> {
        self.live.iter().map(Segment::target_value).collect()
    }

    /// Every segment that should be painted: live and retiring, by index.
    ///
    /// A retiring segment only exists at indices past the live range.
    pub fn painted(&self) -> impl Iterator<Item = &Segment> {
        self.live.iter().chain(self.retiring.iter())
    }

    /// Whether any segment, live or retiring, still has a transition running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.painted().any(Segment::is_animating)
    }

    /// Bring the set in line with `targets`.
    ///
    /// Segments shared by both sequences are retargeted, new indices are
    /// created (or revived from the retiring list) and surplus ones start
    /// retiring. All transitions start at `now` and last `duration_ms`.
    pub fn reconcile(&mut self, targets: &[f64], now: f64, duration_ms: f64) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for (segment, &target) in self.live.iter_mut().zip(targets) {
            if segment.retarget(target, duration_ms, now) {
                report.retargeted += 1;
            }
        }

        // Growth: take over a retiring segment at the same index if there is one.
        for (index, &target) in targets.iter().enumerate().skip(self.live.len()) {
            let mut segment = match self.take_retiring(index) {
                Some(segment) => {
                    report.revived += 1;
                    segment
                }
                None => {
                    report.created += 1;
                    Segment::new(index, 0.0, self.color_for(index)).with_easing(self.easing)
                }
            };
            segment.retarget(target, duration_ms, now);
            self.live.push(segment);
        }

        // Shrink: surplus segments decay to zero before disposal.
        if self.live.len() > targets.len() {
            let surplus = self.live.split_off(targets.len());
            report.retired = surplus.len();
            for mut segment in surplus {
                segment.retarget(0.0, duration_ms, now);
                self.retiring.push(segment);
            }
            self.retiring.sort_by_key(Segment::index);
        }

        self.prune();

        debug!(
            live = self.live.len(),
            retiring = self.retiring.len(),
            retargeted = report.retargeted,
            created = report.created,
            revived = report.revived,
            retired = report.retired,
            "segments reconciled"
        );
        report
    }

    /// Sample every segment at `now`.
    pub fn sample(&mut self, now: f64) {
        for segment in self.live.iter_mut().chain(self.retiring.iter_mut()) {
            segment.sample(now);
        }
    }

    /// Dispose retiring segments that have fully decayed. Returns how many.
    pub fn prune(&mut self) -> usize {
        let before = self.retiring.len();
        self.retiring.retain_mut(|segment| {
            let done = !segment.is_animating() && segment.current_value().abs() <= DECAYED;
            if done {
                segment.dispose();
            }
            !done
        });
        before - self.retiring.len()
    }

    fn take_retiring(&mut self, index: usize) -> Option<Segment> {
        let pos = self.retiring.iter().position(|s| s.index() == index)?;
        Some(self.retiring.remove(pos))
    }
}
