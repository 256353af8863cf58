//! Ring gauge widget.
//!
//! A circular progress indicator showing one or more values as consecutive
//! slices of a ring, with a textual readout in the middle.
//!
//! The gauge owns its interpolation: each value change starts a timed
//! transition and every frame repaints a single composited background for
//! the whole ring. The host drives frames by handing the tokens it got from
//! [`Surface::request_frame`] back to [`RingGauge::on_frame`].

use crate::layout::{conic_gradient, layout_arcs, SegmentArc};
use crate::options::GaugeOptions;
use crate::readout::readout;
use crate::reconcile::{ReconcileReport, SegmentSet};
use crate::scheduler::{TickOutcome, TransitionScheduler};
use crate::segment::Segment;
use ringbar_core::surface::{percent, px};
use ringbar_core::{Canvas, Color, ElementId, FrameToken, Rect, Style, Surface, TextStyle};
use tracing::{debug, warn};

/// Class hint of the root element.
pub const ROOT_CLASS: &str = "ringbar";
/// Class hint of the inner value disc.
pub const VALUE_CLASS: &str = "ringbar_value";
/// Class hint of the readout text element.
pub const VALUE_TEXT_CLASS: &str = "ringbar_value_text";

/// Multi-segment circular progress gauge.
#[derive(Debug)]
pub struct RingGauge {
    options: GaugeOptions,
    segments: SegmentSet,
    scheduler: TransitionScheduler,
    root: ElementId,
    value_disc: ElementId,
    value_text: ElementId,
    text: String,
    removed: bool,
}

impl RingGauge {
    /// Build a gauge on `surface` showing `values`.
    ///
    /// Initial values are shown as-is, without a transition. The element tree
    /// is created detached; see [`append_to`](Self::append_to).
    pub fn new(surface: &mut dyn Surface, values: &[f64], options: GaugeOptions) -> Self {
        let segments = SegmentSet::new(options.palette(), options.easing);
        let root = surface.create_element(ROOT_CLASS);
        let value_disc = surface.create_element(VALUE_CLASS);
        let value_text = surface.create_element(VALUE_TEXT_CLASS);
        surface.attach(root, value_disc);
        surface.attach(value_disc, value_text);

        let mut gauge = Self {
            options,
            segments,
            scheduler: TransitionScheduler::new(),
            root,
            value_disc,
            value_text,
            text: String::new(),
            removed: false,
        };
        gauge.apply_static_styles(surface);

        let values = sanitize(values);
        gauge.segments.reconcile(&values, surface.now(), 0.0);
        gauge.refresh_text(surface);
        gauge.paint_surface(surface);
        debug!(segments = gauge.segments.len(), "gauge created");
        gauge
    }

    /// Build a single-value gauge.
    pub fn with_value(surface: &mut dyn Surface, value: f64, options: GaugeOptions) -> Self {
        Self::new(surface, &[value], options)
    }

    /// Assign a new ordered set of values.
    ///
    /// Every segment heads for its new value over the configured transition
    /// time, starting from wherever it is right now. Assigning the values the
    /// gauge already targets changes nothing. A gauge taken off the surface
    /// with [`remove`](Self::remove) requests no frames until it is appended
    /// again.
    pub fn set_values(&mut self, surface: &mut dyn Surface, values: &[f64]) -> ReconcileReport {
        let values = sanitize(values);
        let now = surface.now();
        self.segments.sample(now);
        let report = self
            .segments
            .reconcile(&values, now, self.options.transition_ms());
        if !report.changed() {
            return report;
        }

        self.refresh_text(surface);
        self.paint_surface(surface);
        if !self.removed {
            self.scheduler.schedule(surface, &self.segments);
        }
        report
    }

    /// Assign a single value.
    pub fn set_value(&mut self, surface: &mut dyn Surface, value: f64) -> ReconcileReport {
        self.set_values(surface, &[value])
    }

    /// Deliver a frame callback.
    ///
    /// Returns `false` when the token is not the one this gauge is waiting
    /// for (cancelled or superseded requests).
    pub fn on_frame(&mut self, surface: &mut dyn Surface, token: FrameToken) -> bool {
        let root = self.root;
        let options = &self.options;
        let outcome = self
            .scheduler
            .tick(surface, token, &mut self.segments, |surface, segments| {
                paint_ring(surface, root, segments, options);
            });
        outcome != TickOutcome::Stale
    }

    /// Attach the gauge under `container`.
    ///
    /// Resumes the tick chain if a transition was interrupted by
    /// [`remove`](Self::remove).
    pub fn append_to(&mut self, surface: &mut dyn Surface, container: ElementId) {
        surface.attach(container, self.root);
        self.removed = false;
        if self.segments.is_animating() && !self.scheduler.is_scheduled() {
            self.scheduler.restart(surface);
        }
    }

    /// Detach the gauge and cancel any pending frame.
    pub fn remove(&mut self, surface: &mut dyn Surface) {
        self.scheduler.cancel(surface);
        surface.detach(self.root);
        self.removed = true;
    }

    /// Value of every live segment at the surface clock.
    ///
    /// Reads the interpolation directly, so the result does not depend on
    /// frames having been delivered.
    #[must_use]
    pub fn values(&self, surface: &dyn Surface) -> Vec<f64> {
        self.segments.values_at(surface.now())
    }

    /// Value of the first segment at the surface clock, if there is one.
    #[must_use]
    pub fn value(&self, surface: &dyn Surface) -> Option<f64> {
        self.segments
            .live()
            .first()
            .map(|segment| segment.value_at(surface.now()))
    }

    /// Interpolated values at `now`, without advancing anything.
    #[must_use]
    pub fn values_at(&self, now: f64) -> Vec<f64> {
        self.segments.values_at(now)
    }

    /// The values last assigned.
    #[must_use]
    pub fn target_values(&self) -> Vec<f64> {
        self.segments.targets()
    }

    /// Current readout text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Arcs of every painted segment (live and decaying), as of the last sample.
    #[must_use]
    pub fn arcs(&self) -> Vec<SegmentArc> {
        layout_arcs(self.segments.painted(), self.options.max)
    }

    /// Whether a tick chain is running.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.scheduler.is_scheduled()
    }

    /// Root element handle.
    #[must_use]
    pub const fn element(&self) -> ElementId {
        self.root
    }

    /// Options the gauge was built with.
    #[must_use]
    pub const fn options(&self) -> &GaugeOptions {
        &self.options
    }

    /// Live segments, in index order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        self.segments.live()
    }

    /// Paint the current state into `canvas`, fitted to `bounds`.
    pub fn paint(&self, canvas: &mut dyn Canvas, bounds: Rect) {
        let center = bounds.center();
        let radius = bounds.inscribed_radius();
        if radius <= 0.0 {
            return;
        }

        canvas.fill_circle(center, radius, self.options.background);
        for arc in self.arcs() {
            if arc.sweep_angle <= 0.0 {
                continue;
            }
            let start = arc.start_angle.to_radians() as f32;
            let end = (arc.start_angle + arc.sweep_angle).to_radians() as f32;
            canvas.fill_arc(center, radius, start, end, arc.color);
        }

        if !self.options.show_value {
            return;
        }
        let inner = radius * self.options.inner_ratio() as f32;
        canvas.fill_circle(center, inner, self.options.value_background);
        canvas.draw_text(
            &self.text,
            center,
            &TextStyle {
                size: inner * 2.0 / 3.0,
                color: Color::WHITE,
            },
        );
    }

    fn apply_static_styles(&self, surface: &mut dyn Surface) {
        let o = &self.options;
        let size = px(o.size);
        surface.set_style(
            self.root,
            &Style::new()
                .with("position", "relative")
                .with("border-radius", "50%")
                .with("width", size.clone())
                .with("height", size),
        );

        let disc = px(o.inner_diameter());
        let offset = percent(o.bars_width / 2.0);
        surface.set_style(
            self.value_disc,
            &Style::new()
                .with("position", "absolute")
                .with("border-radius", "50%")
                .with("background", o.value_background.to_css())
                .with("width", disc.clone())
                .with("height", disc)
                .with("top", offset.clone())
                .with("left", offset)
                .with(
                    "visibility",
                    if o.show_value { "visible" } else { "hidden" },
                ),
        );

        let inner = o.inner_diameter();
        surface.set_style(
            self.value_text,
            &Style::new()
                .with("text-align", "center")
                .with("line-height", px(inner))
                .with("font-size", px(inner / 3.0)),
        );
    }

    fn refresh_text(&mut self, surface: &mut dyn Surface) {
        self.text = readout(&self.segments.targets(), &self.options);
        if self.options.show_value {
            surface.set_text(self.value_text, &self.text);
        }
    }

    fn paint_surface(&self, surface: &mut dyn Surface) {
        paint_ring(surface, self.root, &self.segments, &self.options);
    }
}

fn paint_ring(
    surface: &mut dyn Surface,
    root: ElementId,
    segments: &SegmentSet,
    options: &GaugeOptions,
) {
    let arcs = layout_arcs(segments.painted(), options.max);
    let background = conic_gradient(&arcs, options.background);
    surface.set_style(root, &Style::new().with("background", background));
}

fn sanitize(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|&v| {
            if v.is_finite() {
                v
            } else {
                warn!(value = v, "non-finite value replaced by 0");
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringbar_core::{DrawCommand, RecordingCanvas, RecordingSurface};

    fn gauge(surface: &mut RecordingSurface, values: &[f64]) -> RingGauge {
        RingGauge::new(surface, values, GaugeOptions::default())
    }

    /// Deliver frames, 16ms apart, until the gauge stops asking.
    fn settle(surface: &mut RecordingSurface, gauge: &mut RingGauge) {
        for _ in 0..1000 {
            let frames = surface.take_frames();
            if frames.is_empty() {
                return;
            }
            surface.advance(16.0);
            for token in frames {
                gauge.on_frame(surface, token);
            }
        }
        panic!("gauge never settled");
    }

    #[test]
    fn test_construction_snaps() {
        let mut surface = RecordingSurface::new();
        let g = RingGauge::with_value(&mut surface, 42.0, GaugeOptions::default());
        assert_eq!(g.values(&surface), vec![42.0]);
        assert_eq!(g.value(&surface), Some(42.0));
        assert_eq!(g.text(), "42%");
        assert!(!g.is_animating());
        assert_eq!(surface.pending_frames(), 0);
    }

    #[test]
    fn test_element_tree() {
        let mut surface = RecordingSurface::new();
        let g = gauge(&mut surface, &[42.0]);
        let root = g.element();
        assert_eq!(surface.element(root).unwrap().class, ROOT_CLASS);
        assert_eq!(surface.style_of(root, "width"), Some("150px"));
        assert_eq!(surface.style_of(root, "border-radius"), Some("50%"));

        let disc = surface.children_of(root)[0];
        assert_eq!(surface.element(disc).unwrap().class, VALUE_CLASS);
        assert_eq!(surface.style_of(disc, "width"), Some("120px"));
        assert_eq!(surface.style_of(disc, "top"), Some("10%"));
        assert_eq!(surface.style_of(disc, "background"), Some("#333333"));

        let text = surface.children_of(disc)[0];
        assert_eq!(surface.style_of(text, "line-height"), Some("120px"));
        assert_eq!(surface.style_of(text, "font-size"), Some("40px"));
        assert_eq!(surface.text_of(text), Some("42%"));
    }

    #[test]
    fn test_background_gradient() {
        let mut surface = RecordingSurface::new();
        let g = gauge(&mut surface, &[42.0]);
        assert_eq!(
            surface.style_of(g.element(), "background"),
            Some("conic-gradient(#0484d1 0% 42%, transparent 42.1% 100%) rgba(0, 0, 0, 0.3)")
        );
    }

    #[test]
    fn test_set_values_animates_and_settles() {
        let mut surface = RecordingSurface::new();
        let mut g = gauge(&mut surface, &[0.0]);
        g.set_value(&mut surface, 80.0);
        assert!(g.is_animating());
        assert_eq!(g.values(&surface), vec![0.0]);
        assert_eq!(g.target_values(), vec![80.0]);
        assert_eq!(g.text(), "80%");

        surface.advance(250.0);
        let token = surface.take_frames()[0];
        assert!(g.on_frame(&mut surface, token));
        assert!((g.values(&surface)[0] - 40.0).abs() < 1e-9);

        settle(&mut surface, &mut g);
        assert_eq!(g.values(&surface), vec![80.0]);
        assert!(!g.is_animating());
    }

    #[test]
    fn test_same_values_do_not_restart() {
        let mut surface = RecordingSurface::new();
        let mut g = gauge(&mut surface, &[0.0]);
        g.set_value(&mut surface, 50.0);
        let requested = surface.frames_requested();
        let report = g.set_value(&mut surface, 50.0);
        assert!(!report.changed());
        assert_eq!(surface.frames_requested(), requested);
        assert_eq!(surface.frames_cancelled(), 0);
    }

    #[test]
    fn test_new_assignment_cancels_pending_frame() {
        let mut surface = RecordingSurface::new();
        let mut g = gauge(&mut surface, &[0.0]);
        g.set_value(&mut surface, 50.0);
        g.set_value(&mut surface, 60.0);
        assert_eq!(surface.pending_frames(), 1);
        assert_eq!(surface.frames_cancelled(), 1);
    }

    #[test]
    fn test_empty_values() {
        let mut surface = RecordingSurface::new();
        let mut g = gauge(&mut surface, &[10.0]);
        g.set_values(&mut surface, &[]);
        assert!(g.values(&surface).is_empty());
        assert_eq!(g.value(&surface), None);
        assert!(g.segments().is_empty());
    }

    #[test]
    fn test_non_finite_values_become_zero() {
        let mut surface = RecordingSurface::new();
        let g = gauge(&mut surface, &[f64::NAN, 5.0, f64::INFINITY]);
        assert_eq!(g.values(&surface), vec![0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_hidden_readout() {
        let mut surface = RecordingSurface::new();
        let g = RingGauge::new(
            &mut surface,
            &[42.0],
            GaugeOptions::new().show_value(false),
        );
        let disc = surface.children_of(g.element())[0];
        let text = surface.children_of(disc)[0];
        assert_eq!(surface.style_of(disc, "visibility"), Some("hidden"));
        assert_eq!(surface.text_of(text), Some(""));
        assert_eq!(g.text(), "42%");
    }

    #[test]
    fn test_append_and_remove() {
        let mut surface = RecordingSurface::new();
        let container = surface.root();
        let mut g = gauge(&mut surface, &[0.0]);
        g.append_to(&mut surface, container);
        assert!(surface.is_attached(g.element()));

        g.set_value(&mut surface, 30.0);
        assert_eq!(surface.pending_frames(), 1);
        g.remove(&mut surface);
        assert!(!surface.is_attached(g.element()));
        assert_eq!(surface.pending_frames(), 0);
        assert!(!g.is_animating());

        g.append_to(&mut surface, container);
        assert!(g.is_animating());
        settle(&mut surface, &mut g);
        assert_eq!(g.values(&surface), vec![30.0]);
    }

    #[test]
    fn test_values_follow_clock_without_frames() {
        let mut surface = RecordingSurface::new();
        let mut g = gauge(&mut surface, &[0.0]);
        g.set_value(&mut surface, 42.0);

        surface.advance(250.0);
        assert!((g.values(&surface)[0] - 21.0).abs() < 1e-9);

        surface.advance(10_000.0);
        assert_eq!(g.values(&surface), vec![42.0]);
        assert_eq!(g.value(&surface), Some(42.0));
    }

    #[test]
    fn test_removed_gauge_requests_no_frames() {
        let mut surface = RecordingSurface::new();
        let container = surface.root();
        let mut g = gauge(&mut surface, &[0.0]);
        g.append_to(&mut surface, container);
        g.set_value(&mut surface, 30.0);
        g.remove(&mut surface);

        g.set_value(&mut surface, 60.0);
        assert_eq!(surface.pending_frames(), 0);
        assert!(!g.is_animating());
        assert_eq!(g.target_values(), vec![60.0]);
        assert_eq!(g.text(), "60%");

        surface.advance(10_000.0);
        assert_eq!(g.values(&surface), vec![60.0]);

        g.append_to(&mut surface, container);
        assert_eq!(surface.pending_frames(), 1);
        settle(&mut surface, &mut g);
        assert_eq!(g.values(&surface), vec![60.0]);
        assert_eq!(surface.pending_frames(), 0);
    }

    #[test]
    fn test_paint_to_canvas() {
        let mut surface = RecordingSurface::new();
        let g = gauge(&mut surface, &[25.0, 25.0]);
        let mut canvas = RecordingCanvas::new();
        g.paint(&mut canvas, Rect::square(100.0));

        let commands = canvas.commands();
        assert_eq!(commands.len(), 5);
        assert!(matches!(commands[0], DrawCommand::Circle { radius, .. } if radius == 50.0));
        match &commands[2] {
            DrawCommand::Arc {
                start_angle,
                end_angle,
                ..
            } => {
                assert!((start_angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
                assert!((end_angle - std::f32::consts::PI).abs() < 1e-5);
            }
            other => panic!("expected arc, got {other:?}"),
        }
        assert!(matches!(commands[3], DrawCommand::Circle { radius, .. } if (radius - 40.0).abs() < 1e-4));
        match &commands[4] {
            DrawCommand::Text { content, .. } => assert_eq!(content, "50%"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_paint_empty_bounds_draws_nothing() {
        let mut surface = RecordingSurface::new();
        let g = gauge(&mut surface, &[25.0]);
        let mut canvas = RecordingCanvas::new();
        g.paint(&mut canvas, Rect::square(0.0));
        assert!(canvas.is_empty());
    }
}
