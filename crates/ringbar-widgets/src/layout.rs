//! Arc layout of the painted segments and the composited ring background.

use crate::mapper::{to_degree, to_percentage};
use crate::segment::Segment;
use ringbar_core::surface::percent;
use ringbar_core::Color;
use serde::Serialize;

/// Slices narrower than this (in percent) are left out of the gradient.
pub const MIN_VISIBLE_PERCENT: f64 = 0.1;

/// Gap (in percent) left between two consecutive gradient slices.
pub const SEGMENT_GAP_PERCENT: f64 = 0.1;

/// Geometry of one painted segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentArc {
    /// Segment index
    pub index: usize,
    /// Fill color
    pub color: Color,
    /// Value the arc was computed from
    pub value: f64,
    /// Unclamped share of the ring, in percent
    pub percentage: f64,
    /// Where the arc starts, in percent of the ring
    pub start_percent: f64,
    /// Visible share after the cumulative clamp, in percent
    pub sweep_percent: f64,
    /// Start angle in degrees, clockwise from 12 o'clock
    pub start_angle: f64,
    /// Sweep in degrees
    pub sweep_angle: f64,
}

impl SegmentArc {
    /// Where the arc ends, in percent of the ring.
    #[must_use]
    pub fn end_percent(&self) -> f64 {
        self.start_percent + self.sweep_percent
    }
}

/// Lay out segments one after the other around the ring.
///
/// Each arc starts where the previous one ended. Sweeps are clamped so the
/// cumulative total never exceeds a full revolution.
#[must_use]
pub fn layout_arcs<'a, I>(segments: I, max: f64) -> Vec<SegmentArc>
where
    I: IntoIterator<Item = &'a Segment>,
{
    let mut cursor = 0.0;
    segments
        .into_iter()
        .map(|segment| {
            let value = segment.current_value();
            let percentage = to_percentage(value, max);
            let sweep = percentage.min(100.0 - cursor).max(0.0);
            let arc = SegmentArc {
                index: segment.index(),
                color: segment.color(),
                value,
                percentage,
                start_percent: cursor,
                sweep_percent: sweep,
                start_angle: to_degree(cursor),
                sweep_angle: to_degree(sweep),
            };
            cursor += sweep;
            arc
        })
        .collect()
}

/// Compose the ring background for a set of arcs.
///
/// Produces `conic-gradient(<stops>) <background>`, where each visible arc is
/// a hard color stop and whatever is left of the ring is transparent so the
/// background shows through.
#[must_use]
pub fn conic_gradient(arcs: &[SegmentArc], background: Color) -> String {
    let mut stops = Vec::with_capacity(arcs.len() + 1);
    let mut cursor = 0.0_f64;
    for arc in arcs {
        if arc.sweep_percent < MIN_VISIBLE_PERCENT || cursor >= 100.0 {
            continue;
        }
        let end = (cursor + arc.sweep_percent).min(100.0);
        stops.push(format!(
            "{} {} {}",
            arc.color.to_css(),
            percent(cursor),
            percent(end)
        ));
        cursor = end + SEGMENT_GAP_PERCENT;
    }
    if cursor < 100.0 {
        stops.push(format!("transparent {} 100%", percent(cursor)));
    }
    format!("conic-gradient({}) {}", stops.join(", "), background.to_css())
}
