//! Multi-segment circular progress gauge.
//!
//! The [`RingGauge`] shows an ordered set of values as consecutive slices of
//! a ring. Value changes animate over a fixed duration; growing or shrinking
//! the set keeps each index on the same color and position.
//!
//! Building blocks, leaves first:
//! - [`mapper`]: value to percentage to degrees
//! - [`segment`]: one slice and its interpolation state
//! - [`reconcile`]: keeping the segment set in line with assigned values
//! - [`layout`]: arcs and the composited ring background
//! - [`scheduler`]: frame-by-frame transition driver
//!
//! ```
//! use ringbar_core::RecordingSurface;
//! use ringbar_widgets::{GaugeOptions, RingGauge};
//!
//! let mut surface = RecordingSurface::new();
//! let mut gauge = RingGauge::new(&mut surface, &[10.0, 20.0], GaugeOptions::default());
//! assert_eq!(gauge.text(), "30%");
//!
//! gauge.set_values(&mut surface, &[40.0]);
//! surface.advance(500.0);
//! for token in surface.take_frames() {
//!     gauge.on_frame(&mut surface, token);
//! }
//! assert_eq!(gauge.values(&surface), vec![40.0]);
//! ```

pub mod layout;
pub mod mapper;
pub mod options;
pub mod readout;
pub mod reconcile;
pub mod ring_gauge;
pub mod scheduler;
pub mod segment;

pub use layout::{conic_gradient, layout_arcs, SegmentArc};
pub use mapper::{to_degree, to_percentage};
pub use options::{default_colors, ConfigError, GaugeOptions};
pub use readout::readout;
pub use reconcile::{ReconcileReport, SegmentSet};
pub use ring_gauge::RingGauge;
pub use scheduler::{TickOutcome, TransitionScheduler};
pub use segment::Segment;
