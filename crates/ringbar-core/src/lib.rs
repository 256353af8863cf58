//! Core types and traits for the ringbar radial progress widget.
//!
//! This crate provides the foundation the widget is built on:
//! - Color representation: [`Color`] with CSS token parsing
//! - Geometric primitives: [`Point`], [`Rect`]
//! - Timing functions: [`Easing`]
//! - Retained-mode presentation: [`Surface`] and the in-memory [`RecordingSurface`]
//! - Immediate-mode painting: [`Canvas`] and [`RecordingCanvas`]

mod animation;
mod canvas;
mod color;
mod geometry;
mod recording;
pub mod surface;

pub use animation::Easing;
pub use canvas::{Canvas, DrawCommand, RecordingCanvas, TextStyle};
pub use color::{Color, ColorParseError};
pub use geometry::{Point, Rect};
pub use recording::{RecordedElement, RecordingSurface};
pub use surface::{ElementId, FrameToken, Style, Surface};
