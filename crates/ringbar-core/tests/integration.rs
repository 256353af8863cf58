//! Integration tests for ringbar-core.
//!
//! These tests exercise the public API end-to-end.

use ringbar_core::{
    Canvas, Color, DrawCommand, Easing, Point, Rect, RecordingCanvas, RecordingSurface, Style,
    Surface, TextStyle,
};

// =============================================================================
// Color Integration Tests
// =============================================================================

#[test]
fn test_color_css_roundtrip_defaults() {
    for token in ["#0484d1", "#e53b44", "#2ce8f4", "#ffe762", "#63c64d", "#fb922b"] {
        let color: Color = token.parse().expect("valid palette color");
        assert_eq!(color.to_css(), token);
    }
}

#[test]
fn test_color_translucent_token() {
    let color: Color = "rgba(0, 0, 0, .3)".parse().expect("valid rgba");
    assert!((color.a - 0.3).abs() < 1e-6);
    assert_eq!(color.to_css(), "rgba(0, 0, 0, 0.3)");
}

#[test]
fn test_color_serde_as_string() {
    let json = serde_json::to_string(&Color::from_hex("#333").expect("hex")).expect("json");
    assert_eq!(json, "\"#333333\"");
    let back: Color = serde_json::from_str(&json).expect("parse back");
    assert_eq!(back.to_hex(), "#333333");
    assert!(serde_json::from_str::<Color>("\"not-a-color\"").is_err());
}

// =============================================================================
// Surface Integration Tests
// =============================================================================

#[test]
fn test_surface_tree_through_trait_object() {
    let mut recording = RecordingSurface::new();
    let root = recording.root();
    let surface: &mut dyn Surface = &mut recording;

    let outer = surface.create_element("outer");
    let inner = surface.create_element("inner");
    surface.attach(outer, inner);
    surface.attach(root, outer);
    surface.set_style(inner, &Style::new().with("visibility", "hidden"));
    surface.set_text(inner, "done");

    assert!(recording.is_attached(inner));
    assert_eq!(recording.style_of(inner, "visibility"), Some("hidden"));
    assert_eq!(recording.text_of(inner), Some("done"));
}

#[test]
fn test_surface_frame_loop() {
    let mut surface = RecordingSurface::new();
    let first = surface.request_frame();
    surface.advance(16.0);

    let delivered = surface.take_frames();
    assert_eq!(delivered, vec![first]);
    assert_eq!(surface.now(), 16.0);

    // Cancelling a delivered token does nothing.
    surface.cancel_frame(first);
    assert_eq!(surface.frames_cancelled(), 0);
}

// =============================================================================
// Canvas Integration Tests
// =============================================================================

#[test]
fn test_canvas_pie_from_geometry() {
    let bounds = Rect::square(100.0);
    let center = bounds.center();
    let mut canvas = RecordingCanvas::new();
    canvas.fill_circle(center, bounds.inscribed_radius(), Color::BLACK);
    canvas.fill_arc(
        center,
        bounds.inscribed_radius(),
        0.0,
        std::f32::consts::PI,
        Color::RED,
    );
    canvas.draw_text(
        "50%",
        center,
        &TextStyle {
            size: 20.0,
            color: Color::WHITE,
        },
    );

    assert_eq!(canvas.command_count(), 3);
    match &canvas.commands()[1] {
        DrawCommand::Arc {
            center: c, radius, ..
        } => {
            assert_eq!(*c, Point::new(50.0, 50.0));
            assert_eq!(*radius, 50.0);
        }
        other => panic!("expected arc, got {other:?}"),
    }
}

// =============================================================================
// Easing Integration Tests
// =============================================================================

#[test]
fn test_easing_from_config_string() {
    let easing: Easing = serde_json::from_str("\"cubic-in-out\"").expect("known easing");
    assert_eq!(easing, Easing::CubicInOut);
    assert!((easing.apply(0.5) - 0.5).abs() < 1e-12);
}
