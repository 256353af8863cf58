//! Retained-mode presentation capability.
//!
//! A [`Surface`] is whatever hosts the widget: a DOM bridge, a native scene
//! graph, or the in-memory [`RecordingSurface`](crate::RecordingSurface) used
//! in tests and by the headless CLI. Widgets hold only opaque [`ElementId`]s
//! and [`FrameToken`]s; the surface owns everything behind them.
//!
//! Frame callbacks are inverted: instead of registering a closure, a widget
//! asks for a frame with [`Surface::request_frame`] and the host later hands
//! the returned token back to the widget's frame handler. Cancelled tokens
//! must never be delivered.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque handle to an element created by a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Handle to a pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameToken(pub u64);

/// Ordered set of style properties, applied as a batch.
///
/// Keys use CSS property names (`width`, `background`, `line-height`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style(BTreeMap<String, String>);

impl Style {
    /// Create an empty style batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property (builder form).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Add or replace a property.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a property.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no properties are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Style {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Presentation capability consumed by widgets.
///
/// All operations are assumed infallible; a host that can fail should log and
/// carry on, the widget has no recovery path for presentation errors.
pub trait Surface {
    /// Create a detached element. `class_hint` is a styling hook.
    fn create_element(&mut self, class_hint: &str) -> ElementId;

    /// Attach `child` under `parent`, moving it if it already has a parent.
    fn attach(&mut self, parent: ElementId, child: ElementId);

    /// Merge style properties into an element.
    fn set_style(&mut self, element: ElementId, style: &Style);

    /// Replace an element's text content.
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Detach an element from its parent. Detaching a detached element is a no-op.
    fn detach(&mut self, element: ElementId);

    /// Ask for one frame callback.
    fn request_frame(&mut self) -> FrameToken;

    /// Withdraw a frame request. Unknown or already delivered tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);

    /// Current timestamp in milliseconds (monotonic).
    fn now(&self) -> f64;
}

/// Format a length in CSS pixels, trimming float noise.
#[must_use]
pub fn px(value: f64) -> String {
    format!("{}px", trim_number(value))
}

/// Format a CSS percentage, trimming float noise.
#[must_use]
pub fn percent(value: f64) -> String {
    format!("{}%", trim_number(value))
}

/// Print a number with at most three decimals and no trailing zeros.
#[must_use]
pub fn trim_number(value: f64) -> String {
    let s = format!("{:.3}", value + 0.0);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_builder_and_lookup() {
        let style = Style::new().with("width", "150px").with("height", "150px");
        assert_eq!(style.len(), 2);
        assert_eq!(style.get("width"), Some("150px"));
        assert_eq!(style.get("color"), None);
    }

    #[test]
    fn test_style_set_replaces() {
        let mut style = Style::new();
        style.set("background", "red");
        style.set("background", "blue");
        assert_eq!(style.len(), 1);
        assert_eq!(style.get("background"), Some("blue"));
    }

    #[test]
    fn test_style_from_iter_is_ordered() {
        let style: Style = [("z", "1"), ("a", "2")].into_iter().collect();
        let keys: Vec<&str> = style.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "z"]);
    }

    #[test]
    fn test_trim_number() {
        assert_eq!(trim_number(150.0), "150");
        assert_eq!(trim_number(33.333_333_333), "33.333");
        assert_eq!(trim_number(12.5), "12.5");
        assert_eq!(trim_number(-0.0), "0");
        assert_eq!(trim_number(-0.0001), "0");
    }

    #[test]
    fn test_px_and_percent() {
        assert_eq!(px(120.0), "120px");
        assert_eq!(percent(10.0), "10%");
    }

    #[test]
    fn test_element_id_display() {
        assert_eq!(ElementId(7).to_string(), "element#7");
    }
}
