//! In-memory [`Surface`] with a manual clock.
//!
//! Mirrors what a browser host would do with the same calls: keeps an element
//! tree with merged styles and text, hands out frame tokens, and lets the
//! caller drive time. Used by tests and by the headless CLI.

use crate::surface::{ElementId, FrameToken, Style, Surface};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// State of one element created on a [`RecordingSurface`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordedElement {
    /// Class hint given at creation
    pub class: String,
    /// Parent element, if attached
    pub parent: Option<ElementId>,
    /// Attached children, in attach order
    pub children: Vec<ElementId>,
    /// Merged style properties
    pub style: Style,
    /// Text content
    pub text: String,
}

/// Recording surface with a manually advanced clock.
#[derive(Debug)]
pub struct RecordingSurface {
    elements: BTreeMap<ElementId, RecordedElement>,
    root: ElementId,
    next_element: u64,
    next_frame: u64,
    pending: BTreeSet<FrameToken>,
    now: f64,
    frames_requested: usize,
    frames_cancelled: usize,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    /// Create a surface with a single root container, clock at zero.
    #[must_use]
    pub fn new() -> Self {
        let root = ElementId(0);
        let mut elements = BTreeMap::new();
        elements.insert(
            root,
            RecordedElement {
                class: "root".to_string(),
                ..RecordedElement::default()
            },
        );
        Self {
            elements,
            root,
            next_element: 1,
            next_frame: 1,
            pending: BTreeSet::new(),
            now: 0.0,
            frames_requested: 0,
            frames_cancelled: 0,
        }
    }

    /// The root container (always present).
    #[must_use]
    pub const fn root(&self) -> ElementId {
        self.root
    }

    /// Look up an element.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&RecordedElement> {
        self.elements.get(&id)
    }

    /// A single style property of an element.
    #[must_use]
    pub fn style_of(&self, id: ElementId, key: &str) -> Option<&str> {
        self.elements.get(&id).and_then(|e| e.style.get(key))
    }

    /// Text content of an element.
    #[must_use]
    pub fn text_of(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).map(|e| e.text.as_str())
    }

    /// Children of an element, in attach order.
    #[must_use]
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(&id)
            .map_or(&[][..], |e| e.children.as_slice())
    }

    /// Whether `id` is reachable from the root container.
    #[must_use]
    pub fn is_attached(&self, id: ElementId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.elements.get(&current).and_then(|e| e.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Number of elements ever created, including the root.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Move the clock forward.
    pub fn advance(&mut self, ms: f64) {
        self.now += ms.max(0.0);
    }

    /// Set the clock. Going backwards is ignored.
    pub fn set_now(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Drain outstanding frame tokens, oldest first.
    ///
    /// The caller delivers each one to the widget that requested it.
    pub fn take_frames(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// Outstanding frame tokens.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    /// Whether `token` is still outstanding.
    #[must_use]
    pub fn is_pending(&self, token: FrameToken) -> bool {
        self.pending.contains(&token)
    }

    /// Total frames requested so far.
    #[must_use]
    pub const fn frames_requested(&self) -> usize {
        self.frames_requested
    }

    /// Total frames cancelled while still pending.
    #[must_use]
    pub const fn frames_cancelled(&self) -> usize {
        self.frames_cancelled
    }

    fn unlink(&mut self, element: ElementId) {
        let parent = self.elements.get_mut(&element).and_then(|e| e.parent.take());
        if let Some(parent) = parent {
            if let Some(p) = self.elements.get_mut(&parent) {
                p.children.retain(|c| *c != element);
            }
        }
    }
}

impl Surface for RecordingSurface {
    fn create_element(&mut self, class_hint: &str) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element += 1;
        self.elements.insert(
            id,
            RecordedElement {
                class: class_hint.to_string(),
                ..RecordedElement::default()
            },
        );
        trace!(%id, class = class_hint, "element created");
        id
    }

    fn attach(&mut self, parent: ElementId, child: ElementId) {
        if parent == child || !self.elements.contains_key(&parent) {
            return;
        }
        if !self.elements.contains_key(&child) {
            return;
        }
        self.unlink(child);
        if let Some(c) = self.elements.get_mut(&child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.push(child);
        }
    }

    fn set_style(&mut self, element: ElementId, style: &Style) {
        if let Some(e) = self.elements.get_mut(&element) {
            for (key, value) in style.iter() {
                e.style.set(key, value);
            }
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(e) = self.elements.get_mut(&element) {
            text.clone_into(&mut e.text);
        }
    }

    fn detach(&mut self, element: ElementId) {
        self.unlink(element);
    }

    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_frame);
        self.next_frame += 1;
        self.pending.insert(token);
        self.frames_requested += 1;
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending.remove(&token) {
            self.frames_cancelled += 1;
        }
    }

    fn now(&self) -> f64 {
        self.now
    }
}
