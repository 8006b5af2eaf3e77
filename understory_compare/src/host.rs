// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host capabilities: element handles, the style sink, input listeners, and
//! the system color-scheme signal.
//!
//! The control's only external effects are declarative style properties and
//! attributes, all written through [`StyleSink`]. [`Document`] adds the few
//! structural operations needed to mount the divider and to listen for raw
//! pointer and touch input. The [`headless`](crate::headless) module provides
//! in-memory implementations of both.

use alloc::rc::Rc;
use alloc::string::String;
use core::cell::Cell;

use kurbo::Point;

use crate::listener::Listener;

/// Opaque handle to an element owned by the host document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// What kind of node an [`ElementId`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// An element that can host the control (an `HTMLElement` in a browser).
    Html,
    /// Any other node, for example an SVG element.
    Other,
}

/// Where a style write or input listener is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// The document itself. Style writes go to the root element.
    Document,
    /// A specific element.
    Element(ElementId),
}

impl From<ElementId> for Target {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

/// Where to mount the control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MountTarget {
    /// A selector resolved with [`Document::query_selector`].
    Selector(String),
    /// A direct element reference.
    Element(ElementId),
}

impl From<&str> for MountTarget {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.into())
    }
}

impl From<String> for MountTarget {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<ElementId> for MountTarget {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

/// Raw input event kinds the control listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Mouse button pressed.
    MouseDown,
    /// Mouse moved.
    MouseMove,
    /// Mouse button released.
    MouseUp,
    /// Finger touched down.
    TouchStart,
    /// Finger moved.
    TouchMove,
    /// Finger lifted.
    TouchEnd,
}

impl InputKind {
    /// Returns `true` for touch events.
    #[must_use]
    pub fn is_touch(self) -> bool {
        matches!(self, Self::TouchStart | Self::TouchMove | Self::TouchEnd)
    }
}

/// A raw pointer or touch event as delivered by the host.
#[derive(Debug)]
pub struct InputEvent {
    kind: InputKind,
    position: Option<Point>,
    default_prevented: Cell<bool>,
}

impl InputEvent {
    /// Creates an event of `kind` at `position` in client coordinates.
    ///
    /// Touch events without an active touch point carry no position.
    #[must_use]
    pub fn new(kind: InputKind, position: Option<Point>) -> Self {
        Self {
            kind,
            position,
            default_prevented: Cell::new(false),
        }
    }

    /// A mouse event at `position`.
    #[must_use]
    pub fn mouse(kind: InputKind, position: Point) -> Self {
        Self::new(kind, Some(position))
    }

    /// A touch event whose first touch point is at `position`.
    #[must_use]
    pub fn touch(kind: InputKind, position: Point) -> Self {
        Self::new(kind, Some(position))
    }

    /// Event kind.
    #[must_use]
    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Client-space position of the pointer or first touch point.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Suppresses the host's default action for this event.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Returns `true` once [`prevent_default`](Self::prevent_default) was called.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Write-only access to declarative style state.
///
/// Property names are CSS names (`clip-path`, `--compare-swiper-bg`).
pub trait StyleSink {
    /// Sets a style property on `target`.
    fn set_property(&self, target: Target, name: &str, value: &str);
    /// Removes a style property from `target`.
    fn remove_property(&self, target: Target, name: &str);
    /// Sets an attribute on `target`.
    fn set_attribute(&self, target: Target, name: &str, value: &str);
    /// Removes an attribute from `target`.
    fn remove_attribute(&self, target: Target, name: &str);
}

/// A live "prefers dark color scheme" signal.
pub trait ColorSchemeSignal {
    /// Returns `true` if the system currently prefers a dark scheme.
    fn prefers_dark(&self) -> bool;
    /// Subscribes `listener` to preference changes.
    fn subscribe(&self, listener: &Listener<()>);
    /// Unsubscribes `listener`. Unknown listeners are ignored.
    fn unsubscribe(&self, listener: &Listener<()>);
}

/// The host document the control mounts into.
pub trait Document: StyleSink {
    /// Resolves a selector to a single node.
    fn query_selector(&self, selector: &str) -> Option<ElementId>;

    /// Kind of an existing node, or `None` if the host does not know it.
    fn element_kind(&self, element: ElementId) -> Option<ElementKind>;

    /// Creates a detached element with the given class list.
    fn create_element(&self, class_name: &str) -> ElementId;

    /// Appends `child` to `parent`.
    fn append_child(&self, parent: ElementId, child: ElementId);

    /// Detaches `element` from its parent.
    fn remove_element(&self, element: ElementId);

    /// Installs an input listener. Installing the same listener twice for the
    /// same target and kind has no effect.
    fn add_listener(&self, target: Target, kind: InputKind, listener: &Listener<InputEvent>);

    /// Removes an input listener. Unknown listeners are ignored.
    fn remove_listener(&self, target: Target, kind: InputKind, listener: &Listener<InputEvent>);

    /// The system color-scheme signal, if the host exposes one.
    fn color_scheme(&self) -> Option<Rc<dyn ColorSchemeSignal>>;
}
