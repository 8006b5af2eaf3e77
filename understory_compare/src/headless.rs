// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host implementations.
//!
//! [`HeadlessDocument`] records every style property and attribute written
//! through [`StyleSink`], keeps a flat element tree, and dispatches input
//! events to registered listeners. [`HeadlessViewport`] holds a camera and a
//! bounding box and notifies synchronously. [`HeadlessColorScheme`] is a
//! preference signal that can be flipped at will.
//!
//! They back this crate's tests and are usable for driving the control from
//! any environment without a real renderer.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_compare::headless::HeadlessDocument;
//! use understory_compare::host::{Document, ElementKind, InputEvent, InputKind, StyleSink, Target};
//! use understory_compare::listener::Listener;
//!
//! let document = HeadlessDocument::new();
//! let root = document.insert_element("#map", ElementKind::Html);
//! assert_eq!(document.query_selector("#map"), Some(root));
//!
//! document.set_property(root.into(), "opacity", "0.5");
//! assert_eq!(document.style(root.into(), "opacity").as_deref(), Some("0.5"));
//!
//! let listener = Listener::new(|event: &InputEvent| event.prevent_default());
//! document.add_listener(Target::Document, InputKind::MouseUp, &listener);
//! let event = InputEvent::mouse(InputKind::MouseUp, Point::ZERO);
//! document.dispatch(Target::Document, &event);
//! assert!(event.is_default_prevented());
//! ```

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use hashbrown::HashMap;
use kurbo::Rect;
use smallvec::SmallVec;

use crate::host::{
    ColorSchemeSignal, Document, ElementId, ElementKind, InputEvent, InputKind, StyleSink,
    Target,
};
use crate::listener::{Listener, ListenerRegistry};
use crate::viewport::{Camera, Viewport, ViewportEvent};

#[derive(Clone, Debug)]
struct Node {
    kind: ElementKind,
    class_name: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

#[derive(Debug, Default)]
struct Tree {
    next_id: u64,
    nodes: HashMap<ElementId, Node>,
    selectors: HashMap<String, ElementId>,
}

impl Tree {
    fn insert(&mut self, kind: ElementKind, class_name: &str) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.nodes.insert(
            id,
            Node {
                kind,
                class_name: class_name.to_string(),
                parent: None,
                children: Vec::new(),
            },
        );
        id
    }

    fn detach(&mut self, element: ElementId) {
        let Some(parent) = self.nodes.get_mut(&element).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.retain(|&child| child != element);
        }
    }
}

/// A recording, in-memory [`Document`].
///
/// Style writes to [`Target::Document`] land on the root element's style.
/// Writes to unknown elements are recorded as well; the document does not
/// validate targets.
#[derive(Default)]
pub struct HeadlessDocument {
    tree: RefCell<Tree>,
    styles: RefCell<HashMap<(Target, String), String>>,
    attributes: RefCell<HashMap<(Target, String), String>>,
    listeners: RefCell<ListenerRegistry<(Target, InputKind), InputEvent>>,
    color_scheme: Option<Rc<dyn ColorSchemeSignal>>,
}

impl fmt::Debug for HeadlessDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessDocument")
            .field("elements", &self.tree.borrow().nodes.len())
            .field("styles", &self.styles.borrow().len())
            .field("attributes", &self.attributes.borrow().len())
            .field("listeners", &self.listeners.borrow())
            .field("has_color_scheme", &self.color_scheme.is_some())
            .finish()
    }
}

impl HeadlessDocument {
    /// Creates an empty document without a color-scheme signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exposes `signal` through [`Document::color_scheme`].
    #[must_use]
    pub fn with_color_scheme(mut self, signal: Rc<dyn ColorSchemeSignal>) -> Self {
        self.color_scheme = Some(signal);
        self
    }

    /// Adds a detached node reachable through `selector`.
    pub fn insert_element(&self, selector: &str, kind: ElementKind) -> ElementId {
        let mut tree = self.tree.borrow_mut();
        let id = tree.insert(kind, "");
        tree.selectors.insert(selector.to_string(), id);
        id
    }

    /// Adds a detached HTML element with no selector, such as a viewport
    /// container.
    pub fn create_detached(&self) -> ElementId {
        self.tree.borrow_mut().insert(ElementKind::Html, "")
    }

    /// Current value of a style property.
    #[must_use]
    pub fn style(&self, target: Target, name: &str) -> Option<String> {
        self.styles
            .borrow()
            .get(&(target, name.to_string()))
            .cloned()
    }

    /// Current value of an attribute.
    #[must_use]
    pub fn attribute(&self, target: Target, name: &str) -> Option<String> {
        self.attributes
            .borrow()
            .get(&(target, name.to_string()))
            .cloned()
    }

    /// Class list an element was created with.
    #[must_use]
    pub fn class_name(&self, element: ElementId) -> Option<String> {
        self.tree
            .borrow()
            .nodes
            .get(&element)
            .map(|node| node.class_name.clone())
    }

    /// Children of `element`, in append order.
    #[must_use]
    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.tree
            .borrow()
            .nodes
            .get(&element)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Parent of `element`, if attached.
    #[must_use]
    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.tree
            .borrow()
            .nodes
            .get(&element)
            .and_then(|node| node.parent)
    }

    /// Elements whose class list contains `class`, attached or not.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<ElementId> {
        let tree = self.tree.borrow();
        let mut found: Vec<ElementId> = tree
            .nodes
            .iter()
            .filter(|(_, node)| node.class_name.split_whitespace().any(|c| c == class))
            .map(|(&id, _)| id)
            .collect();
        found.sort_unstable();
        found
    }

    /// Number of input listeners installed for `target` and `kind`.
    #[must_use]
    pub fn listener_count(&self, target: Target, kind: InputKind) -> usize {
        self.listeners.borrow().len(&(target, kind))
    }

    /// Returns `true` if no input listener is installed anywhere.
    #[must_use]
    pub fn has_no_listeners(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Delivers `event` to every listener for `target` and the event's kind.
    ///
    /// There is no bubbling; dispatch to [`Target::Document`] separately to
    /// model document-scoped listeners.
    pub fn dispatch(&self, target: Target, event: &InputEvent) {
        let listeners = self.listeners.borrow().snapshot(&(target, event.kind()));
        for listener in listeners {
            listener.call(event);
        }
    }
}

impl StyleSink for HeadlessDocument {
    fn set_property(&self, target: Target, name: &str, value: &str) {
        self.styles
            .borrow_mut()
            .insert((target, name.to_string()), value.to_string());
    }

    fn remove_property(&self, target: Target, name: &str) {
        self.styles.borrow_mut().remove(&(target, name.to_string()));
    }

    fn set_attribute(&self, target: Target, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert((target, name.to_string()), value.to_string());
    }

    fn remove_attribute(&self, target: Target, name: &str) {
        self.attributes
            .borrow_mut()
            .remove(&(target, name.to_string()));
    }
}

impl Document for HeadlessDocument {
    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        self.tree.borrow().selectors.get(selector).copied()
    }

    fn element_kind(&self, element: ElementId) -> Option<ElementKind> {
        self.tree.borrow().nodes.get(&element).map(|node| node.kind)
    }

    fn create_element(&self, class_name: &str) -> ElementId {
        self.tree.borrow_mut().insert(ElementKind::Html, class_name)
    }

    fn append_child(&self, parent: ElementId, child: ElementId) {
        let mut tree = self.tree.borrow_mut();
        if !tree.nodes.contains_key(&parent) || !tree.nodes.contains_key(&child) {
            return;
        }
        tree.detach(child);
        if let Some(node) = tree.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = tree.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    fn remove_element(&self, element: ElementId) {
        self.tree.borrow_mut().detach(element);
    }

    fn add_listener(&self, target: Target, kind: InputKind, listener: &Listener<InputEvent>) {
        self.listeners.borrow_mut().insert((target, kind), listener);
    }

    fn remove_listener(&self, target: Target, kind: InputKind, listener: &Listener<InputEvent>) {
        self.listeners.borrow_mut().remove(&(target, kind), listener);
    }

    fn color_scheme(&self) -> Option<Rc<dyn ColorSchemeSignal>> {
        self.color_scheme.clone()
    }
}

type ListenerList = SmallVec<[Listener<()>; 2]>;

/// An in-memory [`Viewport`].
///
/// Notifications are delivered synchronously from [`move_to`](Self::move_to),
/// [`resize`](Self::resize) and [`Viewport::jump_to`].
#[derive(Debug)]
pub struct HeadlessViewport {
    container: ElementId,
    bounds: Cell<Rect>,
    camera: Cell<Camera>,
    moved: RefCell<ListenerList>,
    resized: RefCell<ListenerList>,
    jumps: Cell<usize>,
}

impl HeadlessViewport {
    /// Creates a viewport rendering into `container` with the given bounds.
    #[must_use]
    pub fn new(container: ElementId, bounds: Rect) -> Self {
        Self {
            container,
            bounds: Cell::new(bounds),
            camera: Cell::new(Camera::default()),
            moved: RefCell::default(),
            resized: RefCell::default(),
            jumps: Cell::new(0),
        }
    }

    /// Simulates a user gesture moving the camera.
    pub fn move_to(&self, camera: Camera) {
        self.camera.set(camera);
        self.notify(ViewportEvent::Moved);
    }

    /// Changes the container bounds and notifies [`ViewportEvent::Resized`].
    pub fn resize(&self, bounds: Rect) {
        self.bounds.set(bounds);
        self.notify(ViewportEvent::Resized);
    }

    /// Number of [`Viewport::jump_to`] calls so far.
    #[must_use]
    pub fn jump_count(&self) -> usize {
        self.jumps.get()
    }

    /// Number of listeners subscribed to `event`.
    #[must_use]
    pub fn listener_count(&self, event: ViewportEvent) -> usize {
        self.list(event).borrow().len()
    }

    fn list(&self, event: ViewportEvent) -> &RefCell<ListenerList> {
        match event {
            ViewportEvent::Moved => &self.moved,
            ViewportEvent::Resized => &self.resized,
        }
    }

    fn notify(&self, event: ViewportEvent) {
        let listeners = self.list(event).borrow().clone();
        for listener in listeners {
            listener.call(&());
        }
    }
}

impl Viewport for HeadlessViewport {
    fn camera(&self) -> Camera {
        self.camera.get()
    }

    fn jump_to(&self, camera: Camera) {
        self.jumps.set(self.jumps.get() + 1);
        self.camera.set(camera);
        self.notify(ViewportEvent::Moved);
    }

    fn container(&self) -> ElementId {
        self.container
    }

    fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    fn on(&self, event: ViewportEvent, listener: &Listener<()>) {
        let mut list = self.list(event).borrow_mut();
        if !list.contains(listener) {
            list.push(listener.clone());
        }
    }

    fn off(&self, event: ViewportEvent, listener: &Listener<()>) {
        self.list(event).borrow_mut().retain(|l| *l != *listener);
    }
}

/// A [`ColorSchemeSignal`] driven by hand.
#[derive(Debug, Default)]
pub struct HeadlessColorScheme {
    prefers_dark: Cell<bool>,
    listeners: RefCell<Vec<Listener<()>>>,
}

impl HeadlessColorScheme {
    /// Creates a signal with the given initial preference.
    #[must_use]
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            prefers_dark: Cell::new(prefers_dark),
            listeners: RefCell::default(),
        }
    }

    /// Changes the preference, notifying subscribers if it actually changed.
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        if self.prefers_dark.replace(prefers_dark) == prefers_dark {
            return;
        }
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener.call(&());
        }
    }

    /// Number of current subscribers.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl ColorSchemeSignal for HeadlessColorScheme {
    fn prefers_dark(&self) -> bool {
        self.prefers_dark.get()
    }

    fn subscribe(&self, listener: &Listener<()>) {
        let mut listeners = self.listeners.borrow_mut();
        if !listeners.contains(listener) {
            listeners.push(listener.clone());
        }
    }

    fn unsubscribe(&self, listener: &Listener<()>) {
        self.listeners.borrow_mut().retain(|l| l != listener);
    }
}
