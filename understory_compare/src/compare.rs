// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compare control: two viewports, one divider.
//!
//! [`Compare`] wires the pieces together. It mounts a control container with a
//! handle, keeps the viewports' cameras in step through a [`ViewportSync`],
//! routes handle presses into a [`DragController`], positions the divider
//! through a [`PositionModel`], and writes the theme through a
//! [`ThemeResolver`].
//!
//! Every callback the control installs holds only a weak reference back to it,
//! and no internal borrow is held while a viewport, the document, the
//! color-scheme signal, or a [`SlideEnd`] listener runs.
//!
//! Dropping the last [`Compare`] handle tears the control down the same way
//! [`Compare::remove`] does.

use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::drag::{DragController, DragSession};
use crate::error::ConfigurationError;
use crate::host::{Document, ElementId, ElementKind, InputEvent, InputKind, MountTarget, Target};
use crate::listener::{Listener, ListenerRegistry};
use crate::options::CompareOptions;
use crate::position::{Orientation, PositionModel, ResizeMode, SliderLayout, SliderTargets};
use crate::sync::ViewportSync;
use crate::theme::{AppliedTheme, ResolvedTheme, Theme, ThemeResolver};
use crate::viewport::{Viewport, ViewportEvent};

/// Class of the control container.
pub const CONTROL_CLASS: &str = "maplibregl-compare";
/// Class list of the control container of a horizontal divider.
pub const HORIZONTAL_CONTROL_CLASSES: &str = "maplibregl-compare maplibregl-compare-horizontal";
/// Class of the handle of a vertical divider.
pub const VERTICAL_HANDLE_CLASS: &str = "compare-swiper-vertical";
/// Class of the handle of a horizontal divider.
pub const HORIZONTAL_HANDLE_CLASS: &str = "compare-swiper-horizontal";
/// Style property toggled on pointer movement when hover tracking is enabled.
pub const POINTER_EVENTS_PROPERTY: &str = "pointer-events";
/// Style property carrying the handle icon.
pub const BACKGROUND_IMAGE_PROPERTY: &str = "background-image";

/// Events a [`Compare`] emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareEvent {
    /// A drag of the divider completed.
    SlideEnd,
}

/// Payload of [`CompareEvent::SlideEnd`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SlideEnd {
    /// Divider position when the drag ended.
    pub current_position: f64,
}

/// A split-viewport comparison control.
///
/// Cloning yields another handle to the same control. The control is removed
/// when the last handle is dropped. A [`SlideEnd`] listener that captures a
/// handle keeps the control alive until [`remove`](Compare::remove) clears the
/// listeners.
///
/// ```
/// use std::rc::Rc;
/// use core::cell::Cell;
/// use kurbo::{Point, Rect};
/// use understory_compare::headless::{HeadlessDocument, HeadlessViewport};
/// use understory_compare::host::{ElementKind, InputEvent, InputKind, Target};
/// use understory_compare::listener::Listener;
/// use understory_compare::{Compare, CompareEvent, CompareOptions, SlideEnd};
///
/// let document = Rc::new(HeadlessDocument::new());
/// document.insert_element("#compare", ElementKind::Html);
/// let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
/// let a = Rc::new(HeadlessViewport::new(document.create_detached(), bounds));
/// let b = Rc::new(HeadlessViewport::new(document.create_detached(), bounds));
///
/// let compare = Compare::new(a, b, document.clone(), "#compare", CompareOptions::default())?;
/// assert_eq!(compare.current_position(), 400.0);
///
/// let ended = Rc::new(Cell::new(None));
/// let listener = {
///     let ended = ended.clone();
///     Listener::new(move |e: &SlideEnd| ended.set(Some(e.current_position)))
/// };
/// compare.on(CompareEvent::SlideEnd, &listener);
///
/// let handle = Target::Element(compare.handle_element());
/// document.dispatch(handle, &InputEvent::mouse(InputKind::MouseDown, Point::new(400.0, 10.0)));
/// document.dispatch(Target::Document, &InputEvent::mouse(InputKind::MouseMove, Point::new(250.0, 10.0)));
/// document.dispatch(Target::Document, &InputEvent::mouse(InputKind::MouseUp, Point::new(250.0, 10.0)));
/// assert_eq!(ended.get(), Some(250.0));
///
/// compare.remove();
/// # Ok::<(), understory_compare::ConfigurationError>(())
/// ```
#[derive(Clone)]
pub struct Compare {
    inner: Rc<Shared>,
}

struct Shared {
    document: Rc<dyn Document>,
    viewports: [Rc<dyn Viewport>; 2],
    mount: ElementId,
    handle: ElementId,
    targets: SliderTargets,
    mousemove: bool,
    resize_mode: ResizeMode,
    model: RefCell<PositionModel>,
    drag: RefCell<DragController>,
    theme: RefCell<ThemeResolver>,
    sync: RefCell<Option<ViewportSync>>,
    events: RefCell<ListenerRegistry<CompareEvent, SlideEnd>>,
    handlers: Handlers,
    removed: Cell<bool>,
}

struct Handlers {
    resize: Listener<()>,
    press: Listener<InputEvent>,
    drag_move: Listener<InputEvent>,
    release: Listener<InputEvent>,
    hover: Listener<InputEvent>,
}

impl Compare {
    /// Builds the control and mounts it into `container`.
    ///
    /// The divider starts at half of viewport B's extent along the active
    /// axis. Fails before anything is mounted if `container` cannot host the
    /// control.
    pub fn new(
        viewport_a: Rc<dyn Viewport>,
        viewport_b: Rc<dyn Viewport>,
        document: Rc<dyn Document>,
        container: impl Into<MountTarget>,
        options: CompareOptions,
    ) -> Result<Self, ConfigurationError> {
        let mount = resolve_mount(&*document, container.into())?;
        let orientation = options.orientation;

        let control = document.create_element(control_class(orientation));
        let handle = document.create_element(handle_class(orientation));
        let targets = SliderTargets {
            control,
            container_a: viewport_a.container(),
            container_b: viewport_b.container(),
        };
        let model = PositionModel::new(orientation, viewport_b.bounds());
        let signal = document.color_scheme();

        let inner = Rc::new_cyclic(|weak: &Weak<Shared>| Shared {
            theme: RefCell::new(ThemeResolver::new(
                options.theme,
                options.light_palette(),
                options.dark_palette(),
                signal,
                handler(weak, Shared::on_color_scheme_change),
            )),
            handlers: Handlers {
                resize: handler(weak, Shared::on_resize),
                press: handler(weak, Shared::on_press),
                drag_move: handler(weak, Shared::on_drag_move),
                release: handler(weak, Shared::on_release),
                hover: handler(weak, Shared::on_hover),
            },
            document,
            viewports: [viewport_a, viewport_b],
            mount,
            handle,
            targets,
            mousemove: options.mousemove,
            resize_mode: options.resize_mode,
            model: RefCell::new(model),
            drag: RefCell::default(),
            sync: RefCell::new(None),
            events: RefCell::default(),
            removed: Cell::new(false),
        });

        let applied = inner.theme.borrow().current().to_applied();
        applied.write(&*inner.document);
        inner.style_handle(&options);
        inner.document.append_child(control, handle);
        inner.document.append_child(mount, control);

        let initial = inner.model.borrow().extent() / 2.0;
        inner.set_position(initial);

        let [a, b] = &inner.viewports;
        *inner.sync.borrow_mut() = Some(ViewportSync::start(a.clone(), b.clone()));
        b.on(ViewportEvent::Resized, &inner.handlers.resize);

        if inner.mousemove {
            for container in [targets.container_a, targets.container_b] {
                inner.document.add_listener(
                    Target::Element(container),
                    InputKind::MouseMove,
                    &inner.handlers.hover,
                );
            }
        }
        for kind in [InputKind::MouseDown, InputKind::TouchStart] {
            inner
                .document
                .add_listener(Target::Element(handle), kind, &inner.handlers.press);
        }

        tracing::debug!(
            orientation = orientation.as_str(),
            position = initial,
            theme = %options.theme,
            "compare control mounted"
        );
        Ok(Self { inner })
    }

    /// The divider position, always within `[0, extent]`.
    #[must_use]
    pub fn current_position(&self) -> f64 {
        self.inner.model.borrow().position()
    }

    /// The requested theme.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.inner.theme.borrow().requested()
    }

    /// The theme currently in effect.
    #[must_use]
    pub fn resolved_theme(&self) -> ResolvedTheme {
        self.inner.theme.borrow().current().resolved
    }

    /// Divider orientation.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.inner.model.borrow().orientation()
    }

    /// Moves the divider to `x` along the active axis, clamped.
    ///
    /// Does not emit [`CompareEvent::SlideEnd`]. Ignored after
    /// [`remove`](Self::remove).
    pub fn set_slider(&self, x: f64) {
        if self.inner.removed.get() {
            return;
        }
        self.inner.set_position(x);
    }

    /// Changes the requested theme and re-applies it.
    ///
    /// Ignored after [`remove`](Self::remove).
    pub fn set_theme(&self, next: Theme) {
        if self.inner.removed.get() {
            return;
        }
        let change = self.inner.theme.borrow_mut().request(next);
        if let Some(change) = change {
            change.run();
        }
        let applied = self.inner.theme.borrow().current().to_applied();
        applied.write(&*self.inner.document);
    }

    /// Subscribes `listener` to `event`. Subscribing twice has no effect.
    pub fn on(&self, event: CompareEvent, listener: &Listener<SlideEnd>) -> &Self {
        self.inner.events.borrow_mut().insert(event, listener);
        self
    }

    /// Unsubscribes `listener` from `event`.
    pub fn off(&self, event: CompareEvent, listener: &Listener<SlideEnd>) -> &Self {
        self.inner.events.borrow_mut().remove(&event, listener);
        self
    }

    /// Invokes every listener subscribed to `event` with `data`.
    pub fn fire(&self, event: CompareEvent, data: &SlideEnd) -> &Self {
        self.inner.fire(event, data);
        self
    }

    /// Tears the control down.
    ///
    /// Stops camera sync, detaches every listener the control installed,
    /// clears the clip and transform styles and the root theme state, and
    /// unmounts the control container. Calling this again does nothing.
    pub fn remove(&self) {
        self.inner.remove();
    }

    /// Returns `true` while the divider is being dragged.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.inner.drag.borrow().is_dragging()
    }

    /// Returns `true` once [`remove`](Self::remove) ran.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.inner.removed.get()
    }

    /// The control container element.
    #[must_use]
    pub fn control_element(&self) -> ElementId {
        self.inner.targets.control
    }

    /// The handle element inside the control container.
    #[must_use]
    pub fn handle_element(&self) -> ElementId {
        self.inner.handle
    }

    /// The element the control is mounted into.
    #[must_use]
    pub fn mount_element(&self) -> ElementId {
        self.inner.mount
    }
}

impl fmt::Debug for Compare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compare")
            .field("position", &self.current_position())
            .field("orientation", &self.orientation())
            .field("theme", &self.theme())
            .field("dragging", &self.is_dragging())
            .field("removed", &self.is_removed())
            .finish_non_exhaustive()
    }
}

fn handler<T: ?Sized + 'static>(weak: &Weak<Shared>, f: fn(&Shared, &T)) -> Listener<T> {
    let weak = weak.clone();
    Listener::new(move |payload: &T| {
        if let Some(shared) = weak.upgrade() {
            f(&shared, payload);
        }
    })
}

fn resolve_mount(
    document: &dyn Document,
    target: MountTarget,
) -> Result<ElementId, ConfigurationError> {
    match target {
        MountTarget::Selector(selector) => {
            let Some(element) = document.query_selector(&selector) else {
                return Err(ConfigurationError::SelectorNotFound(selector));
            };
            match document.element_kind(element) {
                Some(ElementKind::Html) => Ok(element),
                _ => Err(ConfigurationError::NotAnHtmlElement(selector)),
            }
        }
        MountTarget::Element(element) => match document.element_kind(element) {
            Some(ElementKind::Html) => Ok(element),
            _ => Err(ConfigurationError::InvalidContainer),
        },
    }
}

fn control_class(orientation: Orientation) -> &'static str {
    if orientation.is_horizontal() {
        HORIZONTAL_CONTROL_CLASSES
    } else {
        CONTROL_CLASS
    }
}

fn handle_class(orientation: Orientation) -> &'static str {
    if orientation.is_horizontal() {
        HORIZONTAL_HANDLE_CLASS
    } else {
        VERTICAL_HANDLE_CLASS
    }
}

impl Shared {
    fn style_handle(&self, options: &CompareOptions) {
        let handle = Target::Element(self.handle);
        self.document
            .set_property(handle, BACKGROUND_IMAGE_PROPERTY, options.handle_icon());
        for (name, value) in options.swiper_style.declarations() {
            self.document.set_property(handle, name, value);
        }
    }

    fn set_position(&self, raw: f64) {
        let layout = self.model.borrow_mut().set_position(raw);
        layout.apply(&*self.document, &self.targets);
    }

    /// Positions the divider under the pointer of `event`.
    fn track(&self, event: &InputEvent) {
        if self.mousemove {
            let value = if event.kind().is_touch() { "auto" } else { "none" };
            self.document.set_property(
                Target::Element(self.targets.control),
                POINTER_EVENTS_PROPERTY,
                value,
            );
            self.document
                .set_property(Target::Element(self.handle), POINTER_EVENTS_PROPERTY, value);
        }
        // A touch event without an active touch point has no coordinate.
        let Some(point) = event.position() else {
            return;
        };
        let position = self.model.borrow().local_position(point);
        self.set_position(position);
    }

    fn session_listeners(&self, session: DragSession) -> [(InputKind, &Listener<InputEvent>); 2] {
        let [move_kind, release_kind] = session.listened_kinds();
        [
            (move_kind, &self.handlers.drag_move),
            (release_kind, &self.handlers.release),
        ]
    }

    fn on_press(&self, event: &InputEvent) {
        if self.removed.get() {
            return;
        }
        event.prevent_default();
        let Some(session) = self.drag.borrow_mut().press(event.kind()) else {
            return;
        };
        for (kind, listener) in self.session_listeners(session) {
            self.document.add_listener(Target::Document, kind, listener);
        }
        tracing::debug!(modality = ?session.modality(), "drag started");
    }

    fn on_drag_move(&self, event: &InputEvent) {
        if !self.drag.borrow().accepts_move(event.kind()) {
            return;
        }
        self.track(event);
    }

    fn on_hover(&self, event: &InputEvent) {
        if self.removed.get() || event.kind() != InputKind::MouseMove {
            return;
        }
        self.track(event);
    }

    fn on_release(&self, event: &InputEvent) {
        let Some(session) = self.drag.borrow_mut().release(event.kind()) else {
            return;
        };
        for (kind, listener) in self.session_listeners(session) {
            self.document.remove_listener(Target::Document, kind, listener);
        }
        let current_position = self.model.borrow().position();
        tracing::debug!(current_position, "drag ended");
        self.fire(CompareEvent::SlideEnd, &SlideEnd { current_position });
    }

    fn on_resize(&self, _: &()) {
        let [_, b] = &self.viewports;
        let bounds = b.bounds();
        let layout = self.model.borrow_mut().set_bounds(bounds, self.resize_mode);
        layout.apply(&*self.document, &self.targets);
        tracing::trace!(
            width = bounds.width(),
            height = bounds.height(),
            position = layout.position,
            "viewport resized"
        );
    }

    fn on_color_scheme_change(&self, _: &()) {
        let refreshed = self.theme.borrow().refreshed();
        if let Some(applied) = refreshed {
            applied.write(&*self.document);
            tracing::debug!("system color scheme changed");
        }
    }

    fn fire(&self, event: CompareEvent, data: &SlideEnd) {
        let listeners = self.events.borrow().snapshot(&event);
        for listener in listeners {
            listener.call(data);
        }
    }

    fn remove(&self) {
        if self.removed.replace(true) {
            return;
        }
        let sync = self.sync.borrow_mut().take();
        if let Some(sync) = sync {
            sync.stop();
        }
        let [_, b] = &self.viewports;
        b.off(ViewportEvent::Resized, &self.handlers.resize);

        let document = &*self.document;
        SliderLayout::clear(document, &self.targets);
        let change = self.theme.borrow_mut().release_subscription();
        if let Some(change) = change {
            change.run();
        }
        AppliedTheme::clear(document);

        for container in [self.targets.container_a, self.targets.container_b] {
            document.remove_listener(
                Target::Element(container),
                InputKind::MouseMove,
                &self.handlers.hover,
            );
        }
        let session = self.drag.borrow_mut().cancel();
        if let Some(session) = session {
            for (kind, listener) in self.session_listeners(session) {
                document.remove_listener(Target::Document, kind, listener);
            }
        }
        for kind in [InputKind::MouseDown, InputKind::TouchStart] {
            document.remove_listener(Target::Element(self.handle), kind, &self.handlers.press);
        }

        document.remove_element(self.targets.control);
        // Listeners may own handles; drop them after the borrow ends.
        let events = self.events.take();
        drop(events);
        tracing::debug!("compare control removed");
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.remove();
    }
}
