// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests for the `understory_compare` crate.
//!
//! These drive a full [`Compare`] over the headless host: construction,
//! dragging with mouse and touch, resizing, theming, and teardown.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use proptest::prelude::*;
use understory_compare::headless::{HeadlessColorScheme, HeadlessDocument, HeadlessViewport};
use understory_compare::host::{
    ColorSchemeSignal, Document, ElementId, ElementKind, InputEvent, InputKind, StyleSink,
    Target,
};
use understory_compare::listener::Listener;
use understory_compare::viewport::{Camera, LngLat, Viewport, ViewportEvent};
use understory_compare::{
    BACKGROUND_IMAGE_PROPERTY, CLIP_PROPERTY, CONTROL_CLASS, Compare, CompareEvent,
    CompareOptions, ConfigurationError, DEFAULT_SWIPER_ICON, HANDLE_BACKGROUND_PROPERTY,
    HANDLE_BORDER_PROPERTY, HandleStyle, LINE_BACKGROUND_PROPERTY, Orientation,
    POINTER_EVENTS_PROPERTY, PaletteOverride, ResizeMode, ResolvedTheme, SlideEnd,
    THEME_ATTRIBUTE, TRANSFORM_PROPERTY, Theme,
};

const BOX: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

struct Harness {
    document: Rc<HeadlessDocument>,
    scheme: Rc<HeadlessColorScheme>,
    a: Rc<HeadlessViewport>,
    b: Rc<HeadlessViewport>,
}

impl Harness {
    fn new() -> Self {
        Self::with_bounds(BOX)
    }

    fn with_bounds(bounds: Rect) -> Self {
        let scheme = Rc::new(HeadlessColorScheme::new(false));
        let document = Rc::new(
            HeadlessDocument::new().with_color_scheme(scheme.clone() as Rc<dyn ColorSchemeSignal>),
        );
        document.insert_element("#compare", ElementKind::Html);
        Self {
            a: Rc::new(HeadlessViewport::new(document.create_detached(), bounds)),
            b: Rc::new(HeadlessViewport::new(document.create_detached(), bounds)),
            document,
            scheme,
        }
    }

    fn build(&self, options: CompareOptions) -> Compare {
        Compare::new(
            self.a.clone(),
            self.b.clone(),
            self.document.clone(),
            "#compare",
            options,
        )
        .unwrap()
    }

    fn style(&self, element: ElementId, name: &str) -> Option<String> {
        self.document.style(Target::Element(element), name)
    }

    fn root_style(&self, name: &str) -> Option<String> {
        self.document.style(Target::Document, name)
    }

    fn marker(&self) -> Option<String> {
        self.document.attribute(Target::Document, THEME_ATTRIBUTE)
    }

    fn press(&self, compare: &Compare, kind: InputKind, at: Point) -> InputEvent {
        let event = InputEvent::new(kind, Some(at));
        self.document
            .dispatch(Target::Element(compare.handle_element()), &event);
        event
    }

    fn document_event(&self, kind: InputKind, at: Option<Point>) {
        self.document
            .dispatch(Target::Document, &InputEvent::new(kind, at));
    }
}

fn slide_end_recorder() -> (Listener<SlideEnd>, Rc<RefCell<Vec<SlideEnd>>>) {
    let seen: Rc<RefCell<Vec<SlideEnd>>> = Rc::default();
    let listener = {
        let seen = seen.clone();
        Listener::new(move |e: &SlideEnd| seen.borrow_mut().push(*e))
    };
    (listener, seen)
}

#[test]
fn vertical_starts_at_half_width() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());

    assert_eq!(compare.current_position(), 400.0);
    assert_eq!(compare.orientation(), Orientation::Vertical);
    assert_eq!(
        h.style(compare.control_element(), TRANSFORM_PROPERTY).as_deref(),
        Some("translate(400px, 0)")
    );
    assert_eq!(
        h.style(h.a.container(), CLIP_PROPERTY).as_deref(),
        Some("inset(0 400px 0 0)")
    );
    assert_eq!(
        h.style(h.b.container(), CLIP_PROPERTY).as_deref(),
        Some("inset(0 0 0 400px)")
    );
}

#[test]
fn horizontal_starts_at_half_height() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default().orientation(Orientation::Horizontal));

    assert_eq!(compare.current_position(), 300.0);
    assert_eq!(
        h.style(compare.control_element(), TRANSFORM_PROPERTY).as_deref(),
        Some("translate(0, 300px)")
    );
    assert_eq!(
        h.style(h.a.container(), CLIP_PROPERTY).as_deref(),
        Some("inset(0 0 300px 0)")
    );
    assert_eq!(
        h.style(h.b.container(), CLIP_PROPERTY).as_deref(),
        Some("inset(300px 0 0 0)")
    );
}

#[test]
fn control_is_mounted_with_handle() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());

    let mount = compare.mount_element();
    assert_eq!(h.document.children(mount), [compare.control_element()]);
    assert_eq!(
        h.document.children(compare.control_element()),
        [compare.handle_element()]
    );
    assert_eq!(
        h.document.class_name(compare.control_element()).as_deref(),
        Some(CONTROL_CLASS)
    );
    assert_eq!(
        h.style(compare.handle_element(), BACKGROUND_IMAGE_PROPERTY)
            .as_deref(),
        Some(DEFAULT_SWIPER_ICON)
    );
}

#[test]
fn handle_style_overrides_are_written() {
    let h = Harness::new();
    let compare = h.build(
        CompareOptions::default()
            .swiper_icon("none")
            .swiper_style(HandleStyle {
                width: Some("48px".into()),
                border_radius: Some("50%".into()),
                ..HandleStyle::default()
            }),
    );
    let handle = compare.handle_element();

    assert_eq!(
        h.style(handle, BACKGROUND_IMAGE_PROPERTY).as_deref(),
        Some("none")
    );
    assert_eq!(h.style(handle, "width").as_deref(), Some("48px"));
    assert_eq!(h.style(handle, "border-radius").as_deref(), Some("50%"));
    assert_eq!(h.style(handle, "opacity"), None);
}

#[test]
fn drag_updates_position_before_release() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());

    let press = h.press(&compare, InputKind::MouseDown, Point::new(400.0, 50.0));
    assert!(press.is_default_prevented());
    assert!(compare.is_dragging());

    h.document_event(InputKind::MouseMove, Some(Point::new(300.0, 50.0)));

    assert_eq!(compare.current_position(), 300.0);
    assert!(compare.is_dragging());
}

#[test]
fn drag_coordinates_are_local_to_viewport_bounds() {
    let h = Harness::with_bounds(Rect::new(100.0, 50.0, 900.0, 650.0));
    let compare = h.build(CompareOptions::default().orientation(Orientation::Horizontal));

    h.press(&compare, InputKind::MouseDown, Point::new(0.0, 0.0));
    h.document_event(InputKind::MouseMove, Some(Point::new(500.0, 250.0)));

    assert_eq!(compare.current_position(), 200.0);
}

#[test]
fn completed_drag_fires_slide_end_once() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());
    let (listener, seen) = slide_end_recorder();
    compare.on(CompareEvent::SlideEnd, &listener);

    h.press(&compare, InputKind::MouseDown, Point::new(400.0, 0.0));
    h.document_event(InputKind::MouseMove, Some(Point::new(350.0, 0.0)));
    h.document_event(InputKind::MouseMove, Some(Point::new(-50.0, 0.0)));
    assert!(seen.borrow().is_empty());
    h.document_event(InputKind::MouseUp, Some(Point::new(-50.0, 0.0)));

    assert_eq!(
        *seen.borrow(),
        [SlideEnd {
            current_position: 0.0
        }]
    );
    assert!(!compare.is_dragging());

    // Listeners are gone; a stray release fires nothing.
    h.document_event(InputKind::MouseUp, None);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(
        h.document
            .listener_count(Target::Document, InputKind::MouseMove),
        0
    );
    assert_eq!(
        h.document.listener_count(Target::Document, InputKind::MouseUp),
        0
    );
}

#[test]
fn moves_after_release_are_ignored() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());

    h.press(&compare, InputKind::MouseDown, Point::ZERO);
    h.document_event(InputKind::MouseMove, Some(Point::new(100.0, 0.0)));
    h.document_event(InputKind::MouseUp, None);
    h.document_event(InputKind::MouseMove, Some(Point::new(700.0, 0.0)));

    assert_eq!(compare.current_position(), 100.0);
}

#[test]
fn touch_drag_uses_touch_listeners() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());
    let (listener, seen) = slide_end_recorder();
    compare.on(CompareEvent::SlideEnd, &listener);

    h.press(&compare, InputKind::TouchStart, Point::new(400.0, 0.0));
    assert_eq!(
        h.document
            .listener_count(Target::Document, InputKind::TouchMove),
        1
    );
    assert_eq!(
        h.document
            .listener_count(Target::Document, InputKind::MouseMove),
        0
    );

    h.document_event(InputKind::TouchMove, Some(Point::new(620.0, 0.0)));
    // A touch move without a touch point keeps the position.
    h.document_event(InputKind::TouchMove, None);
    assert_eq!(compare.current_position(), 620.0);

    // The mouse release does not end a touch drag.
    h.document_event(InputKind::MouseUp, None);
    assert!(compare.is_dragging());

    h.document_event(InputKind::TouchEnd, None);
    assert_eq!(
        *seen.borrow(),
        [SlideEnd {
            current_position: 620.0
        }]
    );
    assert_eq!(
        h.document.listener_count(Target::Document, InputKind::TouchEnd),
        0
    );
}

#[test]
fn pointer_events_follow_input_modality_when_tracking_hover() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default().mousemove(true));
    let control = compare.control_element();

    h.press(&compare, InputKind::TouchStart, Point::ZERO);
    h.document_event(InputKind::TouchMove, Some(Point::new(10.0, 0.0)));
    assert_eq!(
        h.style(control, POINTER_EVENTS_PROPERTY).as_deref(),
        Some("auto")
    );
    assert_eq!(
        h.style(compare.handle_element(), POINTER_EVENTS_PROPERTY)
            .as_deref(),
        Some("auto")
    );
    h.document_event(InputKind::TouchEnd, None);

    h.document.dispatch(
        Target::Element(h.a.container()),
        &InputEvent::mouse(InputKind::MouseMove, Point::new(123.0, 0.0)),
    );
    assert_eq!(
        h.style(control, POINTER_EVENTS_PROPERTY).as_deref(),
        Some("none")
    );
    assert_eq!(compare.current_position(), 123.0);
}

#[test]
fn hover_is_not_tracked_by_default() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());

    assert_eq!(
        h.document
            .listener_count(Target::Element(h.a.container()), InputKind::MouseMove),
        0
    );
    h.press(&compare, InputKind::MouseDown, Point::ZERO);
    h.document_event(InputKind::MouseMove, Some(Point::new(10.0, 0.0)));
    assert_eq!(h.style(compare.control_element(), POINTER_EVENTS_PROPERTY), None);
}

#[test]
fn set_slider_clamps_and_is_idempotent() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());

    compare.set_slider(1200.0);
    assert_eq!(compare.current_position(), 800.0);
    compare.set_slider(-5.0);
    assert_eq!(compare.current_position(), 0.0);

    compare.set_slider(250.0);
    let first = (
        h.style(compare.control_element(), TRANSFORM_PROPERTY),
        h.style(h.a.container(), CLIP_PROPERTY),
        h.style(h.b.container(), CLIP_PROPERTY),
    );
    compare.set_slider(250.0);
    let second = (
        h.style(compare.control_element(), TRANSFORM_PROPERTY),
        h.style(h.a.container(), CLIP_PROPERTY),
        h.style(h.b.container(), CLIP_PROPERTY),
    );
    assert_eq!(first, second);
}

#[test]
fn cameras_stay_in_step() {
    let h = Harness::new();
    let _compare = h.build(CompareOptions::default());
    let camera = Camera {
        center: LngLat::new(-122.4, 37.8),
        zoom: 11.0,
        bearing: 20.0,
        pitch: 40.0,
    };

    h.a.move_to(camera);
    assert_eq!(h.b.camera(), camera);
    assert_eq!(h.b.jump_count(), 1);
    assert_eq!(h.a.jump_count(), 0);

    let back = Camera {
        zoom: 3.0,
        ..camera
    };
    h.b.move_to(back);
    assert_eq!(h.a.camera(), back);
    assert_eq!(h.a.jump_count(), 1);
    assert_eq!(h.b.jump_count(), 1);
}

#[test]
fn resize_clamps_position_by_default() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());
    compare.set_slider(600.0);

    h.b.resize(Rect::new(0.0, 0.0, 500.0, 600.0));
    assert_eq!(compare.current_position(), 500.0);
    assert_eq!(
        h.style(h.a.container(), CLIP_PROPERTY).as_deref(),
        Some("inset(0 0 0 0)")
    );

    h.b.resize(Rect::new(0.0, 0.0, 1000.0, 600.0));
    assert_eq!(compare.current_position(), 500.0);
}

#[test]
fn resize_can_keep_proportion() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default().resize_mode(ResizeMode::Proportional));
    compare.set_slider(200.0);

    h.b.resize(Rect::new(0.0, 0.0, 400.0, 600.0));

    assert_eq!(compare.current_position(), 100.0);
    assert_eq!(
        h.style(h.b.container(), CLIP_PROPERTY).as_deref(),
        Some("inset(0 0 0 100px)")
    );
}

#[test]
fn only_viewport_b_resizes_are_observed() {
    let h = Harness::new();
    let _compare = h.build(CompareOptions::default());

    assert_eq!(h.a.listener_count(ViewportEvent::Resized), 0);
    assert_eq!(h.b.listener_count(ViewportEvent::Resized), 1);
}

#[test]
fn dark_theme_writes_palette_and_marker() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default().theme(Theme::Dark));

    assert_eq!(
        h.root_style(HANDLE_BACKGROUND_PROPERTY).as_deref(),
        Some("#60a5fa")
    );
    assert_eq!(h.marker().as_deref(), Some("dark"));
    assert_eq!(compare.resolved_theme(), ResolvedTheme::Dark);

    compare.remove();
    assert_eq!(h.marker(), None);
}

#[test]
fn system_theme_follows_preference() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());

    assert_eq!(compare.theme(), Theme::System);
    assert_eq!(h.marker(), None);
    assert_eq!(
        h.root_style(LINE_BACKGROUND_PROPERTY).as_deref(),
        Some("#ffffff")
    );
    assert_eq!(h.scheme.listener_count(), 1);

    h.scheme.set_prefers_dark(true);

    assert_eq!(compare.resolved_theme(), ResolvedTheme::Dark);
    assert_eq!(
        h.root_style(LINE_BACKGROUND_PROPERTY).as_deref(),
        Some("#374151")
    );
    assert_eq!(h.marker(), None);
}

#[test]
fn switching_theme_manages_subscription() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default().theme(Theme::Light));
    assert_eq!(h.scheme.listener_count(), 0);
    assert_eq!(h.marker().as_deref(), Some("light"));

    compare.set_theme(Theme::System);
    assert_eq!(h.scheme.listener_count(), 1);
    assert_eq!(h.marker(), None);

    compare.set_theme(Theme::Light);
    assert_eq!(h.scheme.listener_count(), 0);

    // A preference change after leaving `system` leaves the light palette.
    h.scheme.set_prefers_dark(true);
    assert_eq!(
        h.root_style(HANDLE_BACKGROUND_PROPERTY).as_deref(),
        Some("#3887be")
    );
    assert_eq!(compare.theme(), Theme::Light);
}

#[test]
fn palette_overrides_apply_per_color() {
    let h = Harness::new();
    let _compare = h.build(CompareOptions::default().theme(Theme::Light).light_colors(
        PaletteOverride {
            swiper_border: Some("#000000".into()),
            ..PaletteOverride::default()
        },
    ));

    assert_eq!(
        h.root_style(HANDLE_BORDER_PROPERTY).as_deref(),
        Some("#000000")
    );
    assert_eq!(
        h.root_style(HANDLE_BACKGROUND_PROPERTY).as_deref(),
        Some("#3887be")
    );
}

#[test]
fn missing_preference_signal_resolves_light() {
    let document = Rc::new(HeadlessDocument::new());
    document.insert_element("#compare", ElementKind::Html);
    let a = Rc::new(HeadlessViewport::new(document.create_detached(), BOX));
    let b = Rc::new(HeadlessViewport::new(document.create_detached(), BOX));

    let compare = Compare::new(
        a,
        b,
        document.clone(),
        "#compare",
        CompareOptions::default(),
    )
    .unwrap();

    assert_eq!(compare.resolved_theme(), ResolvedTheme::Light);
    assert_eq!(document.attribute(Target::Document, THEME_ATTRIBUTE), None);
}

#[test]
fn slide_end_registry_delivers_exact_payload() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());
    let (listener, seen) = slide_end_recorder();
    let payload = SlideEnd {
        current_position: 42.5,
    };

    compare.fire(CompareEvent::SlideEnd, &payload);
    compare
        .on(CompareEvent::SlideEnd, &listener)
        .on(CompareEvent::SlideEnd, &listener)
        .fire(CompareEvent::SlideEnd, &payload);
    assert_eq!(*seen.borrow(), [payload]);

    compare
        .off(CompareEvent::SlideEnd, &listener)
        .fire(CompareEvent::SlideEnd, &payload);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn slide_end_listener_may_reenter_control() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());
    let listener = {
        let compare = compare.clone();
        Listener::new(move |_: &SlideEnd| compare.set_slider(0.0))
    };
    compare.on(CompareEvent::SlideEnd, &listener);

    h.press(&compare, InputKind::MouseDown, Point::ZERO);
    h.document_event(InputKind::MouseMove, Some(Point::new(300.0, 0.0)));
    h.document_event(InputKind::MouseUp, None);

    assert_eq!(compare.current_position(), 0.0);
    compare.remove();
}

/// A document that reads the control back on every style write.
struct ObservingDocument {
    inner: HeadlessDocument,
    control: RefCell<Option<Compare>>,
    seen: RefCell<Vec<(Theme, ResolvedTheme, f64)>>,
}

impl ObservingDocument {
    fn observe(&self) {
        let control = self.control.borrow().clone();
        if let Some(compare) = control {
            self.seen.borrow_mut().push((
                compare.theme(),
                compare.resolved_theme(),
                compare.current_position(),
            ));
        }
    }
}

impl StyleSink for ObservingDocument {
    fn set_property(&self, target: Target, name: &str, value: &str) {
        self.inner.set_property(target, name, value);
        self.observe();
    }

    fn remove_property(&self, target: Target, name: &str) {
        self.inner.remove_property(target, name);
        self.observe();
    }

    fn set_attribute(&self, target: Target, name: &str, value: &str) {
        self.inner.set_attribute(target, name, value);
        self.observe();
    }

    fn remove_attribute(&self, target: Target, name: &str) {
        self.inner.remove_attribute(target, name);
        self.observe();
    }
}

impl Document for ObservingDocument {
    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        self.inner.query_selector(selector)
    }

    fn element_kind(&self, element: ElementId) -> Option<ElementKind> {
        self.inner.element_kind(element)
    }

    fn create_element(&self, class_name: &str) -> ElementId {
        self.inner.create_element(class_name)
    }

    fn append_child(&self, parent: ElementId, child: ElementId) {
        self.inner.append_child(parent, child);
    }

    fn remove_element(&self, element: ElementId) {
        self.inner.remove_element(element);
    }

    fn add_listener(&self, target: Target, kind: InputKind, listener: &Listener<InputEvent>) {
        self.inner.add_listener(target, kind, listener);
    }

    fn remove_listener(&self, target: Target, kind: InputKind, listener: &Listener<InputEvent>) {
        self.inner.remove_listener(target, kind, listener);
    }

    fn color_scheme(&self) -> Option<Rc<dyn ColorSchemeSignal>> {
        self.inner.color_scheme()
    }
}

#[test]
fn document_may_read_the_control_while_it_writes() {
    let scheme = Rc::new(HeadlessColorScheme::new(false));
    let inner =
        HeadlessDocument::new().with_color_scheme(scheme.clone() as Rc<dyn ColorSchemeSignal>);
    inner.insert_element("#compare", ElementKind::Html);
    let a = Rc::new(HeadlessViewport::new(inner.create_detached(), BOX));
    let b = Rc::new(HeadlessViewport::new(inner.create_detached(), BOX));
    let document = Rc::new(ObservingDocument {
        inner,
        control: RefCell::default(),
        seen: RefCell::default(),
    });
    let compare = Compare::new(
        a,
        b,
        document.clone(),
        "#compare",
        CompareOptions::default(),
    )
    .unwrap();
    *document.control.borrow_mut() = Some(compare.clone());

    compare.set_slider(100.0);
    compare.set_theme(Theme::Dark);
    assert_eq!(
        document.seen.borrow().last(),
        Some(&(Theme::Dark, ResolvedTheme::Dark, 100.0))
    );

    compare.set_theme(Theme::System);
    scheme.set_prefers_dark(true);
    assert_eq!(
        document.seen.borrow().last(),
        Some(&(Theme::System, ResolvedTheme::Dark, 100.0))
    );

    compare.remove();
    assert!(compare.is_removed());
    assert_eq!(scheme.listener_count(), 0);
    assert_eq!(document.inner.attribute(Target::Document, THEME_ATTRIBUTE), None);
    document.control.take();
}

#[test]
fn dropped_controls_leave_nothing_behind() {
    let h = Harness::new();
    for theme in [Theme::Dark, Theme::System, Theme::Light] {
        let compare = h.build(CompareOptions::default().theme(theme).mousemove(true));
        compare.set_slider(250.0);
    }

    assert!(h.document.has_no_listeners());
    assert_eq!(h.b.listener_count(ViewportEvent::Resized), 0);
    assert_eq!(h.scheme.listener_count(), 0);
    assert_eq!(h.marker(), None);
    assert_eq!(h.root_style(HANDLE_BACKGROUND_PROPERTY), None);
    assert_eq!(h.style(h.a.container(), CLIP_PROPERTY), None);
    let mount = h.document.query_selector("#compare").unwrap();
    assert!(h.document.children(mount).is_empty());
}

#[test]
fn remove_restores_everything() {
    let h = Harness::new();
    let compare = h.build(
        CompareOptions::default()
            .theme(Theme::System)
            .mousemove(true),
    );
    let (listener, seen) = slide_end_recorder();
    compare.on(CompareEvent::SlideEnd, &listener);
    h.press(&compare, InputKind::MouseDown, Point::ZERO);

    compare.remove();

    assert!(compare.is_removed());
    assert!(!compare.is_dragging());
    assert!(h.document.has_no_listeners());
    assert_eq!(h.document.parent(compare.control_element()), None);
    assert!(h.document.children(compare.mount_element()).is_empty());
    assert_eq!(h.style(h.a.container(), CLIP_PROPERTY), None);
    assert_eq!(h.style(h.b.container(), CLIP_PROPERTY), None);
    assert_eq!(h.style(compare.control_element(), TRANSFORM_PROPERTY), None);
    assert_eq!(h.root_style(HANDLE_BACKGROUND_PROPERTY), None);
    assert_eq!(h.root_style(HANDLE_BORDER_PROPERTY), None);
    assert_eq!(h.root_style(LINE_BACKGROUND_PROPERTY), None);
    assert_eq!(h.marker(), None);
    assert_eq!(h.scheme.listener_count(), 0);
    assert_eq!(h.a.listener_count(ViewportEvent::Moved), 0);
    assert_eq!(h.b.listener_count(ViewportEvent::Moved), 0);
    assert_eq!(h.b.listener_count(ViewportEvent::Resized), 0);

    // The registry is cleared; no slide end was ever emitted.
    compare.fire(
        CompareEvent::SlideEnd,
        &SlideEnd {
            current_position: 1.0,
        },
    );
    assert!(seen.borrow().is_empty());
}

#[test]
fn remove_is_idempotent_and_freezes_the_control() {
    let h = Harness::new();
    let compare = h.build(CompareOptions::default());
    compare.remove();
    compare.remove();

    compare.set_slider(10.0);
    compare.set_theme(Theme::Dark);
    h.a.move_to(Camera {
        zoom: 9.0,
        ..Camera::default()
    });

    assert_eq!(compare.current_position(), 400.0);
    assert_eq!(compare.theme(), Theme::System);
    assert_eq!(h.b.jump_count(), 0);
    assert_eq!(h.marker(), None);
    assert_eq!(h.style(h.a.container(), CLIP_PROPERTY), None);
}

#[test]
fn construction_errors_mount_nothing() {
    let h = Harness::new();
    h.document.insert_element("svg.overlay", ElementKind::Other);

    let missing = Compare::new(
        h.a.clone(),
        h.b.clone(),
        h.document.clone(),
        "#nowhere",
        CompareOptions::default(),
    );
    assert_eq!(
        missing.unwrap_err(),
        ConfigurationError::SelectorNotFound("#nowhere".into())
    );

    let wrong_kind = Compare::new(
        h.a.clone(),
        h.b.clone(),
        h.document.clone(),
        "svg.overlay",
        CompareOptions::default(),
    );
    assert_eq!(
        wrong_kind.unwrap_err(),
        ConfigurationError::NotAnHtmlElement("svg.overlay".into())
    );

    assert!(h.document.find_by_class(CONTROL_CLASS).is_empty());
    assert!(h.document.has_no_listeners());
    assert_eq!(h.root_style(HANDLE_BACKGROUND_PROPERTY), None);
    assert_eq!(h.a.listener_count(ViewportEvent::Moved), 0);
}

proptest! {
    #[test]
    fn set_slider_always_clamps(raw in -5_000.0_f64..5_000.0, width in 1.0_f64..2_000.0) {
        let h = Harness::with_bounds(Rect::new(0.0, 0.0, width, 600.0));
        let compare = h.build(CompareOptions::default());

        compare.set_slider(raw);

        prop_assert_eq!(compare.current_position(), raw.max(0.0).min(width));
    }

    #[test]
    fn horizontal_drag_stays_in_extent(y in -5_000.0_f64..5_000.0, height in 1.0_f64..2_000.0) {
        let h = Harness::with_bounds(Rect::new(0.0, 0.0, 800.0, height));
        let compare = h.build(CompareOptions::default().orientation(Orientation::Horizontal));

        h.press(&compare, InputKind::TouchStart, Point::ZERO);
        h.document_event(InputKind::TouchMove, Some(Point::new(0.0, y)));

        let position = compare.current_position();
        prop_assert!((0.0..=height).contains(&position));
    }
}
