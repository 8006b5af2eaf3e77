// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives a compare control over the headless host and logs what it writes.
//!
//! ```text
//! RUST_LOG=debug cargo run -p understory_demos --bin compare_headless -- --drag-to 250
//! ```

use std::cell::{Cell, RefCell};
use std::error::Error;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use kurbo::{Point, Rect};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use understory_compare::headless::{HeadlessDocument, HeadlessViewport};
use understory_compare::host::{ColorSchemeSignal, ElementKind, InputEvent, InputKind, Target};
use understory_compare::listener::Listener;
use understory_compare::viewport::{Camera, LngLat, Viewport};
use understory_compare::{
    CLIP_PROPERTY, Compare, CompareEvent, CompareOptions, HANDLE_BACKGROUND_PROPERTY,
    Orientation, SlideEnd, THEME_ATTRIBUTE, TRANSFORM_PROPERTY, Theme,
};

#[derive(Parser, Debug)]
#[command(name = "compare_headless")]
#[command(about = "Simulate a split-viewport compare control without a renderer")]
struct Args {
    /// JSON file with compare options (camelCase keys)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Divider orientation: vertical or horizontal
    #[arg(long)]
    orientation: Option<String>,

    /// Theme: light, dark or system
    #[arg(long)]
    theme: Option<String>,

    /// Track the pointer over both viewports outside of dragging
    #[arg(long)]
    mousemove: bool,

    /// Back the system theme with the desktop's color scheme
    #[arg(long)]
    follow_system: bool,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Where the simulated drag releases the divider, along the active axis
    #[arg(long, default_value_t = 200.0)]
    drag_to: f64,
}

/// A color-scheme signal backed by the desktop setting.
///
/// The desktop is queried on construction and on each [`poll`](Self::poll).
#[derive(Debug, Default)]
struct DesktopColorScheme {
    prefers_dark: Cell<bool>,
    listeners: RefCell<Vec<Listener<()>>>,
}

impl DesktopColorScheme {
    fn detect() -> Self {
        Self {
            prefers_dark: Cell::new(desktop_prefers_dark()),
            listeners: RefCell::default(),
        }
    }

    /// Re-reads the desktop setting and notifies subscribers on change.
    fn poll(&self) {
        let now = desktop_prefers_dark();
        if self.prefers_dark.replace(now) == now {
            return;
        }
        info!(prefers_dark = now, "desktop color scheme changed");
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener.call(&());
        }
    }
}

impl ColorSchemeSignal for DesktopColorScheme {
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

fn desktop_prefers_dark() -> bool {
    match dark_light::detect() {
        Ok(dark_light::Mode::Dark) => true,
        Ok(_) => false,
        Err(err) => {
            warn!(?err, "could not detect desktop color scheme, assuming light");
            false
        }
    }
}

fn load_options(args: &Args) -> Result<CompareOptions, Box<dyn Error>> {
    let mut options = match &args.options {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text)?
        }
        None => CompareOptions::default(),
    };
    if let Some(orientation) = &args.orientation {
        options.orientation = orientation.parse::<Orientation>()?;
    }
    if let Some(theme) = &args.theme {
        options.theme = theme.parse::<Theme>()?;
    }
    if args.mousemove {
        options.mousemove = true;
    }
    Ok(options)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let options = load_options(&args)?;
    info!(?options, "options resolved");

    let scheme = args.follow_system.then(|| Rc::new(DesktopColorScheme::detect()));
    let mut document = HeadlessDocument::new();
    if let Some(scheme) = &scheme {
        document = document.with_color_scheme(scheme.clone());
    }
    let document = Rc::new(document);
    document.insert_element("#compare", ElementKind::Html);

    let bounds = Rect::new(0.0, 0.0, args.width, args.height);
    let a = Rc::new(HeadlessViewport::new(document.create_detached(), bounds));
    let b = Rc::new(HeadlessViewport::new(document.create_detached(), bounds));

    let compare = Compare::new(
        a.clone(),
        b.clone(),
        document.clone(),
        "#compare",
        options.clone(),
    )?;
    info!(
        position = compare.current_position(),
        resolved_theme = %compare.resolved_theme(),
        handle_background = ?document.style(Target::Document, HANDLE_BACKGROUND_PROPERTY),
        marker = ?document.attribute(Target::Document, THEME_ATTRIBUTE),
        "mounted"
    );

    let slide_end = Listener::new(|e: &SlideEnd| {
        info!(current_position = e.current_position, "slide end");
    });
    compare.on(CompareEvent::SlideEnd, &slide_end);

    let release_at = match options.orientation {
        Orientation::Vertical => Point::new(bounds.x0 + args.drag_to, bounds.center().y),
        Orientation::Horizontal => Point::new(bounds.center().x, bounds.y0 + args.drag_to),
    };
    let handle = Target::Element(compare.handle_element());
    document.dispatch(handle, &InputEvent::mouse(InputKind::MouseDown, release_at));
    document.dispatch(
        Target::Document,
        &InputEvent::mouse(InputKind::MouseMove, release_at),
    );
    document.dispatch(
        Target::Document,
        &InputEvent::mouse(InputKind::MouseUp, release_at),
    );
    info!(
        transform = ?document.style(Target::Element(compare.control_element()), TRANSFORM_PROPERTY),
        clip_a = ?document.style(Target::Element(a.container()), CLIP_PROPERTY),
        clip_b = ?document.style(Target::Element(b.container()), CLIP_PROPERTY),
        "after drag"
    );

    a.move_to(Camera {
        center: LngLat::new(13.4, 52.5),
        zoom: 10.0,
        bearing: 15.0,
        pitch: 30.0,
    });
    info!(camera_b = ?b.camera(), jumps = b.jump_count(), "after camera move on A");

    b.resize(Rect::new(0.0, 0.0, args.width / 2.0, args.height / 2.0));
    info!(position = compare.current_position(), "after resize");

    if let Some(scheme) = &scheme {
        scheme.poll();
        info!(resolved_theme = %compare.resolved_theme(), "after polling desktop scheme");
    }

    compare.remove();
    info!(
        removed = compare.is_removed(),
        handle_background = ?document.style(Target::Document, HANDLE_BACKGROUND_PROPERTY),
        "removed"
    );
    Ok(())
}
