// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Compare: a headless split-viewport comparison control.
//!
//! Two independently rendered map surfaces sit on top of each other behind a
//! single draggable divider. Their cameras (center, zoom, bearing, pitch) are
//! kept in lock-step, and the divider position decides how much of each
//! surface is visible. This crate never renders anything: it computes
//! positions, mirrors camera state, and writes declarative style properties
//! through a narrow host interface.
//!
//! The building blocks are usable on their own:
//!
//! - [`PositionModel`]: clamped divider position and the matching translation
//!   and clip insets, rendered to CSS by [`SliderLayout`].
//! - [`drag::DragController`]: press, move, and release across mouse and touch.
//! - [`ViewportSync`]: two-way camera mirroring with a reentrancy guard.
//! - [`ThemeResolver`]: light, dark, or system theme, with the preference
//!   subscription kept only while it is needed.
//! - [`listener`]: identity-compared callbacks and a set-based registry.
//!
//! [`Compare`] orchestrates them over a [`host::Document`] and two
//! [`viewport::Viewport`]s. The [`headless`] module implements both traits in
//! memory.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use kurbo::Rect;
//! use understory_compare::headless::{HeadlessDocument, HeadlessViewport};
//! use understory_compare::host::{ElementKind, Target};
//! use understory_compare::viewport::Viewport;
//! use understory_compare::{Compare, CompareOptions, Theme, CLIP_PROPERTY};
//!
//! let document = Rc::new(HeadlessDocument::new());
//! document.insert_element("#compare", ElementKind::Html);
//! let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
//! let a = Rc::new(HeadlessViewport::new(document.create_detached(), bounds));
//! let b = Rc::new(HeadlessViewport::new(document.create_detached(), bounds));
//! let (container_a, container_b) = (a.container(), b.container());
//!
//! let compare = Compare::new(
//!     a,
//!     b,
//!     document.clone(),
//!     "#compare",
//!     CompareOptions::default().theme(Theme::Dark),
//! )
//! .unwrap();
//!
//! compare.set_slider(200.0);
//! assert_eq!(
//!     document.style(Target::Element(container_a), CLIP_PROPERTY).as_deref(),
//!     Some("inset(0 600px 0 0)")
//! );
//! assert_eq!(
//!     document.style(Target::Element(container_b), CLIP_PROPERTY).as_deref(),
//!     Some("inset(0 0 0 200px)")
//! );
//!
//! compare.remove();
//! assert!(document.style(Target::Element(container_a), CLIP_PROPERTY).is_none());
//! ```
//!
//! ## Features
//!
//! - `std` (default): builds Kurbo, `tracing`, and `thiserror` against the
//!   standard library.
//! - `libm`: lets Kurbo use `libm` in `no_std` builds.
//! - `serde`: `Serialize`/`Deserialize` for [`CompareOptions`] and the types it
//!   contains, with `camelCase` field names.
//!
//! This crate is `no_std` and uses `alloc`. All state is single-threaded.

#![no_std]

extern crate alloc;

mod compare;
pub mod drag;
mod error;
pub mod headless;
pub mod host;
pub mod listener;
mod options;
mod position;
mod sync;
mod theme;
pub mod viewport;

pub use compare::{
    BACKGROUND_IMAGE_PROPERTY, CONTROL_CLASS, Compare, CompareEvent, HORIZONTAL_CONTROL_CLASSES,
    HORIZONTAL_HANDLE_CLASS, POINTER_EVENTS_PROPERTY, SlideEnd, VERTICAL_HANDLE_CLASS,
};
pub use error::ConfigurationError;
pub use options::{CompareOptions, DEFAULT_SWIPER_ICON, HandleStyle};
pub use position::{
    CLIP_PROPERTY, Orientation, PositionModel, ResizeMode, SliderLayout, SliderTargets,
    TRANSFORM_PROPERTY,
};
pub use sync::ViewportSync;
pub use theme::{
    AppliedTheme, HANDLE_BACKGROUND_PROPERTY, HANDLE_BORDER_PROPERTY, LINE_BACKGROUND_PROPERTY,
    Palette, PaletteOverride, Resolution, ResolvedTheme, SubscriptionChange, THEME_ATTRIBUTE,
    Theme, ThemeResolver,
};
