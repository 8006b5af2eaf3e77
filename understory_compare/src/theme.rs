// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Theme requests, palettes, and resolution against the system preference.
//!
//! A [`Theme`] request is either concrete (`Light`, `Dark`) or `System`. The
//! [`ThemeResolver`] turns it into a [`ResolvedTheme`] and a [`Palette`], and
//! writes the palette into three custom properties on the document root.
//!
//! While the request is `System`, and only then, the resolver keeps a
//! subscription on the host's [`ColorSchemeSignal`]. Switching away removes it;
//! switching back installs it again.

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::error::ConfigurationError;
use crate::host::{ColorSchemeSignal, StyleSink, Target};
use crate::listener::Listener;

/// Custom property holding the handle background color.
pub const HANDLE_BACKGROUND_PROPERTY: &str = "--compare-swiper-bg";
/// Custom property holding the handle border color.
pub const HANDLE_BORDER_PROPERTY: &str = "--compare-swiper-border";
/// Custom property holding the divider line color.
pub const LINE_BACKGROUND_PROPERTY: &str = "--compare-line-bg";
/// Root attribute naming an explicitly requested theme.
pub const THEME_ATTRIBUTE: &str = "data-compare-theme";

/// A requested theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Theme {
    /// Always light.
    Light,
    /// Always dark.
    Dark,
    /// Follow the system preference, light when unknown.
    #[default]
    System,
}

impl Theme {
    /// Lowercase name, as used in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(ConfigurationError::UnknownTheme(other.into())),
        }
    }
}

/// A concrete theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolvedTheme {
    /// Light palette.
    Light,
    /// Dark palette.
    Dark,
}

impl ResolvedTheme {
    /// Lowercase name, as written to [`THEME_ATTRIBUTE`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colors used by the divider and its handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Handle background.
    pub handle_background: String,
    /// Handle border.
    pub handle_border: String,
    /// Divider line.
    pub line_background: String,
}

impl Palette {
    /// The default light palette.
    #[must_use]
    pub fn light() -> Self {
        Self {
            handle_background: "#3887be".into(),
            handle_border: "#ffffff".into(),
            line_background: "#ffffff".into(),
        }
    }

    /// The default dark palette.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            handle_background: "#60a5fa".into(),
            handle_border: "#1f2937".into(),
            line_background: "#374151".into(),
        }
    }

    /// Replaces each color that `overrides` sets, keeping the rest.
    #[must_use]
    pub fn merged(mut self, overrides: &PaletteOverride) -> Self {
        if let Some(color) = &overrides.swiper_background {
            self.handle_background.clone_from(color);
        }
        if let Some(color) = &overrides.swiper_border {
            self.handle_border.clone_from(color);
        }
        if let Some(color) = &overrides.line_background {
            self.line_background.clone_from(color);
        }
        self
    }
}

/// Per-color palette overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct PaletteOverride {
    /// Handle background.
    pub swiper_background: Option<String>,
    /// Handle border.
    pub swiper_border: Option<String>,
    /// Divider line.
    pub line_background: Option<String>,
}

/// The outcome of resolving a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// What was asked for.
    pub requested: Theme,
    /// What it maps to right now.
    pub resolved: ResolvedTheme,
    /// Palette for `resolved`.
    pub palette: &'a Palette,
}

impl Resolution<'_> {
    /// Copies the resolution out of the resolver that produced it.
    #[must_use]
    pub fn to_applied(&self) -> AppliedTheme {
        AppliedTheme {
            requested: self.requested,
            resolved: self.resolved,
            palette: self.palette.clone(),
        }
    }
}

/// Root theme state, ready to be written.
///
/// Owning its palette lets a caller release the resolver before handing the
/// document control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedTheme {
    /// What was asked for.
    pub requested: Theme,
    /// What it maps to.
    pub resolved: ResolvedTheme,
    /// Palette for `resolved`.
    pub palette: Palette,
}

impl AppliedTheme {
    /// Writes the palette and the theme marker to the document root.
    ///
    /// The marker is present only for a concrete request.
    pub fn write<S: StyleSink + ?Sized>(&self, sink: &S) {
        let palette = &self.palette;
        sink.set_property(
            Target::Document,
            HANDLE_BACKGROUND_PROPERTY,
            &palette.handle_background,
        );
        sink.set_property(Target::Document, HANDLE_BORDER_PROPERTY, &palette.handle_border);
        sink.set_property(
            Target::Document,
            LINE_BACKGROUND_PROPERTY,
            &palette.line_background,
        );

        if self.requested == Theme::System {
            sink.remove_attribute(Target::Document, THEME_ATTRIBUTE);
        } else {
            sink.set_attribute(Target::Document, THEME_ATTRIBUTE, self.resolved.as_str());
        }
        tracing::debug!(
            requested = %self.requested,
            resolved = %self.resolved,
            "applied theme"
        );
    }

    /// Removes everything [`write`](Self::write) puts on the document root.
    pub fn clear<S: StyleSink + ?Sized>(sink: &S) {
        sink.remove_attribute(Target::Document, THEME_ATTRIBUTE);
        sink.remove_property(Target::Document, HANDLE_BACKGROUND_PROPERTY);
        sink.remove_property(Target::Document, HANDLE_BORDER_PROPERTY);
        sink.remove_property(Target::Document, LINE_BACKGROUND_PROPERTY);
    }
}

/// A pending subscribe or unsubscribe on a [`ColorSchemeSignal`].
///
/// The resolver has already recorded the new state; [`run`](Self::run) tells
/// the signal.
#[must_use = "the signal is not told until the change runs"]
pub struct SubscriptionChange {
    signal: Rc<dyn ColorSchemeSignal>,
    listener: Listener<()>,
    subscribe: bool,
}

impl fmt::Debug for SubscriptionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionChange")
            .field("subscribe", &self.subscribe)
            .finish_non_exhaustive()
    }
}

impl SubscriptionChange {
    /// Returns `true` if this installs the subscription.
    #[must_use]
    pub fn is_subscribe(&self) -> bool {
        self.subscribe
    }

    /// Carries the change out on the signal.
    pub fn run(self) {
        if self.subscribe {
            self.signal.subscribe(&self.listener);
            tracing::trace!("subscribed to color scheme changes");
        } else {
            self.signal.unsubscribe(&self.listener);
            tracing::trace!("unsubscribed from color scheme changes");
        }
    }
}

/// Resolves theme requests and keeps the preference subscription in step.
///
/// The methods taking `&mut self` come in two flavors: [`set_requested`] and
/// [`teardown`] talk to the signal directly, while [`request`] and
/// [`release_subscription`] hand back a [`SubscriptionChange`] so a resolver
/// kept in a `RefCell` can be released before the signal runs.
///
/// [`set_requested`]: Self::set_requested
/// [`teardown`]: Self::teardown
/// [`request`]: Self::request
/// [`release_subscription`]: Self::release_subscription
pub struct ThemeResolver {
    requested: Theme,
    light: Palette,
    dark: Palette,
    signal: Option<Rc<dyn ColorSchemeSignal>>,
    on_change: Listener<()>,
    subscribed: bool,
}

impl fmt::Debug for ThemeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeResolver")
            .field("requested", &self.requested)
            .field("light", &self.light)
            .field("dark", &self.dark)
            .field("has_signal", &self.signal.is_some())
            .field("subscribed", &self.subscribed)
            .finish_non_exhaustive()
    }
}

impl ThemeResolver {
    /// Creates a resolver for `requested`.
    ///
    /// `on_change` is subscribed to `signal` whenever the request is
    /// [`Theme::System`]; it should call [`refresh`](Self::refresh).
    pub fn new(
        requested: Theme,
        light: Palette,
        dark: Palette,
        signal: Option<Rc<dyn ColorSchemeSignal>>,
        on_change: Listener<()>,
    ) -> Self {
        let mut resolver = Self {
            requested,
            light,
            dark,
            signal,
            on_change,
            subscribed: false,
        };
        if let Some(change) = resolver.sync_subscription() {
            change.run();
        }
        resolver
    }

    /// The current request.
    #[must_use]
    pub fn requested(&self) -> Theme {
        self.requested
    }

    /// Returns `true` while a preference subscription is installed.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Resolves `requested` against the current system preference.
    #[must_use]
    pub fn resolve(&self, requested: Theme) -> Resolution<'_> {
        let resolved = match requested {
            Theme::Light => ResolvedTheme::Light,
            Theme::Dark => ResolvedTheme::Dark,
            Theme::System => match &self.signal {
                Some(signal) if signal.prefers_dark() => ResolvedTheme::Dark,
                _ => ResolvedTheme::Light,
            },
        };
        let palette = match resolved {
            ResolvedTheme::Light => &self.light,
            ResolvedTheme::Dark => &self.dark,
        };
        Resolution {
            requested,
            resolved,
            palette,
        }
    }

    /// Resolves the current request.
    #[must_use]
    pub fn current(&self) -> Resolution<'_> {
        self.resolve(self.requested)
    }

    /// Changes the request, installing or removing the preference subscription.
    ///
    /// This does not write anything; call [`apply`](Self::apply) afterwards.
    pub fn set_requested(&mut self, next: Theme) {
        if let Some(change) = self.request(next) {
            change.run();
        }
    }

    /// Changes the request and returns the subscription change it needs.
    pub fn request(&mut self, next: Theme) -> Option<SubscriptionChange> {
        self.requested = next;
        self.sync_subscription()
    }

    fn sync_subscription(&mut self) -> Option<SubscriptionChange> {
        let signal = self.signal.as_ref()?;
        let wanted = self.requested == Theme::System;
        if wanted == self.subscribed {
            return None;
        }
        self.subscribed = wanted;
        Some(SubscriptionChange {
            signal: signal.clone(),
            listener: self.on_change.clone(),
            subscribe: wanted,
        })
    }

    /// Writes the current resolution to the document root.
    pub fn apply<S: StyleSink + ?Sized>(&self, sink: &S) {
        self.current().to_applied().write(sink);
    }

    /// The state to re-apply after a preference change.
    ///
    /// `None` unless the request is still [`Theme::System`], which protects
    /// against a notification that raced a switch to a concrete theme.
    #[must_use]
    pub fn refreshed(&self) -> Option<AppliedTheme> {
        (self.requested == Theme::System).then(|| self.current().to_applied())
    }

    /// Re-applies after a preference change.
    ///
    /// Returns whether anything was written; see [`refreshed`](Self::refreshed).
    pub fn refresh<S: StyleSink + ?Sized>(&self, sink: &S) -> bool {
        let Some(applied) = self.refreshed() else {
            return false;
        };
        applied.write(sink);
        true
    }

    /// Forgets the preference subscription and returns the unsubscribe to run.
    pub fn release_subscription(&mut self) -> Option<SubscriptionChange> {
        if !self.subscribed {
            return None;
        }
        self.subscribed = false;
        let signal = self.signal.clone()?;
        Some(SubscriptionChange {
            signal,
            listener: self.on_change.clone(),
            subscribe: false,
        })
    }

    /// Unsubscribes and removes everything [`apply`](Self::apply) wrote.
    pub fn teardown<S: StyleSink + ?Sized>(&mut self, sink: &S) {
        if let Some(change) = self.release_subscription() {
            change.run();
        }
        AppliedTheme::clear(sink);
    }
}
