// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction options for [`Compare`](crate::Compare).

use alloc::string::String;
use alloc::vec::Vec;

use crate::position::{Orientation, ResizeMode};
use crate::theme::{Palette, PaletteOverride, Theme};

/// Handle icon used when [`CompareOptions::swiper_icon`] is unset.
pub const DEFAULT_SWIPER_ICON: &str = "url(\"data:image/svg+xml;charset=utf-8,%3Csvg xmlns='http://www.w3.org/2000/svg' width='60' height='60' viewBox='0 0 24 24'%3E%3Cpath fill='%23fff' d='M9 6l-6 6 6 6V6zm6 0v12l6-6-6-6z'/%3E%3C/svg%3E\")";

/// Visual overrides for the divider handle.
///
/// Each set field is written as an inline style property on the handle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct HandleStyle {
    /// `background-color`.
    pub background_color: Option<String>,
    /// `width`.
    pub width: Option<String>,
    /// `height`.
    pub height: Option<String>,
    /// `border-radius`.
    pub border_radius: Option<String>,
    /// `box-shadow`.
    pub box_shadow: Option<String>,
    /// `border`.
    pub border: Option<String>,
    /// `opacity`.
    pub opacity: Option<String>,
}

impl HandleStyle {
    /// The set fields as `(css property, value)` pairs.
    #[must_use]
    pub fn declarations(&self) -> Vec<(&'static str, &str)> {
        [
            ("background-color", &self.background_color),
            ("width", &self.width),
            ("height", &self.height),
            ("border-radius", &self.border_radius),
            ("box-shadow", &self.box_shadow),
            ("border", &self.border),
            ("opacity", &self.opacity),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }
}

/// Options recognized by [`Compare::new`](crate::Compare::new).
///
/// ```
/// use understory_compare::{CompareOptions, Orientation, Theme};
///
/// let options = CompareOptions::default()
///     .orientation(Orientation::Horizontal)
///     .theme(Theme::Dark)
///     .mousemove(true);
/// assert_eq!(options.theme, Theme::Dark);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct CompareOptions {
    /// Divider orientation.
    pub orientation: Orientation,
    /// Track the pointer over both viewports outside of dragging, letting the
    /// surfaces keep receiving input under the divider.
    pub mousemove: bool,
    /// Requested theme.
    pub theme: Theme,
    /// Overrides merged into the light palette.
    pub light_colors: PaletteOverride,
    /// Overrides merged into the dark palette.
    pub dark_colors: PaletteOverride,
    /// `background-image` value for the handle.
    pub swiper_icon: Option<String>,
    /// Inline style overrides for the handle.
    pub swiper_style: HandleStyle,
    /// Position policy on resize.
    pub resize_mode: ResizeMode,
}

impl CompareOptions {
    /// Sets [`orientation`](Self::orientation).
    #[must_use]
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets [`mousemove`](Self::mousemove).
    #[must_use]
    pub fn mousemove(mut self, enabled: bool) -> Self {
        self.mousemove = enabled;
        self
    }

    /// Sets [`theme`](Self::theme).
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Sets [`light_colors`](Self::light_colors).
    #[must_use]
    pub fn light_colors(mut self, colors: PaletteOverride) -> Self {
        self.light_colors = colors;
        self
    }

    /// Sets [`dark_colors`](Self::dark_colors).
    #[must_use]
    pub fn dark_colors(mut self, colors: PaletteOverride) -> Self {
        self.dark_colors = colors;
        self
    }

    /// Sets [`swiper_icon`](Self::swiper_icon).
    #[must_use]
    pub fn swiper_icon(mut self, icon: impl Into<String>) -> Self {
        self.swiper_icon = Some(icon.into());
        self
    }

    /// Sets [`swiper_style`](Self::swiper_style).
    #[must_use]
    pub fn swiper_style(mut self, style: HandleStyle) -> Self {
        self.swiper_style = style;
        self
    }

    /// Sets [`resize_mode`](Self::resize_mode).
    #[must_use]
    pub fn resize_mode(mut self, mode: ResizeMode) -> Self {
        self.resize_mode = mode;
        self
    }

    /// The handle's `background-image`.
    #[must_use]
    pub fn handle_icon(&self) -> &str {
        self.swiper_icon.as_deref().unwrap_or(DEFAULT_SWIPER_ICON)
    }

    /// Light palette after overrides.
    #[must_use]
    pub fn light_palette(&self) -> Palette {
        Palette::light().merged(&self.light_colors)
    }

    /// Dark palette after overrides.
    #[must_use]
    pub fn dark_palette(&self) -> Palette {
        Palette::dark().merged(&self.dark_colors)
    }
}
