// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Divider position geometry.
//!
//! [`PositionModel`] owns the slider position along one axis of a bounding
//! box and derives the declarative outputs for it: the divider translation and
//! the two complementary clip insets. It performs no I/O; [`SliderLayout::apply`]
//! writes a computed layout through a [`StyleSink`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Rect;
//! use understory_compare::{Orientation, PositionModel};
//!
//! let mut model = PositionModel::new(Orientation::Vertical, Rect::new(0.0, 0.0, 800.0, 600.0));
//! let layout = model.set_position(200.0);
//! assert_eq!(layout.clip_a_css(), "inset(0 600px 0 0)");
//! assert_eq!(layout.clip_b_css(), "inset(0 0 0 200px)");
//!
//! // Out-of-range input is clamped into [0, width].
//! assert_eq!(model.set_position(1000.0).position, 800.0);
//! ```

use alloc::format;
use alloc::string::String;
use core::str::FromStr;

use kurbo::{Insets, Point, Rect, Vec2};

use crate::error::ConfigurationError;
use crate::host::{ElementId, StyleSink, Target};

/// CSS property carrying the divider translation.
pub const TRANSFORM_PROPERTY: &str = "transform";
/// CSS property carrying each viewport's visible region.
pub const CLIP_PROPERTY: &str = "clip-path";

/// Which way the divider runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    /// A vertical divider moving along X; viewport A is on the left.
    #[default]
    Vertical,
    /// A horizontal divider moving along Y; viewport A is on top.
    Horizontal,
}

impl Orientation {
    /// Returns `true` for [`Orientation::Horizontal`].
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        self == Self::Horizontal
    }

    /// Lowercase name, as used in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

impl FromStr for Orientation {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            other => Err(ConfigurationError::UnknownOrientation(other.into())),
        }
    }
}

/// What happens to the position when the bounding box changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ResizeMode {
    /// Keep the position value and clamp it into the new extent.
    #[default]
    Clamp,
    /// Keep the position's fraction of the extent.
    ///
    /// Falls back to [`ResizeMode::Clamp`] when the previous extent was empty.
    Proportional,
}

/// Elements a [`SliderLayout`] is written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliderTargets {
    /// The divider's container, translated along the active axis.
    pub control: ElementId,
    /// Container of viewport A, visible before the divider.
    pub container_a: ElementId,
    /// Container of viewport B, visible after the divider.
    pub container_b: ElementId,
}

/// Declarative outputs for one divider position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderLayout {
    /// Orientation the layout was computed for.
    pub orientation: Orientation,
    /// The clamped position.
    pub position: f64,
    /// Divider translation. The cross-axis component is always zero.
    pub translation: Vec2,
    /// Clip insets of viewport A.
    pub clip_a: Insets,
    /// Clip insets of viewport B.
    pub clip_b: Insets,
}

impl SliderLayout {
    /// CSS `transform` value for the divider container.
    #[must_use]
    pub fn transform_css(&self) -> String {
        match self.orientation {
            Orientation::Vertical => format!("translate({}px, 0)", self.translation.x),
            Orientation::Horizontal => format!("translate(0, {}px)", self.translation.y),
        }
    }

    /// CSS `clip-path` value for viewport A.
    #[must_use]
    pub fn clip_a_css(&self) -> String {
        inset_css(self.clip_a)
    }

    /// CSS `clip-path` value for viewport B.
    #[must_use]
    pub fn clip_b_css(&self) -> String {
        inset_css(self.clip_b)
    }

    /// Writes this layout to `targets`.
    pub fn apply<S: StyleSink + ?Sized>(&self, sink: &S, targets: &SliderTargets) {
        sink.set_property(
            Target::Element(targets.control),
            TRANSFORM_PROPERTY,
            &self.transform_css(),
        );
        sink.set_property(
            Target::Element(targets.container_a),
            CLIP_PROPERTY,
            &self.clip_a_css(),
        );
        sink.set_property(
            Target::Element(targets.container_b),
            CLIP_PROPERTY,
            &self.clip_b_css(),
        );
    }

    /// Removes everything [`apply`](Self::apply) writes.
    pub fn clear<S: StyleSink + ?Sized>(sink: &S, targets: &SliderTargets) {
        sink.remove_property(Target::Element(targets.control), TRANSFORM_PROPERTY);
        sink.remove_property(Target::Element(targets.container_a), CLIP_PROPERTY);
        sink.remove_property(Target::Element(targets.container_b), CLIP_PROPERTY);
    }
}

/// CSS `inset()` in top/right/bottom/left order. Zero lengths print unitless.
fn inset_css(insets: Insets) -> String {
    format!(
        "inset({} {} {} {})",
        length(insets.y0),
        length(insets.x1),
        length(insets.y1),
        length(insets.x0)
    )
}

fn length(value: f64) -> String {
    if value == 0.0 {
        String::from("0")
    } else {
        format!("{value}px")
    }
}

/// Slider position along the active axis of a bounding box.
#[derive(Clone, Debug)]
pub struct PositionModel {
    orientation: Orientation,
    bounds: Rect,
    position: f64,
}

impl PositionModel {
    /// Creates a model over `bounds` with the position at zero.
    #[must_use]
    pub fn new(orientation: Orientation, bounds: Rect) -> Self {
        Self {
            orientation,
            bounds,
            position: 0.0,
        }
    }

    /// The orientation fixed at construction.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The current, already clamped, position.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Size of the bounding box along the active axis.
    #[must_use]
    pub fn extent(&self) -> f64 {
        axis_extent(self.orientation, self.bounds)
    }

    /// Clamps `raw` into `[0, extent]`.
    ///
    /// `NaN` clamps to zero.
    #[must_use]
    pub fn clamp(&self, raw: f64) -> f64 {
        // `f64::max` discards NaN, so this never yields NaN.
        raw.max(0.0).min(self.extent().max(0.0))
    }

    /// Clamps `raw`, stores it as the current position, and returns the layout.
    pub fn set_position(&mut self, raw: f64) -> SliderLayout {
        self.position = self.clamp(raw);
        self.layout()
    }

    /// Layout for the current position.
    #[must_use]
    pub fn layout(&self) -> SliderLayout {
        let position = self.position;
        let width = self.bounds.width();
        let height = self.bounds.height();
        match self.orientation {
            Orientation::Vertical => SliderLayout {
                orientation: self.orientation,
                position,
                translation: Vec2::new(position, 0.0),
                clip_a: Insets::new(0.0, 0.0, width - position, 0.0),
                clip_b: Insets::new(position, 0.0, 0.0, 0.0),
            },
            Orientation::Horizontal => SliderLayout {
                orientation: self.orientation,
                position,
                translation: Vec2::new(0.0, position),
                clip_a: Insets::new(0.0, 0.0, 0.0, height - position),
                clip_b: Insets::new(0.0, position, 0.0, 0.0),
            },
        }
    }

    /// Replaces the bounding box and re-applies the position through the clamp.
    pub fn set_bounds(&mut self, bounds: Rect, mode: ResizeMode) -> SliderLayout {
        let old_extent = self.extent();
        self.bounds = bounds;
        let raw = match mode {
            ResizeMode::Proportional if old_extent > 0.0 => {
                self.position / old_extent * self.extent()
            }
            ResizeMode::Proportional | ResizeMode::Clamp => self.position,
        };
        self.set_position(raw)
    }

    /// Translates a client-space point into a clamped position on the active axis.
    #[must_use]
    pub fn local_position(&self, point: Point) -> f64 {
        let local = match self.orientation {
            Orientation::Vertical => point.x - self.bounds.x0,
            Orientation::Horizontal => point.y - self.bounds.y0,
        };
        self.clamp(local)
    }
}

fn axis_extent(orientation: Orientation, bounds: Rect) -> f64 {
    match orientation {
        Orientation::Vertical => bounds.width(),
        Orientation::Horizontal => bounds.height(),
    }
}
