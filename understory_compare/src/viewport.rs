// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability every compared surface must provide.

use kurbo::Rect;

use crate::host::ElementId;
use crate::listener::Listener;

/// A geographic coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LngLat {
    /// Creates a coordinate from longitude and latitude.
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Complete camera state of a viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    /// Map center.
    pub center: LngLat,
    /// Zoom level.
    pub zoom: f64,
    /// Rotation in degrees.
    pub bearing: f64,
    /// Tilt in degrees.
    pub pitch: f64,
}

/// Notifications a [`Viewport`] delivers to subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewportEvent {
    /// The camera changed, including changes made through [`Viewport::jump_to`].
    Moved,
    /// The container's bounding box changed.
    Resized,
}

/// A rendered surface the compare control is laid over.
///
/// The control never owns the surface. It reads the camera and bounds, writes
/// the camera through [`jump_to`](Self::jump_to), and subscribes to
/// [`ViewportEvent`]s by [`Listener`] identity.
///
/// Implementations deliver notifications synchronously on the calling thread
/// and must tolerate `on`/`off` calls made from inside a notification.
pub trait Viewport {
    /// Current camera state.
    fn camera(&self) -> Camera;

    /// Sets center, zoom, bearing and pitch in one step.
    ///
    /// Implementations are expected to deliver [`ViewportEvent::Moved`]
    /// before returning.
    fn jump_to(&self, camera: Camera);

    /// The container element the surface renders into.
    fn container(&self) -> ElementId;

    /// Bounding box of the container in client coordinates.
    fn bounds(&self) -> Rect;

    /// Subscribes `listener` to `event`. Subscribing twice has no effect.
    fn on(&self, event: ViewportEvent, listener: &Listener<()>);

    /// Unsubscribes `listener` from `event`. Unknown listeners are ignored.
    fn off(&self, event: ViewportEvent, listener: &Listener<()>);
}
