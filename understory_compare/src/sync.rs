// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-way camera mirroring between a pair of viewports.
//!
//! [`ViewportSync::start`] subscribes a [`ViewportEvent::Moved`] handler on each
//! viewport that copies that viewport's camera onto its peer. Copying through
//! [`Viewport::jump_to`] itself notifies `Moved` on the peer, so every mirror
//! runs under a guard:
//!
//! 1) both handlers are unsubscribed and the `mirroring` flag is raised,
//! 2) the camera is copied,
//! 3) the flag is lowered and both handlers are subscribed again.
//!
//! A handler that still runs while the flag is raised returns immediately, so
//! a mirror never triggers the opposite mirror.
//!
//! ## Minimal example
//!
//! ```
//! use std::rc::Rc;
//! use kurbo::Rect;
//! use understory_compare::headless::{HeadlessDocument, HeadlessViewport};
//! use understory_compare::viewport::{Camera, LngLat, Viewport};
//! use understory_compare::ViewportSync;
//!
//! let document = HeadlessDocument::new();
//! let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
//! let a = Rc::new(HeadlessViewport::new(document.create_detached(), bounds));
//! let b = Rc::new(HeadlessViewport::new(document.create_detached(), bounds));
//!
//! let sync = ViewportSync::start(a.clone(), b.clone());
//!
//! let camera = Camera { center: LngLat::new(10.0, 20.0), zoom: 5.0, bearing: 45.0, pitch: 30.0 };
//! a.move_to(camera);
//! assert_eq!(b.camera(), camera);
//! assert_eq!(b.jump_count(), 1);
//! assert_eq!(a.jump_count(), 0);
//!
//! sync.stop();
//! a.move_to(Camera::default());
//! assert_eq!(b.camera(), camera);
//! ```

use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::listener::Listener;
use crate::viewport::{Viewport, ViewportEvent};

/// Keeps two viewports' cameras identical until stopped.
///
/// Dropping the value stops the sync.
#[must_use = "dropping a ViewportSync stops it immediately"]
pub struct ViewportSync {
    inner: Rc<SyncInner>,
}

struct SyncInner {
    peers: RefCell<Option<[Rc<dyn Viewport>; 2]>>,
    handlers: [Listener<()>; 2],
    mirroring: Cell<bool>,
}

impl ViewportSync {
    /// Starts mirroring `a` and `b` onto each other.
    pub fn start(a: Rc<dyn Viewport>, b: Rc<dyn Viewport>) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<SyncInner>| SyncInner {
            peers: RefCell::new(Some([a, b])),
            handlers: [mirror_handler(weak, 0), mirror_handler(weak, 1)],
            mirroring: Cell::new(false),
        });
        if let Some(peers) = inner.peers() {
            inner.attach(&peers);
        }
        tracing::debug!("viewport sync started");
        Self { inner }
    }

    /// Detaches both handlers and releases the viewports.
    ///
    /// Calling this more than once has no further effect.
    pub fn stop(&self) {
        let Some(peers) = self.inner.peers.borrow_mut().take() else {
            return;
        };
        self.inner.detach(&peers);
        tracing::debug!("viewport sync stopped");
    }

    /// Returns `true` until [`stop`](Self::stop) runs.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.peers.borrow().is_some()
    }

    /// Returns `true` while a camera copy is in progress.
    #[must_use]
    pub fn is_mirroring(&self) -> bool {
        self.inner.mirroring.get()
    }
}

impl Drop for ViewportSync {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for ViewportSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportSync")
            .field("active", &self.is_active())
            .field("mirroring", &self.is_mirroring())
            .finish_non_exhaustive()
    }
}

fn mirror_handler(weak: &Weak<SyncInner>, source: usize) -> Listener<()> {
    let weak = weak.clone();
    Listener::new(move |_: &()| {
        if let Some(inner) = weak.upgrade() {
            inner.mirror(source);
        }
    })
}

impl SyncInner {
    fn peers(&self) -> Option<[Rc<dyn Viewport>; 2]> {
        self.peers.borrow().clone()
    }

    fn attach(&self, peers: &[Rc<dyn Viewport>; 2]) {
        for (viewport, handler) in peers.iter().zip(&self.handlers) {
            viewport.on(ViewportEvent::Moved, handler);
        }
    }

    fn detach(&self, peers: &[Rc<dyn Viewport>; 2]) {
        for (viewport, handler) in peers.iter().zip(&self.handlers) {
            viewport.off(ViewportEvent::Moved, handler);
        }
    }

    /// Copies the camera of `peers[source]` onto the other viewport.
    fn mirror(&self, source: usize) {
        if self.mirroring.get() {
            return;
        }
        // The borrow is released before any viewport call so that a viewport
        // may stop the sync from inside `jump_to`.
        let Some(peers) = self.peers() else {
            return;
        };
        let master = &peers[source];
        let clone = &peers[1 - source];

        self.detach(&peers);
        self.mirroring.set(true);
        clone.jump_to(master.camera());
        self.mirroring.set(false);

        if self.peers.borrow().is_some() {
            self.attach(&peers);
        }
        tracing::trace!(source, "mirrored camera");
    }
}
