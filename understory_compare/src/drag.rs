// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Divider drag state: press, move, and release across mouse and touch input.
//!
//! ## Usage
//!
//! 1) On a press over the handle, call [`DragController::press`]. It returns the
//!    new [`DragSession`], whose [`listened_kinds`](DragSession::listened_kinds)
//!    name the document-scoped move and release events to start listening for.
//! 2) On each move, [`DragController::accepts_move`] tells whether the event
//!    belongs to the active session.
//! 3) On release, [`DragController::release`] ends a matching session and
//!    returns it so the same listeners can be removed.
//! 4) [`DragController::cancel`] ends a session without a release, for teardown.
//!
//! ## Minimal example
//!
//! ```
//! use understory_compare::drag::{DragController, Modality};
//! use understory_compare::host::InputKind;
//!
//! let mut drag = DragController::default();
//!
//! let session = drag.press(InputKind::MouseDown).unwrap();
//! assert_eq!(session.modality(), Modality::Pointer);
//! assert_eq!(session.listened_kinds(), [InputKind::MouseMove, InputKind::MouseUp]);
//!
//! assert!(drag.accepts_move(InputKind::MouseMove));
//! assert!(!drag.accepts_move(InputKind::TouchMove));
//!
//! // A touch release does not end a mouse drag.
//! assert!(drag.release(InputKind::TouchEnd).is_none());
//! assert!(drag.release(InputKind::MouseUp).is_some());
//! assert!(!drag.is_dragging());
//! ```

use crate::host::InputKind;

/// The input family a drag session was started with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modality {
    /// Mouse or pen input.
    Pointer,
    /// Touch input.
    Touch,
}

impl Modality {
    /// The modality of an input event kind.
    #[must_use]
    pub fn of(kind: InputKind) -> Self {
        if kind.is_touch() {
            Self::Touch
        } else {
            Self::Pointer
        }
    }

    /// The press event that starts a session of this modality.
    #[must_use]
    pub fn press_kind(self) -> InputKind {
        match self {
            Self::Pointer => InputKind::MouseDown,
            Self::Touch => InputKind::TouchStart,
        }
    }

    /// The move event tracked during a session of this modality.
    #[must_use]
    pub fn move_kind(self) -> InputKind {
        match self {
            Self::Pointer => InputKind::MouseMove,
            Self::Touch => InputKind::TouchMove,
        }
    }

    /// The release event that ends a session of this modality.
    #[must_use]
    pub fn release_kind(self) -> InputKind {
        match self {
            Self::Pointer => InputKind::MouseUp,
            Self::Touch => InputKind::TouchEnd,
        }
    }
}

/// An active drag, from press to matching release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragSession {
    modality: Modality,
}

impl DragSession {
    /// Modality that started this session.
    #[must_use]
    pub fn modality(self) -> Modality {
        self.modality
    }

    /// Move and release kinds to listen for while this session is active.
    #[must_use]
    pub fn listened_kinds(self) -> [InputKind; 2] {
        [self.modality.move_kind(), self.modality.release_kind()]
    }
}

/// Tracks whether the divider is being dragged, and with which modality.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    /// Starts a session for a press of `kind`.
    ///
    /// Returns `None` if `kind` is not a press or a session is already active.
    pub fn press(&mut self, kind: InputKind) -> Option<DragSession> {
        if self.session.is_some() {
            return None;
        }
        let modality = Modality::of(kind);
        if modality.press_kind() != kind {
            return None;
        }
        let session = DragSession { modality };
        self.session = Some(session);
        Some(session)
    }

    /// Returns `true` if a move of `kind` belongs to the active session.
    #[must_use]
    pub fn accepts_move(&self, kind: InputKind) -> bool {
        self.session
            .is_some_and(|session| session.modality.move_kind() == kind)
    }

    /// Ends the session if `kind` is its release event.
    ///
    /// Returns the ended session, or `None` if nothing matched.
    pub fn release(&mut self, kind: InputKind) -> Option<DragSession> {
        let session = self.session?;
        if session.modality.release_kind() != kind {
            return None;
        }
        self.session = None;
        Some(session)
    }

    /// Ends any active session without a release.
    pub fn cancel(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    /// The active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<DragSession> {
        self.session
    }

    /// Returns `true` while a session is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }
}
