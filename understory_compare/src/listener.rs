// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Callback handles and a set-based listener registry.
//!
//! A [`Listener`] is a shared callback compared by identity: two clones of the
//! same listener are equal, two listeners built from identical closures are
//! not. That identity is what lets collaborators `off` exactly the handler
//! they were given in `on`, and what makes repeated registration idempotent in
//! [`ListenerRegistry`].
//!
//! ## Minimal example
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_compare::listener::{Listener, ListenerRegistry};
//!
//! let hits = Rc::new(Cell::new(0));
//! let listener = {
//!     let hits = hits.clone();
//!     Listener::new(move |n: &u32| hits.set(hits.get() + *n))
//! };
//!
//! let mut registry: ListenerRegistry<&'static str, u32> = ListenerRegistry::new();
//! registry.insert("tick", &listener);
//! registry.insert("tick", &listener); // idempotent
//! registry.fire(&"tick", &2);
//! assert_eq!(hits.get(), 2);
//!
//! registry.remove(&"tick", &listener);
//! registry.fire(&"tick", &2);
//! assert_eq!(hits.get(), 2);
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

use hashbrown::{HashMap, HashSet};

/// A shared callback receiving `&T`, compared and hashed by identity.
pub struct Listener<T: ?Sized> {
    callback: Rc<dyn Fn(&T)>,
}

impl<T: ?Sized> Listener<T> {
    /// Wraps a closure into a new listener with a fresh identity.
    pub fn new(callback: impl Fn(&T) + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Invokes the callback.
    #[inline]
    pub fn call(&self, payload: &T) {
        (self.callback)(payload);
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.callback).cast::<()>()
    }
}

impl<T: ?Sized> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<T: ?Sized> PartialEq for Listener<T> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.addr(), other.addr())
    }
}

impl<T: ?Sized> Eq for Listener<T> {}

impl<T: ?Sized> Hash for Listener<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener").field(&self.addr()).finish()
    }
}

/// Maps an event key to a set of listeners.
///
/// Insertion order is not preserved and a listener is stored at most once per
/// key. Firing snapshots the set first, so callbacks may freely register or
/// remove listeners while they run.
pub struct ListenerRegistry<K, T: ?Sized> {
    listeners: HashMap<K, HashSet<Listener<T>>>,
}

impl<K, T: ?Sized> Default for ListenerRegistry<K, T> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }
}

impl<K: fmt::Debug, T: ?Sized> fmt::Debug for ListenerRegistry<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.listeners.iter().map(|(k, set)| (k, set.len())))
            .finish()
    }
}

impl<K: Eq + Hash, T: ?Sized> ListenerRegistry<K, T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` under `key`.
    ///
    /// Returns `false` if it was already registered.
    pub fn insert(&mut self, key: K, listener: &Listener<T>) -> bool {
        self.listeners
            .entry(key)
            .or_default()
            .insert(listener.clone())
    }

    /// Removes `listener` from `key`.
    ///
    /// Returns `false` if it was not registered.
    pub fn remove(&mut self, key: &K, listener: &Listener<T>) -> bool {
        let Some(set) = self.listeners.get_mut(key) else {
            return false;
        };
        let removed = set.remove(listener);
        if set.is_empty() {
            self.listeners.remove(key);
        }
        removed
    }

    /// Returns `true` if `listener` is registered under `key`.
    #[must_use]
    pub fn contains(&self, key: &K, listener: &Listener<T>) -> bool {
        self.listeners
            .get(key)
            .is_some_and(|set| set.contains(listener))
    }

    /// Number of listeners registered under `key`.
    #[must_use]
    pub fn len(&self, key: &K) -> usize {
        self.listeners.get(key).map_or(0, |set| set.len())
    }

    /// Returns `true` if no listener is registered under any key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Clones the listeners registered under `key`.
    ///
    /// Callers that hold the registry behind a `RefCell` should snapshot with
    /// this, release the borrow, and only then invoke the callbacks.
    #[must_use]
    pub fn snapshot(&self, key: &K) -> Vec<Listener<T>> {
        self.listeners
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Invokes every listener registered under `key` with `payload`.
    ///
    /// Firing a key with no listeners is a no-op.
    pub fn fire(&self, key: &K, payload: &T) {
        for listener in self.snapshot(key) {
            listener.call(payload);
        }
    }
}
