// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler storage and the view → handler back-references.
//!
//! The registry owns handlers but never view lifetimes. Views are opaque keys;
//! the host reports removed views with [`Registry::remove_view`] (usually through
//! [`Orchestrator::view_removed`](crate::orchestrator::Orchestrator::view_removed)).

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::error::GestureError;
use crate::handler::Handler;
use crate::types::HandlerId;

/// Handlers keyed by id, plus the handlers attached to each view.
#[derive(Debug)]
pub struct Registry<K> {
    handlers: BTreeMap<HandlerId, Handler<K>>,
    by_view: BTreeMap<K, Vec<HandlerId>>,
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
            by_view: BTreeMap::new(),
        }
    }
}

impl<K: Copy + Ord> Registry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `handler`.
    ///
    /// Fails if the id is taken or the hit slop is invalid.
    pub fn register(&mut self, handler: Handler<K>) -> Result<(), GestureError> {
        let id = handler.id();
        if self.handlers.contains_key(&id) {
            return Err(GestureError::DuplicateHandler(id));
        }
        handler.config().hit_slop.validate()?;
        let view = handler.view;
        self.handlers.insert(id, handler);
        if let Some(view) = view {
            self.by_view.entry(view).or_default().push(id);
        }
        Ok(())
    }

    /// Bind `id` to `view`, unbinding it from any previous view.
    pub fn attach(&mut self, id: HandlerId, view: K) -> Result<(), GestureError> {
        let previous = {
            let handler = self
                .handlers
                .get_mut(&id)
                .ok_or(GestureError::UnknownHandler(id))?;
            handler.view.replace(view)
        };
        if let Some(previous) = previous {
            self.unlink(previous, id);
        }
        let list = self.by_view.entry(view).or_default();
        if !list.contains(&id) {
            list.push(id);
        }
        Ok(())
    }

    /// Unbind `id` from its view. Returns the view it was bound to.
    pub fn detach(&mut self, id: HandlerId) -> Option<K> {
        let view = self.handlers.get_mut(&id)?.view.take()?;
        self.unlink(view, id);
        Some(view)
    }

    /// Remove and return handler `id`.
    pub fn remove(&mut self, id: HandlerId) -> Option<Handler<K>> {
        self.detach(id);
        self.handlers.remove(&id)
    }

    /// Forget `view`, unbinding every handler attached to it.
    ///
    /// Returns the ids of the unbound handlers in attachment order.
    pub fn remove_view(&mut self, view: K) -> Vec<HandlerId> {
        let ids = self.by_view.remove(&view).unwrap_or_default();
        for id in &ids {
            if let Some(h) = self.handlers.get_mut(id) {
                h.view = None;
            }
        }
        ids
    }

    /// Handlers attached to `view`, in attachment order.
    pub fn handlers_for_view(&self, view: K) -> &[HandlerId] {
        self.by_view.get(&view).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Handler `id`, if registered.
    pub fn get(&self, id: HandlerId) -> Option<&Handler<K>> {
        self.handlers.get(&id)
    }

    /// Mutable handler `id`, if registered.
    pub fn get_mut(&mut self, id: HandlerId) -> Option<&mut Handler<K>> {
        self.handlers.get_mut(&id)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// All registered handlers in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Handler<K>> + '_ {
        self.handlers.values()
    }

    fn unlink(&mut self, view: K, id: HandlerId) {
        if let Some(list) = self.by_view.get_mut(&view) {
            list.retain(|h| *h != id);
            if list.is_empty() {
                self.by_view.remove(&view);
            }
        }
    }
}
