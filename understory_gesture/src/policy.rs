// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pairwise interaction rules.
//!
//! These are pure functions of two handlers' declared [`Relations`](crate::handler::Relations),
//! their recognizer hooks, and their current per-cycle state. The orchestrator
//! calls them; they never mutate anything.
//!
//! - [`should_wait_for_other`]: `a` must not activate while `b` is unfinished.
//! - [`can_run_simultaneously`]: `a` and `b` may both be active.
//! - [`should_be_cancelled_by`]: `handler` yields when `activating` is promoted.

use crate::handler::Handler;
use crate::recognizer::Recognize;
use crate::types::GestureState;

/// Whether `a` must wait for `b` to finish before it can be promoted.
///
/// True when `a` lists `b` in `wait_for`, when `a`'s recognizer asks to wait for
/// `b`'s failure, or when `b` lists `a` in `blocks`.
pub fn should_wait_for_other<K>(a: &Handler<K>, b: &Handler<K>) -> bool {
    a.id() != b.id() && (a.declares_wait_for(b.id()) || b.relations.blocks.contains(&a.id()))
}

/// Whether `a` and `b` may be active at the same time.
///
/// Declarations are honored in either direction.
pub fn can_run_simultaneously<K>(a: &Handler<K>, b: &Handler<K>) -> bool {
    a.id() == b.id()
        || a.relations.simultaneous_with.contains(&b.id())
        || b.relations.simultaneous_with.contains(&a.id())
        || a.recognizer.should_recognize_simultaneously(b.id())
        || b.recognizer.should_recognize_simultaneously(a.id())
}

/// Whether `handler` must be cancelled because `activating` is being promoted.
///
/// Handlers that share no pointer, or may run simultaneously, are left alone.
/// A handler with a stake (awaiting or `Active`) defers to its recognizer's
/// [`should_be_cancelled_by`](Recognize::should_be_cancelled_by) hook; any
/// other handler is cancelled.
pub fn should_be_cancelled_by<K>(handler: &Handler<K>, activating: &Handler<K>) -> bool {
    if !handler.shares_pointer_with(activating) {
        return false;
    }
    if can_run_simultaneously(handler, activating) {
        return false;
    }
    if handler.id() != activating.id()
        && (handler.is_awaiting || handler.state == GestureState::Active)
    {
        return handler.recognizer.should_be_cancelled_by(activating.id());
    }
    true
}
